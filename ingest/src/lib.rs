//! Supplier ingestion for hotel inventory.
//!
//! A pipeline run fans out to every configured supplier, normalizes what
//! comes back, reconciles records describing the same hotel into a single
//! canonical record, validates the result and hands both the per-hotel and
//! the per-destination views to a [`repository::HotelRepository`].

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod grouping;
pub mod hotel;
pub mod merger;
pub mod metrics_defs;
pub mod normalize;
pub mod pipeline;
pub mod repository;
pub mod supplier;
pub mod validator;

#[cfg(test)]
mod testutils;

pub use pipeline::{Pipeline, RunReport};
