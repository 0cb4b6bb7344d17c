//! Plumbing shared by the hotelsync crates: a small hyper server loop, the
//! admin (health/readiness) service and metric definition helpers.

pub mod admin_service;
pub mod http;
pub mod metrics_defs;
