//! Storage boundary for reconciled hotels.

use crate::hotel::Hotel;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store command failed: {0}")]
    Command(String),

    #[error("store operation timed out")]
    Timeout,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value persistence of canonical hotels, addressable by hotel and by
/// destination. Writes are independent of each other: a failed write does
/// not undo or prevent any other.
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn put_hotel(&self, hotel_id: &str, hotel: &Hotel) -> Result<(), StoreError>;

    async fn put_destination(&self, destination_id: i64, hotels: &[Hotel])
    -> Result<(), StoreError>;

    async fn get_hotel(&self, hotel_id: &str) -> Result<Option<Hotel>, StoreError>;

    /// Hotels stored for a destination; empty when nothing is stored.
    async fn get_destination(&self, destination_id: i64) -> Result<Vec<Hotel>, StoreError>;

    /// Hotels for the given ids in request order. Unknown ids are skipped.
    async fn get_hotels(&self, hotel_ids: &[String]) -> Result<Vec<Hotel>, StoreError>;
}

pub fn hotel_key(hotel_id: &str) -> String {
    format!("hotel:id:{hotel_id}")
}

pub fn destination_key(destination_id: i64) -> String {
    format!("hotels:destination:{destination_id}")
}
