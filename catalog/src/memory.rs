//! In-process hotel store. Entries expire like their Redis counterparts so a
//! hotel that stops being published eventually disappears.

use async_trait::async_trait;
use ingest::hotel::Hotel;
use ingest::repository::{HotelRepository, StoreError};
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

const MAX_HOTELS: u64 = 1_000_000;
const MAX_DESTINATIONS: u64 = 100_000;

pub struct MemoryStore {
    hotels: Cache<String, Arc<Hotel>>,
    destinations: Cache<i64, Arc<Vec<Hotel>>>,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        MemoryStore {
            hotels: Cache::builder()
                .max_capacity(MAX_HOTELS)
                .time_to_live(ttl)
                .build(),
            destinations: Cache::builder()
                .max_capacity(MAX_DESTINATIONS)
                .time_to_live(ttl)
                .build(),
        }
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn put_hotel(&self, hotel_id: &str, hotel: &Hotel) -> Result<(), StoreError> {
        self.hotels
            .insert(hotel_id.to_string(), Arc::new(hotel.clone()));
        tracing::debug!(hotel_id, "Stored hotel");
        Ok(())
    }

    async fn put_destination(
        &self,
        destination_id: i64,
        hotels: &[Hotel],
    ) -> Result<(), StoreError> {
        if hotels.is_empty() {
            return Ok(());
        }
        self.destinations
            .insert(destination_id, Arc::new(hotels.to_vec()));
        tracing::debug!(destination_id, hotels = hotels.len(), "Stored hotels for destination");
        Ok(())
    }

    async fn get_hotel(&self, hotel_id: &str) -> Result<Option<Hotel>, StoreError> {
        Ok(self.hotels.get(hotel_id).map(|hotel| (*hotel).clone()))
    }

    async fn get_destination(&self, destination_id: i64) -> Result<Vec<Hotel>, StoreError> {
        Ok(self
            .destinations
            .get(&destination_id)
            .map(|hotels| (*hotels).clone())
            .unwrap_or_default())
    }

    async fn get_hotels(&self, hotel_ids: &[String]) -> Result<Vec<Hotel>, StoreError> {
        let hotels = hotel_ids
            .iter()
            .filter_map(|id| match self.hotels.get(id) {
                Some(hotel) => Some((*hotel).clone()),
                None => {
                    tracing::debug!(hotel_id = %id, "Hotel not found");
                    None
                }
            })
            .collect();
        Ok(hotels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(hotel_id: &str, destination_id: i64) -> Hotel {
        Hotel {
            hotel_id: hotel_id.into(),
            destination_id,
            hotel_name: format!("Hotel {hotel_id}"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_put_and_get_hotel() {
        let store = MemoryStore::new(Duration::from_secs(60));
        assert_eq!(store.get_hotel("iJhz").await.unwrap(), None);

        store.put_hotel("iJhz", &hotel("iJhz", 5432)).await.unwrap();
        assert_eq!(
            store.get_hotel("iJhz").await.unwrap(),
            Some(hotel("iJhz", 5432))
        );

        // A later run overwrites the previous record
        let mut updated = hotel("iJhz", 5432);
        updated.details = "Renovated".into();
        store.put_hotel("iJhz", &updated).await.unwrap();
        assert_eq!(store.get_hotel("iJhz").await.unwrap().unwrap().details, "Renovated");
    }

    #[tokio::test]
    async fn test_destination_roundtrip() {
        let store = MemoryStore::new(Duration::from_secs(60));
        assert!(store.get_destination(5432).await.unwrap().is_empty());

        let hotels = vec![hotel("iJhz", 5432), hotel("SjyX", 5432)];
        store.put_destination(5432, &hotels).await.unwrap();
        assert_eq!(store.get_destination(5432).await.unwrap(), hotels);
    }

    #[tokio::test]
    async fn test_get_hotels_skips_unknown_ids_and_keeps_order() {
        let store = MemoryStore::new(Duration::from_secs(60));
        store.put_hotel("a", &hotel("a", 1)).await.unwrap();
        store.put_hotel("b", &hotel("b", 1)).await.unwrap();

        let ids = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        let found: Vec<String> = store
            .get_hotels(&ids)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.hotel_id)
            .collect();
        assert_eq!(found, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let store = MemoryStore::new(Duration::from_millis(50));
        store.put_hotel("iJhz", &hotel("iJhz", 5432)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(store.get_hotel("iJhz").await.unwrap(), None);
    }
}
