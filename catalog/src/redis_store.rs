//! Redis-backed hotel store.
//!
//! Hotels are stored as JSON strings under `hotel:id:{id}` and destination
//! lists under `hotels:destination:{id}`, both with an expiry so that data
//! from a supplier that went away ages out.

use async_trait::async_trait;
use ingest::hotel::Hotel;
use ingest::repository::{HotelRepository, StoreError, destination_key, hotel_key};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);
const BATCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    ttl: Duration,
}

impl RedisStore {
    /// Connects to `url`, failing if the server cannot be reached in time.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;

        let conn = timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout)?
            .map_err(|e| StoreError::Connection(format!("failed to connect to Redis: {e}")))?;

        tracing::info!(url, "Connected to Redis");
        Ok(RedisStore { conn, ttl })
    }

    async fn set(&self, key: String, value: String, limit: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let ttl_secs = self.ttl.as_secs().max(1);
        with_timeout(limit, conn.set_ex::<_, _, ()>(key, value, ttl_secs)).await
    }
}

async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    timeout(limit, fut)
        .await
        .map_err(|_| StoreError::Timeout)?
        .map_err(|e| StoreError::Command(e.to_string()))
}

/// Decodes the stored values, skipping (and logging) the ones that are
/// missing or unreadable.
fn decode_found(ids: &[String], values: Vec<Option<String>>) -> Vec<Hotel> {
    ids.iter()
        .zip(values)
        .filter_map(|(hotel_id, value)| {
            let Some(data) = value else {
                tracing::debug!(%hotel_id, "Hotel not found");
                return None;
            };
            match serde_json::from_str(&data) {
                Ok(hotel) => Some(hotel),
                Err(e) => {
                    tracing::warn!(%hotel_id, error = %e, "Failed to decode stored hotel");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl HotelRepository for RedisStore {
    async fn put_hotel(&self, hotel_id: &str, hotel: &Hotel) -> Result<(), StoreError> {
        let data = serde_json::to_string(hotel)?;
        self.set(hotel_key(hotel_id), data, COMMAND_TIMEOUT).await?;
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
        let data = serde_json::to_string(hotels)?;
        self.set(destination_key(destination_id), data, BATCH_TIMEOUT)
            .await?;
        tracing::debug!(destination_id, hotels = hotels.len(), "Stored hotels for destination");
        Ok(())
    }

    async fn get_hotel(&self, hotel_id: &str) -> Result<Option<Hotel>, StoreError> {
        let mut conn = self.conn.clone();
        let data: Option<String> =
            with_timeout(COMMAND_TIMEOUT, conn.get(hotel_key(hotel_id))).await?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn get_destination(&self, destination_id: i64) -> Result<Vec<Hotel>, StoreError> {
        let mut conn = self.conn.clone();
        let data: Option<String> =
            with_timeout(COMMAND_TIMEOUT, conn.get(destination_key(destination_id))).await?;

        match data {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    async fn get_hotels(&self, hotel_ids: &[String]) -> Result<Vec<Hotel>, StoreError> {
        if hotel_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let keys: Vec<String> = hotel_ids.iter().map(|id| hotel_key(id)).collect();

        // A single key is sent as GET, whose reply is not an array
        let values: Vec<Option<String>> = if let [key] = keys.as_slice() {
            vec![with_timeout(BATCH_TIMEOUT, conn.get(key)).await?]
        } else {
            with_timeout(BATCH_TIMEOUT, conn.mget(&keys)).await?
        };

        Ok(decode_found(hotel_ids, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_found_skips_missing_and_corrupt_values() {
        let stored = Hotel {
            hotel_id: "iJhz".into(),
            destination_id: 5432,
            ..Default::default()
        };
        let ids = vec!["iJhz".to_string(), "missing".to_string(), "corrupt".to_string()];
        let values = vec![
            Some(serde_json::to_string(&stored).unwrap()),
            None,
            Some("{not json".to_string()),
        ];

        assert_eq!(decode_found(&ids, values), vec![stored]);
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisStore::connect("not-a-redis-url", Duration::from_secs(60)).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn test_connect_unreachable_server() {
        let result = RedisStore::connect("redis://127.0.0.1:1/0", Duration::from_secs(60)).await;
        assert!(matches!(
            result,
            Err(StoreError::Connection(_)) | Err(StoreError::Timeout)
        ));
    }
}
