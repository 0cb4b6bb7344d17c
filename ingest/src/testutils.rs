use crate::errors::FetchError;
use crate::hotel::{Hotel, RawHotel};
use crate::repository::{HotelRepository, StoreError};
use crate::supplier::SupplierSource;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

pub fn supplier_url(name: &str) -> Url {
    Url::parse(&format!("http://suppliers.test/{name}")).unwrap()
}

pub fn raw_hotel(hotel_id: &str, destination_id: i64) -> RawHotel {
    RawHotel {
        hotel_id: Some(hotel_id.to_string()),
        destination_id: Some(destination_id),
        ..Default::default()
    }
}

pub fn hotel(hotel_id: &str, destination_id: i64) -> Hotel {
    Hotel {
        hotel_id: hotel_id.to_string(),
        destination_id,
        ..Default::default()
    }
}

pub enum FakeFeed {
    Records(Vec<RawHotel>),
    Status(u16),
    Hang,
    Panic,
}

/// Supplier source answering from canned feeds keyed by URL.
#[derive(Default)]
pub struct FakeSupplierSource {
    feeds: HashMap<Url, FakeFeed>,
}

impl FakeSupplierSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &Url, feed: FakeFeed) -> Self {
        self.feeds.insert(url.clone(), feed);
        self
    }
}

#[async_trait]
impl SupplierSource for FakeSupplierSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<RawHotel>, FetchError> {
        match self.feeds.get(url) {
            Some(FakeFeed::Records(records)) => Ok(records.clone()),
            Some(FakeFeed::Status(status)) => Err(FetchError::Status(*status)),
            Some(FakeFeed::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(vec![])
            }
            Some(FakeFeed::Panic) => panic!("supplier feed exploded"),
            None => Err(FetchError::Status(404)),
        }
    }
}

/// In-memory repository that records writes and can be told to fail some.
#[derive(Default)]
pub struct RecordingRepository {
    hotels: Mutex<HashMap<String, Hotel>>,
    destinations: Mutex<HashMap<i64, Vec<Hotel>>>,
    failing_hotels: HashSet<String>,
    failing_destinations: HashSet<i64>,
}

impl RecordingRepository {
    pub fn failing_hotel(mut self, hotel_id: &str) -> Self {
        self.failing_hotels.insert(hotel_id.to_string());
        self
    }

    pub fn failing_destination(mut self, destination_id: i64) -> Self {
        self.failing_destinations.insert(destination_id);
        self
    }

    pub fn hotel(&self, hotel_id: &str) -> Option<Hotel> {
        self.hotels.lock().unwrap().get(hotel_id).cloned()
    }

    pub fn destination(&self, destination_id: i64) -> Option<Vec<Hotel>> {
        self.destinations.lock().unwrap().get(&destination_id).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.hotels.lock().unwrap().len() + self.destinations.lock().unwrap().len()
    }
}

#[async_trait]
impl HotelRepository for RecordingRepository {
    async fn put_hotel(&self, hotel_id: &str, hotel: &Hotel) -> Result<(), StoreError> {
        if self.failing_hotels.contains(hotel_id) {
            return Err(StoreError::Command(format!("refusing to store {hotel_id}")));
        }
        self.hotels
            .lock()
            .unwrap()
            .insert(hotel_id.to_string(), hotel.clone());
        Ok(())
    }

    async fn put_destination(
        &self,
        destination_id: i64,
        hotels: &[Hotel],
    ) -> Result<(), StoreError> {
        if self.failing_destinations.contains(&destination_id) {
            return Err(StoreError::Timeout);
        }
        self.destinations
            .lock()
            .unwrap()
            .insert(destination_id, hotels.to_vec());
        Ok(())
    }

    async fn get_hotel(&self, hotel_id: &str) -> Result<Option<Hotel>, StoreError> {
        Ok(self.hotel(hotel_id))
    }

    async fn get_destination(&self, destination_id: i64) -> Result<Vec<Hotel>, StoreError> {
        Ok(self.destination(destination_id).unwrap_or_default())
    }

    async fn get_hotels(&self, hotel_ids: &[String]) -> Result<Vec<Hotel>, StoreError> {
        Ok(hotel_ids.iter().filter_map(|id| self.hotel(id)).collect())
    }
}
