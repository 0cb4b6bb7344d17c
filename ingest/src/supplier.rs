//! Transport for supplier feeds.

use crate::errors::FetchError;
use crate::hotel::RawHotel;
use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

/// Retrieves the full record list published at a supplier URL.
///
/// A fetch is all or nothing: either every record of the feed is returned or
/// the supplier is reported as failed. Time bounds are applied by the caller.
#[async_trait]
pub trait SupplierSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<RawHotel>, FetchError>;
}

/// Fetches supplier feeds as JSON arrays over HTTP.
#[derive(Clone, Default)]
pub struct HttpSupplierSource {
    client: reqwest::Client,
}

impl HttpSupplierSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SupplierSource for HttpSupplierSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<RawHotel>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let hotels = serde_json::from_slice(&body)?;
        Ok(hotels)
    }
}
