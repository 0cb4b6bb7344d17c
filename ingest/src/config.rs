use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("at least one supplier URL is required")]
    NoSuppliers,

    #[error("duplicate supplier URL: {0}")]
    DuplicateSupplier(Url),

    #[error("supplier timeout cannot be 0")]
    ZeroTimeout,
}

/// Supplier feeds to pull on every pipeline run.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SuppliersConfig {
    /// Feed URLs. The order is also the reconciliation order: when two
    /// suppliers both have a value for a first-non-empty-wins field, the one
    /// listed first wins.
    pub urls: Vec<Url>,
    /// Upper bound for a single supplier fetch, including the body download.
    #[serde(with = "humantime_serde", default = "default_fetch_timeout")]
    pub timeout: Duration,
}

fn default_fetch_timeout() -> Duration {
    DEFAULT_FETCH_TIMEOUT
}

impl SuppliersConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.urls.is_empty() {
            return Err(ValidationError::NoSuppliers);
        }

        let mut seen = HashSet::new();
        for url in &self.urls {
            if !seen.insert(url) {
                return Err(ValidationError::DuplicateSupplier(url.clone()));
            }
        }

        if self.timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout);
        }

        Ok(())
    }
}
