use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a single supplier did not contribute to a pipeline run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("fetch task failed: {0}")]
    TaskFailed(String),
}

/// A supplier URL paired with the reason it failed.
#[derive(Debug)]
pub struct SupplierFailure {
    pub supplier: Url,
    pub error: FetchError,
}

/// Failure of a whole pipeline run. Anything narrower than this is recovered
/// locally and shows up in the run report instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no data fetched from any of {} suppliers", failures.len())]
    NoSupplierData { failures: Vec<SupplierFailure> },
}
