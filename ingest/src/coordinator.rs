//! Concurrent retrieval of all supplier feeds for one pipeline run.

use crate::errors::{FetchError, PipelineError, SupplierFailure};
use crate::hotel::Hotel;
use crate::metrics_defs::{SUPPLIER_FETCH_DURATION, SUPPLIER_FETCH_FAILURES, SUPPLIER_RECORDS};
use crate::normalize::normalize;
use crate::supplier::SupplierSource;
use indexmap::IndexMap;
use shared::{counter, histogram};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout};
use url::Url;

/// Normalized records of one supplier, or the reason it has none.
pub type SupplierResult = Result<Vec<Hotel>, FetchError>;

/// Outcome of every supplier fetch in a run, keyed by supplier URL and kept
/// in the configured supplier order.
#[derive(Debug)]
pub struct SupplierResults {
    results: IndexMap<Url, SupplierResult>,
}

impl SupplierResults {
    pub fn new(results: IndexMap<Url, SupplierResult>) -> Self {
        Self { results }
    }

    pub fn get(&self, supplier: &Url) -> Option<&SupplierResult> {
        self.results.get(supplier)
    }

    /// Successful suppliers with their records, in supplier order.
    pub fn successes(&self) -> impl Iterator<Item = (&Url, &[Hotel])> {
        self.results
            .iter()
            .filter_map(|(url, result)| result.as_ref().ok().map(|hotels| (url, hotels.as_slice())))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Url, &FetchError)> {
        self.results
            .iter()
            .filter_map(|(url, result)| result.as_ref().err().map(|e| (url, e)))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    fn into_failures(self) -> Vec<SupplierFailure> {
        self.results
            .into_iter()
            .filter_map(|(supplier, result)| result.err().map(|error| SupplierFailure { supplier, error }))
            .collect()
    }
}

/// Fans out one fetch task per supplier and waits for all of them.
///
/// Every task is bounded by its own timeout and reports back through its
/// join handle, so a slow or failing supplier never holds up the others and
/// nothing is shared between tasks while they run.
pub struct FetchCoordinator {
    source: Arc<dyn SupplierSource>,
    timeout: Duration,
}

impl FetchCoordinator {
    pub fn new(source: Arc<dyn SupplierSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Fetches and normalizes every supplier feed.
    ///
    /// Returns [`PipelineError::NoSupplierData`] when not a single supplier
    /// produced usable data. Otherwise failed suppliers are part of the
    /// returned results and the run can go on with what was fetched.
    pub async fn fetch_all(&self, suppliers: &[Url]) -> Result<SupplierResults, PipelineError> {
        let mut join_set = JoinSet::new();
        let mut task_suppliers = HashMap::new();

        for supplier in suppliers {
            let source = self.source.clone();
            let url = supplier.clone();
            let fetch_timeout = self.timeout;

            let abort_handle = join_set.spawn(async move {
                let result = fetch_supplier(source.as_ref(), &url, fetch_timeout).await;
                (url, result)
            });

            task_suppliers.insert(abort_handle.id(), supplier.clone());
        }

        let mut completed = HashMap::with_capacity(suppliers.len());

        while let Some(join_result) = join_set.join_next_with_id().await {
            match join_result {
                Ok((task_id, (url, result))) => {
                    task_suppliers.remove(&task_id);
                    completed.insert(url, result);
                }
                Err(e) => {
                    let Some(url) = task_suppliers.remove(&e.id()) else {
                        tracing::error!(error = %e, "Fetch task failed for an unknown supplier");
                        continue;
                    };
                    tracing::error!(supplier = %url, error = %e, "Fetch task failed");
                    counter!(SUPPLIER_FETCH_FAILURES, "supplier" => url.to_string()).increment(1);
                    completed.insert(url, Err(FetchError::TaskFailed(e.to_string())));
                }
            }
        }

        let results = suppliers
            .iter()
            .filter_map(|url| completed.remove(url).map(|result| (url.clone(), result)))
            .collect();
        let results = SupplierResults::new(results);

        if results.success_count() == 0 {
            tracing::error!(suppliers = suppliers.len(), "No data fetched from any supplier");
            return Err(PipelineError::NoSupplierData {
                failures: results.into_failures(),
            });
        }

        Ok(results)
    }
}

/// Runs one bounded fetch and normalizes every record it returned.
async fn fetch_supplier(
    source: &dyn SupplierSource,
    url: &Url,
    fetch_timeout: Duration,
) -> SupplierResult {
    let start = Instant::now();

    let result = match timeout(fetch_timeout, source.fetch(url)).await {
        Ok(Ok(raw)) => Ok(raw.into_iter().map(normalize).collect::<Vec<_>>()),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(FetchError::Timeout(fetch_timeout)),
    };

    let elapsed = start.elapsed();
    let status = if result.is_ok() { "success" } else { "failure" };
    histogram!(
        SUPPLIER_FETCH_DURATION,
        "supplier" => url.to_string(),
        "status" => status
    )
    .record(elapsed.as_secs_f64());

    match &result {
        Ok(hotels) => {
            tracing::info!(supplier = %url, hotels = hotels.len(), ?elapsed, "Fetched supplier feed");
            histogram!(SUPPLIER_RECORDS, "supplier" => url.to_string()).record(hotels.len() as f64);
        }
        Err(e) => {
            tracing::warn!(supplier = %url, error = %e, "Failed to fetch supplier feed");
            counter!(SUPPLIER_FETCH_FAILURES, "supplier" => url.to_string()).increment(1);
        }
    }

    result
}
