//! The ingestion entry point: fetch, reconcile, validate, group and store.

use crate::config::SuppliersConfig;
use crate::coordinator::FetchCoordinator;
use crate::errors::PipelineError;
use crate::grouping::group_by_destination;
use crate::hotel::Hotel;
use crate::merger::{SkippedRecord, reconcile};
use crate::metrics_defs::{HOTELS_MERGED, HOTELS_REJECTED, PIPELINE_RUN_DURATION, STORE_FAILURES};
use crate::repository::HotelRepository;
use crate::supplier::SupplierSource;
use crate::validator::{ValidationError, validate};
use shared::{counter, gauge, histogram};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierSummary {
    pub supplier: Url,
    pub hotels: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedSupplier {
    pub supplier: Url,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedHotel {
    pub hotel_id: String,
    pub reason: ValidationError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedWrite<K> {
    pub key: K,
    pub reason: String,
}

/// What a successful run did, with every recovered failure attributed to
/// its supplier, hotel or destination.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub suppliers: Vec<SupplierSummary>,
    pub failed_suppliers: Vec<FailedSupplier>,
    pub skipped: Vec<SkippedRecord>,
    pub merged: usize,
    pub rejected: Vec<RejectedHotel>,
    pub stored_hotels: usize,
    pub failed_hotels: Vec<FailedWrite<String>>,
    pub stored_destinations: usize,
    pub failed_destinations: Vec<FailedWrite<i64>>,
    pub duration: Duration,
}

pub struct Pipeline {
    suppliers: Vec<Url>,
    coordinator: FetchCoordinator,
    repository: Arc<dyn HotelRepository>,
}

impl Pipeline {
    pub fn new(
        config: &SuppliersConfig,
        source: Arc<dyn SupplierSource>,
        repository: Arc<dyn HotelRepository>,
    ) -> Self {
        Self {
            suppliers: config.urls.clone(),
            coordinator: FetchCoordinator::new(source, config.timeout),
            repository,
        }
    }

    /// Runs one full ingestion.
    ///
    /// Fails only when no supplier returned usable data, in which case
    /// nothing is written. Every other failure is recorded in the report.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let start = Instant::now();
        tracing::info!(suppliers = self.suppliers.len(), "Starting hotel data fetch");

        let results = match self.coordinator.fetch_all(&self.suppliers).await {
            Ok(results) => results,
            Err(e) => {
                histogram!(PIPELINE_RUN_DURATION, "status" => "failure")
                    .record(start.elapsed().as_secs_f64());
                return Err(e);
            }
        };

        let mut report = RunReport {
            suppliers: results
                .successes()
                .map(|(supplier, hotels)| SupplierSummary {
                    supplier: supplier.clone(),
                    hotels: hotels.len(),
                })
                .collect(),
            failed_suppliers: results
                .failures()
                .map(|(supplier, e)| FailedSupplier {
                    supplier: supplier.clone(),
                    reason: e.to_string(),
                })
                .collect(),
            ..Default::default()
        };

        let reconciled = reconcile(&results);
        report.skipped = reconciled.skipped;
        report.merged = reconciled.hotels.len();
        gauge!(HOTELS_MERGED).set(report.merged as f64);

        let accepted: Vec<Hotel> = reconciled
            .hotels
            .into_values()
            .filter(|hotel| match validate(hotel) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::warn!(hotel_id = %hotel.hotel_id, error = %reason, "Skipping invalid hotel");
                    counter!(HOTELS_REJECTED).increment(1);
                    report.rejected.push(RejectedHotel {
                        hotel_id: hotel.hotel_id.clone(),
                        reason,
                    });
                    false
                }
            })
            .collect();

        self.store(&accepted, &mut report).await;

        report.duration = start.elapsed();
        histogram!(PIPELINE_RUN_DURATION, "status" => "success").record(report.duration.as_secs_f64());
        tracing::info!(
            duration = ?report.duration,
            hotels = report.stored_hotels,
            suppliers = report.suppliers.len(),
            failed_suppliers = report.failed_suppliers.len(),
            rejected = report.rejected.len(),
            "Hotel data processing completed"
        );

        Ok(report)
    }

    /// Best-effort persistence: every hotel by id, then every destination.
    async fn store(&self, accepted: &[Hotel], report: &mut RunReport) {
        for hotel in accepted {
            match self.repository.put_hotel(&hotel.hotel_id, hotel).await {
                Ok(()) => report.stored_hotels += 1,
                Err(e) => {
                    tracing::error!(hotel_id = %hotel.hotel_id, error = %e, "Failed to store hotel");
                    counter!(STORE_FAILURES, "kind" => "hotel").increment(1);
                    report.failed_hotels.push(FailedWrite {
                        key: hotel.hotel_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        for (destination_id, hotels) in group_by_destination(accepted) {
            match self.repository.put_destination(destination_id, &hotels).await {
                Ok(()) => report.stored_destinations += 1,
                Err(e) => {
                    tracing::error!(destination_id, error = %e, "Failed to store hotels for destination");
                    counter!(STORE_FAILURES, "kind" => "destination").increment(1);
                    report.failed_destinations.push(FailedWrite {
                        key: destination_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}
