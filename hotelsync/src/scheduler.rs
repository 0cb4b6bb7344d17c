use ingest::errors::PipelineError;
use ingest::{Pipeline, RunReport};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Runs the pipeline right away and then once per `interval`.
///
/// A run that outlasts the interval swallows the ticks it missed, so runs
/// never overlap. `ready` flips to true after the first successful run and
/// stays there. On shutdown a run in progress gets `shutdown_grace` to
/// finish before it is dropped.
pub struct Scheduler {
    pipeline: Pipeline,
    interval: Duration,
    shutdown_grace: Duration,
    ready: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn ready_flag(&self) -> Arc<AtomicBool> {
        self.ready.clone()
    }

    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(interval = ?self.interval, "Starting scheduler");
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            let run = self.pipeline.run();
            tokio::pin!(run);

            tokio::select! {
                result = &mut run => self.record(result),
                _ = &mut shutdown => {
                    tracing::info!(
                        grace = ?self.shutdown_grace,
                        "Shutdown requested, waiting for the pipeline run in progress"
                    );
                    match tokio::time::timeout(self.shutdown_grace, run).await {
                        Ok(result) => self.record(result),
                        Err(_) => tracing::warn!("Pipeline run did not finish in time, abandoning it"),
                    }
                    break;
                }
            }
        }
        tracing::info!("Scheduler stopped");
    }

    fn record(&self, result: Result<RunReport, PipelineError>) {
        match result {
            Ok(_) => {
                if !self.ready.swap(true, Ordering::Relaxed) {
                    tracing::info!("First pipeline run completed, service is ready");
                }
            }
            Err(e) => tracing::error!(error = %e, "Pipeline run failed"),
        }
    }
}
