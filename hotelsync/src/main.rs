use catalog::api::CatalogApiError;
use clap::{Parser, Subcommand};
use config::{Config, ConfigError};
use ingest::errors::PipelineError;
use ingest::repository::StoreError;
use ingest::supplier::HttpSupplierSource;
use ingest::Pipeline;
use scheduler::Scheduler;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use telemetry::TelemetryError;
use tokio::sync::watch;

mod config;
mod scheduler;
mod telemetry;

const SUPPLIER_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(about = "Pulls hotel data from suppliers, reconciles it and serves it")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Serve the hotel API and refresh the data on a schedule.
    Run {
        #[arg(long, short)]
        config: PathBuf,
    },
    /// Run the pipeline a single time and exit.
    Once {
        #[arg(long, short)]
        config: PathBuf,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("could not open hotel store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("hotel API failed: {0}")]
    Api(#[from] CatalogApiError),
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config_path, once) = match &cli.command {
        CliCommand::Run { config } => (config, false),
        CliCommand::Once { config } => (config, true),
    };

    let config = match Config::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry = telemetry::init_logging(config.common.logging.as_ref());

    match run(config, once) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "hotelsync exited with an error");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config, once: bool) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(start(config, once))
}

async fn start(config: Config, once: bool) -> Result<(), CliError> {
    telemetry::init_metrics(config.common.metrics.as_ref())?;
    if once {
        run_once(config).await
    } else {
        run_service(config).await
    }
}

async fn run_once(config: Config) -> Result<(), CliError> {
    let repository = catalog::get_repository(&config.store).await?;
    let pipeline = Pipeline::new(
        &config.suppliers,
        supplier_source()?,
        repository,
    );

    let report = pipeline.run().await?;
    if !report.failed_hotels.is_empty() || !report.failed_destinations.is_empty() {
        tracing::warn!(
            failed_hotels = report.failed_hotels.len(),
            failed_destinations = report.failed_destinations.len(),
            "Some writes did not reach the hotel store"
        );
    }
    Ok(())
}

async fn run_service(config: Config) -> Result<(), CliError> {
    let repository = catalog::get_repository(&config.store).await?;
    let pipeline = Pipeline::new(
        &config.suppliers,
        supplier_source()?,
        repository.clone(),
    );
    let scheduler = Scheduler::new(pipeline, config.schedule.interval);
    let ready = scheduler.ready_flag();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let stop = || stopped(shutdown_rx.clone());

    let api = async {
        let result = catalog::api::serve(&config.api, repository, stop()).await;
        let _ = shutdown_tx.send(true);
        result
    };

    let admin = async {
        let Some(listener) = &config.admin_listener else {
            return Ok(());
        };
        tracing::info!(host = %listener.host, port = listener.port, "Serving admin endpoints");
        let service = AdminService::new(move || ready.load(Ordering::Relaxed));
        let result = run_http_service(&listener.host, listener.port, service, stop()).await;
        let _ = shutdown_tx.send(true);
        result
    };

    let signal = async {
        tokio::select! {
            _ = shutdown_signal() => {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            _ = stop() => {}
        }
    };

    let (api_result, admin_result, (), ()) =
        tokio::join!(api, admin, scheduler.run(stop()), signal);
    api_result?;
    admin_result?;

    tracing::info!("hotelsync stopped");
    Ok(())
}

fn supplier_source() -> Result<Arc<HttpSupplierSource>, CliError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("hotelsync/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(SUPPLIER_CONNECT_TIMEOUT)
        .build()?;
    Ok(Arc::new(HttpSupplierSource::new(client)))
}

fn stopped(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
