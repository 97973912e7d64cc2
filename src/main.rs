use anyhow::{Context, Result};
use elprice::config::Config;
use elprice::logging::init_logging;
use elprice::sensor::PriceSensor;
use elprice::service::{PriceService, spawn_file_watcher};
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("Logging setup failed: {}", e))?;
    info!("Elprice {} starting up", env!("APP_VERSION"));

    // Unparsable schedules are rejected here rather than on every tick
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let watch = config.update.watch_source.then(|| {
        (
            PathBuf::from(&config.source.file),
            Duration::from_millis(config.update.watch_interval_ms.max(1)),
        )
    });

    let sensor = PriceSensor::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to create sensor: {}", e))?;
    let (service, handle) = PriceService::new(sensor);

    let watcher = watch.map(|(path, poll)| spawn_file_watcher(path, poll, handle.clone()));

    let signal_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
        }
        signal_handle.shutdown();
    });

    let result = service.run().await;
    if let Some(task) = watcher {
        task.abort();
    }

    match result {
        Ok(()) => {
            info!("Shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Update loop failed with error: {}", e);
            Err(anyhow::anyhow!("Update loop error: {}", e))
        }
    }
}
