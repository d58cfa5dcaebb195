// src/pipeline/watch.rs

//! Continuous watching entry point.

use crate::error::{AppError, Result};
use crate::models::{Config, ExaminationType, LocationId};
use crate::pipeline::CycleScheduler;
use crate::services::{Aggregator, BookingClient, LocationFetcher, RetryPolicy};

/// Poll the given locations until Ctrl-C (or `max_cycles` cycles).
///
/// Returns the number of completed cycles.
pub async fn run_watch(
    config: &Config,
    exam: ExaminationType,
    locations: Vec<LocationId>,
    max_cycles: Option<u64>,
) -> Result<u64> {
    if locations.is_empty() {
        return Err(AppError::config(format!(
            "No location IDs configured for {exam}"
        )));
    }

    log::info!(
        "Watching {} locations for {} every {}s (attempts: {}, delay: {}s)",
        locations.len(),
        exam,
        config.polling.interval_secs,
        config.api.max_attempts,
        config.api.retry_delay_secs
    );

    let client = BookingClient::new(config, exam)?;
    let fetcher = LocationFetcher::new(client, RetryPolicy::from_config(&config.api));
    let aggregator = Aggregator::new(fetcher, config.api.max_concurrent);
    let mut scheduler =
        CycleScheduler::new(aggregator, locations, &config.polling).with_max_cycles(max_cycles);

    let cycles = scheduler.run(shutdown_signal()).await;
    Ok(cycles)
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
