// src/services/aggregator.rs

//! Fan-out of the location fetcher across every location of a cycle.

use futures::stream::{self, StreamExt};

use crate::error::AppError;
use crate::models::{AvailabilitySlot, LocationId};
use crate::services::{AvailabilitySource, LocationFetcher};

/// A location that contributed nothing to the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFailure {
    pub location: LocationId,
    pub kind: &'static str,
    pub message: String,
}

/// Everything gathered in one pass over the locations.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Slots of all successful locations, in no particular order
    pub slots: Vec<AvailabilitySlot>,
    pub location_total: usize,
    pub failures: Vec<LocationFailure>,
}

impl CycleOutcome {
    pub fn success_count(&self) -> usize {
        self.location_total - self.failures.len()
    }
}

/// Runs the fetcher for every location with bounded concurrency.
pub struct Aggregator<S> {
    fetcher: LocationFetcher<S>,
    max_concurrent: usize,
}

impl<S: AvailabilitySource> Aggregator<S> {
    pub fn new(fetcher: LocationFetcher<S>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Fetch all locations. Returns only once every location has either
    /// produced slots or exhausted its attempts; failures never abort the pass.
    pub async fn collect(&self, locations: &[LocationId]) -> CycleOutcome {
        let mut outcome = CycleOutcome {
            location_total: locations.len(),
            ..CycleOutcome::default()
        };

        let mut results = stream::iter(locations.iter().copied())
            .map(|location| async move { (location, self.fetcher.fetch(location).await) })
            .buffer_unordered(self.max_concurrent);

        while let Some((location, result)) = results.next().await {
            match result {
                Ok(slots) => {
                    log::debug!("Location {}: {} slots", location, slots.len());
                    outcome.slots.extend(slots);
                }
                Err(error) => {
                    report_failure(location, &error);
                    outcome.failures.push(LocationFailure {
                        location,
                        kind: error.kind(),
                        message: error.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

fn report_failure(location: LocationId, error: &AppError) {
    match error {
        AppError::MalformedRecord { .. } => {
            log::error!("Unexpected response shape, API may have changed: {}", error)
        }
        _ => log::warn!(
            "Skipping location {} this cycle [{}]: {}",
            location,
            error.kind(),
            error
        ),
    }
}
