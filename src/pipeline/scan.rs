// src/pipeline/scan.rs

//! Location discovery.
//!
//! Probes a range of location IDs once each and records the ones the booking
//! API accepts, so they can be polled later.

use std::ops::Range;
use std::path::Path;

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{Config, ExaminationType, LocationId, LocationSets};
use crate::services::{AvailabilitySource, BookingClient, LocationFetcher, RetryPolicy};
use crate::utils::console;

/// Result of probing a range of IDs.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Accepted IDs, ascending
    pub valid: Vec<LocationId>,
    pub probed: usize,
    /// Slots seen across all accepted IDs
    pub slot_count: usize,
}

/// Probe every ID in `ids`. An ID is valid when its query succeeds,
/// whether or not it currently has slots.
pub async fn scan_locations<S: AvailabilitySource>(
    fetcher: &LocationFetcher<S>,
    ids: Range<LocationId>,
    max_concurrent: usize,
) -> ScanOutcome {
    let total = ids.len();
    let mut outcome = ScanOutcome::default();

    let mut results = stream::iter(ids)
        .map(|location| async move { (location, fetcher.fetch(location).await) })
        .buffer_unordered(max_concurrent.max(1));

    while let Some((location, result)) = results.next().await {
        outcome.probed += 1;
        match result {
            Ok(slots) => {
                outcome.slot_count += slots.len();
                outcome.valid.push(location);
            }
            Err(AppError::MalformedRecord { .. }) => {
                log::error!("Location {}: accepted but response shape is unexpected", location);
            }
            Err(e) => log::debug!("Error on location ID {}: {}", location, e),
        }
        console::status(&format!(
            "Scanned {}/{} IDs, {} valid",
            outcome.probed,
            total,
            outcome.valid.len()
        ));
    }
    console::clear_status();

    outcome.valid.sort_unstable();
    outcome
}

/// Scan a range for one examination type and merge the hits into the
/// location file at `output`.
pub async fn run_scan(
    config: &Config,
    exam: ExaminationType,
    ids: Range<LocationId>,
    output: &Path,
) -> Result<ScanOutcome> {
    if ids.is_empty() {
        return Err(AppError::validation(format!(
            "Empty ID range {}..{}",
            ids.start, ids.end
        )));
    }

    log::info!(
        "Scanning location IDs {}..{} for {}",
        ids.start,
        ids.end,
        exam
    );

    let client = BookingClient::new(config, exam)?;
    let fetcher = LocationFetcher::new(client, RetryPolicy::single());
    let outcome = scan_locations(&fetcher, ids, config.api.max_concurrent).await;

    let mut sets = LocationSets::load_or_empty(output).await?;
    let added = sets.merge(exam, outcome.valid.iter().copied());
    sets.save(output).await?;

    log::info!(
        "Found {} valid locations ({} new, {} slots) out of {} probed; saved to {}",
        outcome.valid.len(),
        added,
        outcome.slot_count,
        outcome.probed,
        output.display()
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::services::testing::{FakeSource, bundle};

    #[tokio::test]
    async fn test_scan_keeps_accepted_ids() {
        let source = Arc::new(FakeSource::new(|location, _| match location {
            100 => Ok(vec![bundle("Körprov B", "2022-01-07", "10:00", "Örebro", 800)]),
            102 => Ok(Vec::new()),
            103 => Ok(vec![serde_json::json!({})]),
            _ => Err(AppError::protocol(location, 200, Some(404))),
        }));
        let fetcher = LocationFetcher::new(Arc::clone(&source), RetryPolicy::single());

        let outcome = scan_locations(&fetcher, 100..105, 3).await;
        assert_eq!(outcome.valid, vec![100, 102]);
        assert_eq!(outcome.probed, 5);
        assert_eq!(outcome.slot_count, 1);
        assert_eq!(source.calls(101), 1);
    }
}
