// src/pipeline/list.rs

//! One-shot listing of current availability.

use std::collections::BTreeSet;

use crate::error::{AppError, Result};
use crate::models::{Config, ExaminationType, LocationId};
use crate::pipeline::{ChangeDetector, CycleSnapshot, SortOrder};
use crate::services::{Aggregator, BookingClient, LocationFetcher, RetryPolicy};
use crate::utils::console;

/// How to print the listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub order: SortOrder,
    /// Print only the distinct dates
    pub dates_only: bool,
}

/// Fetch every location once and print the result chronologically.
pub async fn run_list(
    config: &Config,
    exam: ExaminationType,
    locations: Vec<LocationId>,
    options: ListOptions,
) -> Result<CycleSnapshot> {
    if locations.is_empty() {
        return Err(AppError::config(format!(
            "No location IDs configured for {exam}"
        )));
    }

    let client = BookingClient::new(config, exam)?;
    let fetcher = LocationFetcher::new(client, RetryPolicy::from_config(&config.api));
    let aggregator = Aggregator::new(fetcher, config.api.max_concurrent);

    let outcome = aggregator.collect(&locations).await;
    log::info!(
        "Fetched {} of {} locations",
        outcome.success_count(),
        outcome.location_total
    );

    let snapshot: CycleSnapshot = outcome.slots.into_iter().collect();
    if snapshot.is_empty() {
        log::warn!("No available slots found");
        return Ok(snapshot);
    }

    for line in render(&snapshot, options) {
        console::line(&line);
    }
    Ok(snapshot)
}

/// Lines of the listing.
pub fn render(snapshot: &CycleSnapshot, options: ListOptions) -> Vec<String> {
    let sorted = ChangeDetector::new().sorted_by_date(snapshot, options.order);
    if options.dates_only {
        let dates: BTreeSet<&str> = sorted.iter().map(|slot| slot.date()).collect();
        let mut dates: Vec<String> = dates.into_iter().map(str::to_string).collect();
        if options.order == SortOrder::Descending {
            dates.reverse();
        }
        dates
    } else {
        sorted.iter().map(|slot| slot.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilitySlot;

    fn snapshot() -> CycleSnapshot {
        [
            AvailabilitySlot::new("Körprov B", "2022-01-08", "09:00", "Kista", 800),
            AvailabilitySlot::new("Körprov B", "2022-01-07", "13:00", "Örebro", 800),
            AvailabilitySlot::new("Körprov B", "2022-01-07", "10:00", "Örebro", 800),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_render_full() {
        let lines = render(&snapshot(), ListOptions::default());
        assert_eq!(lines[0], "Körprov B, 2022-01-07 10:00 in Örebro for 800");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_dates_only_descending() {
        let options = ListOptions {
            order: SortOrder::Descending,
            dates_only: true,
        };
        assert_eq!(render(&snapshot(), options), vec!["2022-01-08", "2022-01-07"]);
    }
}
