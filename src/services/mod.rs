//! Service layer for the slot watcher.
//!
//! This module contains the I/O-facing logic for:
//! - Querying the booking API (`BookingClient`)
//! - Bounded retry (`RetryPolicy`, `retry`)
//! - Per-location fetching (`LocationFetcher`)
//! - Fan-out across all locations (`Aggregator`)

mod aggregator;
mod client;
mod fetcher;
pub mod retry;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{Aggregator, CycleOutcome, LocationFailure};
pub use client::{BookingClient, parse_bundle_response};
pub use fetcher::LocationFetcher;
pub use retry::RetryPolicy;
pub use source::AvailabilitySource;
