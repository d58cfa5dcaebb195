// src/services/fetcher.rs

//! Per-location availability fetching.

use crate::error::Result;
use crate::models::{AvailabilitySlot, LocationId};
use crate::pipeline::normalize_bundles;
use crate::services::AvailabilitySource;
use crate::services::retry::{RetryPolicy, retry};

/// Fetches and normalizes the slots of a single location, retrying
/// transport and protocol failures.
pub struct LocationFetcher<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: AvailabilitySource> LocationFetcher<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Query one location and normalize every returned record.
    pub async fn fetch(&self, location: LocationId) -> Result<Vec<AvailabilitySlot>> {
        let records = retry(self.policy, location, |_| self.source.query(location)).await?;
        normalize_bundles(location, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::error::AppError;
    use crate::services::testing::{FakeSource, bundle};

    #[tokio::test]
    async fn test_fetch_normalizes() {
        let source = Arc::new(FakeSource::new(|_, _| {
            Ok(vec![
                bundle("Körprov B", "2022-01-07", "10:00", "Örebro", 800),
                bundle("Körprov B", "2022-01-07", "11:00", "Örebro", 800),
            ])
        }));
        let fetcher = LocationFetcher::new(Arc::clone(&source), RetryPolicy::single());

        let slots = fetcher.fetch(1).await.unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].time(), "11:00");
        assert_eq!(source.calls(1), 1);
    }

    #[tokio::test]
    async fn test_always_failing_transport_hits_ceiling() {
        let source = Arc::new(FakeSource::new(|location, _| {
            Err(AppError::transport(location, "timed out"))
        }));
        let fetcher = LocationFetcher::new(Arc::clone(&source), RetryPolicy::new(10, Duration::ZERO));

        let err = fetcher.fetch(3).await.unwrap_err();
        assert!(matches!(err, AppError::RetriesExhausted { location: 3, attempts: 10, .. }));
        assert_eq!(err.kind(), "transport");
        assert_eq!(source.calls(3), 10);
    }

    #[tokio::test]
    async fn test_malformed_response_surfaces_immediately() {
        let source = Arc::new(FakeSource::new(|_, _| {
            Ok(vec![serde_json::json!({ "occasions": [{ "time": "10:00" }] })])
        }));
        let fetcher = LocationFetcher::new(Arc::clone(&source), RetryPolicy::new(10, Duration::ZERO));

        let err = fetcher.fetch(4).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { location: 4, .. }));
        assert_eq!(source.calls(4), 1);
    }
}
