// src/services/source.rs

//! The seam between the polling core and the booking API.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::LocationId;

/// Anything that can answer a single availability query for one location.
///
/// Implementations report connection failures as `AppError::Transport` and
/// bad HTTP/API status as `AppError::Protocol` so callers can retry them.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Issue one query and return the raw ride bundles.
    async fn query(&self, location: LocationId) -> Result<Vec<Value>>;
}

#[async_trait]
impl<T: AvailabilitySource + ?Sized> AvailabilitySource for Arc<T> {
    async fn query(&self, location: LocationId) -> Result<Vec<Value>> {
        (**self).query(location).await
    }
}
