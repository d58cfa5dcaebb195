// src/models/mod.rs

//! Domain models for the slot watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod exam;
mod locations;
mod query;
mod slot;

// Re-export all public types
pub use config::{ApiConfig, Config, PollingConfig, ProxyConfig, SessionConfig};
pub use exam::ExaminationType;
pub use locations::LocationSets;
pub use query::{BookingSession, BundleData, BundleResponse, OccasionBundleQuery, OccasionBundleRequest};
pub use slot::AvailabilitySlot;

/// Opaque identifier of an examination site.
pub type LocationId = u32;
