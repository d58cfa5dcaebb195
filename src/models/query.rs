//! Wire types for the occasion-bundle endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{ExaminationType, LocationId, SessionConfig};

/// Request body for `POST Boka/occasion-bundles`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccasionBundleRequest {
    pub booking_session: BookingSession,
    pub occasion_bundle_query: OccasionBundleQuery,
}

/// Booking session filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSession {
    pub social_security_number: String,
    pub licence_id: u32,
    pub booking_mode_id: u32,
    pub ignore_debt: bool,
    pub ignore_booking_hindrance: bool,
    pub examination_type_id: u32,
    pub exclude_examination_categories: Vec<u32>,
    pub reschedule_type_id: u32,
    pub payment_is_active: bool,
    pub payment_reference: Option<String>,
    pub payment_url: Option<String>,
    pub searched_months: u32,
}

/// Occasion bundle query for one location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccasionBundleQuery {
    pub start_date: String,
    pub searched_months: u32,
    pub location_id: LocationId,
    pub nearby_location_ids: Vec<LocationId>,
    pub vehicle_type_id: u32,
    pub tachograph_type_id: u32,
    pub occasion_choice_id: u32,
    pub examination_type_id: u32,
}

impl OccasionBundleRequest {
    /// Build the request body for a single location.
    pub fn new(session: &SessionConfig, exam: ExaminationType, location: LocationId) -> Self {
        let examination_type_id = exam.api_id();
        Self {
            booking_session: BookingSession {
                social_security_number: session.ssn.clone(),
                licence_id: session.licence_id,
                booking_mode_id: session.booking_mode_id,
                ignore_debt: session.ignore_debt,
                ignore_booking_hindrance: session.ignore_booking_hindrance,
                examination_type_id,
                exclude_examination_categories: session.exclude_examination_categories.clone(),
                reschedule_type_id: session.reschedule_type_id,
                payment_is_active: session.payment_is_active,
                payment_reference: session.payment_reference.clone(),
                payment_url: session.payment_url.clone(),
                searched_months: session.searched_months,
            },
            occasion_bundle_query: OccasionBundleQuery {
                start_date: session.start_date.clone(),
                searched_months: session.searched_months,
                location_id: location,
                nearby_location_ids: session.nearby_location_ids.clone(),
                vehicle_type_id: session.vehicle_type_id,
                tachograph_type_id: session.tachograph_type_id,
                occasion_choice_id: session.occasion_choice_id,
                examination_type_id,
            },
        }
    }
}

/// Response envelope. `status` mirrors an HTTP code; 200 means success.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleResponse {
    pub status: i64,
    #[serde(default)]
    pub data: Option<BundleData>,
}

/// Payload of a successful response.
///
/// Bundles stay untyped here so that a single odd record is reported by the
/// normalizer instead of failing the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleData {
    #[serde(default)]
    pub bundles: Option<Vec<serde_json::Value>>,
}
