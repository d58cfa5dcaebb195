// src/pipeline/normalize.rs

//! Record normalization.
//!
//! Turns the raw ride bundles returned by the booking API into
//! [`AvailabilitySlot`] values. Only the first occasion of a bundle is
//! considered; everything else in the record is dropped.

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::error::{AppError, Result};
use crate::models::{AvailabilitySlot, LocationId};

#[derive(Debug, Deserialize)]
struct RawBundle {
    occasions: Vec<RawOccasion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOccasion {
    name: String,
    date: String,
    time: String,
    location_name: String,
    cost: Number,
}

/// Normalize one raw bundle.
///
/// Fails with `MalformedRecord` when the bundle has no occasions or the first
/// occasion lacks one of the expected fields.
pub fn normalize_record(location: LocationId, record: &Value) -> Result<AvailabilitySlot> {
    let bundle = RawBundle::deserialize(record).map_err(|e| AppError::malformed(location, e))?;
    let occasion = bundle
        .occasions
        .into_iter()
        .next()
        .ok_or_else(|| AppError::malformed(location, "bundle has no occasions"))?;

    Ok(AvailabilitySlot::new(
        occasion.name,
        occasion.date,
        occasion.time,
        occasion.location_name,
        occasion.cost,
    ))
}

/// Normalize every bundle of a response. The first malformed record fails
/// the whole batch.
pub fn normalize_bundles(location: LocationId, records: &[Value]) -> Result<Vec<AvailabilitySlot>> {
    records
        .iter()
        .map(|record| normalize_record(location, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_occasion() {
        let record = json!({
            "occasions": [{
                "time": "10:00",
                "locationName": "Örebro",
                "cost": 325,
                "date": "2022-01-07",
                "name": "Kunskapsprov B"
            }]
        });

        let slot = normalize_record(1000140, &record).unwrap();
        assert_eq!(slot.name(), "Kunskapsprov B");
        assert_eq!(slot.date(), "2022-01-07");
        assert_eq!(slot.time(), "10:00");
        assert_eq!(slot.location(), "Örebro");
        assert_eq!(slot.cost().as_u64(), Some(325));
        assert_eq!(slot.to_string(), "Kunskapsprov B, 2022-01-07 10:00 in Örebro for 325");
    }

    #[test]
    fn test_extra_fields_are_dropped() {
        let record = json!({
            "bundleId": 99,
            "occasions": [{
                "time": "08:15",
                "locationName": "Kista",
                "cost": 800,
                "date": "2022-02-01",
                "name": "Körprov B",
                "occasionId": 123456,
                "duration": { "start": "08:15", "end": "09:00" }
            }]
        });

        let slot = normalize_record(1, &record).unwrap();
        let fields = serde_json::to_value(&slot).unwrap();
        let mut keys: Vec<_> = fields.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["cost", "date", "location", "name", "time"]);
    }

    #[test]
    fn test_only_first_occasion_used() {
        let record = json!({
            "occasions": [
                { "time": "10:00", "locationName": "A", "cost": 1, "date": "2022-01-07", "name": "first" },
                { "time": "11:00", "locationName": "B", "cost": 2, "date": "2022-01-08", "name": "second" }
            ]
        });

        let slot = normalize_record(1, &record).unwrap();
        assert_eq!(slot.name(), "first");
    }

    #[test]
    fn test_decimal_cost_is_kept() {
        for cost in [json!(325.0), json!(162.5)] {
            let record = json!({
                "occasions": [{
                    "time": "10:00",
                    "locationName": "Örebro",
                    "cost": cost,
                    "date": "2022-01-07",
                    "name": "Kunskapsprov B"
                }]
            });

            let slot = normalize_record(1, &record).unwrap();
            assert_eq!(slot.cost().as_f64(), cost.as_f64());
        }
    }

    #[test]
    fn test_non_numeric_cost_is_malformed() {
        let record = json!({
            "occasions": [{
                "time": "10:00",
                "locationName": "Örebro",
                "cost": "325 kr",
                "date": "2022-01-07",
                "name": "Kunskapsprov B"
            }]
        });
        let err = normalize_record(1, &record).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { location: 1, .. }));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let record = json!({
            "occasions": [{ "time": "10:00", "cost": 325, "date": "2022-01-07", "name": "x" }]
        });
        let err = normalize_record(42, &record).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { location: 42, .. }));
    }

    #[test]
    fn test_empty_occasions_is_malformed() {
        let err = normalize_record(1, &json!({ "occasions": [] })).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { .. }));

        let err = normalize_record(1, &json!({ "something": "else" })).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { .. }));
    }

    #[test]
    fn test_batch_fails_on_first_bad_record() {
        let good = json!({
            "occasions": [{ "time": "10:00", "locationName": "A", "cost": 1, "date": "2022-01-07", "name": "n" }]
        });
        let bad = json!({ "occasions": "nope" });

        assert_eq!(normalize_bundles(1, &[good.clone(), good.clone()]).unwrap().len(), 2);
        assert!(normalize_bundles(1, &[good, bad]).is_err());
    }
}
