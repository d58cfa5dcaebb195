//! In-memory availability source for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::models::LocationId;
use crate::services::AvailabilitySource;

type Responder = dyn Fn(LocationId, usize) -> Result<Vec<Value>> + Send + Sync;

/// Answers queries with a closure of `(location, nth call for that location)`.
pub(crate) struct FakeSource {
    respond: Box<Responder>,
    calls: Mutex<HashMap<LocationId, usize>>,
}

impl FakeSource {
    pub(crate) fn new(
        respond: impl Fn(LocationId, usize) -> Result<Vec<Value>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn calls(&self, location: LocationId) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&location)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl AvailabilitySource for FakeSource {
    async fn query(&self, location: LocationId) -> Result<Vec<Value>> {
        let nth = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(location).or_insert(0);
            *count += 1;
            *count - 1
        };
        (self.respond)(location, nth)
    }
}

/// A raw ride bundle as the booking API returns it.
pub(crate) fn bundle(name: &str, date: &str, time: &str, location_name: &str, cost: u32) -> Value {
    json!({
        "occasions": [{
            "name": name,
            "date": date,
            "time": time,
            "locationName": location_name,
            "cost": cost,
            "occasionId": 1
        }]
    })
}
