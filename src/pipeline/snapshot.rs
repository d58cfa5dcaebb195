// src/pipeline/snapshot.rs

//! One cycle's worth of availability.

use std::collections::HashSet;
use std::collections::hash_set;

use crate::models::AvailabilitySlot;

/// Set of slots observed in a single polling cycle.
///
/// Built once from the aggregated slots and replaced wholesale by the next
/// cycle; duplicates collapse on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSnapshot {
    slots: HashSet<AvailabilitySlot>,
}

impl CycleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot: &AvailabilitySlot) -> bool {
        self.slots.contains(slot)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, AvailabilitySlot> {
        self.slots.iter()
    }

    pub(crate) fn as_set(&self) -> &HashSet<AvailabilitySlot> {
        &self.slots
    }
}

impl FromIterator<AvailabilitySlot> for CycleSnapshot {
    fn from_iter<I: IntoIterator<Item = AvailabilitySlot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CycleSnapshot {
    type Item = &'a AvailabilitySlot;
    type IntoIter = hash_set::Iter<'a, AvailabilitySlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
