//! Change detection between polling cycles.
//!
//! Computes which slots appeared and which disappeared since the previous
//! cycle. Slots are compared on every field, so a price change shows up as
//! one removal plus one addition.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::AvailabilitySlot;
use crate::pipeline::CycleSnapshot;

/// Chronological direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDiff {
    /// In current but not in previous
    pub added: HashSet<AvailabilitySlot>,
    /// In previous but not in current
    pub removed: HashSet<AvailabilitySlot>,
}

impl SlotDiff {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// Added slots in chronological order.
    pub fn added_sorted(&self) -> Vec<&AvailabilitySlot> {
        sort_slots(self.added.iter(), SortOrder::Ascending)
    }

    /// Removed slots in chronological order.
    pub fn removed_sorted(&self) -> Vec<&AvailabilitySlot> {
        sort_slots(self.removed.iter(), SortOrder::Ascending)
    }
}

/// Calculator for computing diffs between snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the diff between previous and current snapshots.
    pub fn calculate(&self, previous: &CycleSnapshot, current: &CycleSnapshot) -> SlotDiff {
        let prev = previous.as_set();
        let curr = current.as_set();

        SlotDiff {
            added: curr.difference(prev).cloned().collect(),
            removed: prev.difference(curr).cloned().collect(),
        }
    }

    /// Current snapshot ordered by (date, time).
    pub fn sorted_by_date<'a>(
        &self,
        snapshot: &'a CycleSnapshot,
        order: SortOrder,
    ) -> Vec<&'a AvailabilitySlot> {
        sort_slots(snapshot.iter(), order)
    }

    /// Earliest slot of the snapshot.
    pub fn next_available<'a>(&self, snapshot: &'a CycleSnapshot) -> Result<&'a AvailabilitySlot> {
        snapshot
            .iter()
            .min_by(|a, b| a.chronological_cmp(b))
            .ok_or(AppError::EmptySnapshot)
    }
}

fn sort_slots<'a>(
    slots: impl Iterator<Item = &'a AvailabilitySlot>,
    order: SortOrder,
) -> Vec<&'a AvailabilitySlot> {
    let mut sorted: Vec<_> = slots.collect();
    match order {
        SortOrder::Ascending => sorted.sort_by(|a, b| a.chronological_cmp(b)),
        SortOrder::Descending => sorted.sort_by(|a, b| b.chronological_cmp(a)),
    }
    sorted
}

/// Convenience function to calculate diff.
pub fn calculate_diff(previous: &CycleSnapshot, current: &CycleSnapshot) -> SlotDiff {
    ChangeDetector::new().calculate(previous, current)
}
