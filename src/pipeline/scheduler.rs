// src/pipeline/scheduler.rs

//! The poll → diff → report → wait loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::models::{AvailabilitySlot, LocationId, PollingConfig};
use crate::pipeline::{ChangeDetector, CycleSnapshot, SlotDiff};
use crate::services::{Aggregator, AvailabilitySource, LocationFailure};
use crate::utils::console::{self, Change};

const TICK: Duration = Duration::from_secs(1);

/// Where the scheduler currently is within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Fetching,
    Diffing,
    Reporting,
    Waiting,
}

/// What one cycle found.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// 1-based cycle number
    pub cycle: u64,
    pub snapshot_size: usize,
    pub diff: SlotDiff,
    /// Earliest slot, `None` when the cycle produced nothing
    pub next_available: Option<AvailabilitySlot>,
    pub failures: Vec<LocationFailure>,
}

/// Drives repeated cycles until interrupted.
///
/// Only the previous cycle's snapshot is kept; each cycle replaces it.
pub struct CycleScheduler<S> {
    aggregator: Aggregator<S>,
    locations: Vec<LocationId>,
    interval: Duration,
    announce_initial: bool,
    max_cycles: Option<u64>,
    detector: ChangeDetector,
    previous: Option<CycleSnapshot>,
    state: CycleState,
    cycle: u64,
}

impl<S: AvailabilitySource> CycleScheduler<S> {
    pub fn new(aggregator: Aggregator<S>, locations: Vec<LocationId>, polling: &PollingConfig) -> Self {
        Self {
            aggregator,
            locations,
            interval: polling.interval(),
            announce_initial: polling.announce_initial,
            max_cycles: None,
            detector: ChangeDetector::new(),
            previous: None,
            state: CycleState::Idle,
            cycle: 0,
        }
    }

    /// Stop on its own after `cycles` completed cycles.
    pub fn with_max_cycles(mut self, cycles: Option<u64>) -> Self {
        self.max_cycles = cycles;
        self
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Snapshot retained from the last completed cycle.
    pub fn previous(&self) -> Option<&CycleSnapshot> {
        self.previous.as_ref()
    }

    /// Run cycles until `shutdown` resolves (or the cycle limit is hit).
    ///
    /// An interrupt while waiting stops immediately; an interrupt while
    /// fetching abandons the in-flight cycle. Returns the number of
    /// completed cycles.
    pub async fn run<F>(&mut self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            if self.cycle_limit_reached() {
                log::info!("Completed {} cycles", self.cycle);
                break;
            }

            let report = tokio::select! {
                report = self.run_cycle() => Some(report),
                () = &mut shutdown => None,
            };
            let Some(report) = report else {
                log::warn!("Interrupted while fetching, abandoning cycle {}", self.cycle + 1);
                break;
            };

            self.report(&report);

            if self.cycle_limit_reached() {
                log::info!("Completed {} cycles", self.cycle);
                break;
            }

            let interrupted = tokio::select! {
                _ = self.wait(&report) => false,
                () = &mut shutdown => true,
            };
            if interrupted {
                console::clear_status();
                log::info!("Interrupted, stopping after {} cycles", self.cycle);
                break;
            }
        }

        self.state = CycleState::Idle;
        self.cycle
    }

    fn cycle_limit_reached(&self) -> bool {
        self.max_cycles.is_some_and(|max| self.cycle >= max)
    }

    /// Fetch every location and diff against the previous cycle.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.state = CycleState::Fetching;
        log::debug!("Fetching {} locations", self.locations.len());
        let outcome = self.aggregator.collect(&self.locations).await;
        let current: CycleSnapshot = outcome.slots.into_iter().collect();

        self.state = CycleState::Diffing;
        let diff = match &self.previous {
            Some(previous) => self.detector.calculate(previous, &current),
            None if self.announce_initial => {
                self.detector.calculate(&CycleSnapshot::new(), &current)
            }
            None => SlotDiff::default(),
        };

        let next_available = match self.detector.next_available(&current) {
            Ok(slot) => Some(slot.clone()),
            Err(e) => {
                log::debug!("No next available slot this cycle: {}", e);
                None
            }
        };

        self.cycle += 1;
        let report = CycleReport {
            cycle: self.cycle,
            snapshot_size: current.len(),
            diff,
            next_available,
            failures: outcome.failures,
        };

        self.previous = Some(current);
        report
    }

    /// Print the changes of a cycle.
    pub fn report(&mut self, report: &CycleReport) {
        self.state = CycleState::Reporting;

        for slot in report.diff.added_sorted() {
            console::change(Change::Added, slot);
        }
        for slot in report.diff.removed_sorted() {
            console::change(Change::Removed, slot);
        }

        log::info!(
            "Cycle {}: {} slots, {} added, {} removed, {} failed locations",
            report.cycle,
            report.snapshot_size,
            report.diff.added.len(),
            report.diff.removed.len(),
            report.failures.len()
        );

        match &report.next_available {
            Some(slot) => log::info!(
                "Next available: {} {} in {}",
                slot.date(),
                slot.time(),
                slot.location()
            ),
            None => log::warn!("No available slots this cycle"),
        }
    }

    /// Count down to the next cycle, refreshing the status line every second.
    ///
    /// Returns how many times the status line was drawn.
    async fn wait(&mut self, report: &CycleReport) -> u64 {
        self.state = CycleState::Waiting;
        let deadline = Instant::now() + self.interval;
        let mut ticks = 0;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let seconds_left = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            console::status(&console::format_status(
                report.snapshot_size,
                seconds_left,
                report.next_available.as_ref(),
            ));
            ticks += 1;
            tokio::time::sleep(remaining.min(TICK)).await;
        }

        console::clear_status();
        ticks
    }
}
