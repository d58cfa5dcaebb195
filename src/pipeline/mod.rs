//! Pipeline entry points and the polling core.
//!
//! - `run_watch`: poll forever and report changes
//! - `run_list`: one pass, printed chronologically
//! - `run_scan`: discover valid location IDs

mod diff;
mod list;
mod normalize;
mod scan;
mod scheduler;
mod snapshot;
mod watch;

pub use diff::{ChangeDetector, SlotDiff, SortOrder, calculate_diff};
pub use list::{ListOptions, render, run_list};
pub use normalize::{normalize_bundles, normalize_record};
pub use scan::{ScanOutcome, run_scan, scan_locations};
pub use scheduler::{CycleReport, CycleScheduler, CycleState};
pub use snapshot::CycleSnapshot;
pub use watch::run_watch;
