// src/utils/console.rs

//! Operator-facing console output.
//!
//! Change lines are printed in color with a timestamp; the countdown status
//! line is rewritten in place and wiped before any other line is printed.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Local;

use crate::models::AvailabilitySlot;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Width of the status line currently on screen (0 = none).
static STATUS_WIDTH: AtomicUsize = AtomicUsize::new(0);

/// Kind of change being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Removed,
}

impl Change {
    fn label(self) -> &'static str {
        match self {
            Change::Added => "Added",
            Change::Removed => "Removed",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Change::Added => GREEN,
            Change::Removed => YELLOW,
        }
    }
}

/// `[Added] {name}, {date} {time} in {location} for {cost}`
pub fn format_change(change: Change, slot: &AvailabilitySlot) -> String {
    format!("[{}] {}", change.label(), slot)
}

/// Text of the countdown status line.
pub fn format_status(
    database_size: usize,
    seconds_left: u64,
    next: Option<&AvailabilitySlot>,
) -> String {
    let next = match next {
        Some(slot) => format!("{} {} in {}", slot.date(), slot.time(), slot.location()),
        None => "none".to_string(),
    };
    format!(
        "Database: {} slots | Next sync in {}s | Next available: {}",
        database_size, seconds_left, next
    )
}

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

/// Print one change line.
pub fn change(change: Change, slot: &AvailabilitySlot) {
    clear_status();
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let line = format_change(change, slot);
    if use_color() {
        println!("{}[{}] {}{}", change.color(), timestamp, line, RESET);
    } else {
        println!("[{}] {}", timestamp, line);
    }
}

/// Print a plain line, wiping the status line first.
pub fn line(message: &str) {
    clear_status();
    println!("{}", message);
}

/// Overwrite the status line in place.
pub fn status(message: &str) {
    let previous = STATUS_WIDTH.swap(message.chars().count(), Ordering::Relaxed);
    let padding = previous.saturating_sub(message.chars().count());
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "\r{}{}", message, " ".repeat(padding));
    let _ = stdout.flush();
}

/// Remove the status line, if one is showing.
pub fn clear_status() {
    let width = STATUS_WIDTH.swap(0, Ordering::Relaxed);
    if width > 0 {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r{}\r", " ".repeat(width));
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AvailabilitySlot {
        AvailabilitySlot::new("Kunskapsprov B", "2022-01-07", "10:00", "Örebro", 325)
    }

    #[test]
    fn test_format_change() {
        assert_eq!(
            format_change(Change::Added, &sample()),
            "[Added] Kunskapsprov B, 2022-01-07 10:00 in Örebro for 325"
        );
        assert_eq!(
            format_change(Change::Removed, &sample()),
            "[Removed] Kunskapsprov B, 2022-01-07 10:00 in Örebro for 325"
        );
    }

    #[test]
    fn test_format_status() {
        assert_eq!(
            format_status(12, 42, Some(&sample())),
            "Database: 12 slots | Next sync in 42s | Next available: 2022-01-07 10:00 in Örebro"
        );
        assert!(format_status(0, 5, None).ends_with("Next available: none"));
    }
}
