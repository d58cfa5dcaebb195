//! Availability slot value type.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use serde_json::Number;

/// One bookable exam occasion.
///
/// Equality and hashing cover every field, so identical occasions reported
/// twice in one cycle collapse into a single slot. The cost is kept exactly
/// as the booking API sent it, integer or decimal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AvailabilitySlot {
    name: String,
    date: String,
    time: String,
    location: String,
    cost: Number,
}

impl AvailabilitySlot {
    pub(crate) fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        location: impl Into<String>,
        cost: impl Into<Number>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            time: time.into(),
            location: location.into(),
            cost: cost.into(),
        }
    }

    /// Occasion name, e.g. "Kunskapsprov B".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date in `YYYY-MM-DD` form.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn cost(&self) -> &Number {
        &self.cost
    }

    /// Total ordering used for chronological listings: date, time, then
    /// location, name and cost to break ties.
    pub(crate) fn chronological_cmp(&self, other: &Self) -> Ordering {
        (&self.date, &self.time, &self.location, &self.name)
            .cmp(&(&other.date, &other.time, &other.location, &other.name))
            .then_with(|| compare_cost(&self.cost, &other.cost))
    }
}

fn compare_cost(a: &Number, b: &Number) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

impl fmt::Display for AvailabilitySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {} in {} for {}",
            self.name, self.date, self.time, self.location, self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let slot = AvailabilitySlot::new("Körprov B", "2022-01-07", "10:00", "Örebro", 800);
        assert_eq!(slot.to_string(), "Körprov B, 2022-01-07 10:00 in Örebro for 800");
    }

    #[test]
    fn test_display_decimal_cost() {
        let cost = Number::from_f64(162.5).unwrap();
        let slot = AvailabilitySlot::new("Kunskapsprov B", "2022-01-07", "10:00", "Örebro", cost);
        assert_eq!(slot.to_string(), "Kunskapsprov B, 2022-01-07 10:00 in Örebro for 162.5");
    }

    #[test]
    fn test_equality_covers_all_fields() {
        let a = AvailabilitySlot::new("Körprov B", "2022-01-07", "10:00", "Örebro", 800);
        let b = AvailabilitySlot::new("Körprov B", "2022-01-07", "10:00", "Örebro", 900);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_cost_breaks_ties_numerically() {
        let cheap = AvailabilitySlot::new("Körprov B", "2022-01-07", "10:00", "Örebro", 90);
        let decimal = Number::from_f64(162.5).unwrap();
        let dear = AvailabilitySlot::new("Körprov B", "2022-01-07", "10:00", "Örebro", decimal);
        assert_eq!(cheap.chronological_cmp(&dear), Ordering::Less);
        assert_eq!(dear.chronological_cmp(&cheap), Ordering::Greater);
        assert_eq!(dear.chronological_cmp(&dear.clone()), Ordering::Equal);
    }
}
