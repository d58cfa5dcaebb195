//! Examination type selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of driving exam to watch.
///
/// Chosen once per run; selects both the location set and the API filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExaminationType {
    /// Theory (knowledge) test
    Kunskapsprov,
    /// Practical driving test
    #[serde(alias = "körprov")]
    #[cfg_attr(feature = "cli", value(alias = "körprov"))]
    Korprov,
}

impl ExaminationType {
    /// Identifier the booking API uses for this examination type.
    pub fn api_id(self) -> u32 {
        match self {
            ExaminationType::Kunskapsprov => 3,
            ExaminationType::Korprov => 12,
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            ExaminationType::Kunskapsprov => "Kunskapsprov",
            ExaminationType::Korprov => "Körprov",
        }
    }
}

impl fmt::Display for ExaminationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
