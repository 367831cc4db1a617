//! Loan durations and their normalization to whole months.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Weeks per month used by the normalization. An approximation, not a day-count convention.
const WEEKS_PER_MONTH: i64 = 4;

/// Unit a duration is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    #[default]
    Months,
    Weeks,
}

impl FromStr for PeriodUnit {
    type Err = String;

    /// Accepts `month(s)`, `m`, `week(s)` or `w`, case-insensitively.
    /// An empty string means months.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "m" | "month" | "months" => Ok(PeriodUnit::Months),
            "w" | "week" | "weeks" => Ok(PeriodUnit::Weeks),
            other => Err(format!("unknown period unit '{}'", other)),
        }
    }
}

/// A requested duration, e.g. a 52-week term or a 3-month grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Duration {
    pub periods: i64,
    pub unit: PeriodUnit,
}

impl Duration {
    pub fn months(periods: i64) -> Self {
        Duration {
            periods,
            unit: PeriodUnit::Months,
        }
    }

    pub fn weeks(periods: i64) -> Self {
        Duration {
            periods,
            unit: PeriodUnit::Weeks,
        }
    }

    /// Converts to whole months.
    ///
    /// Weeks round up: `w` weeks become `ceil(w / 4)` months. Non-positive
    /// durations stay non-positive so the engine can reject them.
    pub fn to_months(&self) -> i64 {
        match self.unit {
            PeriodUnit::Months => self.periods,
            PeriodUnit::Weeks => {
                self.periods.div_euclid(WEEKS_PER_MONTH)
                    + i64::from(self.periods.rem_euclid(WEEKS_PER_MONTH) != 0)
            }
        }
    }
}
