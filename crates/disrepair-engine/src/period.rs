//! Disrepair periods as received, and their parsed calendar-date form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::normalize_date;
use crate::error::Result;

/// A date range during which one room is out of service, as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisrepairPeriod {
    pub room_name: String,
    /// Day/month/year (`07/01/2025`) or year-month-day (`2025-01-07`).
    pub start_date: String,
    pub end_date: String,
}

impl DisrepairPeriod {
    pub fn new(
        room_name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            room_name: room_name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Parse both dates into a [`NormalizedInterval`].
    pub fn normalize(&self) -> Result<NormalizedInterval> {
        Ok(NormalizedInterval {
            room_name: self.room_name.clone(),
            start: normalize_date(&self.start_date)?,
            end: normalize_date(&self.end_date)?,
        })
    }
}

/// A disrepair period with parsed dates. Both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInterval {
    pub room_name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl NormalizedInterval {
    /// True when `day` falls within `[start, end]`.
    ///
    /// An inverted interval (`end < start`) covers no day at all.
    pub fn covers(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}

/// Normalize every period, failing on the first unparseable date.
pub fn normalize_periods(periods: &[DisrepairPeriod]) -> Result<Vec<NormalizedInterval>> {
    periods.iter().map(DisrepairPeriod::normalize).collect()
}
