//! Validation of untrusted request periods.
//!
//! Rejects what the aggregator assumes never happens: an empty period list, a
//! period with a missing field, an unparseable date, or an end date before its
//! start date. Messages name the offending field and the 1-based period position.

use serde::{Deserialize, Serialize};

use crate::error::{DisrepairError, Result};
use crate::period::DisrepairPeriod;

/// A period as it arrives from an untrusted client; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInput {
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl From<DisrepairPeriod> for PeriodInput {
    fn from(p: DisrepairPeriod) -> Self {
        Self {
            room_name: Some(p.room_name),
            start_date: Some(p.start_date),
            end_date: Some(p.end_date),
        }
    }
}

/// Validate raw periods and turn them into [`DisrepairPeriod`]s.
///
/// # Errors
/// - `DisrepairError::InvalidInput` if `periods` is missing or empty, a field is
///   missing or blank, or an end date precedes its start date.
/// - `DisrepairError::MalformedDate` if a date cannot be parsed.
pub fn validate_periods(periods: Option<&[PeriodInput]>) -> Result<Vec<DisrepairPeriod>> {
    let periods = match periods {
        Some(p) if !p.is_empty() => p,
        _ => {
            return Err(DisrepairError::InvalidInput(
                "periods array is required and must not be empty".to_string(),
            ))
        }
    };

    periods
        .iter()
        .enumerate()
        .map(|(idx, input)| validate_period(idx + 1, input))
        .collect()
}

fn validate_period(position: usize, input: &PeriodInput) -> Result<DisrepairPeriod> {
    let period = DisrepairPeriod {
        room_name: required(position, "roomName", input.room_name.as_deref())?,
        start_date: required(position, "startDate", input.start_date.as_deref())?,
        end_date: required(position, "endDate", input.end_date.as_deref())?,
    };

    let interval = period.normalize()?;
    if interval.is_inverted() {
        return Err(DisrepairError::InvalidInput(format!(
            "period {position} ({}): endDate {} is before startDate {}",
            period.room_name, period.end_date, period.start_date
        )));
    }

    Ok(period)
}

fn required(position: usize, field: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DisrepairError::InvalidInput(format!(
            "period {position} is missing required field '{field}'"
        ))),
    }
}
