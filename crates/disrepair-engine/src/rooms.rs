//! Resolution of the total-room denominator used for percentages.

use std::collections::HashSet;

use crate::period::DisrepairPeriod;

/// Count distinct room names across all periods (exact, case-sensitive match).
pub fn count_distinct_rooms(periods: &[DisrepairPeriod]) -> u32 {
    periods
        .iter()
        .map(|p| p.room_name.as_str())
        .collect::<HashSet<_>>()
        .len() as u32
}

/// Resolve the total number of rooms in the property.
///
/// Precedence, evaluated once per request:
/// 1. a non-empty explicit room list: its length;
/// 2. an explicit positive whole-number total;
/// 3. the number of distinct room names in `periods`.
///
/// Totals that are zero, negative, fractional or non-finite are ignored.
/// Whole totals beyond `u32::MAX` saturate at `u32::MAX`.
pub fn resolve_total_rooms(
    periods: &[DisrepairPeriod],
    total_rooms: Option<f64>,
    rooms: Option<&[String]>,
) -> u32 {
    if let Some(rooms) = rooms.filter(|r| !r.is_empty()) {
        return rooms.len() as u32;
    }

    if let Some(total) = total_rooms.and_then(whole_positive) {
        return total;
    }

    count_distinct_rooms(periods)
}

fn whole_positive(value: f64) -> Option<u32> {
    let whole = value.is_finite() && value >= 1.0 && value.fract() == 0.0;
    whole.then(|| value.min(f64::from(u32::MAX)) as u32)
}
