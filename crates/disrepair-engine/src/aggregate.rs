//! Overlap aggregation: weeks in disrepair per concurrent room count.
//!
//! Builds the day timeline, groups it into segments, and sums segment lengths per
//! positive room count. Rounding to one decimal happens only when rows are emitted,
//! never during accumulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::period::{normalize_periods, DisrepairPeriod};
use crate::rooms::count_distinct_rooms;
use crate::timeline::{build_timeline, group_segments, Segment};

const DAYS_PER_WEEK: f64 = 7.0;

/// Time spent at one overlap level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    /// Number of rooms simultaneously in disrepair (always > 0).
    pub room_count: u32,
    /// Total weeks at exactly this count, rounded to one decimal.
    pub weeks_in_disrepair: f64,
    /// `room_count / total_rooms * 100`, rounded to one decimal. Not clamped.
    pub percentage_of_property: f64,
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Normalize the periods and return the segment partition of their timeline.
pub fn compute_segments(periods: &[DisrepairPeriod]) -> Result<Vec<Segment>> {
    let intervals = normalize_periods(periods)?;
    let timeline = build_timeline(&intervals)?;
    Ok(group_segments(&timeline))
}

/// Compute weeks in disrepair and percentage of property for every overlap level.
///
/// `total_rooms` should already be resolved by the caller. When it is `None` or
/// zero, the number of distinct room names in `periods` is used instead.
///
/// Rows are sorted by `room_count` ascending; zero-count stretches are not reported.
///
/// # Errors
/// - `DisrepairError::MalformedDate` if any date fails to parse.
/// - `DisrepairError::Computation` if `periods` is empty.
pub fn aggregate_overlaps(
    periods: &[DisrepairPeriod],
    total_rooms: Option<u32>,
) -> Result<Vec<ResultRow>> {
    let segments = compute_segments(periods)?;

    let total_rooms = match total_rooms {
        Some(n) if n > 0 => n,
        _ => count_distinct_rooms(periods),
    };

    let mut days_by_count: BTreeMap<u32, i64> = BTreeMap::new();
    for segment in segments.iter().filter(|s| s.room_count > 0) {
        *days_by_count.entry(segment.room_count).or_insert(0) += segment.day_span();
    }

    tracing::debug!(
        periods = periods.len(),
        segments = segments.len(),
        levels = days_by_count.len(),
        total_rooms,
        "aggregated disrepair overlaps"
    );

    Ok(days_by_count
        .into_iter()
        .map(|(room_count, days)| ResultRow {
            room_count,
            weeks_in_disrepair: round_to_tenth(days as f64 / DAYS_PER_WEEK),
            percentage_of_property: round_to_tenth(
                room_count as f64 / total_rooms as f64 * 100.0,
            ),
        })
        .collect())
}
