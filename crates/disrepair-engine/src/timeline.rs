//! Day-by-day occupancy timeline and its run-length segments.
//!
//! The timeline spans `[min start, max end]` inclusive with one entry per calendar
//! day. Per-day counts are produced by a sweep over interval boundaries (a +1 on the
//! first covered day, a -1 on the day after the last), which yields the same counts
//! as testing every interval against every day.
//!
//! Segments are the run-length encoding of that timeline: every day belongs to
//! exactly one segment, and adjacent segments always differ in count.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DisrepairError, Result};
use crate::period::NormalizedInterval;

/// How many intervals cover a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// A maximal run of consecutive days sharing the same room count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub room_count: u32,
}

impl Segment {
    /// Inclusive number of days in the segment.
    pub fn day_span(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Earliest start and latest end across all intervals.
///
/// # Errors
/// Returns `DisrepairError::Computation` when `intervals` is empty.
pub fn date_bounds(intervals: &[NormalizedInterval]) -> Result<(NaiveDate, NaiveDate)> {
    let min = intervals.iter().map(|i| i.start).min();
    let max = intervals.iter().map(|i| i.end).max();
    match (min, max) {
        (Some(min), Some(max)) => Ok((min, max)),
        _ => Err(DisrepairError::Computation(
            "cannot build a timeline from an empty interval set".to_string(),
        )),
    }
}

/// Build the per-day count timeline from `min start` to `max end` inclusive.
///
/// Inverted intervals still move the bounds but cover no day. If every interval is
/// inverted so that `max end < min start`, the timeline is empty.
pub fn build_timeline(intervals: &[NormalizedInterval]) -> Result<Vec<DailyCount>> {
    let (min, max) = date_bounds(intervals)?;
    if max < min {
        return Ok(Vec::new());
    }

    let len = ((max - min).num_days() + 1) as usize;
    let mut deltas = vec![0i64; len + 1];
    for interval in intervals.iter().filter(|i| !i.is_inverted()) {
        let first = (interval.start - min).num_days() as usize;
        let last = (interval.end - min).num_days() as usize;
        deltas[first] += 1;
        deltas[last + 1] -= 1;
    }

    let mut running = 0i64;
    let timeline = min
        .iter_days()
        .zip(deltas.iter().take(len))
        .map(|(date, delta)| {
            running += delta;
            DailyCount {
                date,
                count: running as u32,
            }
        })
        .collect();

    Ok(timeline)
}

/// Merge consecutive days with equal counts into segments, in chronological order.
pub fn group_segments(timeline: &[DailyCount]) -> Vec<Segment> {
    timeline
        .iter()
        .fold(Vec::<Segment>::new(), |mut segments, day| {
            match segments.last_mut() {
                Some(last) if last.room_count == day.count => last.end = day.date,
                _ => segments.push(Segment {
                    start: day.date,
                    end: day.date,
                    room_count: day.count,
                }),
            }
            segments
        })
}
