//! # disrepair-engine
//!
//! Day-resolution overlap analysis for rooms in disrepair.
//!
//! Given a set of date-bounded disrepair periods, each tagged with a room, the
//! engine builds a unified day timeline, counts how many rooms are out of service
//! on each day, groups equal-count runs into segments, and reports how many weeks
//! each overlap level persisted alongside the share of the property it represents.
//!
//! ```rust
//! use disrepair_engine::{aggregate_overlaps, DisrepairPeriod};
//!
//! let periods = vec![
//!     DisrepairPeriod::new("Kitchen", "01/01/2025", "07/01/2025"),
//!     DisrepairPeriod::new("Bathroom", "01/01/2025", "07/01/2025"),
//! ];
//! let rows = aggregate_overlaps(&periods, Some(2)).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].room_count, 2);
//! assert_eq!(rows[0].weeks_in_disrepair, 1.0);
//! assert_eq!(rows[0].percentage_of_property, 100.0);
//! ```
//!
//! ## Modules
//!
//! - [`date`] — day/month/year and year-month-day strings → calendar dates
//! - [`period`] — wire periods and their normalized form
//! - [`timeline`] — per-day counts and run-length segments
//! - [`aggregate`] — weeks and percentage per room count
//! - [`rooms`] — total-room resolution
//! - [`validate`] — rejection of incomplete or inverted periods
//! - [`request`] — validation + resolution + aggregation for one request
//! - [`error`] — Error types

pub mod aggregate;
pub mod date;
pub mod error;
pub mod period;
pub mod request;
pub mod rooms;
pub mod timeline;
pub mod validate;

pub use aggregate::{aggregate_overlaps, compute_segments, round_to_tenth, ResultRow};
pub use date::normalize_date;
pub use error::DisrepairError;
pub use period::{normalize_periods, DisrepairPeriod, NormalizedInterval};
pub use request::OverlapRequest;
pub use rooms::{count_distinct_rooms, resolve_total_rooms};
pub use timeline::{build_timeline, group_segments, DailyCount, Segment};
pub use validate::{validate_periods, PeriodInput};
