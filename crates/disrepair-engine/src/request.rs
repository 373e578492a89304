//! The overlap request: validation, room resolution and aggregation in one call.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_overlaps, ResultRow};
use crate::error::{DisrepairError, Result};
use crate::rooms::resolve_total_rooms;
use crate::validate::{validate_periods, PeriodInput};

/// Body of an overlap calculation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapRequest {
    #[serde(default)]
    pub periods: Option<Vec<PeriodInput>>,
    /// Explicit property size; ignored unless a positive whole number.
    #[serde(default)]
    pub total_rooms: Option<f64>,
    /// Explicit room list; when non-empty its length is the property size.
    #[serde(default)]
    pub rooms: Option<Vec<String>>,
}

impl OverlapRequest {
    /// Parse a request from JSON text.
    ///
    /// # Errors
    /// Returns `DisrepairError::InvalidInput` when the text is not a valid request body.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DisrepairError::InvalidInput(format!("invalid request body: {e}")))
    }

    /// Validate the periods, resolve the room total, and aggregate.
    pub fn evaluate(&self) -> Result<Vec<ResultRow>> {
        let periods = validate_periods(self.periods.as_deref())?;
        let total_rooms = resolve_total_rooms(&periods, self.total_rooms, self.rooms.as_deref());
        aggregate_overlaps(&periods, Some(total_rooms))
    }
}
