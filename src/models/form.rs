// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw form payloads sent by the map UI.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::workout::{Coords, WorkoutType};

/// Create form submission, with every numeric field still as typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutForm {
    #[serde(rename = "type")]
    pub workout_type: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default)]
    pub elevation: String,
}

/// One labelled row of an edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EditRow {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Editable fields, identified by their display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl EditField {
    pub fn label(&self) -> &'static str {
        match self {
            EditField::Distance => "Distance",
            EditField::Duration => "Duration",
            EditField::Cadence => "Cadence",
            EditField::ElevationGain => "Elev Gain",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            EditField::Distance => "km",
            EditField::Duration => "min",
            EditField::Cadence => "step/min",
            EditField::ElevationGain => "meters",
        }
    }

    /// Resolve a label for a workout of the given type. Labels belonging
    /// to the other variant do not resolve.
    pub fn from_label(label: &str, workout_type: WorkoutType) -> Option<Self> {
        match (label.trim(), workout_type) {
            ("Distance", _) => Some(EditField::Distance),
            ("Duration", _) => Some(EditField::Duration),
            ("Cadence", WorkoutType::Running) => Some(EditField::Cadence),
            ("Elev Gain", WorkoutType::Cycling) => Some(EditField::ElevationGain),
            _ => None,
        }
    }

    /// Rows shown for a workout type, in display order.
    pub fn for_type(workout_type: WorkoutType) -> [EditField; 3] {
        match workout_type {
            WorkoutType::Running => [EditField::Distance, EditField::Duration, EditField::Cadence],
            WorkoutType::Cycling => [
                EditField::Distance,
                EditField::Duration,
                EditField::ElevationGain,
            ],
        }
    }
}

/// A map position reported by the browser (geolocation or click).
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct Position {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Position {
    pub fn coords(&self) -> Result<Coords, AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(Coords::new(self.latitude, self.longitude)?)
    }
}

/// Coerce a text field to a number the way a browser numeric input does:
/// surrounding whitespace is ignored, an empty field reads as zero and
/// anything unparsable reads as NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
