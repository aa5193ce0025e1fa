// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout record model: shared fields plus a running or cycling payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time_utils::format_month_day;

/// Workout variant tag, as stored in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃",
            WorkoutType::Cycling => "🚴",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// `[latitude, longitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let coords = Self(latitude, longitude);
        coords.validate()?;
        Ok(coords)
    }

    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let in_range = self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1);
        if in_range {
            Ok(())
        } else {
            Err(ValidationError::InvalidCoords {
                latitude: self.0,
                longitude: self.1,
            })
        }
    }
}

/// Variant payload. Derived values are persisted but always recomputed
/// after load or mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        /// steps/min
        cadence: f64,
        /// min/km
        #[serde(default)]
        pace: f64,
    },
    #[serde(rename_all = "camelCase")]
    Cycling {
        /// meters
        elevation_gain: f64,
        /// km/h
        #[serde(default)]
        speed: f64,
    },
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// A single recorded workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(rename = "date")]
    created_at: DateTime<Utc>,
    id: String,
    clicks: u32,
    coords: Coords,
    /// km
    distance: f64,
    /// min
    duration: f64,
    description: String,
    #[serde(flatten)]
    kind: WorkoutKind,
}

/// Partial update applied by the edit flow. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub cadence: Option<f64>,
    pub elevation_gain: Option<f64>,
}

impl WorkoutPatch {
    pub fn is_empty(&self) -> bool {
        self.distance.is_none()
            && self.duration.is_none()
            && self.cadence.is_none()
            && self.elevation_gain.is_none()
    }
}

/// Errors raised when workout inputs break the record invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("{0} must be a positive number")]
    NotPositive(&'static str),

    #[error("Coordinates out of range: [{latitude}, {longitude}]")]
    InvalidCoords { latitude: f64, longitude: f64 },

    #[error("Unknown workout type: {0:?}")]
    UnknownType(String),

    #[error("Workout id must not be empty")]
    EmptyId,
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite(field))
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if finite(field, value)? > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive(field))
    }
}

/// Check the variant-specific extra value: cadence must be positive,
/// elevation gain only finite.
fn check_extra(workout_type: WorkoutType, value: f64) -> Result<f64, ValidationError> {
    match workout_type {
        WorkoutType::Running => positive("cadence", value),
        WorkoutType::Cycling => finite("elevation gain", value),
    }
}

impl Workout {
    /// Build a new record, validating all numeric inputs.
    ///
    /// `extra` is the cadence for running and the elevation gain for cycling.
    pub fn create(
        id: String,
        workout_type: WorkoutType,
        coords: Coords,
        distance: f64,
        duration: f64,
        extra: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        coords.validate()?;
        let distance = positive("distance", distance)?;
        let duration = positive("duration", duration)?;
        let extra = check_extra(workout_type, extra)?;

        let kind = match workout_type {
            WorkoutType::Running => WorkoutKind::Running {
                cadence: extra,
                pace: 0.0,
            },
            WorkoutType::Cycling => WorkoutKind::Cycling {
                elevation_gain: extra,
                speed: 0.0,
            },
        };

        let mut workout = Self {
            created_at,
            id,
            clicks: 0,
            coords,
            distance,
            duration,
            description: String::new(),
            kind,
        };
        workout.recompute_derived();
        workout.description = workout.describe();
        Ok(workout)
    }

    /// Recompute pace (running) or speed (cycling) from distance and duration.
    pub fn recompute_derived(&mut self) {
        match &mut self.kind {
            WorkoutKind::Running { pace, .. } => *pace = self.duration / self.distance,
            WorkoutKind::Cycling { speed, .. } => *speed = self.distance / (self.duration / 60.0),
        }
    }

    /// Description derived from the type and creation date, e.g. `Running on March 5`.
    pub fn describe(&self) -> String {
        format!(
            "{} on {}",
            self.workout_type().label(),
            format_month_day(self.created_at)
        )
    }

    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }

    /// Apply an edit. The patch is validated as a whole before anything
    /// is written, so a rejected patch leaves the record untouched. The
    /// extra field of the other variant is ignored.
    pub fn apply_patch(&mut self, patch: &WorkoutPatch) -> Result<(), ValidationError> {
        let distance = positive("distance", patch.distance.unwrap_or(self.distance))?;
        let duration = positive("duration", patch.duration.unwrap_or(self.duration))?;

        let extra = match &self.kind {
            WorkoutKind::Running { cadence, .. } => patch.cadence.unwrap_or(*cadence),
            WorkoutKind::Cycling { elevation_gain, .. } => {
                patch.elevation_gain.unwrap_or(*elevation_gain)
            }
        };
        let extra = check_extra(self.workout_type(), extra)?;

        self.distance = distance;
        self.duration = duration;
        match &mut self.kind {
            WorkoutKind::Running { cadence, .. } => *cadence = extra,
            WorkoutKind::Cycling { elevation_gain, .. } => *elevation_gain = extra,
        }
        self.recompute_derived();
        Ok(())
    }

    /// Re-check every invariant of a record that did not come through
    /// [`Workout::create`], such as one decoded from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        self.coords.validate()?;
        positive("distance", self.distance)?;
        positive("duration", self.duration)?;
        check_extra(self.workout_type(), self.extra_value())?;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Give a decoded record a new id when its stored one is already taken.
    pub(crate) fn reassign_id(&mut self, id: String) {
        self.id = id;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    /// Pace (min/km) or speed (km/h), depending on the variant.
    pub fn metric_value(&self) -> f64 {
        match self.kind {
            WorkoutKind::Running { pace, .. } => pace,
            WorkoutKind::Cycling { speed, .. } => speed,
        }
    }

    /// Cadence or elevation gain, depending on the variant.
    pub fn extra_value(&self) -> f64 {
        match self.kind {
            WorkoutKind::Running { cadence, .. } => cadence,
            WorkoutKind::Cycling { elevation_gain, .. } => elevation_gain,
        }
    }

    pub fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }
}
