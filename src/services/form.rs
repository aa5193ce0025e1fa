// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Create and edit form flows.
//!
//! Create: `Idle -> Collecting -> Validating -> {Committed | Rejected}`.
//! A map click opens the form; a committed submit adds the workout and
//! returns to `Idle`, a rejected one stays `Collecting` with the inputs kept.
//!
//! Edit: at most one open form per workout. Submitted rows are matched to
//! fields by label, and only the fields present are changed.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::form::coerce_number;
use crate::models::{
    Coords, EditField, EditRow, Workout, WorkoutForm, WorkoutPatch, WorkoutType,
};
use crate::services::store::WorkoutStore;

/// Create form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Idle,
    Collecting,
    Validating,
}

/// An edit form as opened for one workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditForm {
    pub workout_id: String,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    /// `false` when a form was already open for this workout.
    pub opened: bool,
    pub rows: Vec<EditRow>,
}

#[derive(Debug)]
pub struct FormController {
    state: FormState,
    /// Where the map was clicked when the form opened.
    coords: Option<Coords>,
    /// Inputs kept after a rejected submit.
    retained: Option<WorkoutForm>,
    open_edits: HashSet<String>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            state: FormState::Idle,
            coords: None,
            retained: None,
            open_edits: HashSet::new(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Map coordinates the open form will place the workout at.
    pub fn coords(&self) -> Option<Coords> {
        self.coords
    }

    pub fn retained_inputs(&self) -> Option<&WorkoutForm> {
        self.retained.as_ref()
    }

    /// Open the create form at a clicked map position. Clicking again while
    /// collecting just moves the pending position.
    pub fn open(&mut self, coords: Coords) {
        self.state = FormState::Collecting;
        self.coords = Some(coords);
    }

    /// Validate a create submission and add the workout to `store`.
    pub fn submit<'s>(
        &mut self,
        store: &'s mut WorkoutStore,
        form: WorkoutForm,
        now: DateTime<Utc>,
    ) -> Result<&'s Workout> {
        let coords = match (self.state, self.coords) {
            (FormState::Collecting, Some(coords)) => coords,
            _ => {
                return Err(AppError::Validation(
                    "Click on the map to place a workout first".to_string(),
                ))
            }
        };

        self.state = FormState::Validating;
        match Self::build(store, coords, &form, now) {
            Ok(workout) => {
                let added = store.add(workout);
                if added.is_ok() {
                    self.state = FormState::Idle;
                    self.coords = None;
                    self.retained = None;
                } else {
                    self.reject(form);
                }
                added
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected workout form");
                self.reject(form);
                Err(e)
            }
        }
    }

    fn reject(&mut self, form: WorkoutForm) {
        self.state = FormState::Collecting;
        self.retained = Some(form);
    }

    fn build(
        store: &WorkoutStore,
        coords: Coords,
        form: &WorkoutForm,
        now: DateTime<Utc>,
    ) -> Result<Workout> {
        let workout_type: WorkoutType = form.workout_type.trim().parse()?;
        let extra = match workout_type {
            WorkoutType::Running => coerce_number(&form.cadence),
            WorkoutType::Cycling => coerce_number(&form.elevation),
        };

        Workout::create(
            store.next_id(now),
            workout_type,
            coords,
            coerce_number(&form.distance),
            coerce_number(&form.duration),
            extra,
            now,
        )
        .map_err(|_| AppError::Validation(AppError::INVALID_INPUTS.to_string()))
    }

    /// Open an edit form for a workout. A second open for the same workout
    /// is a no-op reported with `opened: false`.
    pub fn open_edit(&mut self, store: &WorkoutStore, id: &str) -> Result<EditForm> {
        let workout = store
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Workout {id} not found")))?;

        let opened = self.open_edits.insert(id.to_string());
        let rows = EditField::for_type(workout.workout_type())
            .iter()
            .map(|field| EditRow {
                label: field.label().to_string(),
                value: current_value(workout, *field).to_string(),
                placeholder: Some(field.placeholder().to_string()),
            })
            .collect();

        Ok(EditForm {
            workout_id: id.to_string(),
            workout_type: workout.workout_type(),
            opened,
            rows,
        })
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.open_edits.contains(id)
    }

    /// Apply a submitted edit form. The form closes on success and stays
    /// open when the values are rejected.
    pub fn submit_edit<'s>(
        &mut self,
        store: &'s mut WorkoutStore,
        id: &str,
        rows: &[EditRow],
    ) -> Result<&'s Workout> {
        if !self.open_edits.contains(id) {
            return Err(AppError::NotFound(format!(
                "No edit form open for workout {id}"
            )));
        }

        let workout_type = store
            .find_by_id(id)
            .map(Workout::workout_type)
            .ok_or_else(|| AppError::NotFound(format!("Workout {id} not found")))?;

        let patch = patch_from_rows(workout_type, rows);
        let updated = store.update_fields(id, &patch)?;
        self.open_edits.remove(id);
        Ok(updated)
    }

    /// Back to a fresh form with no open edits.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn current_value(workout: &Workout, field: EditField) -> f64 {
    match field {
        EditField::Distance => workout.distance(),
        EditField::Duration => workout.duration(),
        EditField::Cadence | EditField::ElevationGain => workout.extra_value(),
    }
}

/// Build a patch from labelled rows. Unknown labels, and labels of the
/// other variant, are ignored.
pub fn patch_from_rows(workout_type: WorkoutType, rows: &[EditRow]) -> WorkoutPatch {
    let mut patch = WorkoutPatch::default();
    for row in rows {
        let Some(field) = EditField::from_label(&row.label, workout_type) else {
            continue;
        };
        let value = Some(coerce_number(&row.value));
        match field {
            EditField::Distance => patch.distance = value,
            EditField::Duration => patch.duration = value,
            EditField::Cadence => patch.cadence = value,
            EditField::ElevationGain => patch.elevation_gain = value,
        }
    }
    patch
}
