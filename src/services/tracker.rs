// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The workout tracker session.
//!
//! Ties the store, form flows, map state and persistence together. Every
//! mutation is persisted right away; the returned [`SaveHandle`] can be
//! awaited for the write outcome or dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Coords, EditRow, WorkoutForm};
use crate::services::form::{EditForm, FormController, FormState};
use crate::services::map::{MapState, MapView, PanTo, PositionReport, POSITION_ALERT};
use crate::services::persistence::{PersistenceAdapter, SaveHandle};
use crate::services::presentation::{self, MarkerView, WorkoutRow};
use crate::services::store::WorkoutStore;

/// Result of a geolocation report.
#[derive(Debug, Clone, Serialize)]
pub struct PositionOutcome {
    pub map: Option<MapView>,
    pub markers: Vec<MarkerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

/// Create form status after a map click.
#[derive(Debug, Clone, Serialize)]
pub struct FormStatus {
    pub state: FormState,
    pub coords: Option<Coords>,
}

/// A newly committed workout, ready to draw.
#[derive(Debug, Clone, Serialize)]
pub struct Created {
    pub row: WorkoutRow,
    /// Absent while the map is not loaded.
    pub marker: Option<MarkerView>,
}

/// Everything the UI needs to draw the current state.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub map: Option<MapView>,
    pub form: FormStatus,
    pub rows: Vec<WorkoutRow>,
    pub markers: Vec<MarkerView>,
}

pub struct Tracker {
    store: WorkoutStore,
    form: FormController,
    map: MapState,
    persistence: PersistenceAdapter,
}

impl Tracker {
    pub fn new(store: WorkoutStore, persistence: PersistenceAdapter, zoom_level: u8) -> Self {
        Self {
            store,
            form: FormController::new(),
            map: MapState::new(zoom_level),
            persistence,
        }
    }

    /// Load the persisted store and start a session on it.
    pub async fn load(persistence: PersistenceAdapter, zoom_level: u8) -> Self {
        let store = persistence.load().await;
        Self::new(store, persistence, zoom_level)
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    fn form_status(&self) -> FormStatus {
        FormStatus {
            state: self.form.state(),
            coords: self.form.coords(),
        }
    }

    fn visible_markers(&self) -> Vec<MarkerView> {
        if self.map.is_loaded() {
            presentation::markers(&self.store)
        } else {
            Vec::new()
        }
    }

    /// Handle the browser's geolocation result.
    pub fn report_position(&mut self, report: PositionReport) -> Result<PositionOutcome> {
        match report {
            PositionReport::Located(position) => {
                let view = self.map.load(position.coords()?);
                Ok(PositionOutcome {
                    map: Some(view),
                    markers: presentation::markers(&self.store),
                    alert: None,
                })
            }
            PositionReport::Failed { error } => {
                tracing::warn!(error = %error, "Geolocation failed");
                Ok(PositionOutcome {
                    map: self.map.view(),
                    markers: self.visible_markers(),
                    alert: Some(POSITION_ALERT.to_string()),
                })
            }
        }
    }

    /// A click on the map opens the create form there. Ignored until the
    /// map is loaded.
    pub fn map_click(&mut self, coords: Coords) -> FormStatus {
        if self.map.is_loaded() {
            self.form.open(coords);
        } else {
            tracing::debug!("Ignoring map click before map load");
        }
        self.form_status()
    }

    /// Submit the create form.
    pub fn submit_workout(
        &mut self,
        form: WorkoutForm,
        now: DateTime<Utc>,
    ) -> Result<(Created, SaveHandle)> {
        let workout = self.form.submit(&mut self.store, form, now)?;
        tracing::info!(
            id = workout.id(),
            workout_type = %workout.workout_type(),
            distance = workout.distance(),
            duration = workout.duration(),
            "Workout created"
        );

        let created = Created {
            row: presentation::row(workout),
            marker: self.map.is_loaded().then(|| presentation::marker(workout)),
        };
        Ok((created, self.persistence.save(&self.store)))
    }

    pub fn open_edit(&mut self, id: &str) -> Result<EditForm> {
        self.form.open_edit(&self.store, id)
    }

    /// Submit an edit form; returns the re-rendered row of that workout only.
    pub fn submit_edit(&mut self, id: &str, rows: &[EditRow]) -> Result<(WorkoutRow, SaveHandle)> {
        let workout = self.form.submit_edit(&mut self.store, id, rows)?;
        tracing::info!(
            id,
            distance = workout.distance(),
            duration = workout.duration(),
            "Workout edited"
        );
        let row = presentation::row(workout);
        Ok((row, self.persistence.save(&self.store)))
    }

    /// Move the map to a workout from the list. Before the map is loaded
    /// this only checks that the workout exists.
    pub fn focus(&mut self, id: &str) -> Result<Option<(PanTo, SaveHandle)>> {
        let coords = self
            .store
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Workout {id} not found")))?
            .coords();
        let Some(pan) = self.map.pan_to(coords) else {
            tracing::debug!(id, "Ignoring focus before map load");
            return Ok(None);
        };
        self.store.click(id)?;
        Ok(Some((pan, self.persistence.save(&self.store))))
    }

    /// Reset command: drop every workout, the persisted data and the view.
    pub fn reset(&mut self) -> SaveHandle {
        tracing::info!(count = self.store.len(), "Resetting all workouts");
        self.store.clear();
        self.form.reset();
        self.map.unload();
        self.persistence.clear()
    }

    pub fn listing(&self) -> Listing {
        Listing {
            map: self.map.view(),
            form: self.form_status(),
            rows: presentation::rows(&self.store),
            markers: self.visible_markers(),
        }
    }
}
