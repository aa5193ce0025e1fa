// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory, insertion-ordered collection of workouts.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Workout, WorkoutPatch};

/// Ids are the last ten decimal digits of a millisecond timestamp.
const ID_MODULUS: i64 = 10_000_000_000;

/// Ordered workout collection. Lookups are linear scans; a single user
/// never has enough workouts to need an index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a time-derived id not yet used in this store. Collisions
    /// (two workouts in the same millisecond, or a wrapped timestamp) are
    /// resolved by bumping to the next free value.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis().rem_euclid(ID_MODULUS);
        loop {
            let id = format!("{millis:010}");
            if self.find_by_id(&id).is_none() {
                return id;
            }
            millis = (millis + 1) % ID_MODULUS;
        }
    }

    /// Append a workout. Duplicate ids are rejected.
    pub fn add(&mut self, workout: Workout) -> Result<&Workout> {
        if self.find_by_id(workout.id()).is_some() {
            return Err(AppError::Conflict(format!(
                "Workout {} already exists",
                workout.id()
            )));
        }
        self.workouts.push(workout);
        Ok(&self.workouts[self.workouts.len() - 1])
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    fn find_by_id_mut(&mut self, id: &str) -> Result<&mut Workout> {
        self.workouts
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("Workout {id} not found")))
    }

    /// Apply an edit patch to one workout and recompute its derived values.
    pub fn update_fields(&mut self, id: &str, patch: &WorkoutPatch) -> Result<&Workout> {
        let workout = self.find_by_id_mut(id)?;
        workout.apply_patch(patch)?;
        Ok(workout)
    }

    /// Register a click (focus from the list) on one workout.
    pub fn click(&mut self, id: &str) -> Result<&Workout> {
        let workout = self.find_by_id_mut(id)?;
        workout.click();
        Ok(workout)
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Serialize every workout, in insertion order, as a JSON array.
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string(&self.workouts)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize workouts: {e}")))
    }

    /// Rebuild a store from [`WorkoutStore::serialize`] output.
    ///
    /// The variant comes from each record's `type` tag. Pace and speed are
    /// re-derived rather than trusted and every record is re-validated. A
    /// record whose id was already seen keeps its data under a fresh id. A
    /// JSON `null` reads as an empty store.
    pub fn deserialize(blob: &str) -> Result<Self> {
        let decoded: Option<Vec<Workout>> =
            serde_json::from_str(blob).map_err(|e| AppError::PersistenceDecode(e.to_string()))?;

        let mut store = Self::new();
        for mut workout in decoded.unwrap_or_default() {
            workout.validate().map_err(|e| {
                AppError::PersistenceDecode(format!("workout {}: {}", workout.id(), e))
            })?;
            workout.recompute_derived();
            if store.find_by_id(workout.id()).is_some() {
                let fresh = store.next_id(workout.created_at());
                tracing::warn!(
                    stored_id = workout.id(),
                    new_id = %fresh,
                    "Duplicate stored workout id; assigning a fresh one"
                );
                workout.reassign_id(fresh);
            }
            store.add(workout)?;
        }
        Ok(store)
    }
}

impl<'a> IntoIterator for &'a WorkoutStore {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
