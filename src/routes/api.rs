// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout API routes: list, create, edit, focus and reset.

use crate::error::Result;
use crate::models::{EditRow, WorkoutForm};
use crate::services::map::PanTo;
use crate::services::presentation::WorkoutRow;
use crate::services::tracker::{Created, Listing};
use crate::services::EditForm;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_ID_LEN: usize = 32;
const MAX_EDIT_ROWS: usize = 16;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/workouts",
            get(list_workouts)
                .post(create_workout)
                .delete(reset_workouts),
        )
        .route("/api/workouts/{id}", put(submit_edit))
        .route("/api/workouts/{id}/edit", post(open_edit))
        .route("/api/workouts/{id}/focus", post(focus_workout))
}

fn check_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > MAX_ID_LEN {
        return Err(crate::error::AppError::BadRequest(
            "Invalid workout id".to_string(),
        ));
    }
    Ok(())
}

// ─── Listing ─────────────────────────────────────────────────

/// Everything needed to draw the list and the markers.
async fn list_workouts(State(state): State<Arc<AppState>>) -> Json<Listing> {
    Json(state.tracker.lock().await.listing())
}

// ─── Create ──────────────────────────────────────────────────

/// Submit the create form. The write to storage is queued, not awaited.
async fn create_workout(
    State(state): State<Arc<AppState>>,
    Json(form): Json<WorkoutForm>,
) -> Result<(StatusCode, Json<Created>)> {
    let (created, save) = state
        .tracker
        .lock()
        .await
        .submit_workout(form, chrono::Utc::now())?;
    drop(save);
    Ok((StatusCode::CREATED, Json(created)))
}

// ─── Edit ────────────────────────────────────────────────────

async fn open_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EditForm>> {
    check_id(&id)?;
    let form = state.tracker.lock().await.open_edit(&id)?;
    if !form.opened {
        tracing::debug!(id = %id, "Edit form already open");
    }
    Ok(Json(form))
}

#[derive(Deserialize)]
struct EditSubmission {
    rows: Vec<EditRow>,
}

/// Submit an edit form; responds with the refreshed row only.
async fn submit_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(submission): Json<EditSubmission>,
) -> Result<Json<WorkoutRow>> {
    check_id(&id)?;
    if submission.rows.len() > MAX_EDIT_ROWS {
        return Err(crate::error::AppError::BadRequest(
            "Too many form rows".to_string(),
        ));
    }
    let (row, save) = state
        .tracker
        .lock()
        .await
        .submit_edit(&id, &submission.rows)?;
    drop(save);
    Ok(Json(row))
}

// ─── Focus ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FocusResponse {
    /// Absent while the map is not loaded.
    pub pan: Option<PanTo>,
}

/// Move the map to a workout picked from the list.
async fn focus_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FocusResponse>> {
    check_id(&id)?;
    let focused = state.tracker.lock().await.focus(&id)?;
    let pan = focused.map(|(pan, save)| {
        drop(save);
        pan
    });
    Ok(Json(FocusResponse { pan }))
}

// ─── Reset ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ResetResponse {
    pub success: bool,
}

/// Delete every workout and the persisted data. Waits for storage.
async fn reset_workouts(State(state): State<Arc<AppState>>) -> Result<Json<ResetResponse>> {
    let cleared = state.tracker.lock().await.reset();
    cleared.await?;
    Ok(Json(ResetResponse { success: true }))
}
