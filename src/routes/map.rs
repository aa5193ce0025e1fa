// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map routes: geolocation result and map clicks.

use crate::error::Result;
use crate::models::Position;
use crate::services::map::PositionReport;
use crate::services::tracker::{FormStatus, PositionOutcome};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/position", post(report_position))
        .route("/api/map/click", post(map_click))
}

/// Geolocation succeeded or failed in the browser.
async fn report_position(
    State(state): State<Arc<AppState>>,
    Json(report): Json<PositionReport>,
) -> Result<Json<PositionOutcome>> {
    let outcome = state.tracker.lock().await.report_position(report)?;
    Ok(Json(outcome))
}

/// The map was clicked; opens the create form at that point.
async fn map_click(
    State(state): State<Arc<AppState>>,
    Json(position): Json<Position>,
) -> Result<Json<FormStatus>> {
    let coords = position.coords()?;
    Ok(Json(state.tracker.lock().await.map_click(coords)))
}
