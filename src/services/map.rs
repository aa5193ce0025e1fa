// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map view state driven by the browser's geolocation and map events.
//!
//! The map only exists once a position has been obtained. Until then every
//! map-dependent action (placing a workout, drawing markers, panning) is a
//! no-op.

use serde::{Deserialize, Serialize};

use crate::models::{Coords, Position};

/// Alert shown when the browser cannot provide a position.
pub const POSITION_ALERT: &str = "Could not get your position";

/// Seconds a pan to a focused workout takes.
const PAN_DURATION_SECS: f64 = 1.0;

/// Geolocation result reported by the browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PositionReport {
    Located(Position),
    Failed { error: String },
}

/// Current map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coords,
    pub zoom: u8,
}

/// Instruction to move the map to a workout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanTo {
    pub center: Coords,
    pub zoom: u8,
    pub animate: bool,
    pub pan_duration_secs: f64,
}

#[derive(Debug, Clone)]
pub struct MapState {
    zoom_level: u8,
    view: Option<MapView>,
}

impl MapState {
    pub fn new(zoom_level: u8) -> Self {
        Self {
            zoom_level,
            view: None,
        }
    }

    /// Initialise (or re-center) the map on a position.
    pub fn load(&mut self, center: Coords) -> MapView {
        let view = MapView {
            center,
            zoom: self.zoom_level,
        };
        self.view = Some(view);
        tracing::info!(
            latitude = center.latitude(),
            longitude = center.longitude(),
            zoom = self.zoom_level,
            "Map loaded"
        );
        view
    }

    pub fn is_loaded(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<MapView> {
        self.view
    }

    /// Pan to `center`. `None` while the map is not loaded.
    pub fn pan_to(&mut self, center: Coords) -> Option<PanTo> {
        let view = self.view.as_mut()?;
        view.center = center;
        Some(PanTo {
            center,
            zoom: self.zoom_level,
            animate: true,
            pan_duration_secs: PAN_DURATION_SECS,
        })
    }

    /// Drop the view, as on a page reload.
    pub fn unload(&mut self) {
        self.view = None;
    }
}
