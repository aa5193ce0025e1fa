// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View models for the map markers and the workout list.
//!
//! The browser draws these verbatim: values are already formatted the way
//! they appear on screen.

use serde::Serialize;

use crate::models::{Coords, Workout, WorkoutKind, WorkoutType};
use crate::services::store::WorkoutStore;

const POPUP_MAX_WIDTH: u32 = 250;
const POPUP_MIN_WIDTH: u32 = 100;

/// Popup options passed straight to the map library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

/// A workout marker with its always-open popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub id: String,
    pub coords: Coords,
    pub popup: PopupOptions,
    pub content: String,
}

/// One icon/value/unit cell of a list row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// A workout list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRow {
    pub id: String,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub description: String,
    pub details: Vec<Detail>,
}

pub fn marker(workout: &Workout) -> MarkerView {
    let workout_type = workout.workout_type();
    MarkerView {
        id: workout.id().to_string(),
        coords: workout.coords(),
        popup: PopupOptions {
            max_width: POPUP_MAX_WIDTH,
            min_width: POPUP_MIN_WIDTH,
            auto_close: false,
            close_on_click: false,
            class_name: format!("{workout_type}-popup"),
        },
        content: format!("{} {}", workout_type.emoji(), workout.description()),
    }
}

pub fn row(workout: &Workout) -> WorkoutRow {
    let workout_type = workout.workout_type();
    let mut details = vec![
        Detail {
            icon: workout_type.emoji(),
            value: workout.distance().to_string(),
            unit: "km",
        },
        Detail {
            icon: "⏱",
            value: workout.duration().to_string(),
            unit: "min",
        },
    ];

    match workout.kind() {
        WorkoutKind::Running { cadence, pace } => {
            details.push(Detail {
                icon: "⚡️",
                value: format!("{pace:.1}"),
                unit: "min/km",
            });
            details.push(Detail {
                icon: "🦶🏼",
                value: cadence.to_string(),
                unit: "spm",
            });
        }
        WorkoutKind::Cycling {
            elevation_gain,
            speed,
        } => {
            details.push(Detail {
                icon: "⚡️",
                value: format!("{speed:.1}"),
                unit: "km/h",
            });
            details.push(Detail {
                icon: "⛰",
                value: elevation_gain.to_string(),
                unit: "m",
            });
        }
    }

    WorkoutRow {
        id: workout.id().to_string(),
        workout_type,
        description: workout.description().to_string(),
        details,
    }
}

/// List rows, newest first.
pub fn rows(store: &WorkoutStore) -> Vec<WorkoutRow> {
    store.iter().rev().map(row).collect()
}

/// Markers in insertion order.
pub fn markers(store: &WorkoutStore) -> Vec<MarkerView> {
    store.iter().map(marker).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ride() -> Workout {
        Workout::create(
            "42".to_string(),
            WorkoutType::Cycling,
            Coords(39.0, -12.0),
            27.0,
            95.0,
            523.0,
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_marker_popup() {
        let view = marker(&ride());
        assert_eq!(view.content, "🚴 Cycling on March 5");
        assert_eq!(view.popup.class_name, "cycling-popup");
        assert!(!view.popup.auto_close);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["popup"]["maxWidth"], 250);
        assert_eq!(json["popup"]["closeOnClick"], false);
    }

    #[test]
    fn test_row_details() {
        let view = row(&ride());
        let values: Vec<&str> = view.details.iter().map(|d| d.value.as_str()).collect();
        let units: Vec<&str> = view.details.iter().map(|d| d.unit).collect();
        assert_eq!(values, vec!["27", "95", "17.1", "523"]);
        assert_eq!(units, vec!["km", "min", "km/h", "m"]);
    }
}
