// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod form;
pub mod workout;

pub use form::{EditField, EditRow, Position, WorkoutForm};
pub use workout::{Coords, Workout, WorkoutKind, WorkoutPatch, WorkoutType};
