// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod form;
pub mod map;
pub mod persistence;
pub mod presentation;
pub mod store;
pub mod tracker;

pub use form::{EditForm, FormController, FormState};
pub use map::{MapState, PositionReport};
pub use persistence::{PersistenceAdapter, SaveHandle};
pub use store::WorkoutStore;
pub use tracker::Tracker;
