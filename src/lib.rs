// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Map: record runs and rides by clicking on a map
//!
//! This crate provides the backend API for the map UI: the workout record
//! model, the ordered workout store, its persistence, and the create/edit
//! form flows.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{PersistenceAdapter, Tracker};
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub persistence: PersistenceAdapter,
    /// The single user session. Each request holds the lock for one UI event.
    pub tracker: Mutex<Tracker>,
}

impl AppState {
    /// Load persisted workouts and build the state around them.
    pub async fn load(config: Config, persistence: PersistenceAdapter) -> Self {
        let tracker = Tracker::load(persistence.clone(), config.map_zoom_level).await;
        Self {
            config,
            persistence,
            tracker: Mutex::new(tracker),
        }
    }
}
