// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ZOOM_LEVEL: u8 = 13;
/// Highest zoom level the map tile server provides.
const MAX_ZOOM_LEVEL: u8 = 19;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory holding the durable blob store
    pub data_dir: PathBuf,
    /// Key under which all workouts are persisted
    pub storage_key: String,
    /// Zoom level used when centering the map on a position or workout
    pub map_zoom_level: u8,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("target/test-data"),
            storage_key: crate::db::keys::WORKOUTS.to_string(),
            map_zoom_level: DEFAULT_ZOOM_LEVEL,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let map_zoom_level = match env::var("MAP_ZOOM_LEVEL") {
            Ok(raw) => match raw.trim().parse::<u8>() {
                Ok(level) if level <= MAX_ZOOM_LEVEL => level,
                _ => return Err(ConfigError::Invalid("MAP_ZOOM_LEVEL", raw)),
            },
            Err(_) => DEFAULT_ZOOM_LEVEL,
        };

        let storage_key = env::var("STORAGE_KEY")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| crate::db::keys::WORKOUTS.to_string());
        if storage_key.is_empty() {
            return Err(ConfigError::Invalid("STORAGE_KEY", storage_key));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            storage_key,
            map_zoom_level,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
