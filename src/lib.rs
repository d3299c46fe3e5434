// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mapty Tracker: log runs and rides where they happened.
//!
//! This crate keeps an editable, sortable list of workouts, each pinned to
//! a spot on a map, persists it across restarts, and serves it to a map
//! frontend over a small JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::KeyValueStore;
use services::{ListView, MarkerLayer, WorkoutStore, WorkoutTracker};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tracker wired to the in-memory map and list models the API serves.
pub type Tracker = WorkoutTracker<MarkerLayer, ListView>;

/// Shared application state.
///
/// All commands go through the one tracker lock, so each runs to
/// completion before the next starts.
pub struct AppState {
    pub config: Config,
    pub tracker: Mutex<Tracker>,
}

impl AppState {
    /// Restore persisted workouts and build the shared state. If the config
    /// carries a home position, the map is attached right away.
    pub fn load(config: Config, storage: Arc<dyn KeyValueStore>) -> error::Result<Self> {
        let store = WorkoutStore::load(storage, config.storage_key.clone())?;
        let display = ListView::new(chrono::Duration::milliseconds(config.error_display_ms));
        let mut tracker = WorkoutTracker::restore(store, display, config.map_zoom);

        if let Some(home) = config.home {
            tracker.attach_map(MarkerLayer::new(), home)?;
        }

        Ok(Self {
            config,
            tracker: Mutex::new(tracker),
        })
    }
}
