// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-flight create/edit session.
//!
//! At most one form is open at a time across the whole collection:
//!
//! ```text
//! Idle --start_create(coords)--> Creating(coords) --submit/cancel--> Idle
//! Idle --start_edit(id)--------> Editing(id)      --submit/cancel--> Idle
//! ```
//!
//! A rejected start is dropped, never queued.

use crate::models::{Coordinates, WorkoutId};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SessionState {
    #[default]
    Idle,
    /// New-workout form open, anchored at the clicked map location.
    Creating { coords: Coordinates },
    /// Edit form open for an existing workout.
    Editing {
        #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
        id: WorkoutId,
    },
}

#[derive(Debug, Default)]
pub struct EditSession {
    state: SessionState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Open (or re-anchor) the new-workout form. Rejected while editing.
    pub fn start_create(&mut self, coords: Coordinates) -> bool {
        match self.state {
            SessionState::Idle | SessionState::Creating { .. } => {
                self.state = SessionState::Creating { coords };
                true
            }
            SessionState::Editing { .. } => false,
        }
    }

    /// Open the edit form for `id`. Rejected unless idle.
    pub fn start_edit(&mut self, id: WorkoutId) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = SessionState::Editing { id };
        true
    }

    /// Close the session after a successful submit or a cancel, returning
    /// the state that was open.
    pub fn close(&mut self) -> SessionState {
        std::mem::take(&mut self.state)
    }
}
