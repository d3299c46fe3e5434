// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout tracker: ties user commands to the store, map and display.
//!
//! Handles the core workflow:
//! 1. Map click or edit click opens the single-flight form session
//! 2. Submitted fields are validated before anything is mutated
//! 3. The store is mutated (and snapshotted)
//! 4. Markers and list items are brought in line with the store
//!
//! The map is optional. Until a position is known the tracker keeps
//! working without one; markers for every workout are placed as soon
//! as a map is attached.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, MarkerRef, Workout, WorkoutFields, WorkoutId, WorkoutKind};
use crate::services::display::DisplaySink;
use crate::services::map::MapService;
use crate::services::session::{EditSession, SessionState};
use crate::services::store::{DeleteAll, Replaced, SortOrder, WorkoutStore};

pub struct WorkoutTracker<M, D> {
    store: WorkoutStore,
    session: EditSession,
    display: D,
    map: Option<M>,
    zoom: u8,
}

impl<M: MapService, D: DisplaySink> WorkoutTracker<M, D> {
    /// Build a tracker over a loaded store and render its workouts.
    pub fn restore(store: WorkoutStore, mut display: D, zoom: u8) -> Self {
        for workout in store.workouts() {
            display.render_list_item(workout);
        }

        Self {
            store,
            session: EditSession::new(),
            display,
            map: None,
            zoom,
        }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// The user's position is known: center the map there and place a
    /// marker for every workout.
    pub fn attach_map(&mut self, mut map: M, center: Coordinates) -> Result<()> {
        map.center_view(center, self.zoom);

        let placed: Vec<(WorkoutId, MarkerRef)> = self
            .store
            .workouts()
            .iter()
            .map(|w| (w.id(), place_marker(&mut map, w)))
            .collect();
        for (id, marker) in &placed {
            self.store.attach_marker(*id, Some(*marker))?;
        }

        tracing::info!(
            lat = center.lat,
            lng = center.lng,
            markers = placed.len(),
            "Map attached"
        );
        self.map = Some(map);
        Ok(())
    }

    /// Map clicked: open (or move) the new-workout form at `coords`.
    /// Returns `false` if an edit is in progress.
    pub fn start_create(&mut self, coords: Coordinates) -> bool {
        if !self.session.start_create(coords) {
            tracing::debug!("Create rejected: edit in progress");
            return false;
        }
        self.display.render_form(WorkoutKind::Running, None);
        true
    }

    /// Open the edit form for `id`. Returns `Ok(false)` (and changes
    /// nothing) if another form is already open.
    pub fn start_edit(&mut self, id: WorkoutId) -> Result<bool> {
        if !self.session.is_idle() {
            tracing::debug!(workout_id = %id, state = ?self.session.state(), "Edit rejected");
            return Ok(false);
        }

        let workout = self.store.find(id)?;
        let kind = workout.kind();
        let prefill = WorkoutFields::from_workout(workout);

        self.session.start_edit(id);
        self.display.hide_list_item(id);
        self.display.render_form(kind, Some(&prefill));
        tracing::debug!(workout_id = %id, "Editing workout");
        Ok(true)
    }

    /// Submit the open form. On a validation error the form stays open
    /// and the store is untouched.
    pub fn submit(&mut self, fields: &WorkoutFields) -> Result<Workout> {
        let no_form = || AppError::BadRequest("No workout form is open".to_string());
        let state = self.session.state();
        if state == SessionState::Idle {
            return Err(no_form());
        }

        let input = match fields.validate() {
            Ok(input) => input,
            Err(e) => {
                if let AppError::Validation(msg) = &e {
                    self.display.show_error(msg);
                }
                tracing::debug!(error = %e, "Rejected workout form");
                return Err(e);
            }
        };

        let workout = match state {
            SessionState::Creating { coords } => {
                let workout = Workout::create(coords, input)?;
                self.store.create(workout.clone())?;
                self.place_workout_marker(workout)?
            }
            SessionState::Editing { id } => {
                let Replaced {
                    workout,
                    old_marker,
                } = self.store.replace(id, input)?;
                if let (Some(map), Some(marker)) = (self.map.as_mut(), old_marker) {
                    map.remove_marker(marker);
                }
                self.place_workout_marker(workout)?
            }
            SessionState::Idle => return Err(no_form()),
        };

        self.display.render_list_item(&workout);
        self.display.hide_form();
        self.session.close();
        Ok(workout)
    }

    /// Escape pressed: drop the open form and restore what it covered.
    pub fn cancel(&mut self) -> SessionState {
        let closed = self.session.close();
        match closed {
            SessionState::Idle => {}
            SessionState::Creating { .. } => self.display.hide_form(),
            SessionState::Editing { id } => {
                self.display.hide_form();
                self.display.show_list_item(id);
            }
        }
        closed
    }

    pub fn delete(&mut self, id: WorkoutId) -> Result<()> {
        let marker = self.store.delete(id)?;
        if let (Some(map), Some(marker)) = (self.map.as_mut(), marker) {
            map.remove_marker(marker);
        }
        self.display.remove_list_item(id);

        if self.session.state() == (SessionState::Editing { id }) {
            self.session.close();
            self.display.hide_form();
        }
        Ok(())
    }

    /// Remove everything. A second call in a row reports
    /// [`DeleteAll::NothingToDo`].
    pub fn delete_all(&mut self) -> Result<DeleteAll> {
        let outcome = self.store.delete_all()?;

        if let DeleteAll::Cleared { markers, .. } = &outcome {
            if let Some(map) = self.map.as_mut() {
                for marker in markers {
                    map.remove_marker(*marker);
                }
            }
            self.display.clear_all_list_items();

            if matches!(self.session.state(), SessionState::Editing { .. }) {
                self.session.close();
                self.display.hide_form();
            }
        }
        Ok(outcome)
    }

    /// Return workouts in `order` and redraw the list to match.
    ///
    /// The default list shows newest first, as items are always inserted at
    /// the top; a sorted list shows the first workout of the view on top.
    pub fn sorted(&mut self, order: Option<SortOrder>) -> Vec<Workout> {
        let view: Vec<Workout> = self
            .store
            .sorted_view(order)
            .into_iter()
            .cloned()
            .collect();

        self.display.clear_all_list_items();
        match order {
            None => view.iter().for_each(|w| self.display.render_list_item(w)),
            Some(_) => view
                .iter()
                .rev()
                .for_each(|w| self.display.render_list_item(w)),
        }
        if let SessionState::Editing { id } = self.session.state() {
            self.display.hide_list_item(id);
        }

        view
    }

    /// Center the map on workout `id`. Returns `false` when there is no map.
    pub fn recenter(&mut self, id: WorkoutId) -> Result<bool> {
        let coords = self.store.find(id)?.coords();
        match self.map.as_mut() {
            Some(map) => {
                map.center_view(coords, self.zoom);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Final snapshot on shutdown.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    fn place_workout_marker(&mut self, mut workout: Workout) -> Result<Workout> {
        let marker = self.map.as_mut().map(|map| place_marker(map, &workout));
        self.store.attach_marker(workout.id(), marker)?;
        workout.set_marker(marker);
        Ok(workout)
    }
}

fn place_marker<M: MapService>(map: &mut M, workout: &Workout) -> MarkerRef {
    map.place_marker(workout.coords(), workout.kind(), &workout.popup_text())
}
