// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered workout collection.
//!
//! Canonical order is creation order. Every mutation ends with a full
//! snapshot through the persistence backend. A mutation whose snapshot
//! fails is undone, so memory and storage always agree. Sorted views are read-only and never reorder the
//! collection.

use crate::db::KeyValueStore;
use crate::error::{AppError, Result};
use crate::models::{MarkerRef, Workout, WorkoutId, WorkoutInput, WorkoutKind};
use crate::services::codec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Numeric field a view can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Distance,
    Duration,
    /// Runs only
    Cadence,
    /// Runs only
    Pace,
    /// Rides only
    ElevationGain,
    /// Rides only
    Speed,
}

impl SortField {
    /// The kind this field is restricted to, if any.
    pub fn kind(self) -> Option<WorkoutKind> {
        match self {
            SortField::Distance | SortField::Duration => None,
            SortField::Cadence | SortField::Pace => Some(WorkoutKind::Running),
            SortField::ElevationGain | SortField::Speed => Some(WorkoutKind::Cycling),
        }
    }

    /// Field value for `workout`, or `None` when the field does not apply.
    pub fn value(self, workout: &Workout) -> Option<f64> {
        match self {
            SortField::Distance => Some(workout.distance_km()),
            SortField::Duration => Some(workout.duration_min()),
            SortField::Cadence => workout.cadence(),
            SortField::Pace => workout.pace(),
            SortField::ElevationGain => workout.elevation_gain(),
            SortField::Speed => workout.speed(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SortField::Distance => "distance",
            SortField::Duration => "duration",
            SortField::Cadence => "cadence",
            SortField::Pace => "pace",
            SortField::ElevationGain => "elevationGain",
            SortField::Speed => "speed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    Asc,
    /// Largest first
    Desc,
}

/// A sort request such as `distance-asc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parse a sort key. `"default"` (or an empty key) means canonical order.
    pub fn parse(key: &str) -> Result<Option<Self>> {
        if key.is_empty() || key == "default" {
            return Ok(None);
        }
        key.parse().map(Some)
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::BadRequest(format!("Unknown sort key: {}", s));

        let (field, direction) = s.split_once('-').ok_or_else(invalid)?;
        let field = match field {
            "distance" => SortField::Distance,
            "duration" => SortField::Duration,
            "cadence" => SortField::Cadence,
            "pace" => SortField::Pace,
            "elevationGain" => SortField::ElevationGain,
            "speed" => SortField::Speed,
            _ => return Err(invalid()),
        };
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(invalid()),
        };

        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}-{}", self.field.as_str(), direction)
    }
}

/// Outcome of [`WorkoutStore::replace`].
#[derive(Debug, Clone)]
pub struct Replaced {
    /// The new record, already in the old one's position.
    pub workout: Workout,
    /// Marker of the record that was replaced, for the caller to dispose.
    pub old_marker: Option<MarkerRef>,
}

/// Outcome of [`WorkoutStore::delete_all`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteAll {
    /// The store was already empty; nothing was written.
    NothingToDo,
    Cleared {
        removed: usize,
        /// Markers of the removed records, for the caller to dispose.
        markers: Vec<MarkerRef>,
    },
}

/// Workout collection in canonical (creation) order.
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl WorkoutStore {
    /// An empty store that persists under `key`.
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            workouts: Vec::new(),
            storage,
            key: key.into(),
        }
    }

    /// Initialize from the persisted snapshot, if any. Loaded workouts have
    /// no markers yet.
    pub fn load(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self> {
        let mut store = Self::new(storage, key);
        if let Some(data) = store.storage.load(&store.key)? {
            store.workouts = codec::decode(&data)?;
        }
        tracing::info!(
            key = %store.key,
            count = store.workouts.len(),
            "Loaded workouts"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// All workouts in canonical order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn find(&self, id: WorkoutId) -> Result<&Workout> {
        self.workouts
            .iter()
            .find(|w| w.id() == id)
            .ok_or_else(|| AppError::workout_not_found(id))
    }

    fn position(&self, id: WorkoutId) -> Result<usize> {
        self.workouts
            .iter()
            .position(|w| w.id() == id)
            .ok_or_else(|| AppError::workout_not_found(id))
    }

    /// Append a new workout.
    pub fn create(&mut self, workout: Workout) -> Result<()> {
        let id = workout.id();
        let duplicate = self.workouts.iter().any(|w| w.id() == id);
        debug_assert!(!duplicate, "duplicate workout id {}", id);
        if duplicate {
            return Err(AppError::DuplicateId(id));
        }

        self.workouts.push(workout);
        if let Err(e) = self.snapshot() {
            self.workouts.pop();
            return Err(e);
        }
        tracing::info!(workout_id = %id, count = self.workouts.len(), "Workout created");
        Ok(())
    }

    /// Rebuild workout `id` from new values (possibly as a different kind)
    /// in the same position, keeping its id, creation time and coordinates.
    pub fn replace(&mut self, id: WorkoutId, input: WorkoutInput) -> Result<Replaced> {
        let index = self.position(id)?;
        let old = &self.workouts[index];
        let old_marker = old.marker();
        let workout = old.rebuild(input)?;

        let previous = std::mem::replace(&mut self.workouts[index], workout.clone());
        if let Err(e) = self.snapshot() {
            self.workouts[index] = previous;
            return Err(e);
        }
        tracing::info!(workout_id = %id, kind = %workout.kind(), "Workout replaced");

        Ok(Replaced {
            workout,
            old_marker,
        })
    }

    /// Remove workout `id`, returning its marker for disposal.
    pub fn delete(&mut self, id: WorkoutId) -> Result<Option<MarkerRef>> {
        let index = self.position(id)?;
        let removed = self.workouts.remove(index);
        if let Err(e) = self.snapshot() {
            self.workouts.insert(index, removed);
            return Err(e);
        }
        tracing::info!(workout_id = %id, count = self.workouts.len(), "Workout deleted");
        Ok(removed.marker())
    }

    /// Remove every workout, returning all markers for disposal.
    pub fn delete_all(&mut self) -> Result<DeleteAll> {
        if self.workouts.is_empty() {
            tracing::debug!("No workouts to delete");
            return Ok(DeleteAll::NothingToDo);
        }

        let removed = std::mem::take(&mut self.workouts);
        if let Err(e) = self.snapshot() {
            self.workouts = removed;
            return Err(e);
        }
        let markers = removed.iter().filter_map(Workout::marker).collect();
        tracing::info!(removed = removed.len(), "All workouts deleted");

        Ok(DeleteAll::Cleared {
            removed: removed.len(),
            markers,
        })
    }

    /// Record the marker currently showing workout `id`. Markers are not
    /// durable, so this does not snapshot.
    pub fn attach_marker(&mut self, id: WorkoutId, marker: Option<MarkerRef>) -> Result<()> {
        let index = self.position(id)?;
        self.workouts[index].set_marker(marker);
        Ok(())
    }

    /// Workouts in the requested order without touching canonical order.
    ///
    /// Kind-specific fields only yield workouts of that kind. Ties keep
    /// their canonical relative order. `None` gives canonical order.
    pub fn sorted_view(&self, order: Option<SortOrder>) -> Vec<&Workout> {
        let Some(order) = order else {
            return self.workouts.iter().collect();
        };

        let mut keyed: Vec<(f64, &Workout)> = self
            .workouts
            .iter()
            .filter_map(|w| order.field.value(w).map(|v| (v, w)))
            .collect();

        // sort_by is stable, so equal values stay in canonical order
        // in both directions.
        match order.direction {
            SortDirection::Asc => keyed.sort_by(|a, b| a.0.total_cmp(&b.0)),
            SortDirection::Desc => keyed.sort_by(|a, b| b.0.total_cmp(&a.0)),
        }

        keyed.into_iter().map(|(_, w)| w).collect()
    }

    /// Write the full collection. Also the teardown step on shutdown.
    pub fn flush(&self) -> Result<()> {
        self.snapshot()
    }

    fn snapshot(&self) -> Result<()> {
        let data = codec::encode(&self.workouts)?;
        self.storage.save(&self.key, &data).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Failed to persist workouts");
            e
        })
    }
}
