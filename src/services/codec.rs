// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot encoding for the workout collection.
//!
//! Only durable fields are written. Marker handles belong to the live map
//! and are dropped; pace/speed and the description are recomputed on load,
//! so a decoded workout is identical to the one that was encoded apart from
//! its (absent) marker.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, Workout, WorkoutDetails, WorkoutId, WorkoutInput, WorkoutKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One workout as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWorkout {
    pub id: WorkoutId,
    pub coords: Coordinates,
    /// Minutes
    pub duration: f64,
    /// Kilometers
    pub distance: f64,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
}

impl From<&Workout> for StoredWorkout {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id(),
            coords: workout.coords(),
            duration: workout.duration_min(),
            distance: workout.distance_km(),
            created_at: workout.created_at(),
            kind: workout.kind(),
            cadence: workout.cadence(),
            elevation_gain: workout.elevation_gain(),
        }
    }
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = AppError;

    fn try_from(stored: StoredWorkout) -> Result<Self> {
        let details = match (stored.kind, stored.cadence, stored.elevation_gain) {
            (WorkoutKind::Running, Some(cadence), None) => WorkoutDetails::Running {
                cadence_steps_per_min: cadence,
            },
            (WorkoutKind::Cycling, None, Some(elevation)) => WorkoutDetails::Cycling {
                elevation_gain_meters: elevation,
            },
            (kind, _, _) => {
                return Err(AppError::Codec(format!(
                    "Workout {} has fields that do not match kind {}",
                    stored.id, kind
                )))
            }
        };

        let input = WorkoutInput {
            duration_min: stored.duration,
            distance_km: stored.distance,
            details,
        };

        Workout::from_parts(stored.id, stored.coords, stored.created_at, input).map_err(|e| {
            AppError::Codec(format!("Workout {} is invalid: {}", stored.id, e))
        })
    }
}

#[derive(Serialize)]
struct Snapshot {
    version: u32,
    workouts: Vec<StoredWorkout>,
}

/// Accepted on load: the versioned envelope, or a bare array from before
/// the envelope existed.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFormat {
    Versioned {
        version: u32,
        workouts: Vec<StoredWorkout>,
    },
    Legacy(Vec<StoredWorkout>),
}

/// Serialize workouts in canonical order.
pub fn encode(workouts: &[Workout]) -> Result<String> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        workouts: workouts.iter().map(StoredWorkout::from).collect(),
    };
    serde_json::to_string(&snapshot).map_err(|e| AppError::Codec(e.to_string()))
}

/// Deserialize workouts, preserving their stored order. Every returned
/// workout has no marker.
pub fn decode(data: &str) -> Result<Vec<Workout>> {
    let format: SnapshotFormat =
        serde_json::from_str(data).map_err(|e| AppError::Codec(e.to_string()))?;

    let stored = match format {
        SnapshotFormat::Versioned { version, workouts } if version == SNAPSHOT_VERSION => workouts,
        SnapshotFormat::Versioned { version, .. } => {
            return Err(AppError::Codec(format!(
                "Unsupported snapshot version {}",
                version
            )))
        }
        SnapshotFormat::Legacy(workouts) => {
            tracing::debug!(count = workouts.len(), "Decoding legacy snapshot");
            workouts
        }
    };

    let mut seen = HashSet::with_capacity(stored.len());
    let mut workouts = Vec::with_capacity(stored.len());
    for entry in stored {
        if !seen.insert(entry.id) {
            return Err(AppError::Codec(format!("Duplicate workout id {}", entry.id)));
        }
        workouts.push(Workout::try_from(entry)?);
    }

    Ok(workouts)
}
