// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw form values submitted for a new or edited workout.

use crate::error::{AppError, Result};
use crate::models::workout::{Workout, WorkoutDetails, WorkoutInput, WorkoutKind};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Message shown when any field fails validation.
pub const VALIDATION_MESSAGE: &str = "Inputs have to be positive numbers!";

/// Workout form contents. Numeric fields are optional because an empty
/// input is possible; validation turns these into a [`WorkoutInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutFields {
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    /// Minutes
    pub duration: Option<f64>,
    /// Kilometers
    pub distance: Option<f64>,
    /// Steps per minute (running)
    #[serde(default)]
    pub cadence: Option<f64>,
    /// Meters (cycling)
    #[serde(default)]
    pub elevation_gain: Option<f64>,
}

impl WorkoutFields {
    /// Pre-populated form values for editing an existing workout.
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            kind: workout.kind(),
            duration: Some(workout.duration_min()),
            distance: Some(workout.distance_km()),
            cadence: workout.cadence(),
            elevation_gain: workout.elevation_gain(),
        }
    }

    /// Apply the form rule: every relevant field is a finite number;
    /// duration, distance, and (for runs) cadence are strictly positive.
    /// Elevation gain may be zero or negative.
    pub fn validate(&self) -> Result<WorkoutInput> {
        let duration_min = positive(self.duration)?;
        let distance_km = positive(self.distance)?;

        let details = match self.kind {
            WorkoutKind::Running => WorkoutDetails::Running {
                cadence_steps_per_min: positive(self.cadence)?,
            },
            WorkoutKind::Cycling => WorkoutDetails::Cycling {
                elevation_gain_meters: finite(self.elevation_gain)?,
            },
        };

        Ok(WorkoutInput {
            duration_min,
            distance_km,
            details,
        })
    }
}

fn finite(value: Option<f64>) -> Result<f64> {
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(VALIDATION_MESSAGE.to_string()))
}

fn positive(value: Option<f64>) -> Result<f64> {
    let v = finite(value)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(AppError::Validation(VALIDATION_MESSAGE.to_string()))
    }
}
