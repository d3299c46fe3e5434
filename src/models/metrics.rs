// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived workout metrics: running pace, cycling speed, and the
//! human-readable description.

use crate::error::{AppError, Result};
use crate::models::workout::{WorkoutDetails, WorkoutInput, WorkoutKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Pace (runs) or speed (rides), computed once when a workout is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DerivedMetric {
    /// Minutes per kilometer
    Pace(f64),
    /// Kilometers per hour
    Speed(f64),
}

impl DerivedMetric {
    pub fn value(self) -> f64 {
        match self {
            DerivedMetric::Pace(v) | DerivedMetric::Speed(v) => v,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            DerivedMetric::Pace(_) => "min/km",
            DerivedMetric::Speed(_) => "km/h",
        }
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidMetricInput(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

/// Running pace in min/km.
pub fn pace_min_per_km(duration_min: f64, distance_km: f64) -> Result<f64> {
    require_positive("duration", duration_min)?;
    require_positive("distance", distance_km)?;
    Ok(duration_min / distance_km)
}

/// Cycling speed in km/h.
pub fn speed_km_per_h(duration_min: f64, distance_km: f64) -> Result<f64> {
    require_positive("duration", duration_min)?;
    require_positive("distance", distance_km)?;
    Ok(distance_km / (duration_min / 60.0))
}

/// Compute the metric that applies to the input's kind.
pub fn derive_metric(input: &WorkoutInput) -> Result<DerivedMetric> {
    match input.details {
        WorkoutDetails::Running {
            cadence_steps_per_min,
        } => {
            require_positive("cadence", cadence_steps_per_min)?;
            pace_min_per_km(input.duration_min, input.distance_km).map(DerivedMetric::Pace)
        }
        WorkoutDetails::Cycling {
            elevation_gain_meters,
        } => {
            if !elevation_gain_meters.is_finite() {
                return Err(AppError::InvalidMetricInput(format!(
                    "elevation gain must be a finite number, got {}",
                    elevation_gain_meters
                )));
            }
            speed_km_per_h(input.duration_min, input.distance_km).map(DerivedMetric::Speed)
        }
    }
}

/// "Running on April 14" style label.
pub fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), created_at.format("%B %-d"))
}
