// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout record: one logged run or ride pinned to a map location.

use crate::error::{AppError, Result};
use crate::models::metrics::{self, DerivedMetric};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Opaque, immutable workout identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(Uuid);

impl WorkoutId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for WorkoutId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| AppError::BadRequest(format!("Invalid workout id: {}", s)))
    }
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Activity discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Capitalized label ("Running", "Cycling").
    pub fn label(self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    /// Emoji shown in marker popups and list items.
    pub fn icon(self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃",
            WorkoutKind::Cycling => "🚴",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutKind::Running => f.write_str("running"),
            WorkoutKind::Cycling => f.write_str("cycling"),
        }
    }
}

/// Kind-specific fields. Exactly one of cadence or elevation gain exists,
/// and which one is fixed by the variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutDetails {
    Running { cadence_steps_per_min: f64 },
    Cycling { elevation_gain_meters: f64 },
}

impl WorkoutDetails {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Handle to a marker owned by the map service. Records only point at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MarkerRef(pub u64);

/// Validated measurements used to build (or rebuild) a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub duration_min: f64,
    pub distance_km: f64,
    pub details: WorkoutDetails,
}

/// A single logged activity.
///
/// Records are immutable once built; an edit constructs a replacement via
/// [`Workout::rebuild`], which keeps identity, timestamp, coordinates and marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    coords: Coordinates,
    duration_min: f64,
    distance_km: f64,
    created_at: DateTime<Utc>,
    details: WorkoutDetails,
    metric: DerivedMetric,
    description: String,
    marker: Option<MarkerRef>,
}

impl Workout {
    /// Create a brand-new workout with a fresh id and the current time.
    pub fn create(coords: Coordinates, input: WorkoutInput) -> Result<Self> {
        Self::from_parts(WorkoutId::new(), coords, Utc::now(), input)
    }

    /// Build a workout from all of its durable parts. Derived values are
    /// computed here and nowhere else.
    pub fn from_parts(
        id: WorkoutId,
        coords: Coordinates,
        created_at: DateTime<Utc>,
        input: WorkoutInput,
    ) -> Result<Self> {
        let metric = metrics::derive_metric(&input)?;
        let description = metrics::describe(input.details.kind(), created_at);

        Ok(Self {
            id,
            coords,
            duration_min: input.duration_min,
            distance_km: input.distance_km,
            created_at,
            details: input.details,
            metric,
            description,
            marker: None,
        })
    }

    /// Build the replacement for this workout from new field values.
    ///
    /// The result may be of a different kind, and carries over this
    /// workout's id, creation time, coordinates and marker.
    pub fn rebuild(&self, input: WorkoutInput) -> Result<Self> {
        let mut replacement = Self::from_parts(self.id, self.coords, self.created_at, input)?;
        replacement.marker = self.marker;
        Ok(replacement)
    }

    pub fn id(&self) -> WorkoutId {
        self.id
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    pub fn details(&self) -> WorkoutDetails {
        self.details
    }

    pub fn metric(&self) -> DerivedMetric {
        self.metric
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn marker(&self) -> Option<MarkerRef> {
        self.marker
    }

    /// Running cadence, if this is a run.
    pub fn cadence(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running {
                cadence_steps_per_min,
            } => Some(cadence_steps_per_min),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    /// Cycling elevation gain, if this is a ride.
    pub fn elevation_gain(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling {
                elevation_gain_meters,
            } => Some(elevation_gain_meters),
            WorkoutDetails::Running { .. } => None,
        }
    }

    pub fn pace(&self) -> Option<f64> {
        match self.metric {
            DerivedMetric::Pace(pace) => Some(pace),
            DerivedMetric::Speed(_) => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.metric {
            DerivedMetric::Speed(speed) => Some(speed),
            DerivedMetric::Pace(_) => None,
        }
    }

    /// The measurements this workout was built from.
    pub fn input(&self) -> WorkoutInput {
        WorkoutInput {
            duration_min: self.duration_min,
            distance_km: self.distance_km,
            details: self.details,
        }
    }

    /// Marker popup text, e.g. "🏃 Running on April 14".
    pub fn popup_text(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    pub(crate) fn set_marker(&mut self, marker: Option<MarkerRef>) {
        self.marker = marker;
    }
}
