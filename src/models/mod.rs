// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod form;
pub mod metrics;
pub mod workout;

pub use form::WorkoutFields;
pub use metrics::DerivedMetric;
pub use workout::{
    Coordinates, MarkerRef, Workout, WorkoutDetails, WorkoutId, WorkoutInput, WorkoutKind,
};
