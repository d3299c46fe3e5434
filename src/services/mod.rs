// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod codec;
pub mod display;
pub mod map;
pub mod session;
pub mod store;
pub mod tracker;

pub use display::{DisplaySink, ListView};
pub use map::{MapService, MarkerLayer};
pub use session::{EditSession, SessionState};
pub use store::{DeleteAll, SortDirection, SortField, SortOrder, WorkoutStore};
pub use tracker::WorkoutTracker;
