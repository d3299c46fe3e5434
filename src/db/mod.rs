// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key/value persistence backends.
//!
//! The workout store only needs to save and load one opaque string per key;
//! what the string contains is the codec's business.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::AppError;

/// Storage keys as constants.
pub mod keys {
    /// Default key for the workout snapshot.
    pub const WORKOUTS: &str = "workouts";
}

/// Opaque string store keyed by name.
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Fetch the value under `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> Result<Option<String>, AppError>;
}
