// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout list, form and error banner as seen by the user.
//!
//! [`ListView`] is the in-memory rendering the HTTP frontend reads back.
//! New items go to the top of the list, directly under the form.

use crate::models::{Workout, WorkoutFields, WorkoutId, WorkoutKind};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How long a validation message stays visible by default.
pub const DEFAULT_ERROR_DISPLAY_MS: i64 = 2000;

/// Rendering operations the tracker drives.
pub trait DisplaySink: Send {
    /// Show `workout` in the list. An item already shown for the same id is
    /// redrawn in place; otherwise the item is inserted at the top.
    fn render_list_item(&mut self, workout: &Workout);

    fn remove_list_item(&mut self, id: WorkoutId);

    fn clear_all_list_items(&mut self);

    fn hide_list_item(&mut self, id: WorkoutId);

    fn show_list_item(&mut self, id: WorkoutId);

    /// Open the workout form, optionally filled with existing values.
    fn render_form(&mut self, kind: WorkoutKind, prefill: Option<&WorkoutFields>);

    fn hide_form(&mut self);

    /// Flash a transient message that dismisses itself.
    fn show_error(&mut self, message: &str);
}

/// One rendered row of the workout list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ListItem {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: WorkoutId,
    pub kind: WorkoutKind,
    pub title: String,
    pub icon: String,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Pace or speed, one decimal place
    pub metric_value: f64,
    pub metric_unit: String,
    /// Cadence or elevation gain
    pub extra_value: f64,
    pub extra_unit: String,
    pub hidden: bool,
}

impl ListItem {
    pub fn from_workout(workout: &Workout) -> Self {
        let metric = workout.metric();
        let (extra_value, extra_unit) = match (workout.cadence(), workout.elevation_gain()) {
            (Some(cadence), _) => (cadence, "spm"),
            (None, Some(elevation)) => (elevation, "m"),
            (None, None) => (0.0, ""),
        };

        Self {
            id: workout.id(),
            kind: workout.kind(),
            title: workout.description().to_string(),
            icon: workout.kind().icon().to_string(),
            distance_km: workout.distance_km(),
            duration_min: workout.duration_min(),
            metric_value: round1(metric.value()),
            metric_unit: metric.unit().to_string(),
            extra_value,
            extra_unit: extra_unit.to_string(),
            hidden: false,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The open workout form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FormView {
    pub kind: WorkoutKind,
    pub prefill: Option<WorkoutFields>,
}

#[derive(Debug, Clone)]
struct ErrorBanner {
    message: String,
    expires_at: DateTime<Utc>,
}

/// In-memory list rendering.
#[derive(Debug)]
pub struct ListView {
    items: Vec<ListItem>,
    form: Option<FormView>,
    error: Option<ErrorBanner>,
    error_ttl: Duration,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_ERROR_DISPLAY_MS))
    }
}

impl ListView {
    pub fn new(error_ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            form: None,
            error: None,
            error_ttl,
        }
    }

    /// Items top to bottom, hidden ones included.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Items the user can currently see, top to bottom.
    pub fn visible_items(&self) -> impl Iterator<Item = &ListItem> {
        self.items.iter().filter(|item| !item.hidden)
    }

    pub fn form(&self) -> Option<&FormView> {
        self.form.as_ref()
    }

    /// The error message if it has not yet dismissed itself at `now`.
    pub fn active_error(&self, now: DateTime<Utc>) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|banner| now < banner.expires_at)
            .map(|banner| banner.message.as_str())
    }

    fn item_mut(&mut self, id: WorkoutId) -> Option<&mut ListItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

impl DisplaySink for ListView {
    fn render_list_item(&mut self, workout: &Workout) {
        let item = ListItem::from_workout(workout);
        match self.item_mut(workout.id()) {
            Some(existing) => *existing = item,
            None => self.items.insert(0, item),
        }
    }

    fn remove_list_item(&mut self, id: WorkoutId) {
        self.items.retain(|item| item.id != id);
    }

    fn clear_all_list_items(&mut self) {
        self.items.clear();
    }

    fn hide_list_item(&mut self, id: WorkoutId) {
        if let Some(item) = self.item_mut(id) {
            item.hidden = true;
        }
    }

    fn show_list_item(&mut self, id: WorkoutId) {
        if let Some(item) = self.item_mut(id) {
            item.hidden = false;
        }
    }

    fn render_form(&mut self, kind: WorkoutKind, prefill: Option<&WorkoutFields>) {
        self.form = Some(FormView {
            kind,
            prefill: prefill.cloned(),
        });
    }

    fn hide_form(&mut self) {
        self.form = None;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(ErrorBanner {
            message: message.to_string(),
            expires_at: Utc::now() + self.error_ttl,
        });
    }
}
