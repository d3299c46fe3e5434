// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout command API used by the map frontend.

use crate::error::Result;
use crate::models::{Coordinates, Workout, WorkoutFields, WorkoutId, WorkoutKind};
use crate::services::display::{FormView, ListItem};
use crate::services::map::{MapView, Marker};
use crate::services::{DeleteAll, MarkerLayer, SessionState, SortOrder};
use crate::{AppState, Tracker};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Workout API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/workouts",
            get(list_workouts).delete(delete_all_workouts),
        )
        .route(
            "/api/workouts/{id}",
            get(get_workout).delete(delete_workout),
        )
        .route("/api/workouts/{id}/edit", post(edit_workout))
        .route("/api/workouts/{id}/recenter", post(recenter_workout))
        .route("/api/map/click", post(map_click))
        .route("/api/map/position", post(map_position))
        .route("/api/form/submit", post(submit_form))
        .route("/api/form/cancel", post(cancel_form))
        .route("/api/view", get(get_view))
}

// ─── Response Types ──────────────────────────────────────────

/// A workout as returned by the API.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    pub coords: Coordinates,
    pub duration: f64,
    pub distance: f64,
    pub cadence: Option<f64>,
    pub elevation_gain: Option<f64>,
    pub pace: Option<f64>,
    pub speed: Option<f64>,
    pub description: String,
    pub created_at: String,
}

impl From<&Workout> for WorkoutResponse {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id().to_string(),
            kind: workout.kind(),
            coords: workout.coords(),
            duration: workout.duration_min(),
            distance: workout.distance_km(),
            cadence: workout.cadence(),
            elevation_gain: workout.elevation_gain(),
            pace: workout.pace(),
            speed: workout.speed(),
            description: workout.description().to_string(),
            created_at: workout
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutListResponse {
    pub sort: String,
    pub workouts: Vec<WorkoutResponse>,
}

/// Everything the frontend draws: list, form, error banner and map.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ViewResponse {
    pub session: SessionState,
    pub items: Vec<ListItem>,
    pub form: Option<FormView>,
    pub error: Option<String>,
    pub map: Option<MapView>,
    pub markers: Vec<Marker>,
}

impl ViewResponse {
    fn from_tracker(tracker: &Tracker) -> Self {
        let display = tracker.display();
        let map = tracker.map();

        Self {
            session: tracker.session_state(),
            items: display.items().to_vec(),
            form: display.form().cloned(),
            error: display.active_error(chrono::Utc::now()).map(str::to_string),
            map: map.and_then(MarkerLayer::view),
            markers: map
                .map(|m| m.markers().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

/// Result of a UI command. `accepted` is false when the command was a
/// no-op (e.g. edit while another form is open).
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CommandResponse {
    pub accepted: bool,
    pub view: ViewResponse,
}

impl CommandResponse {
    fn new(accepted: bool, tracker: &Tracker) -> Json<Self> {
        Json(Self {
            accepted,
            view: ViewResponse::from_tracker(tracker),
        })
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAllResponse {
    pub removed: usize,
    pub nothing_to_do: bool,
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Deserialize)]
struct SortQuery {
    /// Sort key such as "distance-asc"; "default" for creation order
    #[serde(default)]
    sort: Option<String>,
}

fn parse_id(raw: &str) -> Result<WorkoutId> {
    raw.parse()
}

/// List workouts, optionally sorted. Also redraws the list to match.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SortQuery>,
) -> Result<Json<WorkoutListResponse>> {
    let order = SortOrder::parse(query.sort.as_deref().unwrap_or(""))?;
    let mut tracker = state.tracker.lock().await;
    let workouts = tracker.sorted(order);

    Ok(Json(WorkoutListResponse {
        sort: order.map_or_else(|| "default".to_string(), |o| o.to_string()),
        workouts: workouts.iter().map(WorkoutResponse::from).collect(),
    }))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutResponse>> {
    let id = parse_id(&id)?;
    let tracker = state.tracker.lock().await;
    let workout = tracker.store().find(id)?;
    Ok(Json(WorkoutResponse::from(workout)))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>> {
    let id = parse_id(&id)?;
    let mut tracker = state.tracker.lock().await;
    tracker.delete(id)?;
    Ok(CommandResponse::new(true, &tracker))
}

async fn delete_all_workouts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteAllResponse>> {
    let mut tracker = state.tracker.lock().await;
    let response = match tracker.delete_all()? {
        DeleteAll::NothingToDo => DeleteAllResponse {
            removed: 0,
            nothing_to_do: true,
        },
        DeleteAll::Cleared { removed, .. } => DeleteAllResponse {
            removed,
            nothing_to_do: false,
        },
    };
    Ok(Json(response))
}

async fn edit_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>> {
    let id = parse_id(&id)?;
    let mut tracker = state.tracker.lock().await;
    let accepted = tracker.start_edit(id)?;
    Ok(CommandResponse::new(accepted, &tracker))
}

async fn recenter_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>> {
    let id = parse_id(&id)?;
    let mut tracker = state.tracker.lock().await;
    let accepted = tracker.recenter(id)?;
    Ok(CommandResponse::new(accepted, &tracker))
}

// ─── Map ─────────────────────────────────────────────────────

/// Map clicked: open the new-workout form at the clicked spot.
async fn map_click(
    State(state): State<Arc<AppState>>,
    Json(coords): Json<Coordinates>,
) -> Json<CommandResponse> {
    let mut tracker = state.tracker.lock().await;
    let accepted = tracker.start_create(coords);
    CommandResponse::new(accepted, &tracker)
}

/// The browser found the user's position: attach a map centered there.
async fn map_position(
    State(state): State<Arc<AppState>>,
    Json(coords): Json<Coordinates>,
) -> Result<Json<CommandResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.attach_map(MarkerLayer::new(), coords)?;
    Ok(CommandResponse::new(true, &tracker))
}

// ─── Form ────────────────────────────────────────────────────

/// Submit the open form (new workout or edit).
async fn submit_form(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<WorkoutFields>,
) -> Result<(StatusCode, Json<WorkoutResponse>)> {
    let mut tracker = state.tracker.lock().await;
    let creating = matches!(tracker.session_state(), SessionState::Creating { .. });
    let workout = tracker.submit(&fields)?;

    let status = if creating {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(WorkoutResponse::from(&workout))))
}

async fn cancel_form(State(state): State<Arc<AppState>>) -> Json<CommandResponse> {
    let mut tracker = state.tracker.lock().await;
    let closed = tracker.cancel();
    CommandResponse::new(closed != SessionState::Idle, &tracker)
}

async fn get_view(State(state): State<Arc<AppState>>) -> Json<ViewResponse> {
    let tracker = state.tracker.lock().await;
    Json(ViewResponse::from_tracker(&tracker))
}
