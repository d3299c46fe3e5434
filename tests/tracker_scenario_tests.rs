// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end workout lifecycle scenarios against the tracker and store.

use mapty_tracker::db::{KeyValueStore, MemoryStore};
use mapty_tracker::error::AppError;
use mapty_tracker::models::{
    Coordinates, MarkerRef, Workout, WorkoutDetails, WorkoutFields, WorkoutId, WorkoutInput,
    WorkoutKind,
};
use mapty_tracker::services::map::DEFAULT_ZOOM;
use mapty_tracker::services::{
    ListView, MarkerLayer, SessionState, SortDirection, SortField, SortOrder, WorkoutStore,
    WorkoutTracker,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Tracker = WorkoutTracker<MarkerLayer, ListView>;

/// Storage that counts saves.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    saves: AtomicUsize,
}

impl CountingStore {
    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn save(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(key, value)
    }

    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.load(key)
    }
}

fn tracker_with_map(storage: Arc<dyn KeyValueStore>) -> Tracker {
    let store = WorkoutStore::new(storage, "workouts");
    let mut tracker = WorkoutTracker::restore(store, ListView::default(), DEFAULT_ZOOM);
    tracker
        .attach_map(MarkerLayer::new(), Coordinates::new(0.0, 0.0))
        .unwrap();
    tracker
}

fn running(duration: f64, distance: f64, cadence: f64) -> WorkoutFields {
    WorkoutFields {
        kind: WorkoutKind::Running,
        duration: Some(duration),
        distance: Some(distance),
        cadence: Some(cadence),
        elevation_gain: None,
    }
}

fn cycling(duration: f64, distance: f64, elevation: f64) -> WorkoutFields {
    WorkoutFields {
        kind: WorkoutKind::Cycling,
        duration: Some(duration),
        distance: Some(distance),
        cadence: None,
        elevation_gain: Some(elevation),
    }
}

fn markers(tracker: &Tracker) -> usize {
    tracker.map().map_or(0, MarkerLayer::len)
}

#[test]
fn test_create_running_places_one_marker() {
    let mut tracker = tracker_with_map(Arc::new(MemoryStore::new()));

    assert!(tracker.start_create(Coordinates::new(10.0, 10.0)));
    let workout = tracker.submit(&running(30.0, 5.0, 150.0)).unwrap();

    assert_eq!(workout.pace(), Some(6.0));
    assert!(workout.description().contains("Running"));
    assert_eq!(tracker.store().len(), 1);
    assert_eq!(tracker.store().find(workout.id()).unwrap().id(), workout.id());
    assert_eq!(markers(&tracker), 1);

    let marker = workout.marker().expect("marker attached");
    let placed = tracker.map().unwrap().marker(marker).unwrap();
    assert_eq!(placed.coords, Coordinates::new(10.0, 10.0));
    assert!(placed.popup_text.starts_with("🏃 Running on "));
}

#[test]
fn test_create_cycling_speed() {
    let mut tracker = tracker_with_map(Arc::new(MemoryStore::new()));

    tracker.start_create(Coordinates::new(1.0, 1.0));
    let workout = tracker.submit(&cycling(60.0, 20.0, 400.0)).unwrap();

    assert_eq!(workout.speed(), Some(20.0));
    assert_eq!(workout.elevation_gain(), Some(400.0));
    assert!(workout.description().contains("Cycling"));
}

#[test]
fn test_sorted_view_by_distance() {
    let mut tracker = tracker_with_map(Arc::new(MemoryStore::new()));
    for distance in [10.0, 5.0] {
        tracker.start_create(Coordinates::new(1.0, 1.0));
        tracker.submit(&running(30.0, distance, 150.0)).unwrap();
    }

    let distances = |order: SortOrder| -> Vec<f64> {
        tracker
            .store()
            .sorted_view(Some(order))
            .iter()
            .map(|w| w.distance_km())
            .collect()
    };

    assert_eq!(
        distances(SortOrder::new(SortField::Distance, SortDirection::Asc)),
        vec![5.0, 10.0]
    );
    assert_eq!(
        distances(SortOrder::new(SortField::Distance, SortDirection::Desc)),
        vec![10.0, 5.0]
    );

    // Canonical order is untouched.
    let canonical: Vec<f64> = tracker
        .store()
        .workouts()
        .iter()
        .map(|w| w.distance_km())
        .collect();
    assert_eq!(canonical, vec![10.0, 5.0]);
}

#[test]
fn test_edit_running_into_cycling() {
    let mut tracker = tracker_with_map(Arc::new(MemoryStore::new()));
    tracker.start_create(Coordinates::new(3.0, 4.0));
    let original = tracker.submit(&running(30.0, 5.0, 150.0)).unwrap();
    let old_marker = original.marker().unwrap();

    assert!(tracker.start_edit(original.id()).unwrap());
    let edited = tracker.submit(&cycling(60.0, 30.0, 250.0)).unwrap();

    assert_eq!(edited.kind(), WorkoutKind::Cycling);
    assert_eq!(edited.id(), original.id());
    assert_eq!(edited.created_at(), original.created_at());
    assert_eq!(edited.coords(), original.coords());
    assert_eq!(edited.speed(), Some(30.0));
    assert_eq!(
        tracker.store().find(original.id()).unwrap().kind(),
        WorkoutKind::Cycling
    );

    // Old marker disposed, exactly one new one placed.
    let map = tracker.map().unwrap();
    assert!(map.marker(old_marker).is_none());
    assert_eq!(map.len(), 1);
    assert_ne!(edited.marker(), Some(old_marker));
    assert_eq!(tracker.session_state(), SessionState::Idle);
}

#[test]
fn test_store_replace_returns_old_marker() {
    let original = Workout::create(
        Coordinates::new(3.0, 4.0),
        WorkoutInput {
            duration_min: 30.0,
            distance_km: 5.0,
            details: WorkoutDetails::Running {
                cadence_steps_per_min: 150.0,
            },
        },
    )
    .unwrap();
    let mut store = WorkoutStore::new(Arc::new(MemoryStore::new()), "workouts");
    store.create(original.clone()).unwrap();
    store
        .attach_marker(original.id(), Some(MarkerRef(7)))
        .unwrap();

    let replaced = store
        .replace(
            original.id(),
            WorkoutInput {
                duration_min: 60.0,
                distance_km: 20.0,
                details: WorkoutDetails::Cycling {
                    elevation_gain_meters: 10.0,
                },
            },
        )
        .unwrap();

    assert_eq!(replaced.old_marker, Some(MarkerRef(7)));
    assert_eq!(replaced.workout.kind(), WorkoutKind::Cycling);
    assert_eq!(replaced.workout.id(), original.id());
    assert_eq!(replaced.workout.created_at(), original.created_at());
    assert_eq!(store.find(original.id()).unwrap().speed(), Some(20.0));
}

#[test]
fn test_delete_missing_id_does_not_snapshot() {
    let storage = Arc::new(CountingStore::default());
    let mut tracker = tracker_with_map(storage.clone());
    tracker.start_create(Coordinates::new(1.0, 1.0));
    tracker.submit(&running(30.0, 5.0, 150.0)).unwrap();
    let saves = storage.saves();

    let err = tracker.delete(WorkoutId::new()).unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(storage.saves(), saves);
    assert_eq!(tracker.store().len(), 1);
}

#[test]
fn test_every_mutation_snapshots() {
    let storage = Arc::new(CountingStore::default());
    let mut tracker = tracker_with_map(storage.clone());

    tracker.start_create(Coordinates::new(1.0, 1.0));
    let workout = tracker.submit(&running(30.0, 5.0, 150.0)).unwrap();
    assert_eq!(storage.saves(), 1);

    tracker.start_edit(workout.id()).unwrap();
    tracker.submit(&running(20.0, 5.0, 150.0)).unwrap();
    assert_eq!(storage.saves(), 2);

    tracker.delete(workout.id()).unwrap();
    assert_eq!(storage.saves(), 3);

    // Nothing to delete, nothing to write.
    tracker.delete_all().unwrap();
    assert_eq!(storage.saves(), 3);
}

#[test]
fn test_invalid_edit_leaves_record_untouched() {
    let storage = Arc::new(CountingStore::default());
    let mut tracker = tracker_with_map(storage.clone());
    tracker.start_create(Coordinates::new(1.0, 1.0));
    let workout = tracker.submit(&running(30.0, 5.0, 150.0)).unwrap();

    tracker.start_edit(workout.id()).unwrap();
    let err = tracker.submit(&running(30.0, 0.0, 150.0)).unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(storage.saves(), 1);
    assert_eq!(
        tracker.store().find(workout.id()).unwrap().distance_km(),
        5.0
    );
    assert_eq!(
        tracker.session_state(),
        SessionState::Editing { id: workout.id() }
    );
}

#[test]
fn test_single_flight_rejects_second_edit() {
    let mut tracker = tracker_with_map(Arc::new(MemoryStore::new()));
    let mut ids = Vec::new();
    for distance in [5.0, 6.0] {
        tracker.start_create(Coordinates::new(1.0, 1.0));
        ids.push(tracker.submit(&running(30.0, distance, 150.0)).unwrap().id());
    }

    assert!(tracker.start_edit(ids[0]).unwrap());
    assert!(!tracker.start_edit(ids[1]).unwrap());
    assert!(!tracker.start_create(Coordinates::new(2.0, 2.0)));

    assert_eq!(tracker.session_state(), SessionState::Editing { id: ids[0] });
}

#[test]
fn test_delete_all_twice_is_safe() {
    let mut tracker = tracker_with_map(Arc::new(MemoryStore::new()));
    for distance in [5.0, 6.0, 7.0] {
        tracker.start_create(Coordinates::new(1.0, 1.0));
        tracker.submit(&running(30.0, distance, 150.0)).unwrap();
    }
    assert_eq!(markers(&tracker), 3);

    let first = tracker.delete_all().unwrap();
    assert!(matches!(
        first,
        mapty_tracker::services::DeleteAll::Cleared { removed: 3, .. }
    ));
    assert_eq!(markers(&tracker), 0);
    assert!(tracker.display().items().is_empty());

    let second = tracker.delete_all().unwrap();
    assert!(matches!(
        second,
        mapty_tracker::services::DeleteAll::NothingToDo
    ));
}

#[test]
fn test_store_works_without_map() {
    let store = WorkoutStore::new(Arc::new(MemoryStore::new()), "workouts");
    let mut tracker: Tracker = WorkoutTracker::restore(store, ListView::default(), DEFAULT_ZOOM);

    tracker.start_create(Coordinates::new(1.0, 1.0));
    let workout = tracker.submit(&cycling(45.0, 15.0, 0.0)).unwrap();

    assert_eq!(workout.marker(), None);
    assert_eq!(tracker.display().items().len(), 1);
    tracker.delete(workout.id()).unwrap();
    assert!(tracker.store().is_empty());
}

/// Storage whose next save fails once.
#[derive(Default)]
struct FailNextSave {
    inner: MemoryStore,
    fail_next: std::sync::atomic::AtomicBool,
}

impl KeyValueStore for FailNextSave {
    fn save(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::Storage("disk full".to_string()));
        }
        self.inner.save(key, value)
    }

    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.load(key)
    }
}

#[test]
fn test_failed_save_keeps_form_open_and_retry_creates_once() {
    let storage = Arc::new(FailNextSave::default());
    let mut tracker = tracker_with_map(storage.clone());
    tracker.start_create(Coordinates::new(1.0, 1.0));

    storage.fail_next.store(true, Ordering::SeqCst);
    let err = tracker.submit(&running(30.0, 5.0, 150.0)).unwrap_err();

    assert!(matches!(err, AppError::Storage(_)));
    assert!(tracker.store().is_empty());
    assert!(tracker.display().items().is_empty());
    assert_eq!(markers(&tracker), 0);
    assert!(matches!(
        tracker.session_state(),
        SessionState::Creating { .. }
    ));

    let workout = tracker.submit(&running(30.0, 5.0, 150.0)).unwrap();

    assert_eq!(tracker.store().len(), 1);
    assert_eq!(tracker.display().items().len(), 1);
    assert_eq!(markers(&tracker), 1);
    assert_eq!(tracker.session_state(), SessionState::Idle);
    assert!(storage.load("workouts").unwrap().is_some());
    assert_eq!(tracker.store().workouts()[0].id(), workout.id());
}

#[test]
fn test_failed_save_on_edit_keeps_old_record_and_marker() {
    let storage = Arc::new(FailNextSave::default());
    let mut tracker = tracker_with_map(storage.clone());
    tracker.start_create(Coordinates::new(1.0, 1.0));
    let original = tracker.submit(&running(30.0, 5.0, 150.0)).unwrap();

    tracker.start_edit(original.id()).unwrap();
    storage.fail_next.store(true, Ordering::SeqCst);
    assert!(tracker.submit(&cycling(60.0, 20.0, 10.0)).is_err());

    let stored = tracker.store().find(original.id()).unwrap();
    assert_eq!(stored.kind(), WorkoutKind::Running);
    assert_eq!(stored.marker(), original.marker());
    assert!(tracker
        .map()
        .unwrap()
        .marker(original.marker().unwrap())
        .is_some());
    assert_eq!(
        tracker.session_state(),
        SessionState::Editing { id: original.id() }
    );
}
