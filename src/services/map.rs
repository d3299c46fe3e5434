// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map surface: marker placement and view centering.
//!
//! The tracker talks to the map only through [`MapService`]. The bundled
//! [`MarkerLayer`] keeps the marker set and view in memory, and the frontend
//! draws whatever it holds.

use crate::models::{Coordinates, MarkerRef, WorkoutKind};
use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Zoom level used when centering on the user or on a workout.
pub const DEFAULT_ZOOM: u8 = 15;

/// Operations the tracker needs from a map.
pub trait MapService: Send {
    /// Put a marker with an open popup at `coords`.
    fn place_marker(
        &mut self,
        coords: Coordinates,
        popup_kind: WorkoutKind,
        popup_text: &str,
    ) -> MarkerRef;

    /// Take a marker off the map. Unknown handles are ignored.
    fn remove_marker(&mut self, marker: MarkerRef);

    fn center_view(&mut self, coords: Coordinates, zoom: u8);
}

/// A marker currently on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Marker {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: MarkerRef,
    pub coords: Coordinates,
    /// Popup style, one per workout kind.
    pub popup_kind: WorkoutKind,
    pub popup_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

/// In-memory map model.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: BTreeMap<MarkerRef, Marker>,
    next_id: u64,
    view: Option<MapView>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers in placement order.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn marker(&self, marker: MarkerRef) -> Option<&Marker> {
        self.markers.get(&marker)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn view(&self) -> Option<MapView> {
        self.view
    }
}

impl MapService for MarkerLayer {
    fn place_marker(
        &mut self,
        coords: Coordinates,
        popup_kind: WorkoutKind,
        popup_text: &str,
    ) -> MarkerRef {
        self.next_id += 1;
        let id = MarkerRef(self.next_id);
        self.markers.insert(
            id,
            Marker {
                id,
                coords,
                popup_kind,
                popup_text: popup_text.to_string(),
            },
        );
        id
    }

    fn remove_marker(&mut self, marker: MarkerRef) {
        if self.markers.remove(&marker).is_none() {
            tracing::debug!(marker = marker.0, "Marker already removed");
        }
    }

    fn center_view(&mut self, coords: Coordinates, zoom: u8) {
        self.view = Some(MapView {
            center: coords,
            zoom,
        });
    }
}
