//! Map / floor selection.
//!
//! Two axes of state: which map is selected and which floor of that map is
//! showing. The navigator never holds an out-of-range floor; invalid requests
//! return [`NavError`] and leave the selection untouched.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;

use serde::Serialize;

use crate::catalog::{Catalog, MapEntry};
use crate::error::NavError;

/// Which way to step through a map's floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorStep {
    Prev,
    Next,
}

/// What the host shows for floor navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FloorControls {
    /// Current floor name; empty before a map is selected.
    pub label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    /// Hidden when the map has a single floor (or none is selected).
    pub visible: bool,
}

/// The resolved selection: map, floor, and the image to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorView {
    pub map_id: String,
    pub floor: usize,
    pub image: String,
    pub controls: FloorControls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    map_id: String,
    floor: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MapNavigator {
    current: Option<Selection>,
}

impl MapNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected map id.
    #[must_use]
    pub fn map_id(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.map_id.as_str())
    }

    /// Currently shown floor index.
    #[must_use]
    pub fn floor(&self) -> Option<usize> {
        self.current.as_ref().map(|s| s.floor)
    }

    /// Select a map and jump to its default floor.
    ///
    /// # Errors
    ///
    /// [`NavError::UnknownMap`] for an id not in the catalog and
    /// [`NavError::NotSelectable`] for the placeholder entry.
    pub fn select_map(&mut self, catalog: &Catalog, id: &str) -> Result<FloorView, NavError> {
        let map = catalog.map(id).ok_or_else(|| NavError::UnknownMap(id.to_string()))?;
        if !map.selectable {
            return Err(NavError::NotSelectable(id.to_string()));
        }
        let floor = map.default_floor.min(map.floors.len().saturating_sub(1));
        self.current = Some(Selection { map_id: map.id.clone(), floor });
        self.view(catalog)
    }

    /// Move one floor up or down. Stepping past either end is a no-op that
    /// returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`NavError::NoMapSelected`] before any map is chosen.
    pub fn step_floor(&mut self, catalog: &Catalog, step: FloorStep) -> Result<Option<FloorView>, NavError> {
        let (map, floor) = self.current_map(catalog)?;
        let next = match step {
            FloorStep::Prev => floor.checked_sub(1),
            FloorStep::Next => Some(floor + 1).filter(|f| *f < map.floors.len()),
        };
        let Some(next) = next else {
            return Ok(None);
        };
        if let Some(sel) = self.current.as_mut() {
            sel.floor = next;
        }
        self.view(catalog).map(Some)
    }

    /// Jump straight to a floor of the current map.
    ///
    /// # Errors
    ///
    /// [`NavError::FloorOutOfRange`] when `index` is past the floor list.
    pub fn select_floor(&mut self, catalog: &Catalog, index: usize) -> Result<FloorView, NavError> {
        let (map, _) = self.current_map(catalog)?;
        if index >= map.floors.len() {
            return Err(NavError::FloorOutOfRange { map: map.id.clone(), index, floors: map.floors.len() });
        }
        if let Some(sel) = self.current.as_mut() {
            sel.floor = index;
        }
        self.view(catalog)
    }

    /// Resolve the current selection.
    ///
    /// # Errors
    ///
    /// [`NavError::NoMapSelected`] before any map is chosen.
    pub fn view(&self, catalog: &Catalog) -> Result<FloorView, NavError> {
        let (map, floor) = self.current_map(catalog)?;
        let entry = map.floors.get(floor).ok_or_else(|| NavError::FloorOutOfRange {
            map: map.id.clone(),
            index: floor,
            floors: map.floors.len(),
        })?;
        Ok(FloorView {
            map_id: map.id.clone(),
            floor,
            image: entry.image.clone(),
            controls: controls_for(map, floor),
        })
    }

    /// Floor controls for the current state; hidden before a map is chosen.
    #[must_use]
    pub fn controls(&self, catalog: &Catalog) -> FloorControls {
        match self.current_map(catalog) {
            Ok((map, floor)) => controls_for(map, floor),
            Err(_) => FloorControls::default(),
        }
    }

    fn current_map<'c>(&self, catalog: &'c Catalog) -> Result<(&'c MapEntry, usize), NavError> {
        let sel = self.current.as_ref().ok_or(NavError::NoMapSelected)?;
        let map = catalog.map(&sel.map_id).ok_or_else(|| NavError::UnknownMap(sel.map_id.clone()))?;
        Ok((map, sel.floor))
    }
}

fn controls_for(map: &MapEntry, floor: usize) -> FloorControls {
    let count = map.floors.len();
    let label = map.floors.get(floor).map(|f| f.name.clone()).unwrap_or_default();
    if count <= 1 {
        return FloorControls { label, prev_enabled: false, next_enabled: false, visible: false };
    }
    FloorControls { label, prev_enabled: floor > 0, next_enabled: floor + 1 < count, visible: true }
}
