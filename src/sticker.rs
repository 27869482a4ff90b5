//! Placed stickers: the live overlay collection and its manipulation session.
//!
//! `PlacedSticker` is a plain record; the host renders it as a projection
//! (see [`crate::render::sticker_views`]). The store owns the records in draw
//! order, tracks at most one drag in progress, and remembers the last touch
//! tap per sticker so two quick taps can delete it.

#[cfg(test)]
#[path = "sticker_test.rs"]
mod sticker_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{StickerCategory, StickerTemplate, StickerVisual, TemplateId};
use crate::geom::{Bounds, Point};

/// Unique identifier for a placed sticker.
pub type StickerId = Uuid;

/// Where a drag started: a tray template (creates a sticker on drop) or a
/// sticker already on the board (repositions it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "origin", content = "id")]
pub enum DragOrigin {
    Tray(TemplateId),
    Board(StickerId),
}

/// Placed edge lengths per category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerSizes {
    pub operator: f64,
    pub gadget: f64,
}

impl StickerSizes {
    #[must_use]
    pub fn for_category(&self, category: StickerCategory) -> f64 {
        if category.is_operator() { self.operator } else { self.gadget }
    }
}

/// A sticker on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSticker {
    pub id: StickerId,
    /// Template it was created from.
    pub template: TemplateId,
    pub label: String,
    pub category: StickerCategory,
    pub visual: StickerVisual,
    /// Edge length; stickers are square.
    pub size: f64,
    /// Top-left corner, container-relative.
    pub position: Point,
}

impl PlacedSticker {
    /// Whether `pt` falls inside the sticker's box.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.position.x
            && pt.y >= self.position.y
            && pt.x <= self.position.x + self.size
            && pt.y <= self.position.y + self.size
    }
}

/// An in-progress drag of a placed sticker.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Manipulation {
    id: StickerId,
    /// Pointer position minus sticker top-left at grab time.
    grab_offset: Point,
}

/// The live sticker collection.
#[derive(Debug, Default)]
pub struct StickerStore {
    stickers: Vec<PlacedSticker>,
    manipulation: Option<Manipulation>,
    last_tap: HashMap<StickerId, u64>,
}

impl StickerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sticker from `template` centered on `center`, clamped inside
    /// `bounds`, and add it on top of the draw order.
    pub fn instantiate(
        &mut self,
        template_id: TemplateId,
        template: &StickerTemplate,
        center: Point,
        sizes: StickerSizes,
        bounds: Bounds,
    ) -> StickerId {
        let size = sizes.for_category(template.category);
        let top_left = Point::new(center.x - size * 0.5, center.y - size * 0.5);
        let sticker = PlacedSticker {
            id: Uuid::new_v4(),
            template: template_id,
            label: template.label.clone(),
            category: template.category,
            visual: template.visual.clone(),
            size,
            position: bounds.clamp_box(top_left, size),
        };
        let id = sticker.id;
        tracing::debug!(%id, label = %sticker.label, "sticker placed");
        self.stickers.push(sticker);
        id
    }

    #[must_use]
    pub fn get(&self, id: &StickerId) -> Option<&PlacedSticker> {
        self.stickers.iter().find(|s| s.id == *id)
    }

    /// Stickers bottom-first.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedSticker> {
        self.stickers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Topmost sticker under `pt`.
    #[must_use]
    pub fn hit(&self, pt: Point) -> Option<StickerId> {
        self.stickers.iter().rev().find(|s| s.contains(pt)).map(|s| s.id)
    }

    /// Start moving a placed sticker. Returns `false` if it no longer exists.
    pub fn begin_drag(&mut self, id: StickerId, pointer: Point) -> bool {
        let Some(sticker) = self.get(&id) else {
            return false;
        };
        let grab_offset = pointer - sticker.position;
        self.manipulation = Some(Manipulation { id, grab_offset });
        true
    }

    /// Follow the pointer with the sticker being dragged, keeping the grab
    /// offset. Returns the moved sticker's id.
    pub fn drag_to(&mut self, pointer: Point, bounds: Bounds) -> Option<StickerId> {
        let m = self.manipulation?;
        let sticker = self.stickers.iter_mut().find(|s| s.id == m.id)?;
        sticker.position = bounds.clamp_box(pointer - m.grab_offset, sticker.size);
        Some(m.id)
    }

    /// Shift a sticker by `delta`, clamped inside `bounds`.
    pub fn drag_by(&mut self, id: &StickerId, delta: Point, bounds: Bounds) -> bool {
        let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == *id) else {
            return false;
        };
        sticker.position = bounds.clamp_box(sticker.position + delta, sticker.size);
        true
    }

    /// Finish the current drag, returning the sticker that was being moved.
    pub fn end_drag(&mut self) -> Option<StickerId> {
        self.manipulation.take().map(|m| m.id)
    }

    #[must_use]
    pub fn dragging(&self) -> Option<StickerId> {
        self.manipulation.map(|m| m.id)
    }

    /// Remove a sticker. A second delete of the same id is a no-op.
    pub fn delete(&mut self, id: &StickerId) -> Option<PlacedSticker> {
        let index = self.stickers.iter().position(|s| s.id == *id)?;
        if self.manipulation.is_some_and(|m| m.id == *id) {
            self.manipulation = None;
        }
        self.last_tap.remove(id);
        Some(self.stickers.remove(index))
    }

    /// Record a touch tap on a sticker at `time_ms`.
    ///
    /// Returns `true` when this tap lands within `window_ms` of the previous
    /// tap on the same sticker (a double tap).
    pub fn register_tap(&mut self, id: StickerId, time_ms: u64, window_ms: u64) -> bool {
        let previous = self.last_tap.insert(id, time_ms);
        match previous {
            Some(prev) if time_ms > prev => time_ms - prev < window_ms,
            _ => false,
        }
    }

    /// Remove every sticker, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.stickers.len();
        self.stickers.clear();
        self.manipulation = None;
        self.last_tap.clear();
        removed
    }

    /// Pull every sticker back inside `bounds` (after a container resize).
    pub fn clamp_all(&mut self, bounds: Bounds) {
        for sticker in &mut self.stickers {
            sticker.position = bounds.clamp_box(sticker.position, sticker.size);
        }
    }
}
