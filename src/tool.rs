//! Input model: tools, normalized pointer and key events, and the stroke
//! state machine.
//!
//! Mouse and touch streams are reduced at the host boundary to a single
//! [`PointerEvent`]. `Tool` captures the user's drawing intent; `Stroke` is
//! the gesture being tracked between pointer-down and pointer-up, carrying
//! whatever context is needed to extend or roll back the ink.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_THICKNESS, MIN_THICKNESS};
use crate::geom::Point;
use crate::sticker::StickerId;
use crate::surface::{Ink, Snapshot};

/// Which drawing tool is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand ink in the current color (default).
    #[default]
    Pen,
    /// Freehand erase at a multiple of the pen thickness.
    Eraser,
    /// Straight arrow with a live preview.
    Arrow,
}

impl Tool {
    /// Status line the host shows when this tool becomes active.
    #[must_use]
    pub fn selected_message(self) -> &'static str {
        match self {
            Self::Pen => "Pen tool selected.",
            Self::Eraser => "Eraser tool selected.",
            Self::Arrow => "Arrow tool selected.",
        }
    }
}

/// Pen color and base thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    /// Ink color as `#rrggbb`.
    pub color: String,
    /// Base stroke width in pixels.
    pub thickness: f64,
}

impl ToolSettings {
    /// Clamp a host-supplied thickness into the accepted slider range.
    #[must_use]
    pub fn clamp_thickness(raw: f64) -> f64 {
        if raw.is_finite() { raw.clamp(MIN_THICKNESS, MAX_THICKNESS) } else { MIN_THICKNESS }
    }
}

/// What the pointer was over when the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Target {
    /// The drawing surface itself.
    Surface,
    /// A placed sticker.
    Sticker(StickerId),
    /// Anything outside the drawing surface.
    Outside,
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// A normalized mouse or touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Container-relative position. `None` when the terminating event carried
    /// no coordinates (e.g. `touchend`).
    pub point: Option<Point>,
    /// Hit target under the pointer.
    pub target: Target,
    /// Mouse or touch.
    pub source: PointerSource,
    /// Host timestamp in milliseconds, used for double-tap detection.
    pub time_ms: u64,
}

impl PointerEvent {
    /// A mouse event over the surface at `(x, y)`.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { point: Some(Point::new(x, y)), target: Target::Surface, source: PointerSource::Mouse, time_ms: 0 }
    }

    /// A terminating event with no coordinates.
    #[must_use]
    pub fn without_point() -> Self {
        Self { point: None, target: Target::Surface, source: PointerSource::Mouse, time_ms: 0 }
    }

    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_time(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }
}

/// A keyboard key as reported by the host (e.g. `"d"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    /// True for auto-repeat events while the key is held.
    pub repeat: bool,
}

impl KeyEvent {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), repeat: false }
    }

    #[must_use]
    pub fn repeated(key: impl Into<String>) -> Self {
        Self { key: key.into(), repeat: true }
    }
}

/// The stroke in progress, if any.
///
/// Each active variant carries what is needed to extend the ink on move and to
/// finish or roll back on release.
#[derive(Debug, Clone, Default)]
pub enum Stroke {
    /// No stroke; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pen or eraser path being painted segment by segment.
    Freehand {
        /// Where the stroke started.
        origin: Point,
        /// End of the last painted segment.
        last: Point,
        /// Stroke width fixed at pointer-down.
        width: f64,
        /// Paint or erase, fixed at pointer-down.
        ink: Ink,
    },
    /// Arrow being previewed over a saved copy of the surface.
    Arrow {
        /// Tail of the arrow.
        origin: Point,
        /// Most recent preview tip; fallback when release has no coordinates.
        last: Point,
        /// Surface pixels from before the stroke began.
        snapshot: Snapshot,
        /// Shaft width fixed at pointer-down.
        width: f64,
        /// Arrow color fixed at pointer-down.
        color: Rgba<u8>,
    },
}

impl Stroke {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
