//! Shared numeric constants for the board core.

// ── Ink ─────────────────────────────────────────────────────────

/// Eraser width is the base thickness times this factor.
pub const ERASER_MULTIPLIER: f64 = 8.0;

/// Pen thickness bounds accepted from the host slider.
pub const MIN_THICKNESS: f64 = 1.0;
pub const MAX_THICKNESS: f64 = 50.0;

/// Default pen thickness in pixels.
pub const DEFAULT_THICKNESS: f64 = 5.0;

/// Default pen color.
pub const DEFAULT_PEN_COLOR: &str = "#ff0000";

// ── Surface ─────────────────────────────────────────────────────

/// Largest ink buffer, in pixels, that a resize may allocate.
pub const MAX_SURFACE_PIXELS: u64 = 1 << 26;

// ── Arrows ──────────────────────────────────────────────────────

/// Arrowhead length in pixels.
pub const ARROW_HEAD_SIZE: f64 = 20.0;

/// Arrowhead half-angle in radians (30°).
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

// ── Stickers ────────────────────────────────────────────────────

/// Edge length of an operator sticker (attacker / defender).
pub const OPERATOR_SIZE: f64 = 64.0;

/// Edge length of a gadget sticker.
pub const GADGET_SIZE: f64 = 48.0;

/// Two touch taps closer than this delete a sticker.
pub const DOUBLE_TAP_MS: u64 = 300;

// ── Notices ─────────────────────────────────────────────────────

/// How long the host shows a status notice.
pub const NOTICE_MS: u64 = 1500;
