//! Board tunables parsed from environment variables.

use crate::color::normalize_hex_color;
use crate::consts::{
    ARROW_HEAD_SIZE, DEFAULT_PEN_COLOR, DEFAULT_THICKNESS, DOUBLE_TAP_MS, ERASER_MULTIPLIER, GADGET_SIZE, NOTICE_MS,
    OPERATOR_SIZE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Eraser width = pen thickness × this factor.
    pub eraser_multiplier: f64,
    /// Edge length for attacker / defender stickers.
    pub operator_size: f64,
    /// Edge length for gadget stickers.
    pub gadget_size: f64,
    /// Two touch taps within this window delete a sticker.
    pub double_tap_ms: u64,
    /// Arrowhead line length.
    pub arrow_head_size: f64,
    /// Display duration attached to every notice.
    pub notice_ms: u64,
    /// Initial pen color (`#rrggbb`).
    pub pen_color: String,
    /// Initial pen thickness.
    pub pen_thickness: f64,
    /// Whether a pointer leaving the surface mid-arrow commits it (true) or
    /// discards it like a cancel (false).
    pub arrow_commit_on_leave: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            eraser_multiplier: ERASER_MULTIPLIER,
            operator_size: OPERATOR_SIZE,
            gadget_size: GADGET_SIZE,
            double_tap_ms: DOUBLE_TAP_MS,
            arrow_head_size: ARROW_HEAD_SIZE,
            notice_ms: NOTICE_MS,
            pen_color: DEFAULT_PEN_COLOR.to_string(),
            pen_thickness: DEFAULT_THICKNESS,
            arrow_commit_on_leave: true,
        }
    }
}

impl BoardConfig {
    /// Build typed board config from environment variables.
    ///
    /// Every key is optional; absent or unparsable values keep the default.
    /// - `TACBOARD_ERASER_MULTIPLIER`: default 8
    /// - `TACBOARD_OPERATOR_SIZE`: default 64
    /// - `TACBOARD_GADGET_SIZE`: default 48
    /// - `TACBOARD_DOUBLE_TAP_MS`: default 300
    /// - `TACBOARD_ARROW_HEAD`: default 20
    /// - `TACBOARD_NOTICE_MS`: default 1500
    /// - `TACBOARD_PEN_COLOR`: default `#ff0000`
    /// - `TACBOARD_PEN_THICKNESS`: default 5
    /// - `TACBOARD_ARROW_COMMIT_ON_LEAVE`: default `true`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).map_err(|_| ()))
    }

    /// Same as [`BoardConfig::from_env`] with a caller-supplied lookup, so
    /// tests do not have to mutate the process environment.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Result<String, ()>,
    {
        let d = Self::default();
        let pen_color = match lookup("TACBOARD_PEN_COLOR") {
            Ok(raw) => normalize_hex_color(&raw, &d.pen_color),
            Err(()) => d.pen_color.clone(),
        };
        Self {
            eraser_multiplier: positive_f64(&lookup, "TACBOARD_ERASER_MULTIPLIER", d.eraser_multiplier),
            operator_size: positive_f64(&lookup, "TACBOARD_OPERATOR_SIZE", d.operator_size),
            gadget_size: positive_f64(&lookup, "TACBOARD_GADGET_SIZE", d.gadget_size),
            double_tap_ms: parse_or(&lookup, "TACBOARD_DOUBLE_TAP_MS", d.double_tap_ms),
            arrow_head_size: positive_f64(&lookup, "TACBOARD_ARROW_HEAD", d.arrow_head_size),
            notice_ms: parse_or(&lookup, "TACBOARD_NOTICE_MS", d.notice_ms),
            pen_color,
            pen_thickness: positive_f64(&lookup, "TACBOARD_PEN_THICKNESS", d.pen_thickness),
            arrow_commit_on_leave: parse_or(&lookup, "TACBOARD_ARROW_COMMIT_ON_LEAVE", d.arrow_commit_on_leave),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Result<String, ()>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(()) => default,
    }
}

fn positive_f64<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Result<String, ()>,
{
    let value = parse_or(lookup, key, default);
    if value.is_finite() && value > 0.0 { value } else { default }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
