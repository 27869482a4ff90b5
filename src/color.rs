//! Color parsing for ink and sticker backgrounds.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use image::Rgba;

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16);
            match (channel(0), channel(1), channel(2)) {
                (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
                _ => None,
            }
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            match (channel(0), channel(2), channel(4)) {
                (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Opaque RGBA pixel for a hex color, or `fallback` when `raw` does not parse.
#[must_use]
pub fn hex_to_rgba(raw: &str, fallback: Rgba<u8>) -> Rgba<u8> {
    match parse_hex_rgb(raw) {
        Some((r, g, b)) => Rgba([r, g, b, 255]),
        None => fallback,
    }
}

/// Normalize a color to canonical lowercase `#rrggbb`.
#[must_use]
pub fn normalize_hex_color(value: &str, fallback: &str) -> String {
    let (r, g, b) = parse_hex_rgb(value)
        .or_else(|| parse_hex_rgb(fallback))
        .unwrap_or((255, 0, 0));
    format!("#{r:02x}{g:02x}{b:02x}")
}
