//! Rendering: pure projections of board state.
//!
//! Nothing here mutates the board. [`sticker_views`] is what a DOM host needs
//! to position overlay elements; [`compose`] flattens background, ink, and
//! stickers into one RGBA frame for headless output.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::background::Background;
use crate::catalog::StickerVisual;
use crate::color::hex_to_rgba;
use crate::engine::BoardCore;
use crate::sticker::{StickerId, StickerStore};
use crate::surface::fits_surface;

/// Flat fill used when no background pixels are available.
const PLACEHOLDER_FILL: Rgba<u8> = Rgba([224, 224, 224, 255]);

/// Fill for image stickers whose icon cannot be loaded.
const MISSING_ICON_FILL: Rgba<u8> = Rgba([74, 85, 104, 255]);

/// Resolves image references (map floors, sticker icons) to pixels.
pub trait AssetSource {
    fn load(&self, url: &str) -> Option<RgbaImage>;
}

/// An asset source that never has anything.
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn load(&self, _url: &str) -> Option<RgbaImage> {
        None
    }
}

/// One overlay element as the host should draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StickerView {
    pub id: StickerId,
    pub left: f64,
    pub top: f64,
    pub size: f64,
    pub label: String,
    pub visual: StickerVisual,
}

/// Project the sticker store to draw-ordered views (bottom first).
#[must_use]
pub fn sticker_views(stickers: &StickerStore) -> Vec<StickerView> {
    stickers
        .iter()
        .map(|s| StickerView {
            id: s.id,
            left: s.position.x,
            top: s.position.y,
            size: s.size,
            label: s.label.clone(),
            visual: s.visual.clone(),
        })
        .collect()
}

/// Flatten the board into a single frame the size of the surface.
///
/// Layers, bottom to top: background (scaled to fit), ink, stickers.
#[must_use]
pub fn compose(core: &BoardCore, assets: &dyn AssetSource) -> RgbaImage {
    let surface = core.surface();
    let (w, h) = (surface.width(), surface.height());

    let mut frame = background_layer(core.background(), assets, w, h);
    imageops::overlay(&mut frame, surface.as_image(), 0, 0);

    for view in sticker_views(core.stickers()) {
        let Some(tile) = sticker_tile(&view, assets) else {
            continue;
        };
        imageops::overlay(&mut frame, &tile, to_px(view.left), to_px(view.top));
    }
    frame
}

fn background_layer(background: &Background, assets: &dyn AssetSource, w: u32, h: u32) -> RgbaImage {
    let loaded;
    let source = match background {
        Background::Uploaded { image, .. } => Some(image),
        Background::Placeholder { url } | Background::MapFloor { url, .. } => {
            loaded = assets.load(url);
            loaded.as_ref()
        }
        Background::Empty => None,
    };
    match source {
        Some(img) if w > 0 && h > 0 => imageops::resize(img, w, h, FilterType::Triangle),
        _ => RgbaImage::from_pixel(w, h, PLACEHOLDER_FILL),
    }
}

fn sticker_tile(view: &StickerView, assets: &dyn AssetSource) -> Option<RgbaImage> {
    let side = match u32::try_from(to_px(view.size)) {
        Ok(side) if side > 0 && fits_surface(side, side) => side,
        _ => return None,
    };
    let tile = match &view.visual {
        StickerVisual::Text { bg_color, .. } => {
            RgbaImage::from_pixel(side, side, hex_to_rgba(bg_color, MISSING_ICON_FILL))
        }
        StickerVisual::Image { url, .. } => match assets.load(url) {
            Some(icon) => imageops::resize(&icon, side, side, FilterType::Triangle),
            None => RgbaImage::from_pixel(side, side, MISSING_ICON_FILL),
        },
    };
    Some(tile)
}

#[allow(clippy::cast_possible_truncation)]
fn to_px(v: f64) -> i64 {
    v.round() as i64
}
