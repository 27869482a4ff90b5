//! Raster ink surface: the pixel buffer that holds committed strokes.
//!
//! The surface is a plain RGBA buffer sized to the board container. Strokes
//! are rasterized straight into it, so there is no history to replay: a
//! resize or [`Surface::clear`] loses everything. The arrow preview relies on
//! [`Surface::snapshot`] / [`Surface::restore`] to draw transient frames
//! without touching committed ink.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use image::{Rgba, RgbaImage};

use crate::consts::{ARROW_HEAD_ANGLE, MAX_SURFACE_PIXELS};
use crate::error::SurfaceError;
use crate::geom::{Bounds, Point};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How a stroke combines with existing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Source-over painting with an RGBA color.
    Paint(Rgba<u8>),
    /// Destination-out: covered pixels become fully transparent.
    Erase,
}

/// A saved copy of the surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pixels: RgbaImage,
}

/// The ink buffer. Strokes always use round caps and joins.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self { pixels: RgbaImage::new(0, 0) }
    }
}

/// Whether a `width × height` buffer is within [`MAX_SURFACE_PIXELS`].
#[must_use]
pub fn fits_surface(width: u32, height: u32) -> bool {
    u64::from(width) * u64::from(height) <= MAX_SURFACE_PIXELS
}

impl Surface {
    /// Create a transparent surface of the given size.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::TooLarge`] when the buffer would exceed
    /// [`MAX_SURFACE_PIXELS`].
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Ok(Self { pixels: allocate(width, height)? })
    }

    /// Reallocate to the container's new pixel size. Contents are discarded.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::TooLarge`] when the buffer would exceed
    /// [`MAX_SURFACE_PIXELS`]. The current buffer is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.pixels = allocate(width, height)?;
        tracing::debug!(width, height, "surface resized");
        Ok(())
    }

    /// Wipe every pixel to transparent.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = TRANSPARENT;
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Surface size as floating-point container bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.pixels.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|px| px.0[3] == 0)
    }

    /// Borrow the underlying RGBA buffer.
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copy the current pixels.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { pixels: self.pixels.clone() }
    }

    /// Put back pixels saved by [`Surface::snapshot`].
    ///
    /// Returns `false` and leaves the buffer alone when the snapshot was taken
    /// at a different size (the surface was resized in between).
    pub fn restore(&mut self, snapshot: &Snapshot) -> bool {
        if snapshot.pixels.dimensions() != self.pixels.dimensions() {
            tracing::debug!("snapshot size mismatch; restore skipped");
            return false;
        }
        self.pixels.copy_from_slice(snapshot.pixels.as_raw());
        true
    }

    /// Rasterize one straight segment of the given width.
    pub fn stroke_segment(&mut self, from: Point, to: Point, width: f64, ink: Ink) {
        let (w, h) = self.pixels.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let radius = (width * 0.5).max(0.5);

        let min_x = clamp_index(from.x.min(to.x) - radius, w);
        let max_x = clamp_index(from.x.max(to.x) + radius, w);
        let min_y = clamp_index(from.y.min(to.y) - radius, h);
        let max_y = clamp_index(from.y.max(to.y) + radius, h);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if covers(center, from, to, radius) {
                    let px = self.pixels.get_pixel_mut(x, y);
                    *px = apply_ink(*px, ink);
                }
            }
        }
    }

    /// Draw an arrow: the shaft `from → to` plus two head lines of length
    /// `head` leaving `to` at ±30° back toward `from`.
    ///
    /// This is the single primitive behind both the live preview and the
    /// committed arrow.
    pub fn draw_arrow(&mut self, from: Point, to: Point, head: f64, width: f64, color: Rgba<u8>) {
        let ink = Ink::Paint(color);
        self.stroke_segment(from, to, width, ink);
        let (left, right) = arrowhead_points(from, to, head);
        self.stroke_segment(to, left, width, ink);
        self.stroke_segment(to, right, width, ink);
    }
}

/// End points of the two arrowhead lines for a shaft `from → to`.
#[must_use]
pub fn arrowhead_points(from: Point, to: Point, head: f64) -> (Point, Point) {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let left = Point::new(
        to.x - head * (angle - ARROW_HEAD_ANGLE).cos(),
        to.y - head * (angle - ARROW_HEAD_ANGLE).sin(),
    );
    let right = Point::new(
        to.x - head * (angle + ARROW_HEAD_ANGLE).cos(),
        to.y - head * (angle + ARROW_HEAD_ANGLE).sin(),
    );
    (left, right)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_index(v: f64, len: u32) -> u32 {
    let max = f64::from(len - 1);
    v.floor().clamp(0.0, max) as u32
}

/// Whether a pixel center lies within `radius` of the segment `a → b`.
fn covers(p: Point, a: Point, b: Point, radius: f64) -> bool {
    let ab = b - a;
    let ap = p - a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 <= f64::EPSILON {
        return p.distance(a) <= radius;
    }
    let t = ((ap.x * ab.x + ap.y * ab.y) / len2).clamp(0.0, 1.0);
    let nearest = Point::new(a.x + ab.x * t, a.y + ab.y * t);
    p.distance(nearest) <= radius
}

fn allocate(width: u32, height: u32) -> Result<RgbaImage, SurfaceError> {
    if !fits_surface(width, height) {
        return Err(SurfaceError::TooLarge { width, height });
    }
    Ok(RgbaImage::from_pixel(width, height, TRANSPARENT))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apply_ink(dst: Rgba<u8>, ink: Ink) -> Rgba<u8> {
    match ink {
        Ink::Erase => TRANSPARENT,
        Ink::Paint(src) => {
            let sa = f64::from(src.0[3]) / 255.0;
            if sa >= 1.0 {
                return src;
            }
            let da = f64::from(dst.0[3]) / 255.0;
            let out_a = sa + da * (1.0 - sa);
            if out_a <= 0.0 {
                return TRANSPARENT;
            }
            let mut out = [0u8; 4];
            for i in 0..3 {
                let s = f64::from(src.0[i]);
                let d = f64::from(dst.0[i]);
                out[i] = ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
            }
            out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
            Rgba(out)
        }
    }
}
