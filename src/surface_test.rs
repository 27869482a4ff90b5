#![allow(clippy::float_cmp)]

use super::*;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn covered(surface: &Surface, x: u32, y: u32) -> bool {
    surface.pixel(x, y).is_some_and(|px| px.0[3] > 0)
}

// =============================================================
// Buffer lifecycle
// =============================================================

#[test]
fn new_surface_is_blank() {
    let s = Surface::new(40, 30).unwrap();
    assert_eq!((s.width(), s.height()), (40, 30));
    assert!(s.is_blank());
    assert_eq!(s.bounds(), Bounds::new(40.0, 30.0));
}

#[test]
fn default_surface_is_empty() {
    let s = Surface::default();
    assert_eq!((s.width(), s.height()), (0, 0));
    assert!(s.is_blank());
}

#[test]
fn pixel_outside_is_none() {
    let s = Surface::new(10, 10).unwrap();
    assert!(s.pixel(10, 0).is_none());
    assert!(s.pixel(0, 10).is_none());
}

#[test]
fn clear_wipes_ink() {
    let mut s = Surface::new(50, 50).unwrap();
    s.stroke_segment(Point::new(5.0, 5.0), Point::new(45.0, 45.0), 4.0, Ink::Paint(RED));
    assert!(!s.is_blank());
    s.clear();
    assert!(s.is_blank());
}

#[test]
fn resize_discards_ink() {
    let mut s = Surface::new(50, 50).unwrap();
    s.stroke_segment(Point::new(5.0, 5.0), Point::new(45.0, 5.0), 4.0, Ink::Paint(RED));
    s.resize(80, 60).unwrap();
    assert_eq!((s.width(), s.height()), (80, 60));
    assert!(s.is_blank());
}

#[test]
fn oversized_surface_is_refused() {
    assert_eq!(
        Surface::new(u32::MAX, u32::MAX).unwrap_err(),
        SurfaceError::TooLarge { width: u32::MAX, height: u32::MAX }
    );
    assert!(fits_surface(8192, 8192));
    assert!(!fits_surface(8193, 8192));
}

#[test]
fn oversized_resize_keeps_current_ink() {
    let mut s = Surface::new(50, 50).unwrap();
    s.stroke_segment(Point::new(5.0, 5.0), Point::new(45.0, 5.0), 4.0, Ink::Paint(RED));
    let before = s.as_image().clone();
    assert!(s.resize(u32::MAX, 2).is_err());
    assert_eq!(s.as_image(), &before);
}

#[test]
fn stroke_on_empty_surface_is_noop() {
    let mut s = Surface::default();
    s.stroke_segment(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 5.0, Ink::Paint(RED));
    assert!(s.is_blank());
}

// =============================================================
// Segments
// =============================================================

#[test]
fn segment_covers_band_of_its_width() {
    let mut s = Surface::new(60, 40).unwrap();
    s.stroke_segment(Point::new(10.0, 20.0), Point::new(50.0, 20.0), 4.0, Ink::Paint(RED));
    assert_eq!(s.pixel(30, 20), Some(RED));
    assert_eq!(s.pixel(30, 18), Some(RED));
    assert!(!covered(&s, 30, 25));
    assert!(!covered(&s, 30, 14));
}

#[test]
fn round_cap_extends_past_endpoint() {
    let mut s = Surface::new(40, 20).unwrap();
    s.stroke_segment(Point::new(10.0, 10.0), Point::new(20.0, 10.0), 6.0, Ink::Paint(RED));
    assert!(covered(&s, 8, 10));
}

#[test]
fn zero_length_segment_draws_dot() {
    let mut s = Surface::new(20, 20).unwrap();
    s.stroke_segment(Point::new(10.0, 10.0), Point::new(10.0, 10.0), 4.0, Ink::Paint(RED));
    assert!(covered(&s, 10, 10));
    assert!(!covered(&s, 10, 14));
}

#[test]
fn segment_partly_outside_is_clipped() {
    let mut s = Surface::new(20, 20).unwrap();
    s.stroke_segment(Point::new(-50.0, 10.0), Point::new(50.0, 10.0), 2.0, Ink::Paint(RED));
    assert!(covered(&s, 0, 10));
    assert!(covered(&s, 19, 10));
}

#[test]
fn erase_makes_pixels_transparent() {
    let mut s = Surface::new(40, 20).unwrap();
    s.stroke_segment(Point::new(0.0, 10.0), Point::new(40.0, 10.0), 10.0, Ink::Paint(RED));
    s.stroke_segment(Point::new(10.0, 10.0), Point::new(30.0, 10.0), 4.0, Ink::Erase);
    assert_eq!(s.pixel(20, 10), Some(Rgba([0, 0, 0, 0])));
    assert_eq!(s.pixel(2, 10), Some(RED));
}

#[test]
fn opaque_paint_replaces() {
    let mut s = Surface::new(20, 20).unwrap();
    s.stroke_segment(Point::new(0.0, 10.0), Point::new(20.0, 10.0), 4.0, Ink::Paint(RED));
    s.stroke_segment(Point::new(0.0, 10.0), Point::new(20.0, 10.0), 4.0, Ink::Paint(BLUE));
    assert_eq!(s.pixel(10, 10), Some(BLUE));
}

#[test]
fn translucent_paint_blends_source_over() {
    let mut s = Surface::new(20, 20).unwrap();
    s.stroke_segment(Point::new(0.0, 10.0), Point::new(20.0, 10.0), 4.0, Ink::Paint(RED));
    s.stroke_segment(Point::new(0.0, 10.0), Point::new(20.0, 10.0), 4.0, Ink::Paint(Rgba([0, 0, 255, 128])));
    assert_eq!(s.pixel(10, 10), Some(Rgba([127, 0, 128, 255])));
}

#[test]
fn translucent_paint_on_empty_keeps_color() {
    let mut s = Surface::new(20, 20).unwrap();
    s.stroke_segment(Point::new(0.0, 10.0), Point::new(20.0, 10.0), 4.0, Ink::Paint(Rgba([0, 0, 255, 128])));
    assert_eq!(s.pixel(10, 10), Some(Rgba([0, 0, 255, 128])));
}

// =============================================================
// Snapshot / restore
// =============================================================

#[test]
fn restore_returns_exact_pixels() {
    let mut s = Surface::new(50, 50).unwrap();
    s.stroke_segment(Point::new(5.0, 5.0), Point::new(45.0, 5.0), 3.0, Ink::Paint(RED));
    let before = s.as_image().clone();
    let snap = s.snapshot();
    s.stroke_segment(Point::new(5.0, 25.0), Point::new(45.0, 25.0), 8.0, Ink::Paint(BLUE));
    assert_ne!(s.as_image(), &before);
    assert!(s.restore(&snap));
    assert_eq!(s.as_image(), &before);
}

#[test]
fn restore_after_resize_is_refused() {
    let mut s = Surface::new(50, 50).unwrap();
    let snap = s.snapshot();
    s.resize(60, 60).unwrap();
    s.stroke_segment(Point::new(5.0, 5.0), Point::new(45.0, 5.0), 3.0, Ink::Paint(RED));
    assert!(!s.restore(&snap));
    assert!(!s.is_blank());
}

// =============================================================
// Arrows
// =============================================================

#[test]
fn arrowhead_points_are_symmetric_about_shaft() {
    let (left, right) = arrowhead_points(Point::new(10.0, 50.0), Point::new(110.0, 50.0), 10.0);
    let back = 10.0 * (std::f64::consts::PI / 6.0).cos();
    assert!((left.x - (110.0 - back)).abs() < 1e-9);
    assert!((right.x - (110.0 - back)).abs() < 1e-9);
    assert!((left.y - 55.0).abs() < 1e-9);
    assert!((right.y - 45.0).abs() < 1e-9);
}

#[test]
fn horizontal_arrow_head_ends() {
    let (left, right) = arrowhead_points(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 10.0);
    assert!((left.x - 91.339_745).abs() < 1e-5 && (left.y - 5.0).abs() < 1e-9);
    assert!((right.x - 91.339_745).abs() < 1e-5 && (right.y + 5.0).abs() < 1e-9);
}

#[test]
fn arrowhead_lines_have_head_length() {
    let to = Point::new(40.0, 80.0);
    let (left, right) = arrowhead_points(Point::new(0.0, 0.0), to, 20.0);
    assert!((to.distance(left) - 20.0).abs() < 1e-9);
    assert!((to.distance(right) - 20.0).abs() < 1e-9);
}

#[test]
fn draw_arrow_paints_shaft_and_head() {
    let mut s = Surface::new(150, 100).unwrap();
    s.draw_arrow(Point::new(10.0, 50.0), Point::new(110.0, 50.0), 10.0, 2.0, RED);
    assert!(covered(&s, 60, 50));
    assert!(covered(&s, 105, 47));
    assert!(covered(&s, 105, 52));
    assert!(!covered(&s, 105, 40));
    assert!(!covered(&s, 60, 53));
}

#[test]
fn same_arrow_rasterizes_identically() {
    let draw = || {
        let mut s = Surface::new(160, 120).unwrap();
        s.draw_arrow(Point::new(12.5, 100.0), Point::new(140.0, 17.25), 20.0, 5.0, RED);
        s
    };
    let (first, second) = (draw(), draw());
    assert!(!first.is_blank());
    assert_eq!(first.as_image(), second.as_image());
}

#[test]
fn redrawing_arrow_over_itself_changes_nothing() {
    let mut s = Surface::new(160, 120).unwrap();
    s.draw_arrow(Point::new(20.0, 20.0), Point::new(130.0, 90.0), 20.0, 3.0, RED);
    let once = s.as_image().clone();
    s.draw_arrow(Point::new(20.0, 20.0), Point::new(130.0, 90.0), 20.0, 3.0, RED);
    assert_eq!(s.as_image(), &once);
}
