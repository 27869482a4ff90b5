#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn distance_is_euclidean() {
    assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
}

#[test]
fn point_add_and_sub() {
    let a = Point::new(10.0, 20.0);
    let b = Point::new(1.5, -2.0);
    assert_eq!(a + b, Point::new(11.5, 18.0));
    assert_eq!(a - b, Point::new(8.5, 22.0));
}

#[test]
fn bounds_center() {
    assert_eq!(Bounds::new(900.0, 500.0).center(), Point::new(450.0, 250.0));
}

#[test]
fn bounds_contains_edges() {
    let b = Bounds::new(100.0, 50.0);
    assert!(b.contains(Point::new(0.0, 0.0)));
    assert!(b.contains(Point::new(100.0, 50.0)));
    assert!(!b.contains(Point::new(-0.1, 10.0)));
    assert!(!b.contains(Point::new(10.0, 50.1)));
}

#[test]
fn clamp_box_keeps_box_inside() {
    let b = Bounds::new(800.0, 600.0);
    assert_eq!(b.clamp_box(Point::new(-20.0, -5.0), 64.0), Point::new(0.0, 0.0));
    assert_eq!(b.clamp_box(Point::new(790.0, 590.0), 64.0), Point::new(736.0, 536.0));
    assert_eq!(b.clamp_box(Point::new(100.0, 100.0), 64.0), Point::new(100.0, 100.0));
}

#[test]
fn clamp_box_larger_than_container_pins_to_origin() {
    let b = Bounds::new(40.0, 30.0);
    assert_eq!(b.clamp_box(Point::new(12.0, 8.0), 64.0), Point::new(0.0, 0.0));
}
