use std::io::Cursor;

use image::{ImageFormat, Rgba};

use super::*;

fn png_bytes(w: u32, h: u32, fill: Rgba<u8>) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, fill);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn image_mime_detection() {
    assert!(is_image_mime("image/png"));
    assert!(is_image_mime("IMAGE/JPEG"));
    assert!(!is_image_mime("text/plain"));
    assert!(!is_image_mime(""));
}

#[test]
fn decodes_png_upload() {
    let bytes = png_bytes(4, 3, Rgba([10, 20, 30, 255]));
    let img = decode_upload(&bytes, "image/png").unwrap();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(*img.get_pixel(2, 1), Rgba([10, 20, 30, 255]));
}

#[test]
fn rejects_non_image_mime() {
    let bytes = png_bytes(1, 1, Rgba([0, 0, 0, 255]));
    assert!(matches!(decode_upload(&bytes, "text/plain"), Err(UploadError::NotAnImage(m)) if m == "text/plain"));
}

#[test]
fn rejects_undecodable_bytes() {
    assert!(matches!(decode_upload(b"definitely not pixels", "image/png"), Err(UploadError::Decode(_))));
}

#[test]
fn slot_starts_empty() {
    let slot = BackgroundSlot::default();
    assert_eq!(slot.current(), &Background::Empty);
}

#[test]
fn last_upload_wins() {
    let mut slot = BackgroundSlot::default();
    assert_eq!(slot.set_uploaded(RgbaImage::new(2, 2)), 1);
    assert_eq!(slot.set_uploaded(RgbaImage::new(5, 5)), 2);
    match slot.current() {
        Background::Uploaded { image, generation } => {
            assert_eq!(image.dimensions(), (5, 5));
            assert_eq!(*generation, 2);
        }
        other => panic!("expected uploaded background, got {other:?}"),
    }
}

#[test]
fn url_and_image_accessors() {
    let floor = Background::MapFloor { map_id: "bank".into(), floor: 0, url: "./img/map/bank_2f.jpg".into() };
    assert_eq!(floor.url(), Some("./img/map/bank_2f.jpg"));
    assert!(floor.image().is_none());

    let uploaded = Background::Uploaded { image: RgbaImage::new(1, 1), generation: 1 };
    assert!(uploaded.url().is_none());
    assert!(uploaded.image().is_some());
    assert!(Background::Empty.url().is_none());
}
