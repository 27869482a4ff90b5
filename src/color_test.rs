use super::*;

#[test]
fn parses_long_form() {
    assert_eq!(parse_hex_rgb("#1a2B3c"), Some((0x1a, 0x2b, 0x3c)));
}

#[test]
fn parses_short_form() {
    assert_eq!(parse_hex_rgb("#f0a"), Some((0xff, 0x00, 0xaa)));
}

#[test]
fn rejects_malformed() {
    assert_eq!(parse_hex_rgb("ff0000"), None);
    assert_eq!(parse_hex_rgb("#ff00"), None);
    assert_eq!(parse_hex_rgb("#gg0000"), None);
    assert_eq!(parse_hex_rgb("#ééé"), None);
    assert_eq!(parse_hex_rgb(""), None);
}

#[test]
fn hex_to_rgba_is_opaque() {
    assert_eq!(hex_to_rgba("#00ff00", Rgba([0, 0, 0, 0])), Rgba([0, 255, 0, 255]));
}

#[test]
fn hex_to_rgba_falls_back() {
    let fallback = Rgba([1, 2, 3, 4]);
    assert_eq!(hex_to_rgba("blue", fallback), fallback);
}

#[test]
fn normalize_lowercases_and_expands() {
    assert_eq!(normalize_hex_color("#ABC", "#000000"), "#aabbcc");
    assert_eq!(normalize_hex_color(" #FF8800 ", "#000000"), "#ff8800");
}

#[test]
fn normalize_uses_fallback_then_red() {
    assert_eq!(normalize_hex_color("nope", "#00f"), "#0000ff");
    assert_eq!(normalize_hex_color("nope", "also nope"), "#ff0000");
}
