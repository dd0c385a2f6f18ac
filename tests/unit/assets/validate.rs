use std::io::Cursor;

use super::*;

fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn require_dimensions_reports_actual_size() {
    let bytes = encode(16, 8, image::ImageFormat::Png);
    require_dimensions(&bytes, 16, 8).unwrap();

    let err = require_dimensions(&bytes, 1024, 1024).unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));
    assert!(err.to_string().contains("got 16x8"));
}

#[test]
fn require_dimensions_unreadable_source_is_source_decode() {
    let err = require_dimensions(b"\x00\x01garbage", 1024, 1024).unwrap_err();
    assert!(matches!(err, ForgeError::SourceDecode(_)));
}

#[test]
fn require_png_accepts_png_only() {
    require_png(&encode(2, 2, image::ImageFormat::Png)).unwrap();
    assert!(require_png(&encode(2, 2, image::ImageFormat::Jpeg)).is_err());
    assert!(require_png(b"text").is_err());
}
