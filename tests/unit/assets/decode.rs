use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_keeps_straight_alpha() {
    let bytes = png_bytes(2, 1, [100, 50, 200, 128]);
    let raster = decode_image(&bytes).unwrap();
    assert_eq!(raster.dimensions(), (2, 1));
    assert_eq!(raster.data(), &[100, 50, 200, 128, 100, 50, 200, 128]);
}

#[test]
fn decode_image_rejects_garbage() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, ForgeError::Decode(_)));
}

#[test]
fn read_dimensions_from_header() {
    let bytes = png_bytes(7, 3, [0, 0, 0, 255]);
    assert_eq!(read_dimensions(&bytes).unwrap(), (7, 3));
    assert!(read_dimensions(b"nope").is_err());
}

#[test]
fn encode_then_decode_preserves_pixels() {
    let raster = Raster::from_rgba8(1, 2, vec![1, 2, 3, 4, 250, 251, 252, 253]).unwrap();
    let png = encode_png(&raster).unwrap();
    assert_eq!(sniff_format(&png), Some(image::ImageFormat::Png));
    assert_eq!(decode_image(&png).unwrap(), raster);
}
