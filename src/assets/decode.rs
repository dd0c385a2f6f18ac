use std::io::Cursor;

use anyhow::Context;

use crate::foundation::{
    core::Raster,
    error::{ForgeError, ForgeResult},
};

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) into a straight RGBA8 [`Raster`].
pub fn decode_image(bytes: &[u8]) -> ForgeResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ForgeError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ForgeError::decode("decoded image has zero width or height"));
    }
    Raster::from_rgba8(width, height, rgba.into_raw())
}

/// Read image dimensions from the header without decoding pixel data.
pub fn read_dimensions(bytes: &[u8]) -> ForgeResult<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ForgeError::decode(format!("guess image format: {e}")))?
        .into_dimensions()
        .map_err(|e| ForgeError::decode(format!("read image dimensions: {e}")))
}

/// Detect the container format of encoded bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<image::ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Encode a raster as PNG bytes.
pub fn encode_png(raster: &Raster) -> ForgeResult<Vec<u8>> {
    let (width, height) = raster.dimensions();
    let img = image::RgbaImage::from_raw(width, height, raster.data().to_vec())
        .ok_or_else(|| ForgeError::pixel_read("raster length does not match its dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
