//! Input preconditions checked before a tool starts processing.

use crate::{
    assets::decode::{read_dimensions, sniff_format},
    foundation::error::{ForgeError, ForgeResult},
};

/// Width and height every app icon source must have.
pub const ICON_SOURCE_SIZE: u32 = 1024;

/// Require the encoded image to be exactly `width x height`.
///
/// Bytes whose header cannot be read are reported as [`ForgeError::SourceDecode`] since the
/// source is unusable for any output.
pub fn require_dimensions(bytes: &[u8], width: u32, height: u32) -> ForgeResult<()> {
    let (w, h) = read_dimensions(bytes).map_err(|e| ForgeError::source_decode(e.to_string()))?;
    if (w, h) != (width, height) {
        return Err(ForgeError::validation(format!(
            "image must be exactly {width}x{height} pixels, got {w}x{h}"
        )));
    }
    Ok(())
}

/// Require the encoded bytes to be a PNG file.
pub fn require_png(bytes: &[u8]) -> ForgeResult<()> {
    match sniff_format(bytes) {
        Some(image::ImageFormat::Png) => Ok(()),
        Some(other) => Err(ForgeError::validation(format!(
            "expected a PNG file, got {other:?}"
        ))),
        None => Err(ForgeError::validation("expected a PNG file")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/validate.rs"]
mod tests;
