use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Raster,
        error::{ForgeError, ForgeResult},
    },
    scan::bounds::{BoundingBox, ScanOpts, scan},
};

/// What [`trim`] does when a raster has no content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimMode {
    /// Return the raster unchanged.
    #[default]
    Lenient,
    /// Fail with [`ForgeError::NoContent`].
    Strict,
}

/// Copy the inclusive region `bbox` out of `raster`.
pub fn crop(raster: &Raster, bbox: BoundingBox) -> ForgeResult<Raster> {
    let (width, height) = raster.dimensions();
    if bbox.left > bbox.right || bbox.top > bbox.bottom {
        return Err(ForgeError::validation(format!(
            "crop box ({},{})-({},{}) is inverted",
            bbox.left, bbox.top, bbox.right, bbox.bottom
        )));
    }
    if bbox.right >= width || bbox.bottom >= height {
        return Err(ForgeError::validation(format!(
            "crop box ({},{})-({},{}) exceeds {width}x{height} raster",
            bbox.left, bbox.top, bbox.right, bbox.bottom
        )));
    }
    if bbox.is_full(width, height) {
        return Ok(raster.clone());
    }

    let src = raster.data();
    let src_row = (width as usize) * 4;
    let out_row = (bbox.width() as usize) * 4;
    let mut out = Vec::with_capacity(out_row * bbox.height() as usize);
    for y in bbox.top..=bbox.bottom {
        let start = (y as usize) * src_row + (bbox.left as usize) * 4;
        out.extend_from_slice(&src[start..start + out_row]);
    }
    Raster::from_rgba8(bbox.width(), bbox.height(), out)
}

/// Scan `raster` and crop it to its content box.
pub fn trim(raster: &Raster, opts: ScanOpts, mode: TrimMode) -> ForgeResult<Raster> {
    match scan(raster, opts)? {
        Some(bbox) => crop(raster, bbox),
        None => match mode {
            TrimMode::Lenient => Ok(raster.clone()),
            TrimMode::Strict => Err(ForgeError::no_content(format!(
                "no pixel with alpha > {} in {}x{} raster",
                opts.threshold.0,
                raster.width(),
                raster.height()
            ))),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scan/trim.rs"]
mod tests;
