use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Raster,
    error::{ForgeError, ForgeResult},
};

/// Alpha cut-off: a pixel counts as content when `alpha > threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlphaThreshold(pub u8);

impl AlphaThreshold {
    /// Any non-zero alpha is content. Used by the PNG cropper.
    pub const ANY_VISIBLE: Self = Self(0);
    /// Ignores faint anti-aliasing haze below alpha 11. Used when trimming rendered snapshots.
    pub const EXPORT_TRIM: Self = Self(10);

    /// Whether `alpha` counts as content under this threshold.
    pub fn is_content(self, alpha: u8) -> bool {
        alpha > self.0
    }
}

impl Default for AlphaThreshold {
    fn default() -> Self {
        Self::ANY_VISIBLE
    }
}

/// Scanner configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOpts {
    /// Opacity policy.
    #[serde(default)]
    pub threshold: AlphaThreshold,
    /// Margin added on every side after detection, clamped to the raster.
    #[serde(default)]
    pub padding: u32,
}

impl ScanOpts {
    /// Options with the given threshold and padding.
    pub fn new(threshold: AlphaThreshold, padding: u32) -> Self {
        Self { threshold, padding }
    }
}

/// Inclusive pixel rectangle: `left <= right`, `top <= bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Leftmost column.
    pub left: u32,
    /// Topmost row.
    pub top: u32,
    /// Rightmost column (inclusive).
    pub right: u32,
    /// Bottom row (inclusive).
    pub bottom: u32,
}

impl BoundingBox {
    /// Build a box, rejecting inverted edges.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> ForgeResult<Self> {
        if left > right || top > bottom {
            return Err(ForgeError::validation(format!(
                "bounding box edges are inverted: ({left},{top})-({right},{bottom})"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Whether `(x, y)` lies inside the box.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }

    /// Grow by `padding` on every side, clamped to a `width x height` raster.
    pub fn padded(self, padding: u32, width: u32, height: u32) -> Self {
        let max_x = width.saturating_sub(1);
        let max_y = height.saturating_sub(1);
        Self {
            left: self.left.saturating_sub(padding),
            top: self.top.saturating_sub(padding),
            right: self.right.saturating_add(padding).min(max_x),
            bottom: self.bottom.saturating_add(padding).min(max_y),
        }
    }

    /// Whether the box covers the whole `width x height` raster.
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        self.left == 0
            && self.top == 0
            && self.right + 1 == width
            && self.bottom + 1 == height
    }
}

/// Find the bounding box of all pixels whose alpha exceeds `opts.threshold`.
///
/// Returns `Ok(None)` when no pixel qualifies. Padding is applied after detection.
pub fn scan(raster: &Raster, opts: ScanOpts) -> ForgeResult<Option<BoundingBox>> {
    let (width, height) = raster.dimensions();
    let data = raster.data();
    let row_len = (width as usize) * 4;
    if width == 0 || height == 0 || data.len() != row_len * (height as usize) {
        return Err(ForgeError::pixel_read(format!(
            "cannot scan {width}x{height} raster backed by {} bytes",
            data.len()
        )));
    }

    let mut found: Option<BoundingBox> = None;
    for (y, row) in data.chunks_exact(row_len).enumerate() {
        let y = y as u32;
        for (x, px) in row.chunks_exact(4).enumerate() {
            if !opts.threshold.is_content(px[3]) {
                continue;
            }
            let x = x as u32;
            found = Some(match found {
                None => BoundingBox {
                    left: x,
                    top: y,
                    right: x,
                    bottom: y,
                },
                Some(b) => BoundingBox {
                    left: b.left.min(x),
                    top: b.top,
                    right: b.right.max(x),
                    bottom: y,
                },
            });
        }
    }

    Ok(found.map(|b| b.padded(opts.padding, width, height)))
}

#[cfg(test)]
#[path = "../../tests/unit/scan/bounds.rs"]
mod tests;
