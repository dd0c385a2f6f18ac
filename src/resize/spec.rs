use serde::{Deserialize, Serialize};

use crate::foundation::error::{ForgeError, ForgeResult};

/// One requested output: exact pixel size plus its relative archive path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeSpec {
    /// Human-readable label (`"iPhone Notification 20pt @2x"`).
    pub label: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Relative archive path, e.g. `iOS/Icon-App-20x20@2x.png`.
    pub path: String,
}

impl SizeSpec {
    /// Build a spec, rejecting zero dimensions and empty paths.
    pub fn new(
        label: impl Into<String>,
        width: u32,
        height: u32,
        path: impl Into<String>,
    ) -> ForgeResult<Self> {
        let spec = Self {
            label: label.into(),
            width,
            height,
            path: path.into(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Square spec (`size × size`).
    pub fn square(label: impl Into<String>, size: u32, path: impl Into<String>) -> ForgeResult<Self> {
        Self::new(label, size, size, path)
    }

    /// Check invariants (useful after deserialization).
    pub fn validate(&self) -> ForgeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ForgeError::validation(format!(
                "size spec '{}' must have non-zero dimensions, got {}x{}",
                self.label, self.width, self.height
            )));
        }
        if self.path.trim().is_empty() {
            return Err(ForgeError::validation(format!(
                "size spec '{}' has an empty path",
                self.label
            )));
        }
        Ok(())
    }
}
