use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::decode::{decode_image, read_dimensions},
    foundation::{
        core::Raster,
        error::{ForgeError, ForgeResult},
    },
};

/// User-supplied encoded image plus a display name.
///
/// Bytes are shared, so cloning a source is cheap. Decoding failures of a source are
/// [`ForgeError::SourceDecode`], which is fatal to the export it feeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    name: String,
    bytes: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap in-memory bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes.into()),
        }
    }

    /// Read a file; the file name becomes the display name.
    pub fn from_path(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read source image '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Display name (usually the file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Shared handle to the encoded bytes.
    pub fn shared_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    /// Decode into a raster.
    pub fn decode(&self) -> ForgeResult<Raster> {
        decode_image(&self.bytes)
            .map_err(|err| ForgeError::source_decode(format!("{}: {err}", self.name)))
    }

    /// Header dimensions without a full decode.
    pub fn dimensions(&self) -> ForgeResult<(u32, u32)> {
        read_dimensions(&self.bytes)
            .map_err(|err| ForgeError::source_decode(format!("{}: {err}", self.name)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
