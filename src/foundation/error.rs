/// Convenience result type used across assetforge.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Bytes could not be interpreted as an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// The primary user-supplied source failed to decode. Fatal to a whole run.
    #[error("source decode error: {0}")]
    SourceDecode(String),

    /// A non-source layer image (background, overlay) failed to decode.
    #[error("layer decode error: {0}")]
    LayerDecode(String),

    /// No pixel above the alpha threshold was found.
    #[error("no content: {0}")]
    NoContent(String),

    /// A pixel buffer could not be read (inconsistent dimensions or length).
    #[error("pixel read error: {0}")]
    PixelRead(String),

    /// Archive assembly failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// An input precondition was not met (dimensions, format, spec values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    /// Build a [`ForgeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ForgeError::SourceDecode`] value.
    pub fn source_decode(msg: impl Into<String>) -> Self {
        Self::SourceDecode(msg.into())
    }

    /// Build a [`ForgeError::LayerDecode`] value.
    pub fn layer_decode(msg: impl Into<String>) -> Self {
        Self::LayerDecode(msg.into())
    }

    /// Build a [`ForgeError::NoContent`] value.
    pub fn no_content(msg: impl Into<String>) -> Self {
        Self::NoContent(msg.into())
    }

    /// Build a [`ForgeError::PixelRead`] value.
    pub fn pixel_read(msg: impl Into<String>) -> Self {
        Self::PixelRead(msg.into())
    }

    /// Build a [`ForgeError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`ForgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ForgeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error aborts a whole export run instead of a single output.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SourceDecode(_) | Self::Archive(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
