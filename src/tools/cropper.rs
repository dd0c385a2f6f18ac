use crate::{
    assets::{source::SourceImage, validate::require_png},
    foundation::error::{ForgeError, ForgeResult},
    pipeline::export::{ExportJob, Packaging, RunContext},
    scan::{
        bounds::{AlphaThreshold, ScanOpts},
        trim::{TrimMode, trim},
    },
};

/// Crops transparent margins off PNG files.
///
/// Files without any visible pixel are skipped and reported. A single result is delivered as a
/// PNG, several as `cropped_images.zip`.
#[derive(Clone, Debug)]
pub struct CropJob {
    sources: Vec<SourceImage>,
    opts: ScanOpts,
}

impl CropJob {
    /// Job over `sources` with the default policy (any visible pixel, no padding).
    pub fn new(sources: Vec<SourceImage>) -> Self {
        Self {
            sources,
            opts: ScanOpts::new(AlphaThreshold::ANY_VISIBLE, 0),
        }
    }

    /// Override threshold and padding.
    pub fn with_opts(mut self, opts: ScanOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Output file name for `source`.
    pub fn output_name(source: &SourceImage) -> String {
        format!("{}_cropped.png", source.stem())
    }
}

impl ExportJob for CropJob {
    fn name(&self) -> &str {
        "crop"
    }

    fn archive_name(&self) -> String {
        "cropped_images.zip".to_string()
    }

    fn packaging(&self) -> Packaging {
        Packaging::SingleWhenAlone
    }

    fn validate(&self) -> ForgeResult<()> {
        if self.sources.is_empty() {
            return Err(ForgeError::validation("select at least one PNG file"));
        }
        for source in &self.sources {
            require_png(source.bytes())
                .map_err(|e| ForgeError::validation(format!("{}: {e}", source.name())))?;
        }
        Ok(())
    }

    fn process(&self, ctx: &mut RunContext) -> ForgeResult<()> {
        let total = self.sources.len();
        for (idx, source) in self.sources.iter().enumerate() {
            tracing::debug!(file = source.name(), current = idx + 1, total, "cropping");
            let cropped = source
                .decode()
                .and_then(|raster| trim(&raster, self.opts, TrimMode::Strict))
                .map_err(|err| match err {
                    ForgeError::NoContent(msg) => {
                        ForgeError::no_content(format!("{}: {msg}", source.name()))
                    }
                    other => other,
                });
            if ctx.record(Self::output_name(source), cropped).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/cropper.rs"]
mod tests;
