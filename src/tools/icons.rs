use crate::{
    assets::{
        source::SourceImage,
        validate::{ICON_SOURCE_SIZE, require_dimensions},
    },
    foundation::error::{ForgeError, ForgeResult},
    pipeline::export::{ExportJob, RunContext},
    presets::icons::{IconTable, Platform},
    resize::{batch::BatchResizer, spec::SizeSpec},
};

/// App icon set export: one 1024×1024 source resized to every size of the chosen platforms.
#[derive(Clone, Debug)]
pub struct IconJob {
    source: SourceImage,
    platforms: Vec<Platform>,
    table: IconTable,
    resizer: BatchResizer,
}

impl IconJob {
    /// Job with the built-in size tables.
    pub fn new(source: SourceImage, platforms: impl IntoIterator<Item = Platform>) -> Self {
        let mut platforms: Vec<Platform> = platforms.into_iter().collect();
        platforms.sort();
        platforms.dedup();
        Self {
            source,
            platforms,
            table: IconTable::default(),
            resizer: BatchResizer::default(),
        }
    }

    /// Use a custom size table.
    pub fn with_table(mut self, table: IconTable) -> Self {
        self.table = table;
        self
    }

    /// Use a custom resizer.
    pub fn with_resizer(mut self, resizer: BatchResizer) -> Self {
        self.resizer = resizer;
        self
    }

    /// Every spec this job produces, platform by platform.
    pub fn specs(&self) -> ForgeResult<Vec<SizeSpec>> {
        let mut out = Vec::new();
        for &platform in &self.platforms {
            out.extend_from_slice(self.table.specs(platform)?);
        }
        Ok(out)
    }
}

impl ExportJob for IconJob {
    fn name(&self) -> &str {
        "icons"
    }

    fn archive_name(&self) -> String {
        match self.platforms.as_slice() {
            [single] => format!("{}-icons.zip", single.label().to_ascii_lowercase()),
            _ => "app-icons.zip".to_string(),
        }
    }

    fn validate(&self) -> ForgeResult<()> {
        if self.platforms.is_empty() {
            return Err(ForgeError::validation("select at least one platform"));
        }
        for spec in self.specs()? {
            spec.validate()?;
        }
        require_dimensions(self.source.bytes(), ICON_SOURCE_SIZE, ICON_SOURCE_SIZE)
    }

    fn process(&self, ctx: &mut RunContext) -> ForgeResult<()> {
        let specs = self.specs()?;
        let assets = self.resizer.resize_all(&self.source, &specs)?;
        for asset in assets {
            if ctx.record(asset.spec.path, Ok(asset.raster)).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/icons.rs"]
mod tests;
