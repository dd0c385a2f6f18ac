//! Mockup helpers around an external 3D renderer: screen texture preparation, snapshot trimming
//! and saved camera presets.

use std::path::{Path, PathBuf};

use anyhow::Context;
use resvg::tiny_skia;
use serde::{Deserialize, Serialize};

use crate::{
    assets::source::SourceImage,
    compose::paint,
    foundation::{
        core::Raster,
        error::{ForgeError, ForgeResult},
    },
    pipeline::export::{ExportJob, Packaging, RunContext},
    scan::{
        bounds::{AlphaThreshold, ScanOpts},
        trim::{TrimMode, trim},
    },
};

/// Corner radius of screen textures as a fraction of the smaller side.
pub const SCREEN_CORNER_RATIO: f32 = 0.18;

/// Margin kept around trimmed snapshots.
pub const SNAPSHOT_PADDING: u32 = 20;

/// Clip `raster` to a rounded rectangle whose radius is `ratio × min(width, height)`.
///
/// Corners are quadratic curves with the control point on the corner, so the result matches
/// textures prepared for the device model.
pub fn round_corners(raster: &Raster, ratio: f32) -> ForgeResult<Raster> {
    let (w, h) = (raster.width() as f32, raster.height() as f32);
    let r = (w.min(h) * ratio.clamp(0.0, 0.5)).max(0.0);

    let mut pb = tiny_skia::PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(w - r, 0.0);
    pb.quad_to(w, 0.0, w, r);
    pb.line_to(w, h - r);
    pb.quad_to(w, h, w - r, h);
    pb.line_to(r, h);
    pb.quad_to(0.0, h, 0.0, h - r);
    pb.line_to(0.0, r);
    pb.quad_to(0.0, 0.0, r, 0.0);
    pb.close();
    let path = pb
        .finish()
        .ok_or_else(|| ForgeError::validation("cannot build rounded clip path"))?;

    let src = paint::raster_to_pixmap(raster)?;
    let mask = paint::clip_mask(raster.width(), raster.height(), &path)?;
    let mut out = paint::new_pixmap(raster.width(), raster.height())?;
    out.draw_pixmap(
        0,
        0,
        src.as_ref(),
        &tiny_skia::PixmapPaint::default(),
        tiny_skia::Transform::identity(),
        Some(&mask),
    );
    paint::pixmap_to_raster(out)
}

/// Exports a rendered mockup snapshot trimmed to its visible content.
#[derive(Clone, Debug)]
pub struct SnapshotJob {
    snapshot: SourceImage,
    opts: ScanOpts,
    file_name: String,
}

impl SnapshotJob {
    /// Trim with alpha threshold 10 and 20 px padding, delivered as `phone-showcase.png`.
    pub fn new(snapshot: SourceImage) -> Self {
        Self {
            snapshot,
            opts: ScanOpts::new(AlphaThreshold::EXPORT_TRIM, SNAPSHOT_PADDING),
            file_name: "phone-showcase.png".to_string(),
        }
    }

    /// Override the output file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Override threshold and padding.
    pub fn with_opts(mut self, opts: ScanOpts) -> Self {
        self.opts = opts;
        self
    }
}

impl ExportJob for SnapshotJob {
    fn name(&self) -> &str {
        "mockup"
    }

    fn packaging(&self) -> Packaging {
        Packaging::SingleWhenAlone
    }

    fn validate(&self) -> ForgeResult<()> {
        self.snapshot.dimensions().map(|_| ())
    }

    fn process(&self, ctx: &mut RunContext) -> ForgeResult<()> {
        if ctx.check().is_break() {
            return Ok(());
        }
        let raster = self.snapshot.decode()?;
        let trimmed = trim(&raster, self.opts, TrimMode::Strict);
        if ctx.record(self.file_name.clone(), trimmed).is_break() {
            tracing::debug!("snapshot export invalidated");
        }
        Ok(())
    }
}

/// Camera and model pose of a saved preset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetValues {
    /// Camera distance.
    pub zoom: f64,
    /// Horizontal model offset.
    pub pos_x: f64,
    /// Vertical model offset.
    pub pos_y: f64,
    /// Rotation around X (radians).
    pub rot_x: f64,
    /// Rotation around Y (radians).
    pub rot_y: f64,
    /// Rotation around Z (radians).
    pub rot_z: f64,
}

/// Named view preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MockupPreset {
    /// Unique name.
    pub name: String,
    /// Pose values.
    pub values: PresetValues,
}

/// Presets persisted as a JSON array file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresetStore {
    path: Option<PathBuf>,
    presets: Vec<MockupPreset>,
}

impl PresetStore {
    /// In-memory store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file yields an empty store bound to that path.
    pub fn open(path: impl Into<PathBuf>) -> ForgeResult<Self> {
        let path = path.into();
        let presets = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read presets '{}'", path.display()))?;
            Self::parse(&text)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path: Some(path),
            presets,
        })
    }

    fn parse(text: &str) -> ForgeResult<Vec<MockupPreset>> {
        let presets: Vec<MockupPreset> = serde_json::from_str(text)
            .map_err(|e| ForgeError::serde(format!("parse mockup presets JSON: {e}")))?;
        for p in &presets {
            if p.name.trim().is_empty() {
                return Err(ForgeError::validation("mockup preset name must be non-empty"));
            }
        }
        Ok(presets)
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Presets in insertion order.
    pub fn list(&self) -> &[MockupPreset] {
        &self.presets
    }

    /// Preset by exact name.
    pub fn get(&self, name: &str) -> Option<&MockupPreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Insert or replace by name.
    pub fn upsert(&mut self, preset: MockupPreset) -> ForgeResult<()> {
        if preset.name.trim().is_empty() {
            return Err(ForgeError::validation("mockup preset name must be non-empty"));
        }
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
        Ok(())
    }

    /// Remove by name. Returns whether a preset was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name);
        self.presets.len() != before
    }

    /// Pretty JSON array.
    pub fn to_json(&self) -> ForgeResult<String> {
        serde_json::to_string_pretty(&self.presets)
            .map_err(|e| ForgeError::serde(format!("serialize mockup presets: {e}")))
    }

    /// Write back to the backing file. In-memory stores are left untouched.
    pub fn save(&self) -> ForgeResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("write presets '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), count = self.presets.len(), "mockup presets saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/mockup.rs"]
mod tests;
