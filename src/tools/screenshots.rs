//! App Store screenshot export.
//!
//! Each group holds up to four device screenshots plus per-family captions. Every populated slot
//! becomes one composed canvas: gradient background, framed screenshot, centered caption.

use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    assets::source::SourceImage,
    compose::{
        compositor::Compositor,
        gradient::ColorStop,
        model::{
            AnchorPriority, Fill, FrameLayer, FrameStyle, ImageLayer, Layer, LayerSpec, Placement,
            ScreenLayout, TextLayer, TextStyle,
        },
    },
    foundation::error::{ForgeError, ForgeResult},
    pipeline::export::{ExportJob, RunContext},
    presets::{
        Presets,
        screens::{DeviceFamily, DeviceScreen, ScreenSlot, ScreenTable},
        style::StylePresets,
    },
};

/// Most groups a single export accepts.
pub const MAX_GROUPS: usize = 6;

/// Default vertical shift applied to screenshots taller than their frame.
pub const DEFAULT_OFFSET: f64 = 88.0;

fn default_offset() -> f64 {
    DEFAULT_OFFSET
}

/// Caption and placement settings for one device family of a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Headline.
    #[serde(default)]
    pub title: String,
    /// Secondary line.
    #[serde(default)]
    pub subtitle: String,
    /// Keep the bottom of tall screenshots visible instead of the top.
    #[serde(default)]
    pub bottom_priority: bool,
    /// Vertical shift in pixels for screenshots taller than the frame.
    #[serde(default = "default_offset")]
    pub offset: f64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            bottom_priority: false,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl DeviceConfig {
    fn placement(&self) -> Placement {
        Placement::Anchored {
            priority: if self.bottom_priority {
                AnchorPriority::Bottom
            } else {
                AnchorPriority::Top
            },
            offset: self.offset,
        }
    }
}

/// One set of device screenshots sharing captions.
#[derive(Clone, Debug, Default)]
pub struct ScreenshotGroup {
    /// Captions for iPhone slots.
    pub iphone: DeviceConfig,
    /// Captions for iPad slots.
    pub ipad: DeviceConfig,
    /// Populated slots.
    pub screens: BTreeMap<ScreenSlot, SourceImage>,
}

impl ScreenshotGroup {
    /// Set the screenshot of `slot`, returning the group for chaining.
    pub fn with_screen(mut self, slot: ScreenSlot, source: SourceImage) -> Self {
        self.screens.insert(slot, source);
        self
    }

    /// Whether no slot has an image.
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Caption settings for `family`.
    pub fn config(&self, family: DeviceFamily) -> &DeviceConfig {
        match family {
            DeviceFamily::Iphone => &self.iphone,
            DeviceFamily::Ipad => &self.ipad,
        }
    }
}

/// Shared look of every screenshot in an export.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenshotStyle {
    /// Background gradient stops.
    pub gradient: Vec<ColorStop>,
    /// Title area height as a fraction of canvas height.
    pub title_area_ratio: f64,
    /// Frame width as a fraction of canvas width.
    pub frame_width_ratio: f64,
    /// Frame panel look.
    pub frame: FrameStyle,
    /// Caption typography.
    pub text: TextStyle,
}

impl ScreenshotStyle {
    /// Resolve preset names (`"Earth"`, `"Medium"`, `"Wide"`).
    pub fn from_presets(
        presets: &StylePresets,
        color: &str,
        title_area: &RatioChoice,
        frame_width: &RatioChoice,
    ) -> ForgeResult<Self> {
        Ok(Self {
            gradient: presets.color(color)?.stops()?,
            title_area_ratio: title_area.resolve(|n| presets.title_area(n))?,
            frame_width_ratio: frame_width.resolve(|n| presets.frame_width(n))?,
            frame: FrameStyle::default(),
            text: TextStyle::default(),
        })
    }

    fn validate(&self) -> ForgeResult<()> {
        for (what, v) in [
            ("title area ratio", self.title_area_ratio),
            ("frame width ratio", self.frame_width_ratio),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ForgeError::validation(format!(
                    "{what} must be in [0, 1], got {v}"
                )));
            }
        }
        if self.gradient.is_empty() {
            return Err(ForgeError::validation("background gradient has no stops"));
        }
        Ok(())
    }
}

impl Default for ScreenshotStyle {
    fn default() -> Self {
        let presets = StylePresets::default();
        Self {
            gradient: presets
                .colors
                .first()
                .and_then(|c| c.stops().ok())
                .unwrap_or_default(),
            title_area_ratio: 0.18,
            frame_width_ratio: 0.85,
            frame: FrameStyle::default(),
            text: TextStyle::default(),
        }
    }
}

/// Preset name or explicit ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatioChoice {
    /// Preset name.
    Named(String),
    /// Explicit value.
    Value(f64),
}

impl RatioChoice {
    fn resolve(&self, lookup: impl Fn(&str) -> ForgeResult<f64>) -> ForgeResult<f64> {
        match self {
            Self::Named(name) => lookup(name),
            Self::Value(v) => Ok(*v),
        }
    }
}

/// One planned output of a [`ScreenshotJob`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedScreenshot {
    /// Archive path.
    pub path: String,
    /// Index into the job's groups.
    pub group: usize,
    /// Slot within the group.
    pub slot: ScreenSlot,
}

/// Screenshot export over several groups.
#[derive(Clone, Debug)]
pub struct ScreenshotJob {
    groups: Vec<ScreenshotGroup>,
    style: ScreenshotStyle,
    screens: ScreenTable,
    compositor: Compositor,
}

impl ScreenshotJob {
    /// Job with default screens and compositor.
    pub fn new(groups: Vec<ScreenshotGroup>, style: ScreenshotStyle) -> Self {
        Self {
            groups,
            style,
            screens: ScreenTable::default(),
            compositor: Compositor::default(),
        }
    }

    /// Use a custom screen table.
    pub fn with_screens(mut self, screens: ScreenTable) -> Self {
        self.screens = screens;
        self
    }

    /// Use a preconfigured compositor (custom font directories).
    pub fn with_compositor(mut self, compositor: Compositor) -> Self {
        self.compositor = compositor;
        self
    }

    /// Groups of this job.
    pub fn groups(&self) -> &[ScreenshotGroup] {
        &self.groups
    }

    /// Outputs in export order. Empty groups are skipped; the k-th populated group (k ≥ 2)
    /// gets a `-k` suffix so paths never collide.
    pub fn plan(&self) -> ForgeResult<Vec<PlannedScreenshot>> {
        let mut out = Vec::new();
        let populated = self.groups.iter().enumerate().filter(|(_, g)| !g.is_empty());
        for (ordinal, (group_idx, group)) in populated.enumerate() {
            for &slot in group.screens.keys() {
                let screen = self.screens.get(slot)?;
                out.push(PlannedScreenshot {
                    path: numbered_path(&screen.path, ordinal + 1),
                    group: group_idx,
                    slot,
                });
            }
        }
        Ok(out)
    }

    /// Layer stack for one slot of `group`; a missing screenshot draws the empty frame state.
    pub fn layer_spec(
        &self,
        group: &ScreenshotGroup,
        screen: &DeviceScreen,
        image: Option<&SourceImage>,
    ) -> LayerSpec {
        let config = group.config(screen.slot.family());
        let mut spec = LayerSpec::new()
            .with(Layer::Background(Fill::LinearGradient(self.style.gradient.clone())))
            .with(Layer::Frame(FrameLayer {
                layout: ScreenLayout {
                    frame_width_ratio: self.style.frame_width_ratio,
                    title_area_ratio: self.style.title_area_ratio,
                    frame_aspect: screen.frame_aspect,
                    ..ScreenLayout::default()
                },
                style: self.style.frame,
                placeholder: image.is_none(),
            }));
        if let Some(src) = image {
            spec.push(Layer::Image(ImageLayer {
                bytes: src.shared_bytes(),
                placement: config.placement(),
            }));
        }
        spec.with(Layer::Text(TextLayer {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            title_area_ratio: self.style.title_area_ratio,
            style: self.style.text.clone(),
        }))
    }
}

/// `iPhone/6.7-inch.png` for the first group, `iPhone/6.7-inch-2.png` for the second, ...
fn numbered_path(path: &str, ordinal: usize) -> String {
    if ordinal <= 1 {
        return path.to_string();
    }
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    };
    let file = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{ordinal}.{ext}"),
        _ => format!("{file}-{ordinal}"),
    };
    match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file,
    }
}

impl ExportJob for ScreenshotJob {
    fn name(&self) -> &str {
        "screenshots"
    }

    fn validate(&self) -> ForgeResult<()> {
        if self.groups.len() > MAX_GROUPS {
            return Err(ForgeError::validation(format!(
                "at most {MAX_GROUPS} screenshot groups are supported, got {}",
                self.groups.len()
            )));
        }
        if self.groups.iter().all(ScreenshotGroup::is_empty) {
            return Err(ForgeError::validation("add at least one screenshot"));
        }
        for group in &self.groups {
            for cfg in [&group.iphone, &group.ipad] {
                if !cfg.offset.is_finite() {
                    return Err(ForgeError::validation("screenshot offset must be finite"));
                }
            }
        }
        self.screens.validate()?;
        self.style.validate()
    }

    fn process(&self, ctx: &mut RunContext) -> ForgeResult<()> {
        for planned in self.plan()? {
            if ctx.check().is_break() {
                break;
            }
            let group = &self.groups[planned.group];
            let screen = self.screens.get(planned.slot)?;
            let spec = self.layer_spec(group, screen, group.screens.get(&planned.slot));
            let raster = self.compositor.compose(&spec, screen.width, screen.height);
            if ctx.record(planned.path, raster).is_break() {
                break;
            }
        }
        Ok(())
    }
}

/// JSON description of a screenshot export; image paths are relative to the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotManifest {
    /// Color preset name.
    #[serde(default = "default_color")]
    pub color: String,
    /// Title-area preset name or ratio.
    #[serde(default = "default_title_area")]
    pub title_area: RatioChoice,
    /// Frame-width preset name or ratio.
    #[serde(default = "default_frame_width")]
    pub frame_width: RatioChoice,
    /// Groups in order.
    #[serde(default)]
    pub groups: Vec<ManifestGroup>,
}

/// One group of a [`ScreenshotManifest`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestGroup {
    /// iPhone captions.
    #[serde(default)]
    pub iphone: DeviceConfig,
    /// iPad captions.
    #[serde(default)]
    pub ipad: DeviceConfig,
    /// Image path per slot.
    #[serde(default)]
    pub screens: BTreeMap<ScreenSlot, PathBuf>,
}

fn default_color() -> String {
    "Earth".to_string()
}

fn default_title_area() -> RatioChoice {
    RatioChoice::Named("Medium".to_string())
}

fn default_frame_width() -> RatioChoice {
    RatioChoice::Named("Medium".to_string())
}

impl ScreenshotManifest {
    /// Parse a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ForgeError::validation(format!("open screenshot manifest '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ForgeError::serde(format!("parse screenshot manifest JSON: {e}")))
    }

    /// Load every referenced image (relative to `base_dir`) and build the job.
    pub fn into_job(self, base_dir: &Path, presets: &Presets) -> ForgeResult<ScreenshotJob> {
        let style = ScreenshotStyle::from_presets(
            &presets.style,
            &self.color,
            &self.title_area,
            &self.frame_width,
        )?;
        let mut groups = Vec::with_capacity(self.groups.len());
        for g in self.groups {
            let mut group = ScreenshotGroup {
                iphone: g.iphone,
                ipad: g.ipad,
                screens: BTreeMap::new(),
            };
            for (slot, rel) in g.screens {
                let source = SourceImage::from_path(base_dir.join(rel))?;
                group.screens.insert(slot, source);
            }
            groups.push(group);
        }
        Ok(ScreenshotJob::new(groups, style).with_screens(presets.screens.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/screenshots.rs"]
mod tests;
