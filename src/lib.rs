//! assetforge turns source images into sized, store-ready assets.
//!
//! Every tool is an [`ExportJob`] driven by an [`ExportPipeline`]:
//!
//! - [`IconJob`] resizes a 1024×1024 source into per-platform icon sets
//! - [`ScreenshotJob`] composites framed App Store screenshots with titles
//! - [`CropJob`] trims transparent margins off PNG files
//! - [`SnapshotJob`] trims 3D mockup renders; [`BackgroundJob`] draws low-poly backgrounds
//!
//! The building blocks ([`scan()`], [`compose()`], [`BatchResizer`], [`assemble`]) are usable on
//! their own.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod archive;
pub(crate) mod assets;
pub(crate) mod compose;
pub(crate) mod pipeline;
pub(crate) mod presets;
pub(crate) mod resize;
pub(crate) mod scan;
pub(crate) mod tools;

pub use crate::foundation::core::{Point, Raster, Rect, Rgba8, RoundedRect, Size};
pub use crate::foundation::error::{ForgeError, ForgeResult};

pub use crate::archive::zip::{ArchiveBlob, ArchiveEntry, assemble, extract, normalize_entry_path};
pub use crate::assets::decode::{decode_image, encode_png, read_dimensions, sniff_format};
pub use crate::assets::source::SourceImage;
pub use crate::assets::validate::{ICON_SOURCE_SIZE, require_dimensions, require_png};
pub use crate::compose::compositor::{Compositor, compose};
pub use crate::compose::gradient::{ColorStop, parse_color, parse_css_linear_gradient};
pub use crate::compose::layout::{FrameGeometry, cover_fit, frame_geometry, place_image};
pub use crate::compose::model::{
    AnchorPriority, Fill, FrameLayer, FrameStyle, ImageLayer, Layer, LayerSpec, Placement,
    ScreenLayout, StrokeStyle, TextLayer, TextStyle,
};
pub use crate::compose::text::TextRenderer;
pub use crate::pipeline::export::{
    Deliverable, ExportJob, ExportOutcome, ExportPipeline, Packaging, PipelineState, RunContext,
};
pub use crate::pipeline::result::{ExportResult, ExportSummary, OutputFailure};
pub use crate::pipeline::session::ExportSession;
pub use crate::presets::Presets;
pub use crate::presets::background::{BackgroundPresets, BackgroundSize, ColorTheme};
pub use crate::presets::icons::{IconTable, Platform};
pub use crate::presets::screens::{DeviceFamily, DeviceScreen, ScreenSlot, ScreenTable};
pub use crate::presets::style::{ColorPreset, RatioPreset, StylePresets};
pub use crate::resize::batch::{BatchResizer, ResizeFilter, ResizeThreading, ResizedAsset};
pub use crate::resize::spec::SizeSpec;
pub use crate::scan::bounds::{AlphaThreshold, BoundingBox, ScanOpts, scan};
pub use crate::scan::trim::{TrimMode, crop, trim};
pub use crate::tools::background::{BackgroundJob, MAX_EDGE, PolygonSpec, render_polygons};
pub use crate::tools::cropper::CropJob;
pub use crate::tools::icons::IconJob;
pub use crate::tools::mockup::{
    MockupPreset, PresetStore, PresetValues, SCREEN_CORNER_RATIO, SNAPSHOT_PADDING, SnapshotJob,
    round_corners,
};
pub use crate::tools::screenshots::{
    DEFAULT_OFFSET, DeviceConfig, MAX_GROUPS, ManifestGroup, PlannedScreenshot, RatioChoice,
    ScreenshotGroup, ScreenshotJob, ScreenshotManifest, ScreenshotStyle,
};
