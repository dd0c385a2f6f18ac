use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{compose::gradient::ColorStop, foundation::core::Rgba8};

/// Ordered list of layers; later layers draw over earlier ones.
#[derive(Clone, Debug, Default)]
pub struct LayerSpec {
    /// Layers in draw order.
    pub layers: Vec<Layer>,
}

impl LayerSpec {
    /// Empty spec (composes to a transparent canvas).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer, returning the stack for chaining.
    pub fn with(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Append a layer in place.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// One drawable layer.
#[derive(Clone, Debug)]
pub enum Layer {
    /// Full-canvas fill.
    Background(Fill),
    /// Rounded panel around the frame region; establishes the region later image layers use.
    Frame(FrameLayer),
    /// User image drawn inside the current frame region (or the whole canvas without a frame).
    Image(ImageLayer),
    /// Centered title/subtitle in the title area.
    Text(TextLayer),
}

/// Background fill kinds.
#[derive(Clone, Debug)]
pub enum Fill {
    /// Flat color.
    Solid(Rgba8),
    /// Gradient from the top-left to the bottom-right corner.
    LinearGradient(Vec<ColorStop>),
    /// Encoded image bytes drawn cover-fit.
    Image(Arc<Vec<u8>>),
}

/// Ratios that place the frame and title area on a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenLayout {
    /// Frame width as a fraction of canvas width.
    pub frame_width_ratio: f64,
    /// Title area height as a fraction of canvas height.
    pub title_area_ratio: f64,
    /// Preferred frame height / frame width.
    pub frame_aspect: f64,
    /// Fraction of the area below the title the frame may use at most.
    #[serde(default = "default_max_fill")]
    pub max_fill: f64,
}

fn default_max_fill() -> f64 {
    0.95
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            frame_width_ratio: 0.85,
            title_area_ratio: 0.18,
            frame_aspect: 2.16,
            max_fill: default_max_fill(),
        }
    }
}

/// Stroke settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Stroke width in pixels.
    pub width: f32,
}

/// Visual style of the frame panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    /// Panel margin around the frame region, in pixels.
    pub padding: f64,
    /// Corner radius of the outer panel.
    pub panel_radius: f64,
    /// Panel fill.
    pub panel_fill: Rgba8,
    /// Corner radius of the frame region (image clip).
    pub clip_radius: f64,
    /// Optional stroke along the outer panel edge.
    pub border: Option<StrokeStyle>,
    /// Fill of the frame region when no image is supplied.
    pub placeholder_fill: Rgba8,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            padding: 30.0,
            panel_radius: 44.0,
            panel_fill: Rgba8::white_alpha(0.8),
            clip_radius: 24.0,
            border: Some(StrokeStyle {
                color: Rgba8::white_alpha(0.3),
                width: 4.0,
            }),
            placeholder_fill: Rgba8::white_alpha(0.1),
        }
    }
}

/// Frame panel layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameLayer {
    /// Placement ratios.
    pub layout: ScreenLayout,
    /// Panel style.
    pub style: FrameStyle,
    /// Draw the empty-state fill inside the frame region.
    pub placeholder: bool,
}

/// Which edge stays visible when an image is taller than its frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPriority {
    /// Keep the top; overflow is cropped from the bottom.
    #[default]
    Top,
    /// Keep the bottom; overflow is cropped from the top.
    Bottom,
}

/// How an image is fitted into its target region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Preserve aspect ratio, fill the region, center, crop overflow.
    Cover,
    /// Fill the region width (or height when too short); tall images are shifted by `offset`
    /// pixels according to `priority`.
    Anchored {
        /// Edge to keep.
        priority: AnchorPriority,
        /// Vertical shift in pixels.
        offset: f64,
    },
}

impl Default for Placement {
    fn default() -> Self {
        Self::Anchored {
            priority: AnchorPriority::Top,
            offset: 0.0,
        }
    }
}

/// Image layer.
#[derive(Clone, Debug)]
pub struct ImageLayer {
    /// Encoded image bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Fitting policy.
    pub placement: Placement,
}

/// Typography of the title area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// CSS-style font family list.
    pub font_family: String,
    /// Title font size as a fraction of canvas width.
    pub title_scale: f64,
    /// Subtitle font size as a fraction of canvas width.
    pub subtitle_scale: f64,
    /// Distance from title to subtitle baseline, as a fraction of canvas width.
    pub subtitle_gap: f64,
    /// Title color.
    pub title_color: Rgba8,
    /// Subtitle color.
    pub subtitle_color: Rgba8,
    /// Title baseline as a fraction of the title area when a subtitle exists.
    pub title_position_with_subtitle: f64,
    /// Title baseline as a fraction of the title area without a subtitle.
    pub title_position_alone: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif"
                .to_string(),
            title_scale: 0.07,
            subtitle_scale: 0.04,
            subtitle_gap: 0.06,
            title_color: Rgba8::WHITE,
            subtitle_color: Rgba8::white_alpha(0.8),
            title_position_with_subtitle: 0.4,
            title_position_alone: 0.5,
        }
    }
}

/// Title and subtitle text layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayer {
    /// Bold headline; empty draws nothing.
    pub title: String,
    /// Secondary line; empty draws nothing.
    pub subtitle: String,
    /// Title area height as a fraction of canvas height.
    pub title_area_ratio: f64,
    /// Typography.
    pub style: TextStyle,
}
