use resvg::tiny_skia;

use crate::{
    assets::decode::decode_image,
    compose::{
        gradient::ColorStop,
        layout::{cover_fit, frame_geometry, place_image, text_baselines},
        model::{Fill, FrameLayer, ImageLayer, Layer, LayerSpec, StrokeStyle, TextLayer},
        paint,
        text::{TextRenderer, TextRun},
    },
    foundation::{
        core::{Raster, Rect, Size},
        error::{ForgeError, ForgeResult},
    },
};

/// Draws a [`LayerSpec`] onto a fresh transparent canvas.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    text: TextRenderer,
}

impl Compositor {
    /// Compositor with system fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compositor using a preconfigured text renderer.
    pub fn with_text_renderer(text: TextRenderer) -> Self {
        Self { text }
    }

    /// Text renderer used for [`Layer::Text`].
    pub fn text_renderer(&self) -> &TextRenderer {
        &self.text
    }

    /// Render `spec` at exactly `width × height`.
    ///
    /// A layer whose image bytes cannot be decoded aborts the composition with
    /// [`ForgeError::LayerDecode`].
    #[tracing::instrument(level = "debug", skip(self, spec), fields(layers = spec.len()))]
    pub fn compose(&self, spec: &LayerSpec, width: u32, height: u32) -> ForgeResult<Raster> {
        if width == 0 || height == 0 {
            return Err(ForgeError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }

        let mut canvas = Canvas {
            pixmap: paint::new_pixmap(width, height)?,
            frame: None,
            pending_border: None,
            text: &self.text,
        };

        let mut layers = spec.layers.iter().peekable();
        while let Some(layer) = layers.next() {
            let image_follows = matches!(layers.peek(), Some(Layer::Image(_)));
            if !matches!(layer, Layer::Image(_)) {
                canvas.flush_border();
            }
            match layer {
                Layer::Background(fill) => canvas.background(fill)?,
                Layer::Frame(frame) => canvas.frame(frame, image_follows)?,
                Layer::Image(image) => {
                    canvas.image(image)?;
                    canvas.flush_border();
                }
                Layer::Text(text) => canvas.text(text)?,
            }
        }
        canvas.flush_border();

        paint::pixmap_to_raster(canvas.pixmap)
    }
}

/// Convenience wrapper around [`Compositor::compose`] with a default compositor.
pub fn compose(spec: &LayerSpec, width: u32, height: u32) -> ForgeResult<Raster> {
    Compositor::default().compose(spec, width, height)
}

#[derive(Clone, Copy, Debug)]
struct ActiveFrame {
    rect: Rect,
    clip_radius: f64,
}

struct Canvas<'a> {
    pixmap: tiny_skia::Pixmap,
    frame: Option<ActiveFrame>,
    pending_border: Option<(tiny_skia::Path, StrokeStyle)>,
    text: &'a TextRenderer,
}

impl Canvas<'_> {
    fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.pixmap.width()),
            f64::from(self.pixmap.height()),
        )
    }

    fn background(&mut self, fill: &Fill) -> ForgeResult<()> {
        let bounds = self.bounds();
        let Some(rect) = paint::skia_rect(bounds) else {
            return Ok(());
        };
        match fill {
            Fill::Solid(color) => {
                let p = paint::solid_paint(*color);
                self.pixmap
                    .fill_rect(rect, &p, tiny_skia::Transform::identity(), None);
            }
            Fill::LinearGradient(stops) => {
                let p = gradient_paint(stops, bounds)?;
                self.pixmap
                    .fill_rect(rect, &p, tiny_skia::Transform::identity(), None);
            }
            Fill::Image(bytes) => {
                let raster = decode_layer(bytes)?;
                let dest = cover_fit(raster_size(&raster), bounds);
                self.draw_raster(&raster, dest, None)?;
            }
        }
        Ok(())
    }

    fn frame(&mut self, frame: &FrameLayer, image_follows: bool) -> ForgeResult<()> {
        let geom = frame_geometry(self.pixmap.width(), self.pixmap.height(), &frame.layout);
        let style = &frame.style;
        let panel = geom.frame.inflate(style.padding, style.padding);

        if let Some(path) = paint::rounded_rect_path(panel, style.panel_radius) {
            self.pixmap.fill_path(
                &path,
                &paint::solid_paint(style.panel_fill),
                tiny_skia::FillRule::Winding,
                tiny_skia::Transform::identity(),
                None,
            );
            if let Some(border) = style.border {
                self.pending_border = Some((path, border));
            }
        }

        if frame.placeholder
            && let Some(path) = paint::rounded_rect_path(geom.frame, style.clip_radius)
        {
            self.pixmap.fill_path(
                &path,
                &paint::solid_paint(style.placeholder_fill),
                tiny_skia::FillRule::Winding,
                tiny_skia::Transform::identity(),
                None,
            );
        }

        self.frame = Some(ActiveFrame {
            rect: geom.frame,
            clip_radius: style.clip_radius,
        });
        // The border only outlines a screenshot; empty frames get none.
        if !image_follows {
            self.pending_border = None;
        }
        Ok(())
    }

    fn image(&mut self, image: &ImageLayer) -> ForgeResult<()> {
        let raster = decode_layer(&image.bytes)?;
        let (target, radius) = match self.frame {
            Some(f) => (f.rect, f.clip_radius),
            None => (self.bounds(), 0.0),
        };
        let dest = place_image(raster_size(&raster), target, image.placement);
        let clip = paint::rounded_rect_path(target, radius);
        self.draw_raster(&raster, dest, clip.as_ref())
    }

    fn text(&mut self, layer: &TextLayer) -> ForgeResult<()> {
        let width = f64::from(self.pixmap.width());
        let title_area = f64::from(self.pixmap.height()) * layer.title_area_ratio;
        let style = &layer.style;
        let has_subtitle = !layer.subtitle.trim().is_empty();
        let (title_y, subtitle_y) = text_baselines(
            width,
            title_area,
            has_subtitle,
            style.title_position_with_subtitle,
            style.title_position_alone,
            style.subtitle_gap,
        );

        let runs = [
            TextRun {
                text: layer.title.clone(),
                center_x: width / 2.0,
                baseline: title_y,
                font_size: (width * style.title_scale).round(),
                bold: true,
                color: style.title_color,
                family: style.font_family.clone(),
            },
            TextRun {
                text: layer.subtitle.clone(),
                center_x: width / 2.0,
                baseline: subtitle_y,
                font_size: (width * style.subtitle_scale).round(),
                bold: false,
                color: style.subtitle_color,
                family: style.font_family.clone(),
            },
        ];
        self.text.draw(&mut self.pixmap, &runs)
    }

    fn flush_border(&mut self) {
        let Some((path, border)) = self.pending_border.take() else {
            return;
        };
        let stroke = tiny_skia::Stroke {
            width: border.width,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint::solid_paint(border.color),
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    /// Draw `raster` scaled into `dest`, optionally clipped to `clip`.
    fn draw_raster(
        &mut self,
        raster: &Raster,
        dest: Rect,
        clip: Option<&tiny_skia::Path>,
    ) -> ForgeResult<()> {
        let visible = dest.intersect(self.bounds());
        let Some(fill_rect) = paint::skia_rect(visible) else {
            return Ok(());
        };

        let src = paint::raster_to_pixmap(raster)?;
        let sx = (dest.width() / f64::from(raster.width())) as f32;
        let sy = (dest.height() / f64::from(raster.height())) as f32;
        let shader = tiny_skia::Pattern::new(
            src.as_ref(),
            tiny_skia::SpreadMode::Pad,
            tiny_skia::FilterQuality::Bicubic,
            1.0,
            tiny_skia::Transform::from_row(sx, 0.0, 0.0, sy, dest.x0 as f32, dest.y0 as f32),
        );
        let mut p = tiny_skia::Paint {
            shader,
            ..Default::default()
        };
        p.anti_alias = true;

        let mask = match clip {
            Some(path) => Some(paint::clip_mask(
                self.pixmap.width(),
                self.pixmap.height(),
                path,
            )?),
            None => None,
        };
        self.pixmap.fill_rect(
            fill_rect,
            &p,
            tiny_skia::Transform::identity(),
            mask.as_ref(),
        );
        Ok(())
    }
}

fn gradient_paint(stops: &[ColorStop], bounds: Rect) -> ForgeResult<tiny_skia::Paint<'static>> {
    let stops: Vec<tiny_skia::GradientStop> = stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.offset, paint::color(s.color)))
        .collect();
    let shader = tiny_skia::LinearGradient::new(
        tiny_skia::Point::from_xy(bounds.x0 as f32, bounds.y0 as f32),
        tiny_skia::Point::from_xy(bounds.x1 as f32, bounds.y1 as f32),
        stops,
        tiny_skia::SpreadMode::Pad,
        tiny_skia::Transform::identity(),
    )
    .ok_or_else(|| ForgeError::validation("gradient needs at least one color stop"))?;
    Ok(tiny_skia::Paint {
        shader,
        anti_alias: true,
        ..Default::default()
    })
}

fn decode_layer(bytes: &[u8]) -> ForgeResult<Raster> {
    decode_image(bytes).map_err(|err| ForgeError::layer_decode(err.to_string()))
}

fn raster_size(raster: &Raster) -> Size {
    Size::new(f64::from(raster.width()), f64::from(raster.height()))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
