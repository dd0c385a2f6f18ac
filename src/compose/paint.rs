//! Bridges between crate types and the tiny-skia canvas.

use resvg::tiny_skia;

use crate::foundation::{
    core::{Raster, Rect, Rgba8, RoundedRect},
    error::{ForgeError, ForgeResult},
    math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
};

pub(crate) fn color(c: Rgba8) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn solid_paint(c: Rgba8) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(color(c));
    paint.anti_alias = true;
    paint
}

pub(crate) fn new_pixmap(width: u32, height: u32) -> ForgeResult<tiny_skia::Pixmap> {
    tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ForgeError::validation(format!("cannot allocate {width}x{height} canvas")))
}

pub(crate) fn raster_to_pixmap(raster: &Raster) -> ForgeResult<tiny_skia::Pixmap> {
    let size = tiny_skia::IntSize::from_wh(raster.width(), raster.height())
        .ok_or_else(|| ForgeError::pixel_read("raster has zero size"))?;
    let mut data = raster.data().to_vec();
    premultiply_rgba8_in_place(&mut data);
    tiny_skia::Pixmap::from_vec(data, size)
        .ok_or_else(|| ForgeError::pixel_read("raster buffer does not match its size"))
}

pub(crate) fn pixmap_to_raster(pixmap: tiny_skia::Pixmap) -> ForgeResult<Raster> {
    let (w, h) = (pixmap.width(), pixmap.height());
    let mut data = pixmap.take();
    unpremultiply_rgba8_in_place(&mut data);
    Raster::from_rgba8(w, h, data)
}

pub(crate) fn rounded_rect_path(rect: Rect, radius: f64) -> Option<tiny_skia::Path> {
    use kurbo::{PathEl, Shape};

    let radius = radius.max(0.0).min(rect.width().min(rect.height()) / 2.0);
    let rr = RoundedRect::from_rect(rect, radius);
    let pt = |p: kurbo::Point| (p.x as f32, p.y as f32);

    let mut pb = tiny_skia::PathBuilder::new();
    for el in rr.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => {
                let (x, y) = pt(p);
                pb.move_to(x, y);
            }
            PathEl::LineTo(p) => {
                let (x, y) = pt(p);
                pb.line_to(x, y);
            }
            PathEl::QuadTo(p1, p2) => {
                let ((x1, y1), (x, y)) = (pt(p1), pt(p2));
                pb.quad_to(x1, y1, x, y);
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let ((x1, y1), (x2, y2), (x, y)) = (pt(p1), pt(p2), pt(p3));
                pb.cubic_to(x1, y1, x2, y2, x, y);
            }
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

pub(crate) fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
}

/// Mask covering `path`, sized to the canvas.
pub(crate) fn clip_mask(width: u32, height: u32, path: &tiny_skia::Path) -> ForgeResult<tiny_skia::Mask> {
    let mut mask = tiny_skia::Mask::new(width, height)
        .ok_or_else(|| ForgeError::validation(format!("cannot allocate {width}x{height} mask")))?;
    mask.fill_path(
        path,
        tiny_skia::FillRule::Winding,
        true,
        tiny_skia::Transform::identity(),
    );
    Ok(mask)
}
