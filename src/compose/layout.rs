//! Placement math for frames and images. All coordinates are canvas pixels (`f64`).

use crate::{
    compose::model::{AnchorPriority, Placement, ScreenLayout},
    foundation::core::{Rect, Size},
};

const EPS: f64 = 1e-9;

/// Resolved frame geometry on a concrete canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGeometry {
    /// Height of the title area at the top of the canvas.
    pub title_area: f64,
    /// Frame region (image clip area).
    pub frame: Rect,
}

/// Place the frame region below the title area, horizontally centered.
///
/// The frame keeps `frame_aspect` unless that would exceed `max_fill` of the space left under
/// the title; it is then shortened and stays centered vertically in that space.
pub fn frame_geometry(width: u32, height: u32, layout: &ScreenLayout) -> FrameGeometry {
    let (w, h) = (f64::from(width), f64::from(height));
    let title_area = h * layout.title_area_ratio;
    let remaining = h - title_area;
    let frame_w = w * layout.frame_width_ratio;
    let frame_h = (frame_w * layout.frame_aspect).min(remaining * layout.max_fill);
    let x = w / 2.0 - frame_w / 2.0;
    let y = title_area + (remaining - frame_h) / 2.0;
    FrameGeometry {
        title_area,
        frame: Rect::new(x, y, x + frame_w, y + frame_h),
    }
}

/// Scale `src` to cover `dst` (aspect preserved), centered on both axes.
pub fn cover_fit(src: Size, dst: Rect) -> Rect {
    let scale = (dst.width() / src.width).max(dst.height() / src.height);
    let draw_w = src.width * scale;
    let draw_h = src.height * scale;
    let x = dst.x0 + (dst.width() - draw_w) / 2.0;
    let y = dst.y0 + (dst.height() - draw_h) / 2.0;
    Rect::new(x, y, x + draw_w, y + draw_h)
}

/// Destination rectangle of an image of size `src` inside `frame`.
pub fn place_image(src: Size, frame: Rect, placement: Placement) -> Rect {
    match placement {
        Placement::Cover => cover_fit(src, frame),
        Placement::Anchored { priority, offset } => anchored(src, frame, priority, offset),
    }
}

fn anchored(src: Size, frame: Rect, priority: AnchorPriority, offset: f64) -> Rect {
    let ratio = src.width / src.height;
    let mut draw_w = frame.width();
    let mut draw_h = draw_w / ratio;
    if draw_h < frame.height() {
        draw_h = frame.height();
        draw_w = draw_h * ratio;
    }

    let x = frame.x0 + (frame.width() - draw_w) / 2.0;
    let y = if draw_h > frame.height() + EPS {
        match priority {
            AnchorPriority::Bottom => frame.y1 - draw_h + offset,
            AnchorPriority::Top => frame.y0 - offset,
        }
    } else {
        frame.y0
    };
    Rect::new(x, y, x + draw_w, y + draw_h)
}

/// Title and subtitle baselines for a canvas `width` wide with a `title_area` px title band.
pub(crate) fn text_baselines(
    width: f64,
    title_area: f64,
    has_subtitle: bool,
    with_subtitle: f64,
    alone: f64,
    subtitle_gap: f64,
) -> (f64, f64) {
    let title_y = if has_subtitle {
        title_area * with_subtitle
    } else {
        title_area * alone
    };
    (title_y, title_y + width * subtitle_gap)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layout.rs"]
mod tests;
