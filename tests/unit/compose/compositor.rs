use std::sync::Arc;

use super::*;
use crate::{
    assets::decode::encode_png,
    compose::model::{AnchorPriority, FrameStyle, Placement, ScreenLayout},
    foundation::core::Rgba8,
};

fn png_of(width: u32, height: u32, row_color: impl Fn(u32) -> Rgba8) -> Arc<Vec<u8>> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let c = row_color(y);
        for _ in 0..width {
            data.extend_from_slice(&c.to_array());
        }
    }
    let raster = Raster::from_rgba8(width, height, data).unwrap();
    Arc::new(encode_png(&raster).unwrap())
}

fn close(a: Rgba8, b: Rgba8) -> bool {
    let d = |x: u8, y: u8| (i16::from(x) - i16::from(y)).abs() <= 8;
    d(a.r, b.r) && d(a.g, b.g) && d(a.b, b.b) && d(a.a, b.a)
}

const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
const GREEN: Rgba8 = Rgba8::new(0, 255, 0, 255);
const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 255);

fn test_frame() -> FrameLayer {
    FrameLayer {
        layout: ScreenLayout {
            frame_width_ratio: 0.5,
            title_area_ratio: 0.0,
            frame_aspect: 2.0,
            max_fill: 0.95,
        },
        style: FrameStyle {
            border: None,
            ..FrameStyle::default()
        },
        placeholder: false,
    }
}

#[test]
fn output_is_exactly_requested_size() {
    let spec = LayerSpec::new()
        .with(Layer::Background(Fill::Solid(RED)))
        .with(Layer::Image(ImageLayer {
            bytes: png_of(13, 7, |_| BLUE),
            placement: Placement::Cover,
        }));
    for (w, h) in [(1, 1), (37, 91), (320, 200)] {
        let out = compose(&spec, w, h).unwrap();
        assert_eq!(out.dimensions(), (w, h));
    }
}

#[test]
fn empty_spec_is_transparent() {
    let out = compose(&LayerSpec::new(), 8, 4).unwrap();
    assert!(out.data().iter().all(|&b| b == 0));
}

#[test]
fn zero_canvas_is_rejected() {
    assert!(matches!(
        compose(&LayerSpec::new(), 0, 10),
        Err(ForgeError::Validation(_))
    ));
}

#[test]
fn solid_background_covers_canvas() {
    let spec = LayerSpec::new().with(Layer::Background(Fill::Solid(GREEN)));
    let out = compose(&spec, 16, 9).unwrap();
    assert_eq!(out.pixel(0, 0), Some(GREEN));
    assert_eq!(out.pixel(15, 8), Some(GREEN));
}

#[test]
fn gradient_runs_from_top_left_to_bottom_right() {
    let spec = LayerSpec::new().with(Layer::Background(Fill::LinearGradient(vec![
        ColorStop::new(0.0, RED),
        ColorStop::new(1.0, BLUE),
    ])));
    let out = compose(&spec, 64, 64).unwrap();
    let tl = out.pixel(0, 0).unwrap();
    let br = out.pixel(63, 63).unwrap();
    assert!(tl.r > 200 && tl.b < 55, "{tl:?}");
    assert!(br.b > 200 && br.r < 55, "{br:?}");
}

#[test]
fn later_layers_draw_over_earlier_ones() {
    let spec = LayerSpec::new()
        .with(Layer::Background(Fill::Solid(RED)))
        .with(Layer::Background(Fill::Solid(BLUE)));
    let out = compose(&spec, 4, 4).unwrap();
    assert_eq!(out.pixel(2, 2), Some(BLUE));
}

#[test]
fn background_image_is_cover_fit() {
    // Left half red, right half blue; drawn onto a square canvas it is cropped at the sides.
    let mut data = Vec::new();
    for _ in 0..10 {
        for x in 0..40 {
            let c = if x < 20 { RED } else { BLUE };
            data.extend_from_slice(&c.to_array());
        }
    }
    let bytes = Arc::new(encode_png(&Raster::from_rgba8(40, 10, data).unwrap()).unwrap());
    let spec = LayerSpec::new().with(Layer::Background(Fill::Image(bytes)));
    let out = compose(&spec, 50, 50).unwrap();
    assert!(close(out.pixel(5, 25).unwrap(), RED));
    assert!(close(out.pixel(44, 25).unwrap(), BLUE));
    assert_eq!(out.pixel(0, 0).unwrap().a, 255);
}

#[test]
fn corrupt_layer_image_is_layer_decode() {
    let spec = LayerSpec::new().with(Layer::Image(ImageLayer {
        bytes: Arc::new(b"nope".to_vec()),
        placement: Placement::Cover,
    }));
    assert!(matches!(
        compose(&spec, 10, 10),
        Err(ForgeError::LayerDecode(_))
    ));

    let spec = LayerSpec::new().with(Layer::Background(Fill::Image(Arc::new(vec![0u8; 16]))));
    assert!(matches!(
        compose(&spec, 10, 10),
        Err(ForgeError::LayerDecode(_))
    ));
}

#[test]
fn bottom_priority_offset_aligns_image_bottom_below_frame() {
    // Canvas 200x1000: frame is (50,400)-(150,600). Image 100x400 is drawn 1:1 with its bottom at
    // y=610, so canvas row 595 shows image row 385.
    let image = png_of(100, 400, |y| match y {
        0..380 => RED,
        380..390 => GREEN,
        _ => BLUE,
    });
    let spec = LayerSpec::new().with(Layer::Frame(test_frame())).with(Layer::Image(
        ImageLayer {
            bytes: image,
            placement: Placement::Anchored {
                priority: AnchorPriority::Bottom,
                offset: 10.0,
            },
        },
    ));
    let out = compose(&spec, 200, 1000).unwrap();
    assert!(close(out.pixel(100, 595).unwrap(), GREEN), "{:?}", out.pixel(100, 595));
    assert!(close(out.pixel(100, 580).unwrap(), RED));
    assert!(close(out.pixel(100, 405).unwrap(), RED));
}

#[test]
fn image_never_leaves_its_clip() {
    let spec = LayerSpec::new().with(Layer::Frame(test_frame())).with(Layer::Image(
        ImageLayer {
            bytes: png_of(10, 10, |_| BLUE),
            placement: Placement::default(),
        },
    ));
    let out = compose(&spec, 200, 1000).unwrap();
    // Inside the frame: image.
    assert!(close(out.pixel(100, 500).unwrap(), BLUE));
    // Padding band: panel fill, no image.
    let panel = out.pixel(100, 385).unwrap();
    assert!(close(panel, Rgba8::white_alpha(0.8)), "{panel:?}");
    // Outside the panel: untouched.
    assert_eq!(out.pixel(5, 500), Some(Rgba8::TRANSPARENT));
    assert_eq!(out.pixel(100, 50), Some(Rgba8::TRANSPARENT));
}

#[test]
fn placeholder_fills_empty_frame() {
    let mut frame = test_frame();
    frame.placeholder = true;
    let spec = LayerSpec::new()
        .with(Layer::Background(Fill::Solid(Rgba8::BLACK)))
        .with(Layer::Frame(frame));
    let out = compose(&spec, 200, 1000).unwrap();
    let inner = out.pixel(100, 500).unwrap();
    let band = out.pixel(100, 385).unwrap();
    assert_eq!(inner.a, 255);
    // The placeholder brightens the panel slightly.
    assert!(inner.r >= band.r, "{inner:?} vs {band:?}");
}

#[test]
fn border_is_stroked_on_panel_edge() {
    let mut frame = test_frame();
    frame.style.border = Some(StrokeStyle {
        color: Rgba8::new(0, 0, 0, 255),
        width: 4.0,
    });
    frame.style.panel_fill = Rgba8::TRANSPARENT;
    let spec = LayerSpec::new()
        .with(Layer::Frame(frame))
        .with(Layer::Image(ImageLayer {
            bytes: png_of(10, 20, |_| BLUE),
            placement: Placement::Cover,
        }));
    let out = compose(&spec, 200, 1000).unwrap();
    // Panel top edge is at y = 400 - 30 = 370.
    assert_eq!(out.pixel(100, 370).unwrap().a, 255);
    assert_eq!(out.pixel(100, 380).unwrap().a, 0);
    assert!(close(out.pixel(100, 500).unwrap(), BLUE));
}

#[test]
fn empty_frame_has_no_border() {
    let mut frame = test_frame();
    frame.style.border = Some(StrokeStyle {
        color: Rgba8::new(0, 0, 0, 255),
        width: 4.0,
    });
    frame.style.panel_fill = Rgba8::TRANSPARENT;
    frame.style.placeholder_fill = Rgba8::TRANSPARENT;
    frame.placeholder = true;
    let spec = LayerSpec::new().with(Layer::Frame(frame));
    let out = compose(&spec, 200, 1000).unwrap();
    assert!(out.data().iter().all(|&b| b == 0));
}

#[test]
fn empty_text_draws_nothing() {
    let spec = LayerSpec::new().with(Layer::Text(TextLayer {
        title: String::new(),
        subtitle: "   ".into(),
        title_area_ratio: 0.2,
        ..TextLayer::default()
    }));
    let out = compose(&spec, 30, 30).unwrap();
    assert!(out.data().iter().all(|&b| b == 0));
}
