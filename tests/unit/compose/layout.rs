use super::*;

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "{a} != {b}");
}

#[test]
fn iphone_frame_is_width_bound() {
    let layout = ScreenLayout {
        frame_width_ratio: 0.85,
        title_area_ratio: 0.18,
        frame_aspect: 2.16,
        max_fill: 0.95,
    };
    let g = frame_geometry(1290, 2796, &layout);
    approx(g.title_area, 2796.0 * 0.18);
    let remaining = 2796.0 - g.title_area;
    let frame_w = 1290.0 * 0.85;
    let expected_h = (frame_w * 2.16_f64).min(remaining * 0.95);
    approx(g.frame.width(), frame_w);
    approx(g.frame.height(), expected_h);
    approx(g.frame.x0, 645.0 - frame_w / 2.0);
    approx(g.frame.y0, g.title_area + (remaining - expected_h) / 2.0);
}

#[test]
fn tall_aspect_is_capped_by_remaining_space() {
    let layout = ScreenLayout {
        frame_width_ratio: 0.9,
        title_area_ratio: 0.25,
        frame_aspect: 10.0,
        max_fill: 0.95,
    };
    let g = frame_geometry(1000, 1000, &layout);
    approx(g.frame.height(), 750.0 * 0.95);
    approx(g.frame.y0, 250.0 + 750.0 * 0.025);
}

#[test]
fn cover_fit_centers_and_covers() {
    let r = cover_fit(Size::new(200.0, 100.0), Rect::new(0.0, 0.0, 100.0, 100.0));
    approx(r.width(), 200.0);
    approx(r.height(), 100.0);
    approx(r.x0, -50.0);
    approx(r.y0, 0.0);
}

#[test]
fn anchored_short_image_fills_height() {
    let frame = Rect::new(10.0, 20.0, 110.0, 220.0);
    let r = place_image(
        Size::new(400.0, 100.0),
        frame,
        Placement::Anchored {
            priority: AnchorPriority::Bottom,
            offset: 10.0,
        },
    );
    approx(r.height(), 200.0);
    approx(r.width(), 800.0);
    approx(r.y0, 20.0);
    approx(r.x0, 10.0 + (100.0 - 800.0) / 2.0);
}

#[test]
fn bottom_priority_puts_image_bottom_offset_below_frame() {
    let frame = Rect::new(0.0, 100.0, 100.0, 300.0);
    let r = place_image(
        Size::new(100.0, 400.0),
        frame,
        Placement::Anchored {
            priority: AnchorPriority::Bottom,
            offset: 10.0,
        },
    );
    approx(r.height(), 400.0);
    approx(r.y1, frame.y1 + 10.0);
}

#[test]
fn top_priority_shifts_image_up_by_offset() {
    let frame = Rect::new(0.0, 100.0, 100.0, 300.0);
    let r = place_image(
        Size::new(100.0, 400.0),
        frame,
        Placement::Anchored {
            priority: AnchorPriority::Top,
            offset: 88.0,
        },
    );
    approx(r.y0, 12.0);
}

#[test]
fn exact_fit_ignores_offset() {
    let frame = Rect::new(0.0, 0.0, 100.0, 200.0);
    let r = place_image(
        Size::new(50.0, 100.0),
        frame,
        Placement::Anchored {
            priority: AnchorPriority::Bottom,
            offset: 40.0,
        },
    );
    approx(r.y0, 0.0);
    approx(r.height(), 200.0);
}

#[test]
fn baselines_depend_on_subtitle() {
    let (t, s) = text_baselines(1000.0, 500.0, true, 0.4, 0.5, 0.06);
    approx(t, 200.0);
    approx(s, 260.0);
    let (t, _) = text_baselines(1000.0, 500.0, false, 0.4, 0.5, 0.06);
    approx(t, 250.0);
}
