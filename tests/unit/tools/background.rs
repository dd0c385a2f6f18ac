use super::*;
use crate::pipeline::export::{Deliverable, ExportOutcome, ExportPipeline};

fn palette() -> Vec<Rgba8> {
    vec![
        Rgba8::new(0x1e, 0x3c, 0x72, 255),
        Rgba8::new(0x2a, 0x52, 0x98, 255),
        Rgba8::new(0xf0, 0xa0, 0x40, 255),
    ]
}

#[test]
fn output_has_requested_size_and_is_opaque() {
    let spec = PolygonSpec::new(160, 90, palette(), 7);
    let r = render_polygons(&spec).unwrap();
    assert_eq!(r.dimensions(), (160, 90));
    assert!(r.data().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn same_seed_is_deterministic() {
    let spec = PolygonSpec::new(120, 80, palette(), 42);
    let a = render_polygons(&spec).unwrap();
    let b = render_polygons(&spec).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seeds_differ() {
    let a = render_polygons(&PolygonSpec::new(120, 80, palette(), 1)).unwrap();
    let b = render_polygons(&PolygonSpec::new(120, 80, palette(), 2)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn single_color_palette_is_uniform() {
    let c = Rgba8::new(40, 200, 120, 255);
    let r = render_polygons(&PolygonSpec::new(64, 64, vec![c], 3)).unwrap();
    for px in r.data().chunks_exact(4) {
        assert_eq!(px, &c.to_array()[..]);
    }
}

#[test]
fn palette_runs_from_first_to_last_color() {
    let spec = PolygonSpec {
        variance: 0.0,
        ..PolygonSpec::new(600, 600, vec![Rgba8::BLACK, Rgba8::WHITE], 0)
    };
    let r = render_polygons(&spec).unwrap();
    let dark = r.pixel(5, 5).unwrap();
    let light = r.pixel(595, 595).unwrap();
    assert!(dark.r < 60, "{dark:?}");
    assert!(light.r > 195, "{light:?}");
}

#[test]
fn validation_rejects_bad_parameters() {
    let ok = PolygonSpec::new(10, 10, palette(), 0);
    assert!(ok.validate().is_ok());
    assert!(PolygonSpec { width: 0, ..ok.clone() }.validate().is_err());
    assert!(PolygonSpec { height: MAX_EDGE + 1, ..ok.clone() }.validate().is_err());
    assert!(PolygonSpec { cell_size: 0.0, ..ok.clone() }.validate().is_err());
    assert!(PolygonSpec { variance: 1.5, ..ok.clone() }.validate().is_err());
    assert!(PolygonSpec { x_colors: Vec::new(), ..ok }.validate().is_err());
}

#[test]
fn spec_from_presets_uses_named_size() {
    let presets = BackgroundPresets::default();
    let spec = PolygonSpec::from_presets(&presets, "twitter", "sunset", 9).unwrap();
    assert_eq!((spec.width, spec.height), (1500, 500));
    assert_eq!(spec.file_name(), "background-1500x500.png");
    assert!(PolygonSpec::from_presets(&presets, "poster", "sunset", 9).is_err());
}

#[test]
fn job_delivers_single_png() {
    let job = BackgroundJob::new(PolygonSpec::new(80, 40, palette(), 11));
    let ExportOutcome::Ready { deliverable, summary } = ExportPipeline::new().run(&job) else {
        panic!("expected ready");
    };
    assert_eq!(summary.succeeded, 1);
    let Deliverable::File { path, bytes } = deliverable else {
        panic!("expected a single file");
    };
    assert_eq!(path, "background-80x40.png");
    assert_eq!(crate::assets::decode::read_dimensions(&bytes).unwrap(), (80, 40));
}

#[test]
fn invalidated_run_records_nothing() {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0));
    let token = crate::pipeline::token::GenerationToken::capture(&counter);
    counter.fetch_add(1, std::sync::atomic::Ordering::AcqRel);
    let mut ctx = RunContext::new(token);
    let job = BackgroundJob::new(PolygonSpec::new(40, 40, palette(), 1));
    job.process(&mut ctx).unwrap();
    assert!(ctx.result().is_empty());
    assert!(ctx.result().failures().is_empty());
}
