use std::io::Cursor;

use super::*;
use crate::pipeline::export::{Deliverable, ExportOutcome, ExportPipeline};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([20, 40, 60, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn small_screens() -> ScreenTable {
    serde_json::from_str(
        r#"[
        { "slot": "iphone69", "width": 65, "height": 140, "path": "iPhone/6.7-inch.png", "frame_aspect": 2.16 },
        { "slot": "iphone65", "width": 64, "height": 139, "path": "iPhone/6.5-inch.png", "frame_aspect": 2.16 },
        { "slot": "ipad_portrait", "width": 102, "height": 137, "path": "iPad/portrait.png", "frame_aspect": 1.33 },
        { "slot": "ipad_landscape", "width": 137, "height": 102, "path": "iPad/landscape.png", "frame_aspect": 0.75 }
    ]"#,
    )
    .unwrap()
}

fn shot(name: &str) -> SourceImage {
    SourceImage::new(name, png(30, 60))
}

#[test]
fn numbered_paths() {
    assert_eq!(numbered_path("iPhone/6.7-inch.png", 1), "iPhone/6.7-inch.png");
    assert_eq!(numbered_path("iPhone/6.7-inch.png", 2), "iPhone/6.7-inch-2.png");
    assert_eq!(numbered_path("iPad/portrait.png", 3), "iPad/portrait-3.png");
    assert_eq!(numbered_path("plain", 2), "plain-2");
}

#[test]
fn plan_skips_empty_groups_and_numbers_populated_ones() {
    let groups = vec![
        ScreenshotGroup::default(),
        ScreenshotGroup::default().with_screen(ScreenSlot::Iphone69, shot("a.png")),
        ScreenshotGroup::default(),
        ScreenshotGroup::default()
            .with_screen(ScreenSlot::Iphone69, shot("b.png"))
            .with_screen(ScreenSlot::IpadLandscape, shot("c.png")),
    ];
    let job = ScreenshotJob::new(groups, ScreenshotStyle::default());
    let plan = job.plan().unwrap();
    let paths: Vec<&str> = plan.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["iPhone/6.7-inch.png", "iPhone/6.7-inch-2.png", "iPad/landscape-2.png"]
    );
    assert_eq!(plan[0].group, 1);
    assert_eq!(plan[2].group, 3);
}

#[test]
fn layer_spec_uses_family_config() {
    let mut group = ScreenshotGroup::default().with_screen(ScreenSlot::IpadPortrait, shot("p.png"));
    group.ipad.title = "Plan trips".into();
    group.ipad.bottom_priority = true;
    group.ipad.offset = 12.0;
    group.iphone.title = "ignored".into();

    let job = ScreenshotJob::new(vec![group.clone()], ScreenshotStyle::default());
    let screens = ScreenTable::default();
    let screen = screens.get(ScreenSlot::IpadPortrait).unwrap();
    let spec = job.layer_spec(&group, screen, group.screens.get(&ScreenSlot::IpadPortrait));

    assert_eq!(spec.len(), 4);
    match &spec.layers[1] {
        Layer::Frame(frame) => {
            assert_eq!(frame.layout.frame_aspect, 1.33);
            assert!(!frame.placeholder);
        }
        other => panic!("expected frame, got {other:?}"),
    }
    match &spec.layers[2] {
        Layer::Image(img) => assert_eq!(
            img.placement,
            Placement::Anchored {
                priority: AnchorPriority::Bottom,
                offset: 12.0
            }
        ),
        other => panic!("expected image, got {other:?}"),
    }
    match &spec.layers[3] {
        Layer::Text(text) => assert_eq!(text.title, "Plan trips"),
        other => panic!("expected text, got {other:?}"),
    }

    let empty = job.layer_spec(&group, screen, None);
    assert_eq!(empty.len(), 3);
    assert!(matches!(&empty.layers[1], Layer::Frame(f) if f.placeholder));
}

#[test]
fn export_composes_each_slot_at_screen_size() {
    let groups = vec![
        ScreenshotGroup::default()
            .with_screen(ScreenSlot::Iphone69, shot("a.png"))
            .with_screen(ScreenSlot::IpadLandscape, shot("b.png")),
    ];
    let job = ScreenshotJob::new(groups, ScreenshotStyle::default()).with_screens(small_screens());
    let ExportOutcome::Ready {
        deliverable: Deliverable::Archive { blob, name },
        summary,
    } = ExportPipeline::new().run(&job)
    else {
        panic!("expected archive");
    };
    assert_eq!(name, "screenshots.zip");
    assert_eq!(summary.succeeded, 2);
    let entries = crate::archive::zip::extract(&blob.bytes).unwrap();
    let landscape = entries.iter().find(|e| e.path == "iPad/landscape.png").unwrap();
    let raster = crate::assets::decode::decode_image(&landscape.data).unwrap();
    assert_eq!(raster.dimensions(), (137, 102));
}

#[test]
fn broken_screenshot_fails_only_its_output() {
    let groups = vec![
        ScreenshotGroup::default()
            .with_screen(ScreenSlot::Iphone69, shot("ok.png"))
            .with_screen(ScreenSlot::Iphone65, SourceImage::new("bad.png", b"nope".to_vec())),
    ];
    let job = ScreenshotJob::new(groups, ScreenshotStyle::default()).with_screens(small_screens());
    let outcome = ExportPipeline::new().run(&job);
    let summary = outcome.summary().unwrap();
    assert!(outcome.is_ready());
    assert_eq!((summary.succeeded, summary.failed), (1, 1));
    assert!(summary.first_error.as_deref().unwrap().contains("layer decode error"));
}

#[test]
fn validation_rules() {
    let empty = ScreenshotJob::new(vec![ScreenshotGroup::default()], ScreenshotStyle::default());
    assert!(empty.validate().is_err());

    let too_many = ScreenshotJob::new(
        vec![ScreenshotGroup::default().with_screen(ScreenSlot::Iphone69, shot("a.png")); MAX_GROUPS + 1],
        ScreenshotStyle::default(),
    );
    assert!(too_many.validate().is_err());

    let style = ScreenshotStyle {
        frame_width_ratio: 1.5,
        ..ScreenshotStyle::default()
    };
    let bad_style = ScreenshotJob::new(
        vec![ScreenshotGroup::default().with_screen(ScreenSlot::Iphone69, shot("a.png"))],
        style,
    );
    assert!(bad_style.validate().is_err());
}

#[test]
fn style_from_presets() {
    let presets = StylePresets::default();
    let style = ScreenshotStyle::from_presets(
        &presets,
        "sun",
        &RatioChoice::Named("Large".into()),
        &RatioChoice::Value(0.8),
    )
    .unwrap();
    assert_eq!(style.title_area_ratio, 0.25);
    assert_eq!(style.frame_width_ratio, 0.8);
    assert_eq!(style.gradient.len(), 2);
    assert!(
        ScreenshotStyle::from_presets(
            &presets,
            "nope",
            &RatioChoice::Value(0.1),
            &RatioChoice::Value(0.1)
        )
        .is_err()
    );
}

#[test]
fn manifest_defaults_and_loading() {
    let dir = std::env::temp_dir().join(format!("assetforge-manifest-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("home.png"), png(10, 20)).unwrap();
    let manifest = r#"{
        "frame_width": 0.9,
        "groups": [
            { "iphone": { "title": "Hello", "bottom_priority": true },
              "screens": { "iphone69": "home.png" } },
            {}
        ]
    }"#;
    std::fs::write(dir.join("shots.json"), manifest).unwrap();

    let m = ScreenshotManifest::from_path(dir.join("shots.json")).unwrap();
    assert_eq!(m.color, "Earth");
    assert_eq!(m.title_area, RatioChoice::Named("Medium".into()));
    assert_eq!(m.groups[0].iphone.offset, DEFAULT_OFFSET);

    let job = m.into_job(&dir, &Presets::builtin()).unwrap();
    assert_eq!(job.groups().len(), 2);
    assert_eq!(job.plan().unwrap().len(), 1);
    assert_eq!(job.groups()[0].iphone.title, "Hello");
    std::fs::remove_dir_all(&dir).unwrap();
}
