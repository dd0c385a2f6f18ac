use std::io::Cursor;

use super::*;
use crate::pipeline::export::{ExportOutcome, ExportPipeline};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn specs_follow_platform_order_without_duplicates() {
    let job = IconJob::new(
        SourceImage::new("icon.png", Vec::new()),
        [Platform::Web, Platform::Ios, Platform::Web],
    );
    let specs = job.specs().unwrap();
    assert_eq!(specs.len(), 13 + 5);
    assert!(specs[0].path.starts_with("iOS/"));
    assert!(specs[13].path.starts_with("web/"));
    assert_eq!(job.archive_name(), "app-icons.zip");
}

#[test]
fn wrong_source_size_is_an_unmet_precondition() {
    let job = IconJob::new(SourceImage::new("icon.png", png(512, 512)), [Platform::Android]);
    let err = job.validate().unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));
    assert!(err.to_string().contains("1024x1024"));

    let outcome = ExportPipeline::new().run(&job);
    let ExportOutcome::Failed { summary, .. } = outcome else {
        panic!("expected failure");
    };
    assert!(summary.unmet_precondition.is_some());
}

#[test]
fn no_platform_selected_is_rejected() {
    let job = IconJob::new(SourceImage::new("icon.png", png(1024, 1024)), []);
    assert!(job.validate().is_err());
}

#[test]
fn android_set_has_every_density() {
    let job = IconJob::new(SourceImage::new("icon.png", png(1024, 1024)), [Platform::Android]);
    assert_eq!(job.archive_name(), "android-icons.zip");
    let ExportOutcome::Ready { summary, .. } = ExportPipeline::new().run(&job) else {
        panic!("expected ready");
    };
    assert_eq!(summary.succeeded, 5);
}

#[test]
fn corrupt_pixel_data_fails_run_without_outputs() {
    // Header intact, image data cut short: validation passes, decoding does not.
    let mut bytes = png(1024, 1024);
    bytes.truncate(bytes.len() / 2);
    let job = IconJob::new(SourceImage::new("icon.png", bytes), [Platform::Ios]);
    job.validate().unwrap();

    let outcome = ExportPipeline::new().run(&job);
    let ExportOutcome::Failed { summary, fallback } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(
        summary
            .first_error
            .as_deref()
            .is_some_and(|e| e.starts_with("source decode error:")),
        "{summary:?}"
    );
    assert_eq!(summary.succeeded, 0);
    assert!(summary.unmet_precondition.is_none());
    assert!(fallback.is_empty());
}
