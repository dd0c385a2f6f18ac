use super::*;
use crate::{
    foundation::{
        core::{Raster, Rgba8},
        error::ForgeResult,
    },
    pipeline::export::{PipelineState, RunContext},
};

/// Emits one white pixel per output; `before_output` runs ahead of each record.
struct PixelJob {
    source: SourceImage,
    outputs: usize,
    before_output: Option<Box<dyn Fn(usize)>>,
}

impl ExportJob for PixelJob {
    fn name(&self) -> &str {
        "pixels"
    }

    fn validate(&self) -> ForgeResult<()> {
        Ok(())
    }

    fn process(&self, ctx: &mut RunContext) -> ForgeResult<()> {
        for idx in 0..self.outputs {
            if let Some(hook) = &self.before_output {
                hook(idx);
            }
            let path = format!("{}-{idx}.png", self.source.stem());
            if ctx.record(path, Raster::filled(1, 1, Rgba8::WHITE)).is_break() {
                return Ok(());
            }
        }
        Ok(())
    }
}

fn source(name: &str) -> SourceImage {
    SourceImage::new(name, b"unused".to_vec())
}

#[test]
fn replacing_source_mid_run_cancels_it() {
    let session = ExportSession::with_source(source("first.png"));
    let handle = session.clone();
    let outcome = session.run("pixels", |src| PixelJob {
        source: src,
        outputs: 3,
        before_output: Some(Box::new(move |idx| {
            if idx == 1 {
                handle.replace_source(source("second.png"));
            }
        })),
    });
    assert_eq!(outcome, ExportOutcome::Cancelled);
    assert_eq!(session.pipeline().state(), PipelineState::Cancelled);
    assert_eq!(session.pipeline().generation(), 1);
    assert_eq!(session.source().unwrap().name(), "second.png");
}

#[test]
fn next_run_uses_replacement_source() {
    let session = ExportSession::with_source(source("first.png"));
    assert_eq!(session.replace_source(source("second.png")), 1);
    let outcome = session.run("pixels", |src| PixelJob {
        source: src,
        outputs: 1,
        before_output: None,
    });
    let ExportOutcome::Ready { deliverable, .. } = outcome else {
        panic!("expected ready, got {outcome:?}");
    };
    let entries = crate::archive::zip::extract(deliverable.bytes()).unwrap();
    assert_eq!(entries[0].path, "second-0.png");
}

#[test]
fn run_without_source_is_unmet_precondition() {
    let session = ExportSession::new();
    let outcome = session.run("pixels", |src| PixelJob {
        source: src,
        outputs: 1,
        before_output: None,
    });
    let ExportOutcome::Failed { summary, fallback } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(summary.unmet_precondition.unwrap().contains("no source image"));
    assert!(fallback.is_empty());
}

#[test]
fn clearing_source_bumps_generation() {
    let session = ExportSession::with_source(source("a.png"));
    assert_eq!(session.clear_source(), 1);
    assert!(session.source().is_none());
}
