use std::sync::{Arc, Mutex};

use crate::{
    assets::source::SourceImage,
    foundation::error::ForgeError,
    pipeline::{
        export::{ExportJob, ExportOutcome, ExportPipeline},
        result::{ExportResult, ExportSummary},
    },
};

/// One tool's working state: the current source image and the pipeline that exports from it.
///
/// Replacing or clearing the source bumps the pipeline generation, so a run still working on the
/// previous image finishes as [`ExportOutcome::Cancelled`]. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct ExportSession {
    pipeline: ExportPipeline,
    source: Arc<Mutex<Option<SourceImage>>>,
}

impl ExportSession {
    /// Session without a source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over `source`.
    pub fn with_source(source: SourceImage) -> Self {
        let session = Self::new();
        *session.lock() = Some(source);
        session
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<SourceImage>> {
        self.source
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pipeline driving this session's runs.
    pub fn pipeline(&self) -> &ExportPipeline {
        &self.pipeline
    }

    /// Current source, if any. Cheap: bytes are shared.
    pub fn source(&self) -> Option<SourceImage> {
        self.lock().clone()
    }

    /// Swap in a new source and cancel any in-flight run. Returns the new generation.
    pub fn replace_source(&self, source: SourceImage) -> u64 {
        tracing::debug!(name = source.name(), "session source replaced");
        *self.lock() = Some(source);
        self.pipeline.invalidate()
    }

    /// Drop the source and cancel any in-flight run. Returns the new generation.
    pub fn clear_source(&self) -> u64 {
        *self.lock() = None;
        self.pipeline.invalidate()
    }

    /// Build a job over the current source and run it.
    ///
    /// Without a source the run fails with an unmet precondition.
    pub fn run<J, F>(&self, name: &str, build: F) -> ExportOutcome
    where
        J: ExportJob,
        F: FnOnce(SourceImage) -> J,
    {
        let Some(source) = self.source() else {
            let err = ForgeError::validation("no source image selected");
            return ExportOutcome::Failed {
                summary: ExportSummary::unmet(name, &err),
                fallback: ExportResult::default(),
            };
        };
        self.pipeline.run(&build(source))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/session.rs"]
mod tests;
