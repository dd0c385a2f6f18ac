use std::{
    fmt,
    ops::ControlFlow,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use crate::{
    archive::zip::{ArchiveBlob, assemble},
    assets::decode::encode_png,
    foundation::{
        core::Raster,
        error::{ForgeError, ForgeResult},
    },
    pipeline::{
        result::{ExportResult, ExportSummary},
        token::GenerationToken,
    },
};

/// Lifecycle of an [`ExportPipeline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// No run yet.
    #[default]
    Idle,
    /// Checking job preconditions.
    Validating,
    /// Producing outputs.
    Processing,
    /// Bundling outputs.
    Archiving,
    /// Last run produced a deliverable.
    Ready,
    /// Last run failed.
    Failed,
    /// Last run was invalidated before it finished.
    Cancelled,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Processing => "processing",
            Self::Archiving => "archiving",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        })
    }
}

/// How successful outputs are handed back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Packaging {
    /// Always a zip archive.
    #[default]
    Archive,
    /// A lone output is delivered as-is; several are zipped.
    SingleWhenAlone,
}

/// A tool-specific export: validates its inputs and records one raster per output path.
pub trait ExportJob {
    /// Short job name used in logs and summaries.
    fn name(&self) -> &str;

    /// File name of the archive deliverable.
    fn archive_name(&self) -> String {
        format!("{}.zip", self.name())
    }

    /// Packaging policy.
    fn packaging(&self) -> Packaging {
        Packaging::Archive
    }

    /// Check preconditions before any processing starts.
    fn validate(&self) -> ForgeResult<()>;

    /// Produce outputs through [`RunContext::record`].
    ///
    /// Returning an error aborts the run without a deliverable; per-output problems should be
    /// recorded instead.
    fn process(&self, ctx: &mut RunContext) -> ForgeResult<()>;
}

/// Per-run state handed to [`ExportJob::process`].
#[derive(Debug)]
pub struct RunContext {
    token: GenerationToken,
    result: ExportResult,
    cancelled: bool,
}

impl RunContext {
    pub(crate) fn new(token: GenerationToken) -> Self {
        Self {
            token,
            result: ExportResult::default(),
            cancelled: false,
        }
    }

    /// Whether the run should stop because it was invalidated.
    pub fn check(&mut self) -> ControlFlow<()> {
        if self.cancelled || !self.token.is_current() {
            self.cancelled = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    /// Record the outcome of one output.
    ///
    /// Successful rasters are encoded to PNG; failures are kept for the summary and processing
    /// continues. Breaks once the run has been invalidated.
    pub fn record(&mut self, path: impl Into<String>, output: ForgeResult<Raster>) -> ControlFlow<()> {
        self.check()?;
        let path = path.into();
        match output.and_then(|raster| encode_png(&raster)) {
            Ok(png) => {
                if self.result.insert(path.clone(), png) {
                    tracing::debug!(%path, "output recorded");
                } else {
                    let err = ForgeError::validation(format!("duplicate output path \"{path}\""));
                    tracing::warn!(%path, %err, "output rejected");
                    self.result.fail(path, &err);
                }
            }
            Err(err) => {
                tracing::warn!(%path, %err, "output failed");
                self.result.fail(path, &err);
            }
        }
        ControlFlow::Continue(())
    }

    /// Outputs recorded so far.
    pub fn result(&self) -> &ExportResult {
        &self.result
    }

    /// Generation this run belongs to.
    pub fn generation(&self) -> u64 {
        self.token.generation()
    }
}

/// Deliverable of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deliverable {
    /// Zip of every output.
    Archive {
        /// Suggested file name.
        name: String,
        /// Zip bytes.
        blob: ArchiveBlob,
    },
    /// Single PNG.
    File {
        /// Output path (used as the file name).
        path: String,
        /// PNG bytes.
        bytes: Vec<u8>,
    },
}

impl Deliverable {
    /// Suggested file name.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Archive { name, .. } => name,
            Self::File { path, .. } => path.rsplit('/').next().unwrap_or(path),
        }
    }

    /// Bytes to write.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Archive { blob, .. } => &blob.bytes,
            Self::File { bytes, .. } => bytes,
        }
    }
}

/// Result of [`ExportPipeline::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Outputs were produced and packaged.
    Ready {
        /// The file to hand to the user.
        deliverable: Deliverable,
        /// Counts and first error.
        summary: ExportSummary,
    },
    /// Nothing usable was packaged.
    Failed {
        /// What went wrong.
        summary: ExportSummary,
        /// Outputs encoded before archiving failed (empty for other failures).
        fallback: ExportResult,
    },
    /// The run was invalidated; its partial result was discarded.
    Cancelled,
    /// Another run was active; this request was dropped.
    Ignored,
}

impl ExportOutcome {
    /// Summary of a finished run.
    pub fn summary(&self) -> Option<&ExportSummary> {
        match self {
            Self::Ready { summary, .. } | Self::Failed { summary, .. } => Some(summary),
            Self::Cancelled | Self::Ignored => None,
        }
    }

    /// Whether a deliverable was produced.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

#[derive(Debug, Default)]
struct Shared {
    generation: Arc<AtomicU64>,
    active: AtomicBool,
    state: Mutex<PipelineState>,
}

/// Runs export jobs one at a time through validate → process → archive.
///
/// Clones share state, so one handle can [`invalidate`](Self::invalidate) a run driven from
/// another thread.
#[derive(Clone, Debug, Default)]
pub struct ExportPipeline {
    shared: Arc<Shared>,
}

struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportPipeline {
    /// Fresh idle pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        *self
            .shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, state: PipelineState) {
        *self
            .shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
        tracing::trace!(%state, "pipeline state");
    }

    /// Whether a run is in progress.
    pub fn is_busy(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    /// Cancel any in-flight run. Returns the new generation.
    pub fn invalidate(&self) -> u64 {
        let next = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation = next, "pipeline invalidated");
        next
    }

    /// Run `job` to completion. Never returns an error: failures are reported in the outcome.
    #[tracing::instrument(skip_all, fields(job = job.name()))]
    pub fn run(&self, job: &dyn ExportJob) -> ExportOutcome {
        if self
            .shared
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("export already running; request ignored");
            return ExportOutcome::Ignored;
        }
        let _active = ActiveGuard(&self.shared.active);
        let token = GenerationToken::capture(&self.shared.generation);

        self.set_state(PipelineState::Validating);
        if let Err(err) = job.validate() {
            tracing::warn!(%err, "export precondition not met");
            return self.fail(ExportSummary::unmet(job.name(), &err), ExportResult::default());
        }

        self.set_state(PipelineState::Processing);
        let mut ctx = RunContext::new(token.clone());
        let processed = job.process(&mut ctx);
        if ctx.cancelled || !token.is_current() {
            return self.cancel();
        }
        let result = ctx.result;

        if let Err(err) = processed {
            tracing::error!(%err, "export aborted");
            let summary = ExportSummary::from_result(job.name(), &result).with_error(&err);
            return self.fail(summary, ExportResult::default());
        }

        let summary = ExportSummary::from_result(job.name(), &result);
        if result.is_empty() {
            let err = ForgeError::no_content("nothing to export");
            let summary = if summary.first_error.is_some() {
                summary
            } else {
                summary.with_error(&err)
            };
            tracing::warn!(%summary, "export produced no outputs");
            return self.fail(summary, result);
        }

        self.set_state(PipelineState::Archiving);
        let deliverable = match job.packaging() {
            Packaging::SingleWhenAlone if result.len() == 1 => {
                match result.clone().into_single() {
                    Some((path, bytes)) => Deliverable::File { path, bytes },
                    None => return self.fail(summary, result),
                }
            }
            _ => match assemble(&result.to_entries()) {
                Ok(blob) => Deliverable::Archive {
                    name: job.archive_name(),
                    blob,
                },
                Err(err) => {
                    tracing::error!(%err, "archiving failed; keeping encoded outputs");
                    return self.fail(summary.with_error(&err), result);
                }
            },
        };

        if !token.is_current() {
            return self.cancel();
        }
        self.set_state(PipelineState::Ready);
        tracing::info!(%summary, file = deliverable.file_name(), "export ready");
        ExportOutcome::Ready {
            deliverable,
            summary,
        }
    }

    fn fail(&self, summary: ExportSummary, fallback: ExportResult) -> ExportOutcome {
        self.set_state(PipelineState::Failed);
        ExportOutcome::Failed { summary, fallback }
    }

    fn cancel(&self) -> ExportOutcome {
        tracing::info!("export cancelled by a newer generation");
        self.set_state(PipelineState::Cancelled);
        ExportOutcome::Cancelled
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/export.rs"]
mod tests;
