use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Snapshot of a pipeline generation taken when a run starts.
///
/// The token goes stale once the owning pipeline is invalidated (for example because the user
/// replaced the source image); a stale run must not publish anything.
#[derive(Clone, Debug)]
pub struct GenerationToken {
    counter: Arc<AtomicU64>,
    generation: u64,
}

impl GenerationToken {
    pub(crate) fn capture(counter: &Arc<AtomicU64>) -> Self {
        Self {
            counter: Arc::clone(counter),
            generation: counter.load(Ordering::Acquire),
        }
    }

    /// Generation this token was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no invalidation happened since the token was taken.
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::Acquire) == self.generation
    }
}
