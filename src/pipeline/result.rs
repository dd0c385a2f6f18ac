use std::{collections::BTreeMap, fmt};

use crate::{archive::zip::ArchiveEntry, foundation::error::ForgeError};

/// One output that could not be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFailure {
    /// Archive path the output would have had.
    pub path: String,
    /// Rendered error message.
    pub error: String,
}

/// Encoded outputs of one run, ordered by path, plus the outputs that failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportResult {
    outputs: BTreeMap<String, Vec<u8>>,
    failures: Vec<OutputFailure>,
}

impl ExportResult {
    /// Store an encoded output. Returns `false` when `path` is already taken.
    pub(crate) fn insert(&mut self, path: String, png: Vec<u8>) -> bool {
        if self.outputs.contains_key(&path) {
            return false;
        }
        self.outputs.insert(path, png);
        true
    }

    pub(crate) fn fail(&mut self, path: String, error: &ForgeError) {
        self.failures.push(OutputFailure {
            path,
            error: error.to_string(),
        });
    }

    /// Successful outputs keyed by path.
    pub fn outputs(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.outputs
    }

    /// Failed outputs in the order they were recorded.
    pub fn failures(&self) -> &[OutputFailure] {
        &self.failures
    }

    /// Encoded bytes of `path`.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.outputs.get(path).map(Vec::as_slice)
    }

    /// Number of successful outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether nothing succeeded.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Successful outputs as archive entries, in path order.
    pub fn to_entries(&self) -> Vec<ArchiveEntry> {
        self.outputs
            .iter()
            .map(|(path, data)| ArchiveEntry::new(path.clone(), data.clone()))
            .collect()
    }

    pub(crate) fn into_single(mut self) -> Option<(String, Vec<u8>)> {
        if self.outputs.len() != 1 {
            return None;
        }
        self.outputs.pop_first()
    }
}

/// What a run produced, suitable for showing to a user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Job name.
    pub job: String,
    /// Outputs produced.
    pub succeeded: usize,
    /// Outputs that failed.
    pub failed: usize,
    /// First error message, if any.
    pub first_error: Option<String>,
    /// Precondition that stopped the run before processing, if any.
    pub unmet_precondition: Option<String>,
}

impl ExportSummary {
    pub(crate) fn from_result(job: &str, result: &ExportResult) -> Self {
        Self {
            job: job.to_string(),
            succeeded: result.len(),
            failed: result.failures().len(),
            first_error: result.failures().first().map(|f| format!("{}: {}", f.path, f.error)),
            unmet_precondition: None,
        }
    }

    pub(crate) fn with_error(mut self, err: &ForgeError) -> Self {
        self.first_error = Some(err.to_string());
        self
    }

    pub(crate) fn unmet(job: &str, err: &ForgeError) -> Self {
        Self {
            job: job.to_string(),
            unmet_precondition: Some(err.to_string()),
            ..Self::default()
        }
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ok, {} failed", self.job, self.succeeded, self.failed)?;
        if let Some(pre) = &self.unmet_precondition {
            write!(f, " (unmet precondition: {pre})")?;
        } else if let Some(err) = &self.first_error {
            write!(f, " (first error: {err})")?;
        }
        Ok(())
    }
}
