use std::io::{Cursor, Read, Write};

use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::foundation::error::{ForgeError, ForgeResult};

/// One file inside an archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative path with `/` separators.
    pub path: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// Build an entry.
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }
}

/// Finished zip bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveBlob {
    /// Zip file contents.
    pub bytes: Vec<u8>,
    /// Number of file entries.
    pub entry_count: usize,
}

/// Normalize a relative archive path: `\` becomes `/`, empty and `.` segments are dropped.
///
/// Absolute paths and `..` segments are rejected.
pub fn normalize_entry_path(path: &str) -> ForgeResult<String> {
    let s = path.replace('\\', "/");
    if s.starts_with('/') || s.split('/').next().is_some_and(|first| first.ends_with(':')) {
        return Err(ForgeError::archive(format!(
            "archive paths must be relative: \"{path}\""
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ForgeError::archive(format!(
                "archive paths must not contain '..': \"{path}\""
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ForgeError::archive(format!(
            "archive path must contain a file name: \"{path}\""
        )));
    }
    Ok(out.join("/"))
}

/// Bundle entries into a deflate-compressed zip.
///
/// Entries keep their input order. Duplicate paths (after normalization) are an error; an empty
/// entry list produces a valid empty archive.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn assemble(entries: &[ArchiveEntry]) -> ForgeResult<ArchiveBlob> {
    let mut seen = std::collections::HashSet::<String>::with_capacity(entries.len());
    let mut paths = Vec::with_capacity(entries.len());
    for entry in entries {
        let norm = normalize_entry_path(&entry.path)?;
        if !seen.insert(norm.clone()) {
            return Err(ForgeError::archive(format!("duplicate archive path \"{norm}\"")));
        }
        paths.push(norm);
    }

    let opts = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
    for (entry, path) in entries.iter().zip(&paths) {
        zw.start_file(path.as_str(), opts)
            .map_err(|e| ForgeError::archive(format!("start entry \"{path}\": {e}")))?;
        zw.write_all(&entry.data)
            .map_err(|e| ForgeError::archive(format!("write entry \"{path}\": {e}")))?;
    }
    let bytes = zw
        .finish()
        .map_err(|e| ForgeError::archive(format!("finish archive: {e}")))?
        .into_inner();

    tracing::debug!(bytes = bytes.len(), "archive assembled");
    Ok(ArchiveBlob {
        bytes,
        entry_count: entries.len(),
    })
}

/// Read every file entry of a zip back, in archive order. Directory entries are skipped.
pub fn extract(bytes: &[u8]) -> ForgeResult<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ForgeError::archive(format!("open archive: {e}")))?;

    let mut out = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let mut file = archive
            .by_index(idx)
            .map_err(|e| ForgeError::archive(format!("read entry #{idx}: {e}")))?;
        if file.is_dir() {
            continue;
        }
        let path = file.name().to_string();
        let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut data)
            .map_err(|e| ForgeError::archive(format!("inflate entry \"{path}\": {e}")))?;
        out.push(ArchiveEntry { path, data });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/archive/zip.rs"]
mod tests;
