//! Codebase archive intake
//!
//! Extracts an uploaded zip archive into a fresh temporary directory for the
//! whitebox scanner. Entries whose names escape the extraction root are
//! skipped, not fatal.

use std::io::{Cursor, Read};
use std::path::PathBuf;

use application::error::ApplicationError;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// An extracted codebase on disk
///
/// Dropping the handle does not delete the directory; the analysis run owns
/// cleanup because extraction and analysis happen on different tasks.
#[derive(Debug)]
pub struct ExtractedCodebase {
    root: PathBuf,
    files: usize,
}

impl ExtractedCodebase {
    /// Root directory of the extracted tree
    #[must_use]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Number of files written during extraction
    #[must_use]
    pub const fn files(&self) -> usize {
        self.files
    }

    /// Give up ownership of the directory path
    #[must_use]
    pub fn into_root(self) -> PathBuf {
        self.root
    }
}

/// Extract a zip archive from memory into a new temporary directory
pub fn extract_zip(bytes: &[u8]) -> Result<ExtractedCodebase, ApplicationError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ApplicationError::Internal(format!("could not open archive: {e}")))?;

    let dir = TempDir::with_prefix("strideforge-upload-")?;
    let root = dir.keep();

    let mut files = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ApplicationError::Internal(format!("could not read archive entry: {e}")))?;

        // enclosed_name rejects absolute paths and `..` traversal
        let Some(relative) = entry.enclosed_name() else {
            warn!(name = entry.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let target = root.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut contents = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut contents)?;
        std::fs::write(&target, contents)?;
        files += 1;
        debug!(path = %target.display(), "Extracted archive entry");
    }

    info!(files, root = %root.display(), "Codebase archive extracted");

    Ok(ExtractedCodebase { root, files })
}
