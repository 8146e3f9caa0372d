//! Structural inspection: page count extraction.
//!
//! Deliberately the thinnest module in the crate: a wrapper over `lopdf`
//! that walks the document's page tree and counts leaves. Parsing a PDF is
//! the only step in the scan that can fail on *content* rather than I/O,
//! and in this design that failure is fatal for the run: one malformed PDF
//! aborts the corpus. Deployments that cannot tolerate that disable the
//! step via [`crate::config::SyncOptions::count_pages`] and sync a constant
//! 0 instead.

use crate::error::SyncError;
use std::path::Path;

/// Parse `path` as a PDF and return its page count.
///
/// # Errors
/// [`SyncError::Format`] if the file is not parseable as a PDF (corrupt
/// header, broken xref, wrong format behind a `.pdf` extension).
pub fn count_pages(path: &Path) -> Result<u32, SyncError> {
    let document = lopdf::Document::load(path).map_err(|err| SyncError::Format {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    Ok(document.get_pages().len() as u32)
}
