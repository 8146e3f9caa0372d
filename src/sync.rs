//! Top-level orchestration: scan, then sync.
//!
//! Strictly two-pass: [`build_corpus`] completes the entire scan (walk →
//! fingerprint → page count → dedup) before [`run`] opens a single network
//! connection. No streaming pipeline between the phases, no concurrency:
//! the only shared state is the one [`Corpus`] owned by this function and
//! lent read-only to the client. Collaborators are constructed here and
//! passed down explicitly; there is no ambient global session.

use crate::client::{GristTransport, SyncClient};
use crate::config::{SyncConfig, SyncOptions};
use crate::corpus::{Corpus, FileRecord};
use crate::error::SyncError;
use crate::{hasher, pages, scanner};
use std::path::Path;
use tracing::{debug, info};

/// End-of-run summary. Exists only on the success path: a failed run
/// reports its error, not partial progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Visible PDF files encountered during the walk.
    pub scanned: usize,
    /// Unique fingerprints after deduplication.
    pub unique: usize,
    /// Records submitted to the remote store.
    pub synced: usize,
}

/// Scan phase: walk `root` and build the deduplicated corpus.
///
/// Returns the corpus and the raw number of files scanned (before
/// deduplication). Any filesystem or parse failure aborts the scan.
pub fn build_corpus(root: &Path, options: &SyncOptions) -> Result<(Corpus, usize), SyncError> {
    let mut corpus = Corpus::new();
    let mut scanned = 0usize;

    for entry in scanner::scan(root) {
        let path = entry?;
        scanned += 1;

        let fingerprint = hasher::fingerprint_file(&path)?;
        let page_count = if options.count_pages {
            pages::count_pages(&path)?
        } else {
            0
        };
        debug!("{}  {} ({} pages)", fingerprint, path.display(), page_count);

        corpus.put(FileRecord::new(&path, fingerprint, page_count));
    }

    Ok((corpus, scanned))
}

/// Run a full scan-and-sync against the configured Grist table.
pub async fn run(config: &SyncConfig, options: &SyncOptions) -> Result<SyncReport, SyncError> {
    // ── Phase 1: scan ─────────────────────────────────────────────────────
    info!("Scanning {}", config.pdf_folder.display());
    let (corpus, scanned) = build_corpus(&config.pdf_folder, options)?;
    info!("{} files scanned, {} unique", scanned, corpus.len());

    // ── Phase 2: sync ─────────────────────────────────────────────────────
    let transport = GristTransport::new(config)?;
    let client = SyncClient::new(transport, options);
    let synced = client.push(&corpus).await?;
    info!("{} records upserted to {}", synced, config.records_url());

    Ok(SyncReport {
        scanned,
        unique: corpus.len(),
        synced,
    })
}
