//! The corpus: one deduplicated record per content fingerprint.
//!
//! A run builds exactly one [`Corpus`] in memory, owned by the scan phase,
//! then hands it read-only to the sync phase. There is no removal and no
//! persistence; the mapping lives for one run and dies with the process.
//!
//! Collision policy: a second file with an already-seen fingerprint
//! *replaces* the stored record wholesale (name, pages, ancestry: a full
//! overwrite, not a merge), while keeping the slot's original position so
//! iteration stays in first-insertion order.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Metadata for one unique file content, as it will be upserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Lowercase-hex MD5 of the file content; the dedup and upsert key.
    pub fingerprint: String,

    /// Base name without extension. Descriptive only: two different
    /// files may share it, and duplicates overwrite it.
    pub display_name: String,

    /// Page count, or 0 when structural inspection was skipped.
    pub page_count: u32,

    /// Parent directories from the file up to the filesystem root.
    /// Provenance/debug data, not part of the upsert key.
    pub ancestors: Vec<PathBuf>,
}

impl FileRecord {
    /// Build a record for a scanned file.
    pub fn new(path: &Path, fingerprint: String, page_count: u32) -> Self {
        let display_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ancestors = path.ancestors().skip(1).map(Path::to_path_buf).collect();
        Self {
            fingerprint,
            display_name,
            page_count,
            ancestors,
        }
    }
}

/// In-memory mapping from fingerprint to [`FileRecord`].
#[derive(Debug, Default)]
pub struct Corpus {
    /// fingerprint → slot in `records`.
    index: HashMap<String, usize>,
    records: Vec<FileRecord>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or unconditionally overwrite the record for its fingerprint.
    pub fn put(&mut self, record: FileRecord) {
        match self.index.get(&record.fingerprint) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.index.insert(record.fingerprint.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Current records, in first-insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Look up a record by fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<&FileRecord> {
        self.index.get(fingerprint).map(|&slot| &self.records[slot])
    }

    /// Number of unique fingerprints held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
