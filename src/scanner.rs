//! Tree scanning: enumerate candidate PDF paths under a root.
//!
//! The walk is lazy (nothing is read from disk until the iterator is
//! driven) and prunes hidden subtrees instead of filtering after the fact,
//! so a `.git/` full of blobs is never descended into. "Hidden" follows the
//! dotfile convention: any path segment starting with `.`, which excludes
//! both hidden files and everything inside hidden directories. The root
//! itself is exempt so `scan(Path::new("."))` works.
//!
//! Ordering is whatever the filesystem returns and is not stable across
//! runs. Callers must not depend on it for correctness; within one run it
//! only determines which of two identical files wins the corpus slot.

use crate::error::SyncError;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_pdf(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .map(|ext| ext == "pdf")
            .unwrap_or(false)
}

/// Lazily yield every visible `*.pdf` file under `root`, recursively.
///
/// Walk failures (missing root, unreadable directory) are yielded as
/// [`SyncError::Filesystem`] items so the caller's `?` aborts the scan.
pub fn scan(root: &Path) -> impl Iterator<Item = Result<PathBuf, SyncError>> {
    let root = root.to_path_buf();
    WalkDir::new(root.clone())
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(move |entry| match entry {
            Ok(entry) if is_pdf(&entry) => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                Some(Err(SyncError::Filesystem {
                    path,
                    source: err.into(),
                }))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, b"x").expect("write");
    }

    fn scan_sorted(root: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = scan(root).map(|r| r.expect("scan entry")).collect();
        found.sort();
        found
    }

    #[test]
    fn finds_nested_pdfs_and_ignores_other_extensions() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("sub/deeper/c.pdf"));

        let found = scan_sorted(dir.path());
        assert_eq!(
            found,
            vec![dir.path().join("a.pdf"), dir.path().join("sub/deeper/c.pdf")]
        );
    }

    #[test]
    fn never_yields_a_dot_prefixed_segment() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join(".b.pdf"));
        touch(&dir.path().join(".hidden/inside.pdf"));
        touch(&dir.path().join("sub/.also_hidden/deep.pdf"));

        let found = scan_sorted(dir.path());
        assert_eq!(found, vec![dir.path().join("a.pdf")]);
        for path in &found {
            let below_root = path.strip_prefix(dir.path()).unwrap();
            assert!(
                !below_root
                    .components()
                    .any(|c| c.as_os_str().to_string_lossy().starts_with('.')),
                "hidden segment leaked: {}",
                path.display()
            );
        }
    }

    #[test]
    fn extension_match_is_exact() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("upper.PDF"));
        touch(&dir.path().join("archive.pdf.bak"));
        touch(&dir.path().join("real.pdf"));

        let found = scan_sorted(dir.path());
        assert_eq!(found, vec![dir.path().join("real.pdf")]);
    }

    #[test]
    fn missing_root_is_a_filesystem_error() {
        let mut it = scan(Path::new("/no/such/root"));
        match it.next() {
            Some(Err(SyncError::Filesystem { .. })) => {}
            other => panic!("expected Filesystem error, got {other:?}"),
        }
    }
}
