//! Content fingerprinting: streaming MD5 over a file's bytes.
//!
//! The fingerprint is the dedup key in the [`crate::corpus::Corpus`] *and*
//! the upsert key in the remote table (its `MD5` column), so the algorithm
//! is fixed. MD5 is a content identifier here, not a security boundary.
//!
//! Files are read in bounded 64 KiB chunks so arbitrarily large PDFs never
//! have to fit in memory. I/O failures propagate to the caller; a file that
//! cannot be read aborts the scan.

use crate::error::SyncError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read buffer size. Large enough to amortise syscalls, small enough to be
/// a plain stack array.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the lowercase-hex MD5 fingerprint of a file's content.
///
/// Deterministic across runs and identical for byte-identical files
/// regardless of filename or path.
///
/// # Errors
/// [`SyncError::Filesystem`] if the file cannot be opened or a read fails
/// mid-stream.
pub fn fingerprint_file(path: &Path) -> Result<String, SyncError> {
    let fs_err = |source| SyncError::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(fs_err)?;
    let mut context = md5::Context::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(fs_err)?;
        if n == 0 {
            break;
        }
        context.consume(&buf[..n]);
    }
    Ok(format!("{:x}", context.compute()))
}
