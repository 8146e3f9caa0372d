//! Error types for the pdf2grist library.
//!
//! Two distinct error types reflect two distinct failure layers:
//!
//! * [`SyncError`] is everything the run can die of: configuration problems,
//!   filesystem failures during the scan, unparseable documents, and
//!   transport failures that were either permanent or exhausted their retry
//!   budget. Returned from every top-level entry point.
//!
//! * [`TransportError`] is the outcome of a single upsert attempt against
//!   the Grist API.
//!   [`TransportError::is_transient`] tells the retry loop in
//!   [`crate::client::SyncClient`] whether another attempt is worth making;
//!   the caller decides retry vs abort, not the transport.
//!
//! No error is swallowed: every failure surfaces at the process boundary and
//! terminates the run with a non-zero exit.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2grist library.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The configuration file could not be read at all.
    #[error("Failed to read configuration file '{path}': {source}\nPass the file with --conf <path>.")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but is not valid TOML / misses a key.
    #[error("Configuration file '{path}' is invalid: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configuration field was present but unusable (e.g. empty).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Filesystem errors ─────────────────────────────────────────────────
    /// The scan root is missing, a directory could not be entered, or a
    /// file read failed mid-hash.
    #[error("Filesystem error at '{path}': {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Format errors ─────────────────────────────────────────────────────
    /// A file with a .pdf extension could not be parsed as a PDF.
    #[error("Cannot parse '{path}' as a PDF: {detail}\nRun with page counting disabled to sync it anyway.")]
    Format { path: PathBuf, detail: String },

    // ── Transport errors ──────────────────────────────────────────────────
    /// A non-retryable transport failure (4xx other than 429).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A transient transport failure persisted past the retry budget.
    #[error("Upsert for fingerprint {fingerprint} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        fingerprint: String,
        attempts: u32,
        #[source]
        last: TransportError,
    },
}

/// Outcome of a single upsert attempt against the remote store.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced an HTTP response (DNS, connect, TLS,
    /// timeout). Always considered transient.
    #[error("Connection to the Grist API failed: {0}")]
    Connect(String),

    /// The server answered with a non-2xx status.
    #[error("Grist API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// Whether a retry is expected to help.
    ///
    /// Connection failures and the overload/rate-limit statuses
    /// (429, 500, 502, 503, 504) are transient; every other status is
    /// permanent and propagates immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Connect(_) => true,
            TransportError::Status { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
        }
    }
}
