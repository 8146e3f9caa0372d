//! # pdf2grist
//!
//! One-shot batch synchroniser: scan a folder tree for PDF files, fingerprint
//! each by content, deduplicate, and upsert the metadata into a
//! [Grist](https://www.getgrist.com/) table.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder tree
//!  │
//!  ├─ 1. Scan     walk the tree, keep visible *.pdf files
//!  ├─ 2. Hash     streaming MD5 fingerprint per file
//!  ├─ 3. Inspect  page count via lopdf (optional)
//!  ├─ 4. Dedup    one corpus record per fingerprint, last write wins
//!  └─ 5. Sync     sequential idempotent upserts, retry on transient failure
//! ```
//!
//! The scan phase completes fully before the sync phase begins; everything
//! is single-threaded and sequential by design. Records keyed on the `MD5`
//! column make the sync idempotent: re-running against the same tree and
//! table converges on the same rows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2grist::{run, SyncConfig, SyncOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SyncConfig::load(Path::new("grist.toml"))?;
//!     let report = run(&config, &SyncOptions::default()).await?;
//!     eprintln!("{} scanned, {} unique, {} synced",
//!         report.scanned, report.unique, report.synced);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2grist` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod corpus;
pub mod error;
pub mod hasher;
pub mod pages;
pub mod scanner;
pub mod sync;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{GristTransport, SyncClient, Transport, UpsertPayload};
pub use config::{SyncConfig, SyncOptions};
pub use corpus::{Corpus, FileRecord};
pub use error::{SyncError, TransportError};
pub use sync::{build_corpus, run, SyncReport};
