//! CLI binary for pdf2grist.
//!
//! A thin shim over the library crate with two modes:
//! a full scan-and-sync driven by a configuration file, and an ad-hoc
//! list-and-fingerprint mode that never touches the network.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2grist::{hasher, run, scanner, Corpus, FileRecord, SyncConfig, SyncOptions};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Full sync: scan PDF_FOLDER and upsert into the configured Grist table
  pdf2grist --conf grist.toml

  # Ad-hoc: list and fingerprint the PDFs under a folder, no network
  pdf2grist ~/Documents/archive

  # Sync without opening the PDFs (page counts recorded as 0)
  pdf2grist --conf grist.toml --no-pages

CONFIGURATION FILE (TOML):
  GRIST_API_KEY  = "secret"                        bearer credential
  GRIST_BASE     = "https://grist.example.org/api" API base URL
  GRIST_DOC_ID   = "abc123"                        target document
  GRIST_TABLE_ID = "Pdfs"                          target table
  PDF_FOLDER     = "/srv/archive"                  root to scan

EXIT STATUS:
  0 on full successful completion; non-zero on any configuration,
  filesystem, parse, or transport error. A run that dies mid-sync leaves
  already-submitted rows in place (each upsert is independent).
"#;

/// Sync PDF fingerprints and page counts into a Grist table.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2grist",
    version,
    about = "Scan a folder tree for PDFs and upsert their metadata into a Grist table",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Configuration file; runs the full scan-and-sync.
    #[arg(long, value_name = "PATH", conflicts_with = "folder")]
    conf: Option<PathBuf>,

    /// Folder to list and fingerprint without syncing.
    folder: Option<PathBuf>,

    /// Skip page counting (records carry n_pages = "0").
    #[arg(long, requires = "conf")]
    no_pages: bool,

    /// Total upsert attempts per record.
    #[arg(long, default_value_t = 5, requires = "conf")]
    max_retries: u32,

    /// Initial retry backoff in milliseconds (doubles per attempt).
    #[arg(long, default_value_t = 1000, requires = "conf")]
    backoff_ms: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match (&cli.conf, &cli.folder) {
        // ── Sync mode ────────────────────────────────────────────────────
        (Some(conf_path), _) => {
            let config = SyncConfig::load(conf_path)
                .with_context(|| format!("Failed to load '{}'", conf_path.display()))?;
            let options = SyncOptions {
                max_retries: cli.max_retries,
                backoff_base: Duration::from_millis(cli.backoff_ms),
                count_pages: !cli.no_pages,
            };

            let report = run(&config, &options).await.context("Sync failed")?;
            if !cli.quiet {
                eprintln!(
                    "✔ {} files scanned, {} unique, {} records synced",
                    report.scanned, report.unique, report.synced
                );
            }
            Ok(())
        }

        // ── List mode ────────────────────────────────────────────────────
        (None, Some(folder)) => {
            let mut corpus = Corpus::new();
            let mut listed = 0usize;
            for entry in scanner::scan(folder) {
                let path = entry.context("Scan failed")?;
                let fingerprint = hasher::fingerprint_file(&path)
                    .with_context(|| format!("Failed to hash '{}'", path.display()))?;
                println!("{fingerprint}  {}", path.display());
                corpus.put(FileRecord::new(&path, fingerprint, 0));
                listed += 1;
            }
            if !cli.quiet {
                eprintln!("{listed} files, {} unique", corpus.len());
            }
            Ok(())
        }

        (None, None) => anyhow::bail!("provide --conf <path> to sync or a <folder> to list"),
    }
}
