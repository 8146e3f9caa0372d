//! Configuration: the external file schema and the per-run knobs.
//!
//! Two layers on purpose:
//!
//! * [`SyncConfig`] is the deployment-specific part: credentials, target
//!   document/table, and the folder to scan. It is loaded exactly once at
//!   startup from a TOML file with a fixed key schema, validated eagerly,
//!   and immutable for the rest of the run. A missing or empty key fails
//!   before any scanning starts.
//!
//! * [`SyncOptions`] is the behavioural part: retry budget, backoff base
//!   and the page-counting toggle. Field observations of the original tool
//!   disagreed on the retry numbers (5 attempts / 1 s in one deployment,
//!   3 / 0.5 s in another), so these are knobs with documented defaults
//!   rather than constants.

use crate::error::SyncError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection and target settings, loaded from a TOML file.
///
/// The key names are deliberately the upper-case identifiers the original
/// deployment used, so existing configuration files keep working:
///
/// ```toml
/// GRIST_API_KEY  = "secret"
/// GRIST_BASE     = "https://grist.example.org/api"
/// GRIST_DOC_ID   = "abc123"
/// GRIST_TABLE_ID = "Pdfs"
/// PDF_FOLDER     = "/srv/archive"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Static bearer credential attached to every request.
    #[serde(rename = "GRIST_API_KEY")]
    pub api_key: String,

    /// Base URL of the Grist API, e.g. `https://grist.example.org/api`.
    #[serde(rename = "GRIST_BASE")]
    pub base_url: String,

    /// Target document identifier.
    #[serde(rename = "GRIST_DOC_ID")]
    pub doc_id: String,

    /// Target table identifier within the document.
    #[serde(rename = "GRIST_TABLE_ID")]
    pub table_id: String,

    /// Filesystem root to scan for PDFs.
    #[serde(rename = "PDF_FOLDER")]
    pub pdf_folder: PathBuf,
}

impl SyncConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    /// [`SyncError::ConfigRead`] if the file cannot be read,
    /// [`SyncError::ConfigParse`] on malformed TOML or a missing/unknown key,
    /// [`SyncError::InvalidConfig`] if a required value is empty.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SyncError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SyncConfig =
            toml::from_str(&raw).map_err(|source| SyncError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot possibly work.
    fn validate(&self) -> Result<(), SyncError> {
        let non_empty = [
            ("GRIST_API_KEY", &self.api_key),
            ("GRIST_BASE", &self.base_url),
            ("GRIST_DOC_ID", &self.doc_id),
            ("GRIST_TABLE_ID", &self.table_id),
        ];
        for (key, value) in non_empty {
            if value.trim().is_empty() {
                return Err(SyncError::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        if self.pdf_folder.as_os_str().is_empty() {
            return Err(SyncError::InvalidConfig(
                "PDF_FOLDER must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The upsert endpoint for the configured document and table.
    ///
    /// A trailing slash on `GRIST_BASE` is tolerated.
    pub fn records_url(&self) -> String {
        format!(
            "{}/docs/{}/tables/{}/records",
            self.base_url.trim_end_matches('/'),
            self.doc_id,
            self.table_id
        )
    }
}

/// Behavioural knobs for one run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Total upsert attempts per record, including the first. Default: 5.
    ///
    /// A budget of 1 disables retries entirely. Values of 0 are treated
    /// as 1, so a record is always attempted at least once.
    pub max_retries: u32,

    /// Delay before the second attempt; doubles after each further attempt
    /// (1 s → 2 s → 4 s → 8 s with the default budget). Default: 1 s.
    pub backoff_base: Duration,

    /// Open each PDF and extract its page count. Default: true.
    ///
    /// When disabled, records carry a page count of 0 and the files are
    /// never parsed, only read for hashing. Disabling this also removes
    /// the one fatal failure mode a malformed PDF can cause.
    pub count_pages: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_base: Duration::from_secs(1),
            count_pages: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"
GRIST_API_KEY  = "secret"
GRIST_BASE     = "https://grist.example.org/api"
GRIST_DOC_ID   = "abc123"
GRIST_TABLE_ID = "Pdfs"
PDF_FOLDER     = "/srv/archive"
"#;

    fn write_conf(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(content.as_bytes()).expect("write conf");
        f
    }

    #[test]
    fn loads_a_valid_file() {
        let f = write_conf(VALID);
        let config = SyncConfig::load(f.path()).expect("must load");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.table_id, "Pdfs");
        assert_eq!(config.pdf_folder, PathBuf::from("/srv/archive"));
    }

    #[test]
    fn records_url_joins_all_identifiers() {
        let f = write_conf(VALID);
        let config = SyncConfig::load(f.path()).expect("must load");
        assert_eq!(
            config.records_url(),
            "https://grist.example.org/api/docs/abc123/tables/Pdfs/records"
        );
    }

    #[test]
    fn records_url_tolerates_trailing_slash() {
        let f = write_conf(&VALID.replace("org/api", "org/api/"));
        let config = SyncConfig::load(f.path()).expect("must load");
        assert_eq!(
            config.records_url(),
            "https://grist.example.org/api/docs/abc123/tables/Pdfs/records"
        );
    }

    #[test]
    fn missing_key_is_a_parse_error() {
        let f = write_conf(&VALID.replace("GRIST_DOC_ID", "NOT_THE_DOC_ID"));
        match SyncConfig::load(f.path()) {
            Err(SyncError::ConfigParse { .. }) => {}
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn empty_value_is_rejected_eagerly() {
        let f = write_conf(&VALID.replace("\"secret\"", "\"\""));
        match SyncConfig::load(f.path()) {
            Err(SyncError::InvalidConfig(msg)) => {
                assert!(msg.contains("GRIST_API_KEY"), "got: {msg}")
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        match SyncConfig::load(Path::new("/definitely/not/here.toml")) {
            Err(SyncError::ConfigRead { .. }) => {}
            other => panic!("expected ConfigRead, got {other:?}"),
        }
    }

    #[test]
    fn options_defaults() {
        let options = SyncOptions::default();
        assert_eq!(options.max_retries, 5);
        assert_eq!(options.backoff_base, Duration::from_secs(1));
        assert!(options.count_pages);
    }
}
