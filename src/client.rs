//! Sync client: replay a corpus as idempotent upserts with retry/backoff.
//!
//! ## Wire contract
//!
//! One `PUT {base}/docs/{docId}/tables/{tableId}/records` per record, with a
//! body instructing Grist to find-or-create the row whose `MD5` column
//! equals the fingerprint and overwrite its other fields. Replaying the
//! same record twice therefore yields one row, not two. No batching: the
//! records endpoint accepts many records per request, but this client sends
//! one at a time so a failure is attributable to a single file.
//!
//! ## Retry Strategy
//!
//! Connection failures and HTTP 429/500/502/503/504 are transient and
//! retried with exponential backoff (`backoff_base * 2^(attempt-2)` before
//! attempt N): with a 1 s base and a budget of 5 attempts the wait sequence
//! is 1 s → 2 s → 4 s → 8 s. Every other non-2xx status propagates
//! immediately, since retrying a 401 or 404 only delays the inevitable.
//! Exhausting the budget aborts the whole run; records already submitted
//! stay submitted (no rollback, each upsert is an independent remote write).

use crate::config::{SyncConfig, SyncOptions};
use crate::corpus::{Corpus, FileRecord};
use crate::error::{SyncError, TransportError};
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

// ── Wire types ────────────────────────────────────────────────────────────

/// The upsert key: match on the `MD5` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequireKey {
    #[serde(rename = "MD5")]
    pub md5: String,
}

/// The fields written on match-or-create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFields {
    pub filename: String,
    #[serde(rename = "MD5")]
    pub md5: String,
    /// String-encoded integer; the table column is text.
    pub n_pages: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertRecord {
    pub require: RequireKey,
    pub fields: RecordFields,
}

/// Request body for the records endpoint. Always exactly one record here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertPayload {
    pub records: Vec<UpsertRecord>,
}

impl UpsertPayload {
    /// Build the single-record payload for one corpus entry.
    pub fn for_record(record: &FileRecord) -> Self {
        Self {
            records: vec![UpsertRecord {
                require: RequireKey {
                    md5: record.fingerprint.clone(),
                },
                fields: RecordFields {
                    filename: record.display_name.clone(),
                    md5: record.fingerprint.clone(),
                    n_pages: record.page_count.to_string(),
                },
            }],
        }
    }
}

// ── Transport seam ────────────────────────────────────────────────────────

/// Where upsert payloads land.
///
/// The production implementation is [`GristTransport`]; tests substitute
/// scripted stubs to exercise the retry policy without a server. The
/// transport reports outcomes, the [`SyncClient`] decides retry vs abort.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn upsert(&self, payload: &UpsertPayload) -> Result<(), TransportError>;
}

/// A borrowed transport is a transport. Lets callers keep hold of the
/// concrete value (tests inspect their stubs after the run).
impl<T: Transport + ?Sized> Transport for &T {
    async fn upsert(&self, payload: &UpsertPayload) -> Result<(), TransportError> {
        (**self).upsert(payload).await
    }
}

/// HTTP transport talking to a real Grist instance.
pub struct GristTransport {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl GristTransport {
    /// Build the transport from a validated configuration.
    ///
    /// Certificate validation is disabled on purpose: the original
    /// deployments target self-hosted Grist instances behind self-signed
    /// certificates. The bearer credential is still sent over TLS.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|err| TransportError::Connect(err.to_string()))?;
        Ok(Self {
            http,
            url: config.records_url(),
            api_key: config.api_key.clone(),
        })
    }
}

impl Transport for GristTransport {
    async fn upsert(&self, payload: &UpsertPayload) -> Result<(), TransportError> {
        let response = self
            .http
            .put(&self.url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|err| TransportError::Connect(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

// ── Client ────────────────────────────────────────────────────────────────

/// Replays a [`Corpus`] against a [`Transport`], strictly sequentially.
pub struct SyncClient<T: Transport> {
    transport: T,
    max_retries: u32,
    backoff_base: Duration,
}

impl<T: Transport> SyncClient<T> {
    pub fn new(transport: T, options: &SyncOptions) -> Self {
        Self {
            transport,
            // A record is always attempted at least once.
            max_retries: options.max_retries.max(1),
            backoff_base: options.backoff_base,
        }
    }

    /// Push every corpus entry, one request at a time, in corpus order.
    ///
    /// Returns the number of records submitted. The first unrecovered
    /// failure aborts the remainder: there is no per-record isolation, and
    /// already-submitted records are not rolled back.
    pub async fn push(&self, corpus: &Corpus) -> Result<usize, SyncError> {
        let mut synced = 0;
        for record in corpus.entries() {
            self.push_record(record).await?;
            synced += 1;
        }
        Ok(synced)
    }

    /// Upsert one record, retrying transient failures up to the budget.
    async fn push_record(&self, record: &FileRecord) -> Result<(), SyncError> {
        let payload = UpsertPayload::for_record(record);
        let mut last_err: Option<TransportError> = None;

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                let backoff = self.backoff_base * 2u32.pow(attempt - 2);
                warn!(
                    "{}: retry {}/{} after {:?}",
                    record.fingerprint, attempt, self.max_retries, backoff
                );
                sleep(backoff).await;
            }

            match self.transport.upsert(&payload).await {
                Ok(()) => {
                    debug!(
                        "{}: upserted '{}' ({} pages) on attempt {}",
                        record.fingerprint, record.display_name, record.page_count, attempt
                    );
                    return Ok(());
                }
                Err(err) if err.is_transient() => {
                    warn!("{}: attempt {} failed: {}", record.fingerprint, attempt, err);
                    last_err = Some(err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let last = last_err
            .unwrap_or_else(|| TransportError::Connect("no attempt was made".into()));
        Err(SyncError::RetriesExhausted {
            fingerprint: record.fingerprint.clone(),
            attempts: self.max_retries,
            last,
        })
    }
}
