//! HTTP-backed remote mirror client.
//!
//! Bearer-auth JSON client against the per-user record store. The service
//! offers no upsert-by-key, so an upload first queries every remote record
//! id, then partitions creates from updates and submits them in bounded
//! sequential batches; the first failing batch aborts the rest.

use std::collections::HashSet;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::MirrorConfig;
use crate::error::{Error, Result};
use crate::media::MediaStore;
use crate::models::Entry;
use crate::sync::{AssetBlob, EntryRecord, RemoteMirror};

/// Remote-service write limit per batch.
const UPLOAD_BATCH_SIZE: usize = 400;

const ACCOUNT_ROUTE: &str = "/v1/account";
const ENTRIES_ROUTE: &str = "/v1/entries";
const MODIFY_ROUTE: &str = "/v1/entries/modify";

/// Remote mirror over the journal record service.
#[derive(Debug, Clone)]
pub struct HttpMirror {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
    store: MediaStore,
}

impl HttpMirror {
    /// Build a mirror for a configured endpoint. The media store is used to
    /// resolve references to local asset bytes during upload.
    pub fn new(config: &MirrorConfig, store: MediaStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| Error::Service(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self {
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
            client,
            store,
        })
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<RecordPage> {
        let mut request = self
            .client
            .get(format!("{}{ENTRIES_ROUTE}", self.base_url))
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json");
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request
            .send()
            .await
            .map_err(|error| Error::Service(format!("Record query failed: {error}")))?;
        let response = check_status(response).await?;
        response
            .json::<RecordPage>()
            .await
            .map_err(|error| Error::Service(format!("Failed to parse record page: {error}")))
    }

    /// Paginate through all remote records, fetch-until-cursor-is-empty.
    async fn fetch_all_records(&self) -> Result<Vec<EntryRecord>> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            records.extend(page.records);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        Ok(records)
    }

    async fn submit_batch(&self, route: &str, records: &[EntryRecord]) -> Result<()> {
        let response = self
            .client
            .post(format!("{}{route}", self.base_url))
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .json(&serde_json::json!({ "records": records }))
            .send()
            .await
            .map_err(|error| Error::Service(format!("Batch write failed: {error}")))?;
        check_status(response).await?;
        Ok(())
    }
}

impl RemoteMirror for HttpMirror {
    async fn check_account(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}{ACCOUNT_ROUTE}", self.base_url))
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|error| Error::Service(format!("Account check failed: {error}")))?;
        check_status(response).await?;
        Ok(())
    }

    async fn upload(&self, entries: &[Entry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        // No server-side upsert-by-key: learn which ids already exist first.
        let existing: HashSet<String> = self
            .fetch_all_records()
            .await?
            .into_iter()
            .filter_map(|record| record.entry_id)
            .collect();

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for entry in entries {
            let record = EntryRecord::from_entry(entry, &self.store);
            if existing.contains(&entry.id.as_str()) {
                updates.push(record);
            } else {
                creates.push(record);
            }
        }
        debug!(
            creates = creates.len(),
            updates = updates.len(),
            "uploading entries to remote mirror"
        );

        let mut submitted = 0_usize;
        for (route, records) in [(ENTRIES_ROUTE, creates), (MODIFY_ROUTE, updates)] {
            for batch in records.chunks(UPLOAD_BATCH_SIZE) {
                if let Err(error) = self.submit_batch(route, batch).await {
                    // No partial-success tracking: earlier batches stay
                    // applied remotely, the rest are abandoned.
                    if submitted > 0 {
                        return Err(Error::PartialBatchFailure(format!(
                            "aborted after {submitted} submitted batches: {error}"
                        )));
                    }
                    return Err(error);
                }
                submitted += 1;
            }
        }
        Ok(())
    }

    async fn download(&self) -> Result<Vec<(Entry, Vec<AssetBlob>)>> {
        let records = self.fetch_all_records().await?;
        let total = records.len();
        let entries: Vec<(Entry, Vec<AssetBlob>)> = records
            .into_iter()
            .filter_map(EntryRecord::into_entry)
            .collect();
        if entries.len() < total {
            warn!(
                dropped = total - entries.len(),
                "dropped remote records missing required fields"
            );
        }
        Ok(entries)
    }
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<EntryRecord>,
    #[serde(default)]
    cursor: Option<String>,
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = format!("HTTP {}: {}", status.as_u16(), compact_text(&body));
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(Error::AccountUnavailable(message))
    } else {
        Err(Error::Service(message))
    }
}

/// Truncate response bodies to keep error messages readable.
fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn record_page_tolerates_missing_fields() {
        let page: RecordPage = serde_json::from_str("{}").unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.cursor, None);

        let page: RecordPage =
            serde_json::from_str(r#"{"records": [], "cursor": "abc"}"#).unwrap();
        assert_eq!(page.cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn compact_text_truncates_long_bodies() {
        let long = "x".repeat(400);
        assert_eq!(compact_text(&long).len(), 180);
        assert_eq!(compact_text("  short  "), "short");
    }
}
