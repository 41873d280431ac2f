//! Journal service: the single logical writer over the local catalog.
//!
//! All catalog mutations funnel through this service and each one is
//! followed by a synchronous persist attempt whose failure is logged, not
//! raised; the in-memory list stays the source of truth until the next
//! successful persist. Long-running work (media copies, mirror traffic,
//! transcription) is async and rejoins the service only to mutate state.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::LocalCatalog;
use crate::config::JournalConfig;
use crate::error::{Error, Result};
use crate::media::MediaStore;
use crate::models::{Entry, EntryId, EntryKind};
use crate::recovery::recover_media_paths;
use crate::sync::{merge_catalogs, RemoteMirror, SyncState, SyncStatus};

/// External speech-to-text capability, injected at the seam; the network
/// call itself is out of scope for this crate.
#[allow(async_fn_in_trait)]
pub trait Transcriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Owns the catalog, media store, remote mirror, and sync status.
#[derive(Debug)]
pub struct JournalService<M> {
    catalog: LocalCatalog,
    store: MediaStore,
    mirror: M,
    status: SyncStatus,
}

impl<M: RemoteMirror> JournalService<M> {
    /// Load the catalog from the configured data dir and run media path
    /// recovery once (repairing references broken by a reinstall/restore).
    #[must_use]
    pub fn open(config: &JournalConfig, mirror: M) -> Self {
        let store = MediaStore::new(&config.data_dir);
        let mut catalog = LocalCatalog::load(config.catalog_path());
        let repaired = recover_media_paths(&mut catalog, &store);
        if repaired > 0 {
            info!(repaired, "repaired media references on launch");
        }
        Self {
            catalog,
            store,
            mirror,
            status: SyncStatus::new(),
        }
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        self.catalog.entries()
    }

    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.catalog.get(id)
    }

    #[must_use]
    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    /// Current sync status; poll `status().version()` for changes.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Re-run media path recovery on demand (it already runs once in
    /// [`Self::open`]). Returns the number of repaired references.
    pub fn recover(&mut self) -> usize {
        recover_media_paths(&mut self.catalog, &self.store)
    }

    /// Create and persist a text entry.
    pub fn create_text_entry(&mut self, body: impl Into<String>, mood: Option<String>) -> EntryId {
        let mut entry = Entry::text(body);
        entry.mood = mood;
        let id = entry.id;
        self.catalog.append(entry);
        id
    }

    /// Create a media entry: the source file is copied into the media store
    /// first, then the entry is appended and persisted. The local persist
    /// completes before any mirror traffic is attempted.
    pub async fn create_media_entry(
        &mut self,
        kind: EntryKind,
        source: &Path,
        body: impl Into<String>,
        mood: Option<String>,
    ) -> Result<EntryId> {
        let reference = self.store.save(kind, source).await?;
        let mut entry = match kind {
            EntryKind::Audio => Entry::audio(reference),
            EntryKind::Video => Entry::video(reference),
            EntryKind::Photo => Entry::photos(vec![reference])?,
            EntryKind::Text => {
                return Err(Error::InvalidInput(
                    "Text entries do not carry media".to_string(),
                ))
            }
        };
        entry.body = body.into();
        entry.mood = mood;
        let id = entry.id;
        self.catalog.append(entry);
        Ok(id)
    }

    /// Delete an entry and best-effort remove every media file it owns.
    ///
    /// Deletion is not propagated to the remote mirror (no tombstone), so a
    /// deleted entry can reappear after a later download-merge.
    pub async fn delete_entry(&mut self, id: &EntryId) -> Result<()> {
        let Some(removed) = self.catalog.remove(id) else {
            return Err(Error::NotFound(id.to_string()));
        };
        for reference in removed.media_refs() {
            self.store.delete(reference).await;
        }
        Ok(())
    }

    /// Transcribe an entry's audio through the injected capability and store
    /// the transcript. A transcription failure is surfaced to the caller but
    /// leaves the entry saved without a transcript.
    pub async fn set_transcript<T: Transcriber>(
        &mut self,
        id: &EntryId,
        transcriber: &T,
    ) -> Result<()> {
        let reference = self
            .catalog
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?
            .audio
            .clone()
            .ok_or_else(|| Error::InvalidInput("Entry has no audio to transcribe".to_string()))?;

        let audio = tokio::fs::read(self.store.resolve(&reference)).await?;
        let transcript = transcriber.transcribe(&audio).await?;

        if let Some(entry) = self
            .catalog
            .entries_mut()
            .iter_mut()
            .find(|entry| entry.id == *id)
        {
            entry.transcript = Some(transcript);
        }
        self.catalog.persist_logged();
        Ok(())
    }

    /// Run one full sync round: account check, upload, download, merge.
    ///
    /// Status moves to `Syncing`, then `Synced` or `Error` (`NoAccount` when
    /// the account check reports no signed-in user). Mirror failures never
    /// corrupt local state.
    pub async fn sync(&mut self) -> Result<()> {
        self.status.advance(SyncState::Syncing);
        let outcome = self.sync_round().await;
        match &outcome {
            Ok(()) => {
                self.status.advance(SyncState::Synced);
            }
            Err(Error::AccountUnavailable(reason)) => {
                info!(%reason, "sync skipped, account unavailable");
                self.status.advance(SyncState::Error);
                self.status.advance(SyncState::NoAccount);
            }
            Err(error) => {
                warn!(%error, "sync failed");
                self.status.advance(SyncState::Error);
            }
        }
        outcome
    }

    async fn sync_round(&mut self) -> Result<()> {
        self.mirror.check_account().await?;
        self.mirror.upload(self.catalog.entries()).await?;

        let downloaded = self.mirror.download().await?;
        let mut remote_entries = Vec::with_capacity(downloaded.len());
        for (entry, blobs) in downloaded {
            for blob in blobs {
                if let Err(error) = self.store.restore(&blob.file_name, &blob.data).await {
                    warn!(file_name = %blob.file_name, %error, "failed to materialize downloaded asset");
                }
            }
            remote_entries.push(entry);
        }

        let merged = merge_catalogs(self.catalog.entries(), remote_entries);
        self.catalog.replace_all(merged);
        Ok(())
    }
}
