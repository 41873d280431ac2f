//! Local entry catalog: the authoritative on-device list of all entries.
//!
//! The whole catalog is persisted as one serialized blob. Storage order is
//! insertion order, newest first by construction; loading never fails to the
//! caller (an unreadable blob yields an empty catalog).

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::models::{Entry, EntryId};

/// In-memory entry list plus the blob path it persists to.
#[derive(Debug)]
pub struct LocalCatalog {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl LocalCatalog {
    /// Load the catalog from its blob path.
    ///
    /// Fails open: a missing file or an undeserializable blob produces an
    /// empty catalog and a warning, never an error.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Vec<Entry>>(&bytes) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(path = %path.display(), %error, "catalog blob unreadable, starting empty");
                    Vec::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read catalog blob, starting empty");
                Vec::new()
            }
        };
        Self { path, entries }
    }

    /// Blob path this catalog persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by id.
    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == *id)
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    /// Insert at the head (storage order is most-recent-first) and persist
    /// synchronously.
    pub fn append(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
        self.persist_logged();
    }

    /// Remove the entry with the matching id and persist. Returns the removed
    /// entry so the caller can clean up its media files.
    pub fn remove(&mut self, id: &EntryId) -> Option<Entry> {
        let position = self.entries.iter().position(|entry| entry.id == *id)?;
        let removed = self.entries.remove(position);
        self.persist_logged();
        Some(removed)
    }

    /// Replace the whole list (bulk merge-replace after a mirror sync) and
    /// persist.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.persist_logged();
    }

    /// Serialize the full ordered list and atomically replace the previous
    /// blob: the write lands in a sibling temp file that is renamed over the
    /// old blob, so readers never observe a partial write.
    pub fn persist(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &bytes)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Persist, logging and swallowing failures. The in-memory state stays
    /// authoritative until the next successful persist; a crash in between
    /// loses the mutation (documented limitation of the journaling tool).
    pub(crate) fn persist_logged(&self) {
        if let Err(error) = self.persist() {
            warn!(path = %self.path.display(), %error, "failed to persist catalog, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::MediaRef;

    fn catalog_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("catalog.json")
    }

    #[test]
    fn load_missing_blob_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = LocalCatalog::load(catalog_path(&dir));
        assert!(catalog.is_empty());
    }

    #[test]
    fn load_garbage_blob_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(&dir);
        std::fs::write(&path, b"{not json").unwrap();

        let catalog = LocalCatalog::load(&path);
        assert!(catalog.is_empty());
    }

    #[test]
    fn append_then_load_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(&dir);

        let mut entry = Entry::audio(MediaRef::new("audio_1700000000.m4a"));
        entry.mood = Some("calm".to_string());
        entry.transcript = Some("today I...".to_string());
        entry.body = "morning walk".to_string();

        let mut catalog = LocalCatalog::load(&path);
        catalog.append(entry.clone());

        let reloaded = LocalCatalog::load(&path);
        assert_eq!(reloaded.entries(), &[entry]);
    }

    #[test]
    fn optional_fields_stay_absent_through_the_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(&dir);

        let mut catalog = LocalCatalog::load(&path);
        catalog.append(Entry::text("plain"));

        let reloaded = LocalCatalog::load(&path);
        let entry = &reloaded.entries()[0];
        assert_eq!(entry.mood, None);
        assert_eq!(entry.transcript, None);

        let blob = std::fs::read_to_string(&path).unwrap();
        assert!(!blob.contains("\"mood\""));
    }

    #[test]
    fn append_inserts_at_head() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = LocalCatalog::load(catalog_path(&dir));

        let first = Entry::text("first");
        let second = Entry::text("second");
        catalog.append(first.clone());
        catalog.append(second.clone());

        assert_eq!(catalog.entries()[0].id, second.id);
        assert_eq!(catalog.entries()[1].id, first.id);
    }

    #[test]
    fn remove_returns_the_entry_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(&dir);
        let mut catalog = LocalCatalog::load(&path);

        let entry = Entry::text("to delete");
        let id = entry.id;
        catalog.append(entry);
        catalog.append(Entry::text("keeper"));

        let removed = catalog.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.remove(&id).is_none());

        let reloaded = LocalCatalog::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get(&id).is_none());
    }

    #[test]
    fn failed_persist_keeps_old_blob_and_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(&dir);
        let mut catalog = LocalCatalog::load(&path);

        let persisted = Entry::text("persisted");
        catalog.append(persisted.clone());

        // A directory squatting on the temp path makes the next write fail
        // before the rename, so the old blob is never touched.
        std::fs::create_dir(path.with_extension("tmp")).unwrap();
        assert!(catalog.persist().is_err());

        catalog.append(Entry::text("lost if we crash now"));

        // In-memory state is still the source of truth...
        assert_eq!(catalog.len(), 2);
        // ...while the blob on disk is the last successful persist.
        let reloaded = LocalCatalog::load(&path);
        assert_eq!(reloaded.entries(), &[persisted]);
    }

    #[test]
    fn persist_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(&dir);
        let mut catalog = LocalCatalog::load(&path);
        catalog.append(Entry::text("x"));

        assert!(path.is_file());
        assert!(!path.with_extension("tmp").exists());
    }
}
