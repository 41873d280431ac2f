//! Filesystem media store for entry attachments.
//!
//! Blobs live in one private directory under the data dir and are addressed
//! by bare file names of the form `<kind>_<epochSeconds>.<ext>`. Entries
//! store only the file name; absolute paths embed an app-container segment
//! that does not survive a reinstall, which is what makes path recovery
//! possible (see [`crate::recovery`]).

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{EntryKind, MediaRef};

const MEDIA_DIR_NAME: &str = "media";

/// Media blob storage rooted at a private per-app directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaStore {
    media_dir: PathBuf,
}

impl MediaStore {
    /// Create a store rooted at `<data_dir>/media`. The directory is created
    /// lazily on first write.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            media_dir: data_dir.join(MEDIA_DIR_NAME),
        }
    }

    /// The private media directory this store resolves against.
    #[must_use]
    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Copy a source file into the store under a generated name.
    ///
    /// If a file already exists at the generated name it is removed first
    /// (delete-then-copy), so a repeated save is idempotent-safe.
    pub async fn save(&self, kind: EntryKind, source: &Path) -> Result<MediaRef> {
        let file_name = generated_file_name(kind)?;
        let destination = self.prepare_destination(&file_name).await?;
        fs::copy(source, &destination).await?;
        Ok(MediaRef::new(file_name))
    }

    /// Write an in-memory buffer into the store under a generated name
    /// (e.g. an encoded photo that never touched disk).
    pub async fn import_bytes(&self, kind: EntryKind, bytes: &[u8]) -> Result<MediaRef> {
        let file_name = generated_file_name(kind)?;
        let destination = self.prepare_destination(&file_name).await?;
        fs::write(&destination, bytes).await?;
        Ok(MediaRef::new(file_name))
    }

    /// Write bytes under an exact caller-supplied file name, used when
    /// materializing assets downloaded from the remote mirror. A file that
    /// already exists under that name is kept untouched.
    pub async fn restore(&self, file_name: &str, bytes: &[u8]) -> Result<MediaRef> {
        let file_name = file_name.trim();
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(Error::InvalidInput(format!(
                "Invalid media file name: {file_name:?}"
            )));
        }

        let reference = MediaRef::new(file_name);
        if self.exists(&reference) {
            return Ok(reference);
        }

        fs::create_dir_all(&self.media_dir).await?;
        fs::write(self.media_dir.join(file_name), bytes).await?;
        Ok(reference)
    }

    /// Compute the expected absolute location of a reference.
    ///
    /// Legacy absolute-path references resolve as-is; bare file names join
    /// the current media directory. Does not guarantee the file exists.
    #[must_use]
    pub fn resolve(&self, reference: &MediaRef) -> PathBuf {
        if reference.is_absolute() {
            PathBuf::from(reference.as_str())
        } else {
            self.media_dir.join(reference.file_name())
        }
    }

    /// Whether the resolved location currently exists on disk.
    #[must_use]
    pub fn exists(&self, reference: &MediaRef) -> bool {
        self.resolve(reference).is_file()
    }

    /// Best-effort removal; deletion is cleanup, not a correctness-critical
    /// path, so failures are logged and swallowed.
    pub async fn delete(&self, reference: &MediaRef) {
        let path = self.resolve(reference);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to delete media file");
            }
        }
    }

    async fn prepare_destination(&self, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.media_dir).await?;
        let destination = self.media_dir.join(file_name);
        match fs::remove_file(&destination).await {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }
        Ok(destination)
    }
}

fn generated_file_name(kind: EntryKind) -> Result<String> {
    let extension = kind.media_extension().ok_or_else(|| {
        Error::InvalidInput(format!("Entry kind '{kind}' does not carry media"))
    })?;
    let epoch_seconds = chrono::Utc::now().timestamp();
    Ok(format!("{}_{epoch_seconds}.{extension}", kind.file_prefix()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn save_copies_into_media_dir_with_generated_name() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("clip.m4a");
        std::fs::write(&source, b"pcm").unwrap();

        let store = MediaStore::new(root.path());
        let reference = store.save(EntryKind::Audio, &source).await.unwrap();

        assert!(reference.file_name().starts_with("audio_"));
        assert!(reference.file_name().ends_with(".m4a"));
        assert!(!reference.is_absolute());
        assert!(store.exists(&reference));
        assert_eq!(std::fs::read(store.resolve(&reference)).unwrap(), b"pcm");
    }

    #[tokio::test]
    async fn import_bytes_writes_photo() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        let reference = store.import_bytes(EntryKind::Photo, b"jpeg").await.unwrap();
        assert!(reference.file_name().starts_with("photo_"));
        assert!(reference.file_name().ends_with(".jpg"));
        assert!(store.exists(&reference));
    }

    #[tokio::test]
    async fn text_kind_cannot_generate_media_names() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        let error = store.import_bytes(EntryKind::Text, b"x").await.unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn restore_keeps_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        store.restore("audio_1.m4a", b"original").await.unwrap();
        store.restore("audio_1.m4a", b"replacement").await.unwrap();

        let path = store.resolve(&MediaRef::new("audio_1.m4a"));
        assert_eq!(std::fs::read(path).unwrap(), b"original");
    }

    #[tokio::test]
    async fn restore_rejects_path_segments() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        assert!(store.restore("../escape.m4a", b"x").await.is_err());
        assert!(store.restore("", b"x").await.is_err());
    }

    #[tokio::test]
    async fn resolve_passes_absolute_references_through() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        let reference = MediaRef::new("/somewhere/else/video_1.mov");
        assert_eq!(
            store.resolve(&reference),
            PathBuf::from("/somewhere/else/video_1.mov")
        );
    }

    #[tokio::test]
    async fn delete_is_best_effort() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        // Missing file: swallowed, no panic.
        store.delete(&MediaRef::new("video_9.mov")).await;

        let reference = store.import_bytes(EntryKind::Video, b"mov").await.unwrap();
        store.delete(&reference).await;
        assert!(!store.exists(&reference));
    }
}
