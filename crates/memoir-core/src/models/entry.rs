//! Journal entry model

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A unique identifier for an entry, using UUID v7 (time-sortable).
///
/// The id is the merge key between local and remote copies; it is assigned
/// once at creation and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Create a new unique entry ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// What an entry captures. Immutable once created; determines which media
/// references are legal (a `Text` entry never owns media).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Plain written entry
    Text,
    /// Voice recording
    Audio,
    /// Video recording
    Video,
    /// One or more photos
    Photo,
}

impl EntryKind {
    /// Prefix used when generating media file names (`audio_1700000000.m4a`).
    #[must_use]
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Photo => "photo",
        }
    }

    /// Media file extension for this kind, `None` for text entries.
    #[must_use]
    pub const fn media_extension(self) -> Option<&'static str> {
        match self {
            Self::Text => None,
            Self::Audio => Some("m4a"),
            Self::Video => Some("mov"),
            Self::Photo => Some("jpg"),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}

impl FromStr for EntryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            "photo" => Ok(Self::Photo),
            other => Err(Error::InvalidInput(format!("Unknown entry kind: {other}"))),
        }
    }
}

/// A stable handle to a media file.
///
/// Normally holds a bare file name that the media store resolves against its
/// current private directory. Catalogs written by older builds may hold an
/// absolute path whose container segment is stale after a reinstall; path
/// recovery rewrites those back to bare file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// The stored location string, verbatim.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component; equals the whole string for bare file names.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0)
    }

    /// Whether the stored location is an absolute path (legacy catalogs).
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        Path::new(&self.0).is_absolute()
    }
}

/// A journal entry.
///
/// `id`, `created_at`, and `kind` are immutable after creation; everything
/// else may be edited. Optional fields round-trip as absent-vs-present
/// through the catalog blob and the remote record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, stable across local and remote copies
    pub id: EntryId,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Display title, defaults to a timestamp-derived string
    pub title: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Free text (caption, notes, transcript-derived)
    #[serde(default)]
    pub body: String,
    /// Audio recording reference (audio entries only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaRef>,
    /// Video recording reference (video entries only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaRef>,
    /// Photo references (photo entries only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<MediaRef>,
    /// Optional mood tag (short string or emoji)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Optional transcript produced by an external transcription call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl Entry {
    fn blank(kind: EntryKind) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: EntryId::new(),
            created_at: now,
            title: Self::title_for_timestamp(now),
            kind,
            body: String::new(),
            audio: None,
            video: None,
            photos: Vec::new(),
            mood: None,
            transcript: None,
        }
    }

    /// Create a text entry with the given body.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        let mut entry = Self::blank(EntryKind::Text);
        entry.body = body.into();
        entry
    }

    /// Create an audio entry owning one recording reference.
    #[must_use]
    pub fn audio(recording: MediaRef) -> Self {
        let mut entry = Self::blank(EntryKind::Audio);
        entry.audio = Some(recording);
        entry
    }

    /// Create a video entry owning one recording reference.
    #[must_use]
    pub fn video(recording: MediaRef) -> Self {
        let mut entry = Self::blank(EntryKind::Video);
        entry.video = Some(recording);
        entry
    }

    /// Create a photo entry owning one or more photo references.
    pub fn photos(photos: Vec<MediaRef>) -> Result<Self> {
        if photos.is_empty() {
            return Err(Error::InvalidInput(
                "Photo entry requires at least one photo reference".to_string(),
            ));
        }
        let mut entry = Self::blank(EntryKind::Photo);
        entry.photos = photos;
        Ok(entry)
    }

    /// Default title derived from a Unix-ms creation timestamp, in local time.
    #[must_use]
    pub fn title_for_timestamp(created_at_ms: i64) -> String {
        chrono::Local
            .timestamp_millis_opt(created_at_ms)
            .single()
            .map_or_else(
                || "Journal entry".to_string(),
                |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
            )
    }

    /// Every media reference this entry owns.
    pub fn media_refs(&self) -> impl Iterator<Item = &MediaRef> {
        self.audio
            .iter()
            .chain(self.video.iter())
            .chain(self.photos.iter())
    }

    /// Mutable view of every media reference; used by path recovery.
    pub fn media_refs_mut(&mut self) -> impl Iterator<Item = &mut MediaRef> {
        self.audio
            .iter_mut()
            .chain(self.video.iter_mut())
            .chain(self.photos.iter_mut())
    }

    /// Whether this entry owns any media reference.
    #[must_use]
    pub fn has_media(&self) -> bool {
        self.media_refs().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_entry_id_unique() {
        let id1 = EntryId::new();
        let id2 = EntryId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_entry_id_parse() {
        let id = EntryId::new();
        let parsed: EntryId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_kind_parse_round_trip() {
        for kind in [
            EntryKind::Text,
            EntryKind::Audio,
            EntryKind::Video,
            EntryKind::Photo,
        ] {
            let parsed: EntryKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
        assert!("gif".parse::<EntryKind>().is_err());
    }

    #[test]
    fn test_text_entry_has_no_media() {
        let entry = Entry::text("dear diary");
        assert_eq!(entry.kind, EntryKind::Text);
        assert_eq!(entry.body, "dear diary");
        assert!(!entry.has_media());
        assert!(entry.created_at > 0);
        assert!(!entry.title.is_empty());
    }

    #[test]
    fn test_photo_entry_requires_refs() {
        assert!(Entry::photos(Vec::new()).is_err());

        let entry = Entry::photos(vec![
            MediaRef::new("photo_1.jpg"),
            MediaRef::new("photo_2.jpg"),
        ])
        .unwrap();
        assert_eq!(entry.media_refs().count(), 2);
    }

    #[test]
    fn test_media_ref_file_name() {
        assert_eq!(MediaRef::new("audio_1.m4a").file_name(), "audio_1.m4a");
        assert_eq!(
            MediaRef::new("/old/container/media/audio_1.m4a").file_name(),
            "audio_1.m4a"
        );
        assert!(MediaRef::new("/old/container/media/audio_1.m4a").is_absolute());
        assert!(!MediaRef::new("audio_1.m4a").is_absolute());
    }

    #[test]
    fn test_optional_fields_serialize_as_absent() {
        let entry = Entry::text("no extras");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"mood\""));
        assert!(!json.contains("\"transcript\""));
        assert!(!json.contains("\"audio\""));
        assert!(!json.contains("\"photos\""));

        let round_tripped: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, round_tripped);
    }

    #[test]
    fn test_serde_round_trip_with_all_fields() {
        let mut entry = Entry::audio(MediaRef::new("audio_1700000000.m4a"));
        entry.mood = Some("🙂".to_string());
        entry.transcript = Some("hello".to_string());
        entry.body = "caption".to_string();

        let json = serde_json::to_string(&entry).unwrap();
        let round_tripped: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, round_tripped);
    }
}
