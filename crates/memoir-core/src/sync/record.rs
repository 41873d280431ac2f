//! Remote record wire schema.
//!
//! One record per entry, keyed by `entryID`. Every field is optional on the
//! wire so a single malformed record never poisons a whole page; records
//! missing a required field (`entryID`, `type`, `date`) are dropped during
//! conversion. Binary media travels inline as base64 asset payloads.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::media::MediaStore;
use crate::models::{Entry, EntryId, EntryKind, MediaRef};
use crate::sync::AssetBlob;

/// Per-entry record as stored in the remote database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(rename = "entryID", default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Creation timestamp (Unix ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(rename = "audioAsset", default, skip_serializing_if = "Option::is_none")]
    pub audio_asset: Option<AssetPayload>,
    #[serde(rename = "videoAsset", default, skip_serializing_if = "Option::is_none")]
    pub video_asset: Option<AssetPayload>,
    #[serde(rename = "photoAssets", default, skip_serializing_if = "Vec::is_empty")]
    pub photo_assets: Vec<AssetPayload>,
}

/// A binary attachment embedded in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPayload {
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Base64-encoded bytes.
    pub data: String,
}

impl EntryRecord {
    /// Build a record from a local entry, reading asset bytes from their
    /// resolved local locations. A media file that cannot be read is skipped
    /// with a warning; the record still uploads without that asset.
    #[must_use]
    pub fn from_entry(entry: &Entry, store: &MediaStore) -> Self {
        Self {
            entry_id: Some(entry.id.as_str()),
            title: Some(entry.title.clone()),
            content: Some(entry.body.clone()),
            kind: Some(entry.kind.to_string()),
            date: Some(entry.created_at),
            mood: entry.mood.clone(),
            transcription: entry.transcript.clone(),
            audio_asset: entry.audio.as_ref().and_then(|r| read_asset(store, r)),
            video_asset: entry.video.as_ref().and_then(|r| read_asset(store, r)),
            photo_assets: entry
                .photos
                .iter()
                .filter_map(|r| read_asset(store, r))
                .collect(),
        }
    }

    /// Convert a downloaded record into an entry plus its asset blobs.
    ///
    /// Returns `None` (record dropped) when a required field is missing or
    /// fails to parse.
    #[must_use]
    pub fn into_entry(self) -> Option<(Entry, Vec<AssetBlob>)> {
        let id: EntryId = match self.entry_id.as_deref().map(str::parse) {
            Some(Ok(id)) => id,
            _ => {
                warn!("dropping remote record without a parseable entryID");
                return None;
            }
        };
        let kind: EntryKind = match self.kind.as_deref().map(str::parse) {
            Some(Ok(kind)) => kind,
            _ => {
                warn!(entry_id = ?self.entry_id, "dropping remote record without a valid type");
                return None;
            }
        };
        let Some(date) = self.date else {
            warn!(entry_id = ?self.entry_id, "dropping remote record without a date");
            return None;
        };

        // The kind determines which media fields are legal; assets a
        // malformed record carries outside its kind are dropped so a text
        // record with an audioAsset can never enter the catalog owning media.
        let illegal_assets = match kind {
            EntryKind::Text => {
                usize::from(self.audio_asset.is_some())
                    + usize::from(self.video_asset.is_some())
                    + self.photo_assets.len()
            }
            EntryKind::Audio => usize::from(self.video_asset.is_some()) + self.photo_assets.len(),
            EntryKind::Video => usize::from(self.audio_asset.is_some()) + self.photo_assets.len(),
            EntryKind::Photo => {
                usize::from(self.audio_asset.is_some()) + usize::from(self.video_asset.is_some())
            }
        };
        if illegal_assets > 0 {
            warn!(
                entry_id = ?self.entry_id,
                %kind,
                illegal_assets,
                "dropping assets not legal for the record's kind"
            );
        }

        let mut blobs = Vec::new();
        let mut audio = None;
        let mut video = None;
        let mut photos: Vec<MediaRef> = Vec::new();
        match kind {
            EntryKind::Text => {}
            EntryKind::Audio => {
                audio = self
                    .audio_asset
                    .and_then(|asset| decode_asset(asset, &mut blobs));
            }
            EntryKind::Video => {
                video = self
                    .video_asset
                    .and_then(|asset| decode_asset(asset, &mut blobs));
            }
            EntryKind::Photo => {
                photos = self
                    .photo_assets
                    .into_iter()
                    .filter_map(|asset| decode_asset(asset, &mut blobs))
                    .collect();
            }
        }

        let entry = Entry {
            id,
            created_at: date,
            title: self
                .title
                .unwrap_or_else(|| Entry::title_for_timestamp(date)),
            kind,
            body: self.content.unwrap_or_default(),
            audio,
            video,
            photos,
            mood: self.mood,
            transcript: self.transcription,
        };
        Some((entry, blobs))
    }
}

fn read_asset(store: &MediaStore, reference: &MediaRef) -> Option<AssetPayload> {
    let path = store.resolve(reference);
    match std::fs::read(&path) {
        Ok(bytes) => Some(AssetPayload {
            file_name: reference.file_name().to_string(),
            data: BASE64.encode(bytes),
        }),
        Err(error) => {
            warn!(path = %path.display(), %error, "skipping unreadable media asset during upload");
            None
        }
    }
}

fn decode_asset(asset: AssetPayload, blobs: &mut Vec<AssetBlob>) -> Option<MediaRef> {
    match BASE64.decode(asset.data.as_bytes()) {
        Ok(data) => {
            blobs.push(AssetBlob {
                file_name: asset.file_name.clone(),
                data,
            });
            Some(MediaRef::new(asset.file_name))
        }
        Err(error) => {
            warn!(file_name = %asset.file_name, %error, "dropping undecodable asset payload");
            // Keep the reference so the entry still lists its media; recovery
            // will report it missing until a later sync restores it.
            Some(MediaRef::new(asset.file_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(entry_id: Option<&str>, kind: Option<&str>, date: Option<i64>) -> EntryRecord {
        EntryRecord {
            entry_id: entry_id.map(ToString::to_string),
            title: Some("T".to_string()),
            content: Some("body".to_string()),
            kind: kind.map(ToString::to_string),
            date,
            mood: None,
            transcription: None,
            audio_asset: None,
            video_asset: None,
            photo_assets: Vec::new(),
        }
    }

    #[test]
    fn wire_field_names_match_the_remote_schema() {
        let id = EntryId::new();
        let json =
            serde_json::to_value(record(Some(&id.as_str()), Some("audio"), Some(7))).unwrap();
        assert_eq!(json["entryID"], id.as_str());
        assert_eq!(json["type"], "audio");
        assert_eq!(json["date"], 7);
    }

    #[test]
    fn records_missing_required_fields_are_dropped() {
        let id = EntryId::new().as_str();
        assert!(record(None, Some("text"), Some(1)).into_entry().is_none());
        assert!(record(Some("not-a-uuid"), Some("text"), Some(1))
            .into_entry()
            .is_none());
        assert!(record(Some(&id), None, Some(1)).into_entry().is_none());
        assert!(record(Some(&id), Some("hologram"), Some(1))
            .into_entry()
            .is_none());
        assert!(record(Some(&id), Some("text"), None).into_entry().is_none());

        assert!(record(Some(&id), Some("text"), Some(1)).into_entry().is_some());
    }

    #[test]
    fn entry_round_trips_through_a_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        std::fs::create_dir_all(store.media_dir()).unwrap();
        std::fs::write(store.media_dir().join("audio_9.m4a"), b"pcm-bytes").unwrap();

        let mut original = Entry::audio(MediaRef::new("audio_9.m4a"));
        original.mood = Some("🌧".to_string());
        original.transcript = Some("rain again".to_string());
        original.body = "caption".to_string();

        let record = EntryRecord::from_entry(&original, &store);
        let (converted, blobs) = record.into_entry().unwrap();

        assert_eq!(converted, original);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].file_name, "audio_9.m4a");
        assert_eq!(blobs[0].data, b"pcm-bytes");
    }

    #[test]
    fn assets_outside_the_record_kind_are_dropped() {
        let id = EntryId::new().as_str();

        // A text record must never yield an entry owning media.
        let mut text_record = record(Some(&id), Some("text"), Some(1));
        text_record.audio_asset = Some(AssetPayload {
            file_name: "audio_1.m4a".to_string(),
            data: BASE64.encode(b"pcm"),
        });
        let (entry, blobs) = text_record.into_entry().unwrap();
        assert_eq!(entry.audio, None);
        assert!(!entry.has_media());
        assert!(blobs.is_empty());

        // A photo record keeps its photos but sheds a stray audio asset.
        let mut photo_record = record(Some(&id), Some("photo"), Some(1));
        photo_record.photo_assets = vec![AssetPayload {
            file_name: "photo_1.jpg".to_string(),
            data: BASE64.encode(b"jpg"),
        }];
        photo_record.audio_asset = Some(AssetPayload {
            file_name: "audio_1.m4a".to_string(),
            data: BASE64.encode(b"pcm"),
        });
        let (entry, blobs) = photo_record.into_entry().unwrap();
        assert_eq!(entry.audio, None);
        assert_eq!(entry.photos.len(), 1);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].file_name, "photo_1.jpg");
    }

    #[test]
    fn missing_local_media_uploads_without_the_asset() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let entry = Entry::audio(MediaRef::new("audio_gone.m4a"));
        let record = EntryRecord::from_entry(&entry, &store);
        assert!(record.audio_asset.is_none());
        assert_eq!(record.entry_id, Some(entry.id.as_str()));
    }

    #[test]
    fn absent_optional_fields_stay_absent_on_the_wire() {
        let id = EntryId::new().as_str();
        let json = serde_json::to_string(&record(Some(&id), Some("text"), Some(1))).unwrap();
        assert!(!json.contains("mood"));
        assert!(!json.contains("audioAsset"));
        assert!(!json.contains("photoAssets"));
    }
}
