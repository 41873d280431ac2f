//! Shared command helpers: config resolution, id lookup, list formatting.

use std::path::{Path, PathBuf};

use chrono::TimeZone;
use memoir_core::config::JournalConfig;
use memoir_core::{Entry, EntryId};
use serde::Serialize;

use crate::error::CliError;

/// Resolve the journal configuration once at startup.
///
/// `MEMOIR_*` environment variables win when present (including the mirror
/// pair); otherwise the catalog lives under the platform data directory.
/// A `--data-dir` flag overrides the data directory either way.
pub fn resolve_config(data_dir_flag: Option<&Path>) -> Result<JournalConfig, CliError> {
    let mut config = if std::env::var_os("MEMOIR_DATA_DIR").is_some()
        || std::env::var_os("MEMOIR_MIRROR_URL").is_some()
        || std::env::var_os("MEMOIR_MIRROR_TOKEN").is_some()
    {
        JournalConfig::from_env()?
    } else {
        JournalConfig::new(default_data_dir().ok_or(CliError::NoDataDir)?)
    };

    if let Some(dir) = data_dir_flag {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("memoir"))
}

/// Resolve a full entry id or a unique id prefix against the catalog.
pub fn resolve_entry_id(entries: &[Entry], raw: &str) -> Result<EntryId, CliError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CliError::EntryNotFound(raw.to_string()));
    }

    if let Ok(id) = raw.parse::<EntryId>() {
        if entries.iter().any(|entry| entry.id == id) {
            return Ok(id);
        }
        return Err(CliError::EntryNotFound(raw.to_string()));
    }

    let matches: Vec<EntryId> = entries
        .iter()
        .filter(|entry| entry.id.as_str().starts_with(raw))
        .map(|entry| entry.id)
        .collect();
    match matches.as_slice() {
        [] => Err(CliError::EntryNotFound(raw.to_string())),
        [only] => Ok(*only),
        many => Err(CliError::AmbiguousEntryId(format!(
            "Entry id prefix '{raw}' matches {} entries",
            many.len()
        ))),
    }
}

/// One entry row in `list --json` output.
#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: String,
    pub created_at: i64,
    pub kind: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    pub media_files: Vec<String>,
}

pub fn entry_to_list_item(entry: &Entry) -> EntryListItem {
    EntryListItem {
        id: entry.id.as_str(),
        created_at: entry.created_at,
        kind: entry.kind.to_string(),
        title: entry.title.clone(),
        body: entry.body.clone(),
        mood: entry.mood.clone(),
        media_files: entry
            .media_refs()
            .map(|reference| reference.file_name().to_string())
            .collect(),
    }
}

pub fn format_entry_line(entry: &Entry) -> String {
    let short_id: String = entry.id.as_str().chars().take(8).collect();
    let when = chrono::Local
        .timestamp_millis_opt(entry.created_at)
        .single()
        .map_or_else(|| "-".to_string(), |ts| ts.format("%Y-%m-%d %H:%M").to_string());
    let mood = entry.mood.as_deref().unwrap_or("");
    let preview: String = if entry.body.is_empty() {
        entry.title.clone()
    } else {
        entry.body.lines().next().unwrap_or("").chars().take(60).collect()
    };
    format!("{short_id}  {when}  {:<5}  {preview} {mood}", entry.kind.to_string())
}
