//! Journal configuration.
//!
//! One explicit configuration object, resolved once at startup and threaded
//! through constructors; there are no global mutable settings. The remote
//! mirror is optional: when `mirror` is `None` the app runs with the no-op
//! mirror stub and sync reports no account.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const ENV_DATA_DIR: &str = "MEMOIR_DATA_DIR";
const ENV_MIRROR_URL: &str = "MEMOIR_MIRROR_URL";
const ENV_MIRROR_TOKEN: &str = "MEMOIR_MIRROR_TOKEN";

const CATALOG_FILE_NAME: &str = "catalog.json";

/// Remote mirror endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Record service base URL (scheme required, no trailing slash).
    pub base_url: String,
    /// Per-user bearer token.
    pub access_token: String,
}

impl MirrorConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        let access_token = access_token.into().trim().to_string();
        if access_token.is_empty() {
            return Err(Error::InvalidInput(
                "Mirror access token must not be empty".to_string(),
            ));
        }
        Ok(Self {
            base_url,
            access_token,
        })
    }
}

/// Top-level journal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    /// Private per-app data directory holding the catalog blob and media.
    pub data_dir: PathBuf,
    /// Optional remote mirror; `None` disables sync.
    pub mirror: Option<MirrorConfig>,
}

impl JournalConfig {
    /// Configuration with no remote mirror.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            mirror: None,
        }
    }

    /// Path of the persisted catalog blob (the fixed storage key).
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE_NAME)
    }

    /// Load configuration from `MEMOIR_DATA_DIR`, `MEMOIR_MIRROR_URL`, and
    /// `MEMOIR_MIRROR_TOKEN`.
    ///
    /// Returns an error when the data dir is unset or when only half of the
    /// mirror pair is provided.
    pub fn from_env() -> Result<Self> {
        Self::parse(|key| env::var(key).ok())
    }

    fn parse(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = normalize_value(lookup(ENV_DATA_DIR)).ok_or_else(|| {
            Error::InvalidInput(format!("{ENV_DATA_DIR} must point at a data directory"))
        })?;

        let mirror_url = normalize_value(lookup(ENV_MIRROR_URL));
        let mirror_token = normalize_value(lookup(ENV_MIRROR_TOKEN));
        let mirror = match (mirror_url, mirror_token) {
            (Some(url), Some(token)) => Some(MirrorConfig::new(url, token)?),
            (None, None) => None,
            _ => {
                return Err(Error::InvalidInput(format!(
                    "{ENV_MIRROR_URL} and {ENV_MIRROR_TOKEN} must be set together"
                )))
            }
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            mirror,
        })
    }

    /// Override the data directory (CLI `--data-dir`).
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }
}

fn normalize_value(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::InvalidInput(
            "Mirror base URL must not be empty".to_string(),
        ));
    }
    if !(base.starts_with("https://") || base.starts_with("http://")) {
        return Err(Error::InvalidInput(
            "Mirror base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}
