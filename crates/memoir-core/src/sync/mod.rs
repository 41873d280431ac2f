//! Remote mirror: optional replication of the local catalog to a per-user
//! remote record store.
//!
//! The mirror is an injected capability resolved at startup: a real
//! [`HttpMirror`] when the user has a signed-in account, or [`NoopMirror`]
//! otherwise. Mirror failures update the observable sync status; they never
//! block or corrupt local state.

mod http;
mod merge;
mod record;

use std::fmt;

pub use http::HttpMirror;
pub use merge::merge_catalogs;
pub use record::EntryRecord;

use crate::error::{Error, Result};
use crate::models::Entry;

/// Sync status surfaced to the UI.
///
/// `Unknown -> Syncing -> {Synced, Error}`; `Synced` and `Error` re-enter
/// `Syncing` on the next attempt. `NoAccount` is reached when the account
/// check reports no signed-in user and holds until an external change
/// (sign-in) lets a new sync attempt start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Unknown,
    NoAccount,
    Syncing,
    Synced,
    Error,
}

impl SyncState {
    /// Whether the state machine admits a transition to `next`.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unknown, Self::Syncing | Self::NoAccount)
                | (Self::Syncing, Self::Synced | Self::Error)
                | (Self::Synced, Self::Syncing)
                | (Self::Error, Self::Syncing | Self::NoAccount)
                | (Self::NoAccount, Self::Syncing)
        )
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::NoAccount => "no account",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Explicit sync state container with a polled version counter.
///
/// Observers compare `version()` against the last value they saw instead of
/// relying on framework-managed observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncStatus {
    state: SyncState,
    version: u64,
}

impl SyncStatus {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SyncState::Unknown,
            version: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Bumped on every accepted transition.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Apply a transition if the state machine admits it. Returns whether the
    /// state changed.
    pub fn advance(&mut self, next: SyncState) -> bool {
        if !self.state.can_transition(next) {
            tracing::debug!(from = %self.state, to = %next, "ignoring invalid sync transition");
            return false;
        }
        self.state = next;
        self.version += 1;
        true
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// A binary asset travelling alongside a downloaded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBlob {
    /// Bare media file name the entry's reference points at.
    pub file_name: String,
    /// Raw asset bytes.
    pub data: Vec<u8>,
}

/// Replication operations against the per-user remote record store.
#[allow(async_fn_in_trait)]
pub trait RemoteMirror {
    /// Verify a signed-in account; `Error::AccountUnavailable` when there is
    /// none (or the account state is restricted/undetermined).
    async fn check_account(&self) -> Result<()>;

    /// Push local entries to the remote store, creating or updating records
    /// by entry id. A failed batch aborts the remaining batches.
    async fn upload(&self, entries: &[Entry]) -> Result<()>;

    /// Fetch every remote record and convert it into an entry plus any asset
    /// blobs it carries. Records missing required fields are dropped.
    async fn download(&self) -> Result<Vec<(Entry, Vec<AssetBlob>)>>;
}

/// Stub mirror used when sync is disabled or no account is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMirror;

impl RemoteMirror for NoopMirror {
    async fn check_account(&self) -> Result<()> {
        Err(Error::AccountUnavailable(
            "remote mirror is disabled".to_string(),
        ))
    }

    async fn upload(&self, _entries: &[Entry]) -> Result<()> {
        Err(Error::AccountUnavailable(
            "remote mirror is disabled".to_string(),
        ))
    }

    async fn download(&self) -> Result<Vec<(Entry, Vec<AssetBlob>)>> {
        Err(Error::AccountUnavailable(
            "remote mirror is disabled".to_string(),
        ))
    }
}
