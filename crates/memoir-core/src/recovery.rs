//! Media path recovery.
//!
//! Runs once after the catalog loads. Entries written by older builds can
//! hold absolute media paths whose container segment went stale after a
//! reinstall/restore; this pass re-derives the expected location from the
//! stored file name and rewrites repairable references to bare file names.
//! Filename-based, not content-addressed: a reference whose file cannot be
//! found anywhere is left unresolved for the UI to render as missing media.

use tracing::{debug, info};

use crate::catalog::LocalCatalog;
use crate::media::MediaStore;
use crate::models::MediaRef;

/// Attempt to repair every media reference in the catalog.
///
/// Each reference (audio, video, and each photo independently) goes through
/// the same three steps: resolved file exists → no action; expected location
/// under the current media dir exists → rewrite; exact file-name match in a
/// directory scan → adopt; otherwise leave unresolved. If anything was
/// repaired the catalog is persisted once at the end (batched write).
///
/// Idempotent: a second run with no filesystem changes repairs nothing.
pub fn recover_media_paths(catalog: &mut LocalCatalog, store: &MediaStore) -> usize {
    let mut repaired = 0;
    for entry in catalog.entries_mut() {
        for reference in entry.media_refs_mut() {
            if recover_reference(reference, store) {
                repaired += 1;
            }
        }
    }

    if repaired > 0 {
        info!(repaired, "recovered media references, persisting catalog");
        catalog.persist_logged();
    }
    repaired
}

fn recover_reference(reference: &mut MediaRef, store: &MediaStore) -> bool {
    if store.exists(reference) {
        return false;
    }

    let file_name = reference.file_name().to_string();

    // Expected location under the current private media directory.
    if store.media_dir().join(&file_name).is_file() {
        debug!(%file_name, "repaired media reference from expected location");
        *reference = MediaRef::new(file_name);
        return true;
    }

    // Last resort: scan the media directory for an exact file-name match.
    if scan_for_file(store, &file_name) {
        debug!(%file_name, "adopted media file found by directory scan");
        *reference = MediaRef::new(file_name);
        return true;
    }

    debug!(%file_name, "media reference left unresolved");
    false
}

fn scan_for_file(store: &MediaStore, file_name: &str) -> bool {
    let Ok(dir) = std::fs::read_dir(store.media_dir()) else {
        return false;
    };
    dir.flatten()
        .any(|candidate| candidate.file_name().to_string_lossy() == file_name)
}
