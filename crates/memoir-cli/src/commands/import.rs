use std::path::Path;

use memoir_core::service::JournalService;
use memoir_core::sync::RemoteMirror;

use crate::cli::MediaKind;
use crate::error::CliError;

pub async fn run_import<M: RemoteMirror>(
    service: &mut JournalService<M>,
    kind: MediaKind,
    file: &Path,
    body: String,
    mood: Option<String>,
) -> Result<(), CliError> {
    // Fail early with a readable IO error before touching the store.
    std::fs::metadata(file)?;

    let id = service
        .create_media_entry(kind.into(), file, body, mood)
        .await?;
    println!("{id}");
    Ok(())
}
