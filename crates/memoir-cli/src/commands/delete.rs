use memoir_core::service::JournalService;
use memoir_core::sync::RemoteMirror;

use crate::commands::common::resolve_entry_id;
use crate::error::CliError;

pub async fn run_delete<M: RemoteMirror>(
    service: &mut JournalService<M>,
    id: &str,
) -> Result<(), CliError> {
    let id = resolve_entry_id(service.entries(), id)?;
    service.delete_entry(&id).await?;
    println!("{id}");
    Ok(())
}
