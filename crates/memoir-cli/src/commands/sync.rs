use memoir_core::service::JournalService;
use memoir_core::sync::RemoteMirror;

use crate::error::CliError;

pub async fn run_sync<M: RemoteMirror>(service: &mut JournalService<M>) -> Result<(), CliError> {
    let outcome = service.sync().await;
    println!("sync status: {}", service.status().state());
    outcome.map_err(CliError::from)
}
