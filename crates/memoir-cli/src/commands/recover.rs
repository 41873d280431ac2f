use memoir_core::service::JournalService;
use memoir_core::sync::RemoteMirror;

use crate::error::CliError;

pub fn run_recover<M: RemoteMirror>(service: &mut JournalService<M>) -> Result<(), CliError> {
    let repaired = service.recover();
    println!("repaired {repaired} media reference(s)");
    Ok(())
}
