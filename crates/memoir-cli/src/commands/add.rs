use memoir_core::service::JournalService;
use memoir_core::sync::RemoteMirror;

use crate::error::CliError;

pub fn run_add<M: RemoteMirror>(
    service: &mut JournalService<M>,
    body: &[String],
    mood: Option<String>,
) -> Result<(), CliError> {
    let body = body.join(" ").trim().to_string();
    if body.is_empty() {
        return Err(CliError::EmptyBody);
    }

    let id = service.create_text_entry(body, mood);
    println!("{id}");
    Ok(())
}
