use memoir_core::service::JournalService;
use memoir_core::sync::RemoteMirror;

use crate::commands::common::{entry_to_list_item, format_entry_line, EntryListItem};
use crate::error::CliError;

pub fn run_list<M: RemoteMirror>(
    service: &JournalService<M>,
    limit: usize,
    as_json: bool,
) -> Result<(), CliError> {
    let entries = &service.entries()[..limit.min(service.entries().len())];

    if as_json {
        let items: Vec<EntryListItem> = entries.iter().map(entry_to_list_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for entry in entries {
            println!("{}", format_entry_line(entry));
        }
    }
    Ok(())
}
