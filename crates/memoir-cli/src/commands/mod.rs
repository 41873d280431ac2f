pub mod common;

mod add;
mod delete;
mod import;
mod list;
mod recover;
mod sync;

pub use add::run_add;
pub use delete::run_delete;
pub use import::run_import;
pub use list::run_list;
pub use recover::run_recover;
pub use sync::run_sync;
