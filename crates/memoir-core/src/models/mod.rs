//! Data models for memoir

mod entry;

pub use entry::{Entry, EntryId, EntryKind, MediaRef};
