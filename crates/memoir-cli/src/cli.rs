use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "memoir")]
#[command(about = "Personal journal from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the journal data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new text entry
    #[command(alias = "new")]
    Add {
        /// Entry text
        body: Vec<String>,
        /// Optional mood tag (short string or emoji)
        #[arg(long)]
        mood: Option<String>,
    },
    /// Create a media entry from an existing file
    Import {
        /// Media kind
        #[arg(value_enum)]
        kind: MediaKind,
        /// Source file to copy into the journal
        file: PathBuf,
        /// Optional caption
        #[arg(long, default_value = "")]
        body: String,
        /// Optional mood tag
        #[arg(long)]
        mood: Option<String>,
    },
    /// List recent entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an existing entry and its media files
    Delete {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Re-run media path recovery over the catalog
    Recover,
    /// Sync the catalog with the remote mirror
    Sync,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MediaKind {
    Audio,
    Video,
    Photo,
}

impl From<MediaKind> for memoir_core::EntryKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Audio => Self::Audio,
            MediaKind::Video => Self::Video,
            MediaKind::Photo => Self::Photo,
        }
    }
}
