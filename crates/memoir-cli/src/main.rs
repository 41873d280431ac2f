//! memoir CLI - journal entries from the terminal.

mod cli;
mod commands;
mod error;

use clap::Parser;
use memoir_core::media::MediaStore;
use memoir_core::service::JournalService;
use memoir_core::sync::{HttpMirror, NoopMirror, RemoteMirror};

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("memoir=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = commands::common::resolve_config(cli.data_dir.as_deref())?;
    tracing::debug!(data_dir = %config.data_dir.display(), mirror = config.mirror.is_some(), "resolved journal config");

    // The mirror capability is resolved once at startup: a real client when
    // configured, the no-op stub otherwise.
    match &config.mirror {
        Some(mirror_config) => {
            let mirror = HttpMirror::new(mirror_config, MediaStore::new(&config.data_dir))?;
            dispatch(cli.command, JournalService::open(&config, mirror)).await
        }
        None => dispatch(cli.command, JournalService::open(&config, NoopMirror)).await,
    }
}

async fn dispatch<M: RemoteMirror>(
    command: Commands,
    mut service: JournalService<M>,
) -> Result<(), CliError> {
    match command {
        Commands::Add { body, mood } => commands::run_add(&mut service, &body, mood),
        Commands::Import {
            kind,
            file,
            body,
            mood,
        } => commands::run_import(&mut service, kind, &file, body, mood).await,
        Commands::List { limit, json } => commands::run_list(&service, limit, json),
        Commands::Delete { id } => commands::run_delete(&mut service, &id).await,
        Commands::Recover => commands::run_recover(&mut service),
        Commands::Sync => commands::run_sync(&mut service).await,
    }
}
