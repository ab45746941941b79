// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pulse - a terminal chat assistant with a learned memory of your preferences.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod chat;
mod inspect;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use pulse_config::PulseConfig;
use pulse_core::{PulseError, StorageAdapter};
use pulse_storage::SqliteStorage;

/// Pulse - a terminal chat assistant with a learned memory of your preferences.
#[derive(Parser, Debug)]
#[command(name = "pulse", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat (the default).
    Chat {
        /// Resume an existing session instead of creating a new one.
        #[arg(long)]
        session: Option<String>,
    },
    /// Inspect or delete stored chat sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
    /// Inspect the cognitive memory vault.
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// List the bundled model catalog.
    Models {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration (API key redacted).
    Config,
}

#[derive(Subcommand, Debug)]
enum SessionsAction {
    /// List sessions, newest first.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print a session's messages.
    Show { id: String },
    /// Delete a session and its messages.
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum MemoryAction {
    /// List learned entries, oldest first.
    List {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pulse_config::load_and_validate_path(path),
        None => pulse_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pulse_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.assistant.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: PulseConfig) -> Result<(), PulseError> {
    match command.unwrap_or(Commands::Chat { session: None }) {
        Commands::Chat { session } => chat::run_chat(config, session).await,
        Commands::Sessions { action } => {
            let storage = open_storage(&config).await?;
            let result = match action {
                SessionsAction::List { json } => inspect::list_sessions(&storage, json).await,
                SessionsAction::Show { id } => inspect::show_session(&storage, &id).await,
                SessionsAction::Delete { id } => inspect::delete_session(&storage, &id).await,
            };
            storage.close().await?;
            result
        }
        Commands::Memory {
            action: MemoryAction::List { json },
        } => {
            let storage = open_storage(&config).await?;
            let result = inspect::list_memories(&storage, json).await;
            storage.close().await?;
            result
        }
        Commands::Models { json } => inspect::list_models(&config, json),
        Commands::Config => inspect::print_config(&config),
    }
}

/// Opens and migrates the configured SQLite database.
pub(crate) async fn open_storage(config: &PulseConfig) -> Result<Arc<SqliteStorage>, PulseError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

/// Installs the fmt subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulse={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
