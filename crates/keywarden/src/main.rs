// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keywarden - an encrypted credential vault.
//!
//! This is the binary entry point for the Keywarden CLI.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use keywarden_core::types::OwnerId;
use keywarden_storage::{Database, SqliteStore};
use keywarden_vault::VaultService;

mod commands;
mod prompt;

/// Keywarden - an encrypted credential vault.
#[derive(Parser, Debug)]
#[command(name = "keywarden", version, about, long_about = None)]
struct Cli {
    /// Owner scope for all operations.
    #[arg(long, global = true, default_value = "local")]
    owner: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a new credential.
    Add(AddArgs),
    /// Show one record; secrets only with --reveal.
    Show {
        id: String,
        /// Decrypt and print the password and notes.
        #[arg(long)]
        reveal: bool,
    },
    /// List records, with optional filters.
    List(ListArgs),
    /// Delete a record.
    Rm { id: String },
    /// Toggle a record's favorite flag.
    Favorite { id: String },
    /// Mark a record compromised (or clear the flag).
    Compromised {
        id: String,
        /// Clear the flag instead of setting it.
        #[arg(long)]
        clear: bool,
    },
    /// Generate a random password.
    Gen(GenArgs),
    /// Security posture summary for the vault.
    Stats,
    /// Decrypt all records to JSON for backup.
    Export {
        /// Write to a file instead of stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Bulk-import records from an export file.
    Import { input: String },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Site label, e.g. "GitHub".
    #[arg(long)]
    site: String,
    #[arg(long)]
    username: String,
    /// Secret value; prompted interactively when omitted.
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// One of: social, banking, email, shopping, work, entertainment,
    /// utilities, other.
    #[arg(long)]
    category: Option<String>,
    /// Comma-separated tags.
    #[arg(long)]
    tags: Option<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    favorites: bool,
    /// Only records scoring weak or medium.
    #[arg(long)]
    weak: bool,
    /// Only records at least this many days old.
    #[arg(long)]
    older_than: Option<i64>,
    /// Case-insensitive substring match over site, username, email, tags.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct GenArgs {
    #[arg(long, default_value_t = 16)]
    length: usize,
    #[arg(long)]
    no_upper: bool,
    #[arg(long)]
    no_lower: bool,
    #[arg(long)]
    no_digits: bool,
    #[arg(long)]
    no_symbols: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match keywarden_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            keywarden_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let db = match Database::open(&config.storage).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("keywarden: failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let vault = VaultService::new(
        Arc::new(SqliteStore::new(db.clone())),
        Arc::new(prompt::PromptSecretProvider::new()),
        config.vault.clone(),
    );
    let owner = OwnerId(cli.owner.clone());

    let result = match cli.command {
        Commands::Add(args) => commands::add(&vault, &owner, args).await,
        Commands::Show { id, reveal } => commands::show(&vault, &owner, id, reveal).await,
        Commands::List(args) => commands::list(&vault, &owner, args).await,
        Commands::Rm { id } => commands::rm(&vault, &owner, id).await,
        Commands::Favorite { id } => commands::favorite(&vault, &owner, id).await,
        Commands::Compromised { id, clear } => {
            commands::compromised(&vault, &owner, id, clear).await
        }
        Commands::Gen(args) => commands::generate(&vault, args),
        Commands::Stats => commands::stats(&vault, &owner).await,
        Commands::Export { output } => commands::export(&vault, &owner, output).await,
        Commands::Import { input } => commands::import(&vault, &owner, input).await,
    };

    let exit_code = match result {
        Ok(()) => {
            if let Err(e) = db.close().await {
                eprintln!("keywarden: {e}");
                1
            } else {
                0
            }
        }
        Err(e) => {
            eprintln!("keywarden: {e}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keywarden={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn binary_loads_config_defaults() {
        // String-only load keeps the test independent of ambient
        // /etc, XDG, and KEYWARDEN_* configuration on the host.
        let config = keywarden_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.app.log_level, "info");
    }
}
