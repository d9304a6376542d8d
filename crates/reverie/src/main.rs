// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reverie - a conversational assistant with tiered conversation memory.
//!
//! This is the binary entry point for the Reverie CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod account;
mod config_cmd;
mod history;
mod shell;
mod status;
mod turn;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Reverie - a conversational assistant with tiered conversation memory.
#[derive(Parser, Debug)]
#[command(name = "reverie", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive REPL session.
    Shell {
        /// Conversation owner; history is partitioned per user.
        #[arg(long, default_value = "local")]
        user: String,
    },
    /// Show recent conversation turns.
    Recent {
        #[arg(long, default_value = "local")]
        user: String,
        /// Maximum turns to show; defaults to the configured recent_limit.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Remove the most recent exchange, or the entire history with --all.
    Forget {
        #[arg(long, default_value = "local")]
        user: String,
        /// Erase the user's entire conversation history.
        #[arg(long)]
        all: bool,
    },
    /// Manage user accounts.
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Check the health of configured adapters.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Manage Reverie configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommands {
    /// Register a new account.
    Create { username: String },
    /// Verify credentials for an account.
    Login { username: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration with secrets redacted.
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match reverie_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            reverie_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // Log to stderr so shell output stays clean on stdout.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Some(Commands::Shell { user }) => shell::run_shell(config, &user).await,
        Some(Commands::Recent { user, limit }) => {
            history::run_recent(&config, &user, limit).await
        }
        Some(Commands::Forget { user, all }) => history::run_forget(&config, &user, all).await,
        Some(Commands::Account { command }) => match command {
            AccountCommands::Create { username } => {
                account::run_create(&config, &username).await
            }
            AccountCommands::Login { username } => account::run_login(&config, &username).await,
        },
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => config_cmd::run_show(&config),
        },
        None => {
            println!("reverie: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    #[serial_test::serial]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = reverie_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "reverie");
    }
}
