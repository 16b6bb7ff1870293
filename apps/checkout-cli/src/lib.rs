//! # checkout-cli: Command-Line Pricing
//!
//! Prices carts against merchant tax settings from the shell, for support
//! staff reproducing a customer's total and for merchants checking a new
//! tax configuration before rolling it out.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        checkout-price                                   │
//! │                                                                         │
//! │  main.rs ──────► checkout_cli::run()                                   │
//! │                                                                         │
//! │  lib.rs ───────► Cli (clap), config loading, tracing, dispatch         │
//! │                                                                         │
//! │  config.rs ────► CliConfig: defaults ► checkout.toml ► CHECKOUT_* env  │
//! │                                                                         │
//! │  documents.rs ─► settings.json / cart.json                             │
//! │                                                                         │
//! │  commands/ ────► quote, check-settings, show-config                    │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        checkout-core                             │  │
//! │  │   calculate_price_with_diagnostics • Settings::coverage          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Load configuration (`--config`, else the platform default)
//! 3. Initialize tracing (stderr; `RUST_LOG` overrides `log.level`)
//! 4. Run the command, print its output to stdout

pub mod commands;
pub mod config;
pub mod documents;
pub mod error;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::quote::QuoteArgs;
use crate::commands::settings::CheckSettingsArgs;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Order price, tax and discount calculator.
#[derive(Debug, Parser)]
#[command(name = "checkout-price", version)]
pub struct Cli {
    /// Config file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a cart and print the breakdown as JSON.
    Quote(QuoteArgs),

    /// Validate merchant settings and report rule coverage.
    CheckSettings(CheckSettingsArgs),

    /// Print the effective configuration as TOML.
    ShowConfig,
}

/// Runs the command selected on the command line.
pub fn execute(command: &Command, config: &CliConfig) -> CliResult<String> {
    match command {
        Command::Quote(args) => commands::quote::run(args, config),
        Command::CheckSettings(args) => commands::settings::run(args, config),
        Command::ShowConfig => commands::config::run(config),
    }
}

/// Entry point of the `checkout-price` binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.log.level);
    debug!(?config, "Configuration loaded");

    let output = execute(&cli.command, &config)?;
    println!("{output}");

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout stays a clean JSON document. `RUST_LOG`
/// wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
