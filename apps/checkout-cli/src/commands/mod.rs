//! # CLI Commands
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── quote.rs     ◄─── Price a cart against merchant settings
//! ├── settings.rs  ◄─── Validate settings, report rule coverage
//! └── config.rs    ◄─── Print the effective configuration
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  main.rs                                                                │
//! │  ───────                                                                │
//! │  Cli::parse() ──► CliConfig::load(--config) ──► init_tracing            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::quote::run(&args, &config) -> CliResult<String>              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stdout: JSON / TOML document      stderr: logs and diagnostics         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns its rendered output instead of printing it, so the
//! whole flow is testable without capturing stdout.

pub mod config;
pub mod quote;
pub mod settings;

use std::path::Path;

use crate::config::CliConfig;

/// Resolves the settings path: explicit flag first, then configuration.
pub(crate) fn settings_path<'a>(flag: Option<&'a Path>, config: &'a CliConfig) -> Option<&'a Path> {
    flag.or(config.pricing.settings_path.as_deref())
}

/// Renders a serializable value as compact or pretty JSON.
pub(crate) fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
