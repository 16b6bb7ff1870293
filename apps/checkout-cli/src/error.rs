//! # CLI Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                      │
//! │  config::ConfigError ──► ConfigError ──┼──► CliError ──► anyhow (main) │
//! │  io / serde_json ────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing itself never produces an error; everything here comes from
//! reading configuration and documents.

use std::path::PathBuf;

use checkout_core::CoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced by the `checkout-price` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A document could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid JSON of the expected shape.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A command that needs merchant settings got none.
    #[error("No merchant settings given. Pass --settings or set pricing.settings_path")]
    MissingSettings,

    /// No buyer country from flags, cart or configuration.
    #[error("No buyer country given. Pass --country, set it in the cart, or configure pricing.default_country")]
    MissingCountry,

    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Settings, coupon or cart failed validation.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// Effective configuration could not be rendered as TOML.
    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered sources could not be merged or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A value is present but unusable.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
