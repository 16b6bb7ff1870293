//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the commands)     │
//! │     --settings, --country, --currency                                  │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CHECKOUT_SETTINGS_PATH=/etc/shop/settings.json                     │
//! │     CHECKOUT_DEFAULT_COUNTRY=DE                                        │
//! │     CHECKOUT_DEFAULT_CURRENCY=EUR                                      │
//! │     CHECKOUT_LOG_LEVEL=debug                                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, otherwise the platform config dir:                │
//! │     ~/.config/checkout/checkout.toml (Linux)                           │
//! │     ~/Library/Application Support/com.checkout.checkout/checkout.toml  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! settings_path = "/etc/shop/settings.json"
//! default_country = "DE"
//! default_currency = "EUR"
//! validate_inputs = true
//!
//! [log]
//! level = "warn"
//! ```

use std::path::{Path, PathBuf};

use checkout_core::validation::{validate_country, validate_currency};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

// =============================================================================
// Sections
// =============================================================================

/// `[pricing]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Merchant settings document used when `--settings` is not given.
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    /// Buyer country used when neither the flag nor the cart names one.
    #[serde(default)]
    pub default_country: Option<String>,

    /// Currency used when neither the flag nor the cart names one.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Validate settings and carts before pricing.
    /// Pricing accepts anything; validation turns typos into errors.
    #[serde(default = "default_true")]
    pub validate_inputs: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            settings_path: None,
            default_country: None,
            default_currency: default_currency(),
            validate_inputs: true,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// stdout carries the JSON output, so stay quiet by default.
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Loads configuration from defaults, file and process environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform default if present)
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`CliConfig::load`] with an injectable environment lookup.
    pub fn load_with_env(
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("pricing.default_currency", default_currency())?
            .set_default("pricing.validate_inputs", true)?
            .set_default("log.level", default_log_level())?;

        match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => {
                info!(?path, "Loading config from file");
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading config from default location");
                    builder = builder.add_source(File::from(path).format(FileFormat::Toml));
                }
                path => debug!(?path, "No config file found, using defaults"),
            },
        }

        let mut config: CliConfig = builder.build()?.try_deserialize()?;
        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    /// Applies `CHECKOUT_*` environment overrides.
    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(path) = env("CHECKOUT_SETTINGS_PATH") {
            debug!(path = %path, "Overriding settings path from environment");
            self.pricing.settings_path = Some(PathBuf::from(path));
        }

        if let Some(country) = env("CHECKOUT_DEFAULT_COUNTRY") {
            self.pricing.default_country = Some(country);
        }

        if let Some(currency) = env("CHECKOUT_DEFAULT_CURRENCY") {
            self.pricing.default_currency = currency;
        }

        if let Some(flag) = env("CHECKOUT_VALIDATE_INPUTS") {
            match flag.parse() {
                Ok(validate) => self.pricing.validate_inputs = validate,
                Err(_) => warn!(value = %flag, "Ignoring non-boolean CHECKOUT_VALIDATE_INPUTS"),
            }
        }

        if let Some(level) = env("CHECKOUT_LOG_LEVEL") {
            self.log.level = level;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_currency(&self.pricing.default_currency).map_err(|e| ConfigError::InvalidValue {
            key: "pricing.default_currency".to_string(),
            reason: e.to_string(),
        })?;

        if let Some(country) = &self.pricing.default_country {
            validate_country(country).map_err(|e| ConfigError::InvalidValue {
                key: "pricing.default_country".to_string(),
                reason: e.to_string(),
            })?;
        }

        if matches!(&self.pricing.settings_path, Some(path) if path.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "pricing.settings_path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "checkout", "checkout")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.pricing.default_currency, "USD");
        assert!(config.pricing.validate_inputs);
        assert_eq!(config.log.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
            [pricing]
            settings_path = "/etc/shop/settings.json"
            default_country = "DE"
            default_currency = "EUR"

            [log]
            level = "debug"
            "#,
        );

        let config = CliConfig::load_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(
            config.pricing.settings_path,
            Some(PathBuf::from("/etc/shop/settings.json"))
        );
        assert_eq!(config.pricing.default_country.as_deref(), Some("DE"));
        assert_eq!(config.pricing.default_currency, "EUR");
        assert!(config.pricing.validate_inputs);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[pricing]\ndefault_country = \"FR\"\n");
        let config = CliConfig::load_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(config.pricing.default_country.as_deref(), Some("FR"));
        assert_eq!(config.pricing.default_currency, "USD");
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[pricing]\ndefault_currency = \"EUR\"\n");
        let env: HashMap<&str, &str> = [
            ("CHECKOUT_DEFAULT_CURRENCY", "GBP"),
            ("CHECKOUT_DEFAULT_COUNTRY", "GB"),
            ("CHECKOUT_SETTINGS_PATH", "/tmp/settings.json"),
            ("CHECKOUT_VALIDATE_INPUTS", "false"),
            ("CHECKOUT_LOG_LEVEL", "checkout_core=trace"),
        ]
        .into_iter()
        .collect();

        let config =
            CliConfig::load_with_env(Some(file.path()), |key| env.get(key).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.pricing.default_currency, "GBP");
        assert_eq!(config.pricing.default_country.as_deref(), Some("GB"));
        assert_eq!(config.pricing.settings_path, Some(PathBuf::from("/tmp/settings.json")));
        assert!(!config.pricing.validate_inputs);
        assert_eq!(config.log.level, "checkout_core=trace");
    }

    #[test]
    fn test_invalid_env_flag_is_ignored() {
        let file = write_config("");
        let config = CliConfig::load_with_env(Some(file.path()), |key| {
            (key == "CHECKOUT_VALIDATE_INPUTS").then(|| "sometimes".to_string())
        })
        .unwrap();
        assert!(config.pricing.validate_inputs);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = CliConfig::load_with_env(Some(Path::new("/nonexistent/checkout.toml")), no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_currency_is_rejected() {
        let file = write_config("[pricing]\ndefault_currency = \"euro\"\n");
        let err = CliConfig::load_with_env(Some(file.path()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "pricing.default_currency"));
    }

    #[test]
    fn test_toml_rendering_round_trips() {
        let mut config = CliConfig::default();
        config.pricing.default_country = Some("DE".to_string());
        let rendered = config.to_toml().unwrap();
        let parsed: CliConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
