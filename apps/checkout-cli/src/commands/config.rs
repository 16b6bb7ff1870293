//! # `show-config` Command
//!
//! Prints the effective configuration (defaults, file and environment
//! merged) as TOML, in the same format the config file accepts.

use crate::config::CliConfig;
use crate::error::CliResult;

/// Renders the effective configuration.
pub fn run(config: &CliConfig) -> CliResult<String> {
    let rendered = config.to_toml()?;
    Ok(match CliConfig::default_config_path() {
        Some(path) => format!("# default location: {}\n{rendered}", path.display()),
        None => rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_parses_back() {
        let mut config = CliConfig::default();
        config.pricing.default_country = Some("DE".to_string());

        let output = run(&config).unwrap();
        let parsed: CliConfig = toml::from_str(&output).unwrap();

        assert_eq!(parsed, config);
        assert!(output.contains("[pricing]"));
        assert!(output.contains("[log]"));
    }
}
