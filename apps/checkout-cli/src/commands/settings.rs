//! # `check-settings` Command
//!
//! Validates a merchant settings document and reports what the calculator
//! would silently do with it:
//!
//! - rules that can never match because an earlier rule covers them
//! - which rule each product type resolves to for a country, and which
//!   product types fall through to 0% tax

use std::path::PathBuf;

use checkout_core::{RuleCoverage, Settings, TaxMode};
use clap::Args;
use serde::Serialize;
use tracing::warn;

use super::{settings_path, to_json};
use crate::config::CliConfig;
use crate::documents::load_settings;
use crate::error::{CliError, CliResult};

/// Arguments of `checkout-price check-settings`.
#[derive(Debug, Clone, Args)]
pub struct CheckSettingsArgs {
    /// Merchant settings document (JSON). Defaults to `pricing.settings_path`.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Country to report coverage for. Defaults to `pricing.default_country`.
    #[arg(long)]
    pub country: Option<String>,

    /// Product type to resolve (repeatable). Defaults to every product type
    /// named by a rule.
    #[arg(long = "product-type")]
    pub product_types: Vec<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// A rule hidden behind an earlier, broader rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowedRule {
    pub rule: usize,
    pub shadowed_by: usize,
}

/// Result of checking a settings document.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsReport {
    pub tax_mode: TaxMode,
    pub rules: usize,
    pub shadowed: Vec<ShadowedRule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Empty when no country is known.
    pub coverage: Vec<RuleCoverage>,
}

/// Runs the command and returns its JSON output.
pub fn run(args: &CheckSettingsArgs, config: &CliConfig) -> CliResult<String> {
    let report = check(args, config)?;
    Ok(to_json(&report, args.pretty)?)
}

/// Loads, validates and analyses the settings named by `args`.
pub fn check(args: &CheckSettingsArgs, config: &CliConfig) -> CliResult<SettingsReport> {
    let path = settings_path(args.settings.as_deref(), config).ok_or(CliError::MissingSettings)?;
    let settings = load_settings(path)?;
    settings.validate()?;

    let shadowed: Vec<ShadowedRule> = settings
        .shadowed_rules()
        .into_iter()
        .map(|(rule, shadowed_by)| ShadowedRule { rule, shadowed_by })
        .collect();
    for entry in &shadowed {
        warn!(rule = entry.rule, by = entry.shadowed_by, "Tax rule can never match");
    }

    let country = args
        .country
        .clone()
        .or_else(|| config.pricing.default_country.clone());

    let coverage = match &country {
        Some(country) => {
            let product_types = if args.product_types.is_empty() {
                named_product_types(&settings)
            } else {
                args.product_types.clone()
            };
            settings.coverage(country, product_types.iter().map(String::as_str))
        }
        None if !args.product_types.is_empty() => return Err(CliError::MissingCountry),
        None => Vec::new(),
    };

    for entry in coverage.iter().filter(|c| c.rule.is_none()) {
        warn!(product_type = %entry.product_type, "No tax rule, taxed at 0%");
    }

    Ok(SettingsReport {
        tax_mode: settings.tax_mode(),
        rules: settings.taxes.len(),
        shadowed,
        country,
        coverage,
    })
}

/// Every product type mentioned by any rule, first mention first.
fn named_product_types(settings: &Settings) -> Vec<String> {
    let mut product_types: Vec<String> = Vec::new();
    for product_type in settings.taxes.iter().flat_map(|rule| &rule.product_types) {
        if !product_types.contains(product_type) {
            product_types.push(product_type.clone());
        }
    }
    product_types
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{CoreError, Percentage};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SETTINGS: &str = r#"{
        "prices_include_taxes": true,
        "taxes": [
            { "percentage": 7, "product_types": ["book", "food"], "countries": ["DE"] },
            { "percentage": 19, "countries": ["DE"] },
            { "percentage": 19, "product_types": ["shirt"], "countries": ["DE"] },
            { "percentage": 20, "product_types": ["book"], "countries": ["FR"] }
        ]
    }"#;

    fn write_json(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(settings: &NamedTempFile) -> CheckSettingsArgs {
        CheckSettingsArgs {
            settings: Some(settings.path().to_path_buf()),
            country: None,
            product_types: Vec::new(),
            pretty: false,
        }
    }

    #[test]
    fn test_reports_shadowed_rules() {
        let settings = write_json(SETTINGS);

        let report = check(&args(&settings), &CliConfig::default()).unwrap();

        assert_eq!(report.tax_mode, TaxMode::Inclusive);
        assert_eq!(report.rules, 4);
        assert_eq!(report.shadowed, vec![ShadowedRule { rule: 2, shadowed_by: 1 }]);
        assert!(report.coverage.is_empty());
    }

    #[test]
    fn test_coverage_for_named_product_types() {
        let settings = write_json(SETTINGS);
        let mut check_args = args(&settings);
        check_args.country = Some("FR".to_string());

        let report = check(&check_args, &CliConfig::default()).unwrap();

        let resolved: Vec<(&str, Option<usize>)> = report
            .coverage
            .iter()
            .map(|c| (c.product_type.as_str(), c.rule))
            .collect();
        assert_eq!(
            resolved,
            vec![("book", Some(3)), ("food", None), ("shirt", None)]
        );
        assert_eq!(report.coverage[0].percentage, Percentage::new(20));
    }

    #[test]
    fn test_coverage_for_requested_product_types() {
        let settings = write_json(SETTINGS);
        let mut check_args = args(&settings);
        check_args.product_types = vec!["toy".to_string()];

        let mut config = CliConfig::default();
        config.pricing.default_country = Some("DE".to_string());

        let report = check(&check_args, &config).unwrap();
        assert_eq!(report.country.as_deref(), Some("DE"));
        assert_eq!(report.coverage.len(), 1);
        assert_eq!(report.coverage[0].rule, Some(1));
        assert_eq!(report.coverage[0].percentage, Percentage::new(19));
    }

    #[test]
    fn test_product_types_need_a_country() {
        let settings = write_json(SETTINGS);
        let mut check_args = args(&settings);
        check_args.product_types = vec!["toy".to_string()];

        let err = check(&check_args, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::MissingCountry));
    }

    #[test]
    fn test_invalid_rule_is_rejected() {
        let settings = write_json(r#"{ "taxes": [ { "percentage": 7 }, { "percentage": 250 } ] }"#);

        let err = check(&args(&settings), &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Invalid(CoreError::InvalidTaxRule { index: 1, .. })));
    }

    #[test]
    fn test_requires_settings() {
        let check_args = CheckSettingsArgs {
            settings: None,
            country: None,
            product_types: Vec::new(),
            pretty: false,
        };

        let err = check(&check_args, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::MissingSettings));
    }

    #[test]
    fn test_run_renders_json() {
        let settings = write_json(SETTINGS);
        let mut check_args = args(&settings);
        check_args.country = Some("DE".to_string());

        let output = run(&check_args, &CliConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["rules"], 4);
        assert_eq!(json["shadowed"][0]["shadowed_by"], 1);
        assert_eq!(json["coverage"][0]["product_type"], "book");
        assert_eq!(json["coverage"][0]["rule"], 0);
    }
}
