// ⚙️ Remittance settings
// Loaded from JSON the same way classification rules are; missing fields take defaults.

use crate::money::{within_bounds, MAX_AMOUNT};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Intermediary routing fee assumed when a tariff gives no flat override, in USD
pub const TRANSSHIPMENT_ESTIMATE_USD: Decimal = dec!(20);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemitConfig {
    /// USD figure converted to NTD at the quote's sell price
    pub transshipment_estimate_usd: Decimal,
}

impl Default for RemitConfig {
    fn default() -> Self {
        RemitConfig {
            transshipment_estimate_usd: TRANSSHIPMENT_ESTIMATE_USD,
        }
    }
}

impl RemitConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: RemitConfig =
            serde_json::from_str(content).context("Failed to parse remit config JSON")?;

        if config.transshipment_estimate_usd < Decimal::ZERO {
            anyhow::bail!(
                "transshipment_estimate_usd must not be negative, got {}",
                config.transshipment_estimate_usd
            );
        }
        if !within_bounds(config.transshipment_estimate_usd) {
            anyhow::bail!(
                "transshipment_estimate_usd must be at most {}, got {}",
                MAX_AMOUNT,
                config.transshipment_estimate_usd
            );
        }

        Ok(config)
    }

    /// Load settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read remit config: {:?}", path.as_ref()))?;

        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_estimate() {
        assert_eq!(RemitConfig::default().transshipment_estimate_usd, dec!(20));
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = RemitConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RemitConfig::default());
    }

    #[test]
    fn test_override_estimate() {
        let config = RemitConfig::from_json_str(r#"{"transshipment_estimate_usd": 25.5}"#).unwrap();
        assert_eq!(config.transshipment_estimate_usd, dec!(25.5));
    }

    #[test]
    fn test_negative_estimate_rejected() {
        assert!(RemitConfig::from_json_str(r#"{"transshipment_estimate_usd": -1}"#).is_err());
    }

    #[test]
    fn test_oversized_estimate_rejected() {
        assert!(RemitConfig::from_json_str(r#"{"transshipment_estimate_usd": 1e12}"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(RemitConfig::from_file("/nonexistent/remit.json").is_err());
    }
}
