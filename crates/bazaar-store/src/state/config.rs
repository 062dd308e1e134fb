//! # Market Configuration
//!
//! Currency display and the flat fees checkout adds. The cart itself has no
//! tunables; everything here is consumed by screens and by checkout.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     BAZAAR_CURRENCY_CODE=PKR                                           │
//! │     BAZAAR_CURRENCY_SYMBOL="Rs "                                       │
//! │     BAZAAR_DELIVERY_FEE=1.50      (major units, per vendor order)      │
//! │     BAZAAR_SERVICE_FEE=0.99       (major units, per checkout)          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $BAZAAR_CONFIG, else                                               │
//! │     ~/.config/bazaar-cart/bazaar.toml (Linux)                          │
//! │     ~/Library/Application Support/com.bazaar.cart/bazaar.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     USD, "$", 2 decimals, no fees                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bazaar.toml
//! currency_code = "USD"
//! currency_symbol = "$"
//! currency_decimals = 2
//! delivery_fee_cents = 150
//! service_fee_cents = 99
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bazaar_core::Money;

use crate::error::ConfigError;

/// Money always carries two minor digits.
const MONEY_DECIMALS: u32 = 2;

/// Presentation and checkout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Decimal places shown, 0 to 2
    pub currency_decimals: u8,

    /// Flat delivery fee added to every vendor order, in cents
    pub delivery_fee_cents: i64,

    /// Flat service fee added once per checkout, in cents
    pub service_fee_cents: i64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            delivery_fee_cents: 0,
            service_fee_cents: 0,
        }
    }
}

impl MarketConfig {
    /// Loads config from file (if any), then applies environment overrides.
    ///
    /// ## Errors
    /// Returns `ConfigError` if a config file exists but cannot be read or
    /// parsed. A missing file falls back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults plus environment overrides, no file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Reads a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), currency = %config.currency_code, "Loaded config file");
        Ok(config)
    }

    /// Parses TOML config contents.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Where the config file is looked up.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("BAZAAR_CONFIG") {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("com", "bazaar", "cart").map(|dirs| dirs.config_dir().join("bazaar.toml"))
    }

    /// Applies `BAZAAR_*` overrides read through `lookup`.
    ///
    /// Unparseable fee values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup("BAZAAR_CURRENCY_CODE") {
            self.currency_code = code;
        }

        if let Some(symbol) = lookup("BAZAAR_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(fee) = lookup("BAZAAR_DELIVERY_FEE") {
            match parse_fee(&fee) {
                Some(cents) => self.delivery_fee_cents = cents,
                None => warn!(value = %fee, "Ignoring invalid BAZAAR_DELIVERY_FEE"),
            }
        }

        if let Some(fee) = lookup("BAZAAR_SERVICE_FEE") {
            match parse_fee(&fee) {
                Some(cents) => self.service_fee_cents = cents,
                None => warn!(value = %fee, "Ignoring invalid BAZAAR_SERVICE_FEE"),
            }
        }
    }

    /// Flat delivery fee per vendor order.
    pub fn delivery_fee(&self) -> Money {
        Money::from_cents(self.delivery_fee_cents.max(0))
    }

    /// Flat service fee per checkout.
    pub fn service_fee(&self) -> Money {
        Money::from_cents(self.service_fee_cents.max(0))
    }

    /// Formats a cent amount as a currency string.
    ///
    /// Rounds half up when fewer than two decimals are shown.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_store::MarketConfig;
    ///
    /// let config = MarketConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = u32::from(self.currency_decimals).min(MONEY_DECIMALS);
        let step = 10_u64.pow(MONEY_DECIMALS - decimals);
        let rounded = (cents.unsigned_abs() + step / 2) / step;

        let divisor = 10_u64.pow(decimals);
        let whole = rounded / divisor;
        let frac = rounded % divisor;

        format!(
            "{}{}{}",
            if cents < 0 && rounded > 0 { "-" } else { "" },
            self.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = decimals as usize)
            } else {
                whole.to_string()
            }
        )
    }
}

fn parse_fee(value: &str) -> Option<i64> {
    let major = value.trim().parse::<f64>().ok()?;
    Money::try_from_major(major).ok().map(|m| m.cents())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency_positive() {
        let config = MarketConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = MarketConfig::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_format_currency_whole_units() {
        let config = MarketConfig {
            currency_code: "PKR".to_string(),
            currency_symbol: "Rs ".to_string(),
            currency_decimals: 0,
            ..MarketConfig::default()
        };
        assert_eq!(config.format_currency(25050), "Rs 251");
        assert_eq!(config.format_currency(25049), "Rs 250");
    }

    #[test]
    fn test_format_currency_no_sign_when_rounding_to_zero() {
        let config = MarketConfig {
            currency_symbol: "Rs ".to_string(),
            currency_decimals: 0,
            ..MarketConfig::default()
        };
        assert_eq!(config.format_currency(-1), "Rs 0");
        assert_eq!(config.format_currency(-49), "Rs 0");
        assert_eq!(config.format_currency(-50), "-Rs 1");
    }

    #[test]
    fn test_from_toml_partial_file_keeps_defaults() {
        let config = MarketConfig::from_toml_str(
            r#"
            currency_code = "PKR"
            delivery_fee_cents = 15000
            "#,
        )
        .unwrap();

        assert_eq!(config.currency_code, "PKR");
        assert_eq!(config.delivery_fee_cents, 15000);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.service_fee_cents, 0);
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let err = MarketConfig::from_toml_str("delivery_fee_cents = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "service_fee_cents = 99").unwrap();

        let config = MarketConfig::from_file(file.path()).unwrap();
        assert_eq!(config.service_fee().cents(), 99);
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarketConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = MarketConfig::default();
        config.apply_env_overrides(env(&[
            ("BAZAAR_CURRENCY_CODE", "EUR"),
            ("BAZAAR_CURRENCY_SYMBOL", "€"),
            ("BAZAAR_DELIVERY_FEE", "2.50"),
            ("BAZAAR_SERVICE_FEE", " 0.99 "),
        ]));

        assert_eq!(config.currency_code, "EUR");
        assert_eq!(config.delivery_fee_cents, 250);
        assert_eq!(config.service_fee_cents, 99);
        assert_eq!(config.format_currency(250), "€2.50");
    }

    #[test]
    fn test_invalid_env_fee_is_ignored() {
        let mut config = MarketConfig {
            delivery_fee_cents: 100,
            ..MarketConfig::default()
        };
        config.apply_env_overrides(env(&[
            ("BAZAAR_DELIVERY_FEE", "free"),
            ("BAZAAR_SERVICE_FEE", "-1"),
        ]));

        assert_eq!(config.delivery_fee_cents, 100);
        assert_eq!(config.service_fee_cents, 0);
    }
}
