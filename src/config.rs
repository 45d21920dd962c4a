use std::collections::HashMap;
use thiserror::Error;

use crate::domain::Currency;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// When false, only realized-gain rows are returned; when true, all
    /// intermediate borrow/repay/buy/sell rows are kept as well.
    pub verbose: bool,
    /// Whether the ledger simulates margin borrow/repay pairs.
    pub variant: LedgerVariant,
    /// Account quote currency for cash legs and realized gains.
    pub quote_currency: Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerVariant {
    /// Plain trade ledger: fills and realized gains only.
    Spot,
    /// Margin-aware ledger: synthetic loan/repayment rows around every
    /// position lifecycle.
    Margin,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbose: false,
            variant: LedgerVariant::Spot,
            quote_currency: Currency::new("USDC"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let verbose = match env_map.get("VERBOSE").map(|s| s.as_str()).unwrap_or("false") {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "VERBOSE".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        let variant = match env_map
            .get("LEDGER_VARIANT")
            .map(|s| s.as_str())
            .unwrap_or("spot")
        {
            "spot" => LedgerVariant::Spot,
            "margin" => LedgerVariant::Margin,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LEDGER_VARIANT".to_string(),
                    format!("must be spot or margin, got {}", other),
                ))
            }
        };

        let quote_currency = Currency::new(
            env_map
                .get("QUOTE_CURRENCY")
                .map(|s| s.as_str())
                .unwrap_or("USDC"),
        );

        Ok(Config {
            verbose,
            variant,
            quote_currency,
        })
    }
}
