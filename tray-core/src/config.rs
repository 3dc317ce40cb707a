use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::DEFAULT_TAX_RATE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tax rate {0} is outside 0..=1")]
    TaxRateOutOfRange(Decimal),
}

/// Settings fixed for the lifetime of an [`OrderState`](crate::OrderState).
///
/// `tax_rate` is a fraction (`0.08` for 8%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    pub tax_rate: Decimal,
}

impl OrderConfig {
    pub fn with_tax_rate(tax_rate: Decimal) -> Result<Self, ConfigError> {
        let config = Self { tax_rate };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(ConfigError::TaxRateOutOfRange(self.tax_rate));
        }
        Ok(())
    }
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}
