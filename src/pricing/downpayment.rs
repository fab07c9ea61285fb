//! Splitting an effective price into a downpayment and a financed principal.

use super::PricingError;
use serde::{Deserialize, Serialize};

/// Percentage offered as the default downpayment when available.
pub const DEFAULT_DOWNPAYMENT_PERCENT: u8 = 20;

/// Cash paid upfront and the remainder to be financed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownpaymentSplit {
    pub percent: u8,
    pub downpayment: i64,
    pub principal: i64,
}

/// Splits `price` at `percent`.
///
/// The downpayment is rounded to the nearest rupee with ties going up; the
/// principal is the exact complement, so the two parts always add up to the
/// price.
pub fn split_downpayment(price: i64, percent: u8) -> Result<DownpaymentSplit, PricingError> {
    if percent >= 100 {
        return Err(PricingError::selection(format!(
            "downpayment of {}% leaves nothing to finance",
            percent
        )));
    }
    if price < 0 {
        return Err(PricingError::selection(format!("price {} is negative", price)));
    }

    let downpayment = price
        .checked_mul(i64::from(percent))
        .and_then(|scaled| scaled.checked_add(50))
        .map(|scaled| scaled / 100)
        .ok_or_else(|| {
            PricingError::selection(format!("price {} is too large to split at {}%", price, percent))
        })?;

    Ok(DownpaymentSplit { percent, downpayment, principal: price - downpayment })
}

/// The ordered set of downpayment percentages a shopper may pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownpaymentOptions {
    percentages: Vec<u8>,
    default_percent: u8,
}

impl DownpaymentOptions {
    /// Creates an option set. Duplicates are dropped, order is kept.
    pub fn new(percentages: impl IntoIterator<Item = u8>) -> Result<Self, PricingError> {
        let mut unique: Vec<u8> = Vec::new();
        for percent in percentages {
            if percent == 0 || percent >= 100 {
                return Err(PricingError::selection(format!(
                    "downpayment option {}% must be between 1 and 99",
                    percent
                )));
            }
            if !unique.contains(&percent) {
                unique.push(percent);
            }
        }

        let Some(&first) = unique.first() else {
            return Err(PricingError::selection("at least one downpayment option is required"));
        };

        let default_percent =
            if unique.contains(&DEFAULT_DOWNPAYMENT_PERCENT) { DEFAULT_DOWNPAYMENT_PERCENT } else { first };

        Ok(Self { percentages: unique, default_percent })
    }

    /// Overrides the percentage selected when a product loads.
    pub fn with_default(mut self, percent: u8) -> Result<Self, PricingError> {
        if !self.contains(percent) {
            return Err(PricingError::selection(format!(
                "default downpayment of {}% is not one of {}",
                percent,
                self.describe()
            )));
        }
        self.default_percent = percent;
        Ok(self)
    }

    /// Returns the offered percentages in display order.
    pub fn percentages(&self) -> &[u8] {
        &self.percentages
    }

    /// Returns true if the percentage is offered.
    pub fn contains(&self, percent: u8) -> bool {
        self.percentages.contains(&percent)
    }

    /// The initial selection: 20% when offered unless overridden, otherwise the first option.
    pub fn default_percent(&self) -> u8 {
        self.default_percent
    }

    /// Splits `price` at an offered percentage.
    pub fn split(&self, price: i64, percent: u8) -> Result<DownpaymentSplit, PricingError> {
        if !self.contains(percent) {
            return Err(PricingError::selection(format!(
                "downpayment of {}% is not offered (choose from {})",
                percent,
                self.describe()
            )));
        }
        split_downpayment(price, percent)
    }

    /// Splits `price` at every offered percentage.
    pub fn quotes(&self, price: i64) -> Result<Vec<DownpaymentSplit>, PricingError> {
        self.percentages.iter().map(|&p| split_downpayment(price, p)).collect()
    }

    fn describe(&self) -> String {
        self.percentages.iter().map(|p| format!("{}%", p)).collect::<Vec<_>>().join(", ")
    }
}

impl Default for DownpaymentOptions {
    fn default() -> Self {
        Self { percentages: vec![20, 40], default_percent: DEFAULT_DOWNPAYMENT_PERCENT }
    }
}
