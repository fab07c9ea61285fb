//! Errors raised by the pricing engine.

use thiserror::Error;

/// Precondition violations in downpayment and installment arithmetic.
///
/// Stale variant keys and missing plans are not represented here: those fall
/// back to a zero modifier or to "no plan selected".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Downpayment percentage not offered, or one that leaves nothing sensible to finance.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Malformed plan: zero tenure or a negative/non-finite rate.
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}

impl PricingError {
    pub(crate) fn selection(msg: impl Into<String>) -> Self {
        PricingError::InvalidSelection(msg.into())
    }

    pub(crate) fn plan(msg: impl Into<String>) -> Self {
        PricingError::InvalidPlan(msg.into())
    }
}
