//! Pricing engine: variant resolution, downpayment split, and EMI computation.
//!
//! Everything in here is synchronous and free of side effects apart from
//! debug logging. Figures are whole rupees.

pub mod downpayment;
pub mod error;
pub mod installment;
pub mod selection;
pub mod variant;

pub use downpayment::{split_downpayment, DownpaymentOptions, DownpaymentSplit};
pub use error::PricingError;
pub use installment::{calculate_installment, calculate_plans, Installment, PlanQuote};
pub use selection::{DerivedPricing, SelectionState};
pub use variant::{resolve_price, VariantSelection};
