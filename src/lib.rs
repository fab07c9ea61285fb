//! emi-quote - EMI pricing for smartphone product pages
//!
//! Resolves variant prices, splits the downpayment, and computes monthly
//! installments for every EMI plan a product offers.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod format;
pub mod pricing;

pub use catalog::{CatalogSource, EmiPlan, PlanId, Product, ProductId, VariantGroup, VariantOption};
pub use config::Config;
pub use pricing::{DerivedPricing, DownpaymentOptions, PricingError, SelectionState};
