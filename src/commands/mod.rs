//! CLI command implementations.

pub mod list;
pub mod quote;

pub use list::ListCommand;
pub use quote::{QuoteCommand, QuoteRequest};
