//! Catalog listing command implementation.

use crate::catalog::{self, CatalogSource};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Lists the products available for EMI quotes.
pub struct ListCommand {
    config: Config,
}

impl ListCommand {
    /// Creates a new list command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Lists the configured catalog and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let source = catalog::from_config(&self.config).context("Failed to open catalog")?;

        self.execute_with_source(source.as_ref()).await
    }

    /// Lists a provided catalog (for testing).
    pub async fn execute_with_source(&self, source: &(impl CatalogSource + ?Sized)) -> Result<String> {
        let products = source.list().await?;
        info!("Catalog has {} products", products.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_catalog(&products))
    }
}
