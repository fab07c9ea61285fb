//! Product catalog access: the HTTP API client, a JSON file catalog, and data models.

pub mod client;
pub mod file;
pub mod models;

pub use client::ApiClient;
pub use file::FileCatalog;
pub use models::{EmiPlan, PlanId, Product, ProductId, VariantGroup, VariantOption, Variants};

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Source of product snapshots - enables mocking for tests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Lists every product in the catalog.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Fetches a single product by slug.
    async fn product(&self, slug: &str) -> Result<Product>;
}

/// Builds the catalog source selected by the configuration.
///
/// A configured `catalog_file` wins over the API.
pub fn from_config(config: &Config) -> Result<Box<dyn CatalogSource>> {
    match &config.catalog_file {
        Some(path) => {
            debug!("Using file catalog: {}", path.display());
            Ok(Box::new(FileCatalog::open(path)?))
        }
        None => {
            debug!("Using catalog API: {}", config.api_url);
            Ok(Box::new(ApiClient::new(config)?))
        }
    }
}

/// Response wrapper used by the catalog API: `{ "success": true, "data": ... }`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Returns the payload, failing when the API reported an error.
    pub fn into_data(self) -> Result<T> {
        if self.success == Some(false) {
            anyhow::bail!(
                "Catalog reported an error: {}",
                self.message.as_deref().unwrap_or("no message")
            );
        }
        self.data.ok_or_else(|| anyhow::anyhow!("Catalog response has no data"))
    }
}
