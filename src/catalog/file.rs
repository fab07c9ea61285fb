//! Catalog backed by a local JSON file.

use super::{CatalogSource, Envelope, Product};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Products(Vec<Product>),
    Envelope(Envelope<Vec<Product>>),
}

/// Products loaded once from a JSON file holding either a bare array or the
/// API's `{ "success": ..., "data": [...] }` envelope.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    products: Vec<Product>,
}

impl FileCatalog {
    /// Reads and parses a catalog file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading catalog from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        Self::from_json(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
    }

    /// Parses catalog JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let products = match serde_json::from_str(json)? {
            CatalogDocument::Products(products) => products,
            CatalogDocument::Envelope(envelope) => envelope.into_data()?,
        };

        debug!("Loaded {} products", products.len());
        Ok(Self { products })
    }

    /// Creates a catalog from products already in memory.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Finds a product by slug, falling back to its identifier.
    pub fn find(&self, key: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.slug == key)
            .or_else(|| self.products.iter().find(|p| p.id.0 == key))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn product(&self, slug: &str) -> Result<Product> {
        let slug = slug.trim();
        self.find(slug).cloned().with_context(|| format!("Product not found: {}", slug))
    }
}
