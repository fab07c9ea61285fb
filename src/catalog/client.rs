//! HTTP client for the product catalog API.

use super::{CatalogSource, Envelope, Product};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

/// Catalog API client (`/api/products`, `/api/products/{slug}`).
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the configured API URL.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, base_url: config.api_url.trim_end_matches('/').to_string() })
    }

    /// Creates a client against a custom base URL (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let config = Config { api_url: base_url.into(), ..Config::default() };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs a JSON envelope. Returns `Ok(None)` on 404.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 404 {
            return Ok(None);
        }

        if !status.is_success() {
            anyhow::bail!("Catalog returned status: {}", status);
        }

        let body = response.text().await.context("Failed to read response body")?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).context("Failed to parse catalog response")?;

        envelope.into_data().map(Some)
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn list(&self) -> Result<Vec<Product>> {
        let url = format!("{}/api/products", self.base_url);

        info!("Fetching product list");
        self.fetch(&url).await?.context("Product list endpoint not found")
    }

    async fn product(&self, slug: &str) -> Result<Product> {
        let slug = slug.trim();
        if slug.is_empty() {
            anyhow::bail!("Product slug must not be empty");
        }

        let url = format!("{}/api/products/{}", self.base_url, urlencoding::encode(slug));

        info!("Fetching product: {}", slug);
        match self.fetch(&url).await? {
            Some(product) => Ok(product),
            None => anyhow::bail!("Product not found: {}", slug),
        }
    }
}
