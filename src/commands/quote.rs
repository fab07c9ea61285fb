//! Quote command implementation.

use crate::catalog::{self, CatalogSource, PlanId, Product, VariantGroup};
use crate::config::Config;
use crate::format::Formatter;
use crate::pricing::{DownpaymentOptions, SelectionState};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Shopper choices layered over the defaults picked on load.
#[derive(Debug, Clone, Default)]
pub struct QuoteRequest {
    pub color: Option<String>,
    pub storage: Option<String>,
    pub finish: Option<String>,
    /// Downpayment percentage; must be one of the offered options
    pub downpayment: Option<u8>,
    pub plan: Option<String>,
}

impl QuoteRequest {
    fn variant(&self, group: VariantGroup) -> Option<&str> {
        match group {
            VariantGroup::Color => self.color.as_deref(),
            VariantGroup::Storage => self.storage.as_deref(),
            VariantGroup::Finish => self.finish.as_deref(),
        }
    }
}

/// Prices one product for a set of shopper choices.
pub struct QuoteCommand {
    config: Config,
}

impl QuoteCommand {
    /// Creates a new quote command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads the product from the configured catalog and returns formatted output.
    pub async fn execute(&self, slug: &str, request: &QuoteRequest) -> Result<String> {
        let source = catalog::from_config(&self.config).context("Failed to open catalog")?;

        self.execute_with_source(source.as_ref(), slug, request).await
    }

    /// Prices a product from a provided catalog (for testing).
    pub async fn execute_with_source(
        &self,
        source: &(impl CatalogSource + ?Sized),
        slug: &str,
        request: &QuoteRequest,
    ) -> Result<String> {
        let options = self.config.downpayment_options()?;

        info!("Quoting product: {}", slug.trim());
        let product = source.product(slug).await?;

        let state = Self::select(&product, options, request)?;
        let pricing = state.derive(&product)?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_quote(&product, &state, &pricing))
    }

    /// Builds the selection state for a freshly loaded product and applies the request.
    fn select(
        product: &Product,
        options: DownpaymentOptions,
        request: &QuoteRequest,
    ) -> Result<SelectionState> {
        let mut state = SelectionState::for_product(product, options);

        for group in VariantGroup::ALL {
            if let Some(input) = request.variant(group) {
                let value = Self::match_option(product, group, input);
                debug!("Selecting {} {}", group, value);
                state.set_variant(group, value);
            }
        }

        if let Some(percent) = request.downpayment {
            state.set_downpayment(percent)?;
        }

        if let Some(plan) = &request.plan {
            let plan_id = PlanId::from(plan.trim());
            if !state.set_plan(product, &plan_id) {
                warn!("Plan {} is not offered for {}, no plan selected", plan_id, product.slug);
            }
        }

        Ok(state)
    }

    /// Maps user input to an option key, accepting the key itself or its label.
    ///
    /// Unknown input is kept as-is and ends up priced as unselected.
    fn match_option(product: &Product, group: VariantGroup, input: &str) -> String {
        let input = input.trim();
        let options = product.variants.group(group);

        if let Some(option) = options.iter().find(|o| o.value == input) {
            return option.value.clone();
        }
        if let Some(option) = options.iter().find(|o| o.label.eq_ignore_ascii_case(input)) {
            return option.value.clone();
        }

        warn!("{} '{}' is not available for {}, ignoring its price", group.title(), input, product.slug);
        input.to_string()
    }
}
