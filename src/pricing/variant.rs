//! Variant price resolution.

use super::PricingError;
use crate::catalog::{Product, VariantGroup};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The chosen value key per variant group. `None` means unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSelection {
    pub color: Option<String>,
    pub storage: Option<String>,
    pub finish: Option<String>,
}

impl VariantSelection {
    /// Returns an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected key for a group.
    pub fn get(&self, group: VariantGroup) -> Option<&str> {
        match group {
            VariantGroup::Color => self.color.as_deref(),
            VariantGroup::Storage => self.storage.as_deref(),
            VariantGroup::Finish => self.finish.as_deref(),
        }
    }

    /// Sets or clears the selected key for a group.
    pub fn set(&mut self, group: VariantGroup, value: Option<String>) {
        let slot = match group {
            VariantGroup::Color => &mut self.color,
            VariantGroup::Storage => &mut self.storage,
            VariantGroup::Finish => &mut self.finish,
        };
        *slot = value;
    }

    /// Builder-style setter.
    pub fn with(mut self, group: VariantGroup, value: impl Into<String>) -> Self {
        self.set(group, Some(value.into()));
        self
    }
}

/// Resolves the effective unit price for a selection.
///
/// Each group contributes the modifier of its selected option. A key that is
/// not present in the group contributes nothing; this happens transiently when
/// a selection outlives the product it was made for.
///
/// Fails only when the sum does not fit in an `i64`.
pub fn resolve_price(
    product: &Product,
    selection: &VariantSelection,
) -> Result<i64, PricingError> {
    let mut price = product.price;

    for group in VariantGroup::ALL {
        let Some(value) = selection.get(group) else {
            continue;
        };
        match product.variants.find(group, value) {
            Some(option) => {
                price = price.checked_add(option.price_modifier).ok_or_else(|| {
                    PricingError::selection(format!(
                        "price of {} overflows with {} '{}'",
                        product.id, group, value
                    ))
                })?;
            }
            None => debug!("Ignoring stale {} selection '{}' for {}", group, value, product.id),
        }
    }

    Ok(price)
}
