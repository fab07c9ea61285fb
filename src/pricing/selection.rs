//! Shopper selection state and the derived pricing view.

use super::downpayment::{DownpaymentOptions, DownpaymentSplit};
use super::installment::{calculate_plans, PlanQuote};
use super::variant::{resolve_price, VariantSelection};
use super::PricingError;
use crate::catalog::{PlanId, Product, VariantGroup};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the shopper has picked for one product view.
///
/// Mutations only change the stored choices; call [`SelectionState::derive`]
/// afterwards to get up-to-date figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    variants: VariantSelection,
    downpayment_percent: u8,
    plan_id: Option<PlanId>,
    #[serde(skip)]
    options: DownpaymentOptions,
}

impl SelectionState {
    /// Creates the initial state for a freshly loaded product.
    ///
    /// Picks the first color and finish, the second storage option when there
    /// are at least two (else the first), the default downpayment, and the
    /// first plan.
    pub fn for_product(product: &Product, options: DownpaymentOptions) -> Self {
        let variants = &product.variants;
        let first = |group: VariantGroup| variants.group(group).first().map(|o| o.value.clone());

        let selection = VariantSelection {
            color: first(VariantGroup::Color),
            storage: variants
                .storage
                .get(1)
                .or_else(|| variants.storage.first())
                .map(|o| o.value.clone()),
            finish: first(VariantGroup::Finish),
        };

        Self {
            variants: selection,
            downpayment_percent: options.default_percent(),
            plan_id: product.emi_plans.first().map(|p| p.id.clone()),
            options,
        }
    }

    pub fn variants(&self) -> &VariantSelection {
        &self.variants
    }

    pub fn downpayment_percent(&self) -> u8 {
        self.downpayment_percent
    }

    pub fn plan_id(&self) -> Option<&PlanId> {
        self.plan_id.as_ref()
    }

    pub fn downpayment_options(&self) -> &DownpaymentOptions {
        &self.options
    }

    /// Selects a variant value. Keys missing from the product are kept and
    /// priced as unselected.
    pub fn set_variant(&mut self, group: VariantGroup, value: impl Into<String>) {
        self.variants.set(group, Some(value.into()));
    }

    pub fn clear_variant(&mut self, group: VariantGroup) {
        self.variants.set(group, None);
    }

    /// Chooses a downpayment percentage. The state is unchanged on error.
    pub fn set_downpayment(&mut self, percent: u8) -> Result<(), PricingError> {
        if !self.options.contains(percent) {
            return Err(PricingError::selection(format!(
                "downpayment of {}% is not offered",
                percent
            )));
        }
        self.downpayment_percent = percent;
        Ok(())
    }

    /// Chooses a plan. Unknown identifiers leave no plan selected.
    ///
    /// Returns true if the plan exists on the product.
    pub fn set_plan(&mut self, product: &Product, plan_id: &PlanId) -> bool {
        if product.has_plan(plan_id) {
            self.plan_id = Some(plan_id.clone());
            true
        } else {
            debug!("Plan {} not offered for {}, clearing plan selection", plan_id, product.id);
            self.plan_id = None;
            false
        }
    }

    /// Computes the pricing view for the current choices.
    pub fn derive(&self, product: &Product) -> Result<DerivedPricing, PricingError> {
        let unit_price = resolve_price(product, &self.variants)?;
        let split = self.options.split(unit_price, self.downpayment_percent)?;
        let downpayment_options = self.options.quotes(unit_price)?;
        let plans = calculate_plans(split.principal, &product.emi_plans)?;

        let selected_plan = self.plan_id.clone().filter(|id| plans.iter().any(|p| &p.plan_id == id));

        debug!(
            "Derived pricing for {}: unit {} down {} financed {} ({} plans)",
            product.id,
            unit_price,
            split.downpayment,
            split.principal,
            plans.len()
        );

        Ok(DerivedPricing {
            base_price: product.price,
            unit_price,
            downpayment_percent: split.percent,
            downpayment: split.downpayment,
            principal: split.principal,
            downpayment_options,
            plans,
            selected_plan,
        })
    }
}

/// Figures shown for the current selection. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPricing {
    pub base_price: i64,
    /// Base price plus the selected variant modifiers
    pub unit_price: i64,
    pub downpayment_percent: u8,
    pub downpayment: i64,
    /// Amount financed through the plan
    pub principal: i64,
    pub downpayment_options: Vec<DownpaymentSplit>,
    pub plans: Vec<PlanQuote>,
    pub selected_plan: Option<PlanId>,
}

impl DerivedPricing {
    /// The quote for the selected plan, if one is selected and still offered.
    pub fn selected(&self) -> Option<&PlanQuote> {
        let id = self.selected_plan.as_ref()?;
        self.plans.iter().find(|p| &p.plan_id == id)
    }

    /// Downpayment plus every installment of the selected plan.
    pub fn total_payable(&self) -> Option<i64> {
        self.selected().map(|p| self.downpayment + p.installment.total_amount)
    }

    /// True when variant modifiers moved the price away from the base price.
    pub fn price_adjusted(&self) -> bool {
        self.unit_price != self.base_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EmiPlan, ProductId, VariantOption, Variants};

    fn make_product() -> Product {
        Product {
            id: ProductId("p1".to_string()),
            name: "Test Phone".to_string(),
            slug: "test-phone".to_string(),
            price: 50000,
            mrp: Some(54900),
            base_variant: "128 GB, Black".to_string(),
            image: None,
            images: Vec::new(),
            variants: Variants {
                colors: vec![
                    VariantOption::new("black", "Black", 0),
                    VariantOption::new("gold", "Gold", 2000),
                ],
                storage: vec![
                    VariantOption::new("128", "128 GB", 0),
                    VariantOption::new("256", "256 GB", 5000),
                    VariantOption::new("512", "512 GB", 15000),
                ],
                finish: vec![VariantOption::new("glossy", "Glossy", 0)],
            },
            emi_plans: vec![
                EmiPlan::new("no-cost-3", 0.0, 3),
                EmiPlan::new("six", 1.5, 6),
                EmiPlan::new("twelve", 1.5, 12),
            ],
        }
    }

    #[test]
    fn test_defaults() {
        let product = make_product();
        let state = SelectionState::for_product(&product, DownpaymentOptions::default());

        assert_eq!(state.variants().color.as_deref(), Some("black"));
        assert_eq!(state.variants().storage.as_deref(), Some("256"));
        assert_eq!(state.variants().finish.as_deref(), Some("glossy"));
        assert_eq!(state.downpayment_percent(), 20);
        assert_eq!(state.plan_id(), Some(&PlanId::from("no-cost-3")));
    }

    #[test]
    fn test_defaults_single_storage_option() {
        let mut product = make_product();
        product.variants.storage.truncate(1);
        let state = SelectionState::for_product(&product, DownpaymentOptions::default());
        assert_eq!(state.variants().storage.as_deref(), Some("128"));
    }

    #[test]
    fn test_defaults_without_variants_or_plans() {
        let mut product = make_product();
        product.variants = Variants::default();
        product.emi_plans.clear();

        let state = SelectionState::for_product(&product, DownpaymentOptions::default());
        assert_eq!(state.variants(), &VariantSelection::new());
        assert!(state.plan_id().is_none());

        let derived = state.derive(&product).unwrap();
        assert_eq!(derived.unit_price, 50000);
        assert!(derived.plans.is_empty());
        assert!(derived.selected().is_none());
        assert!(derived.total_payable().is_none());
    }

    #[test]
    fn test_derive_default_state() {
        let product = make_product();
        let state = SelectionState::for_product(&product, DownpaymentOptions::default());
        let derived = state.derive(&product).unwrap();

        assert_eq!(derived.unit_price, 55000);
        assert!(derived.price_adjusted());
        assert_eq!(derived.downpayment, 11000);
        assert_eq!(derived.principal, 44000);
        assert_eq!(derived.downpayment_options.len(), 2);
        assert_eq!(derived.plans.len(), 3);

        let selected = derived.selected().unwrap();
        assert_eq!(selected.installment.monthly_amount, 14667);
        assert_eq!(derived.total_payable(), Some(11000 + 44001));
    }

    #[test]
    fn test_derive_is_idempotent() {
        let product = make_product();
        let state = SelectionState::for_product(&product, DownpaymentOptions::default());
        assert_eq!(state.derive(&product).unwrap(), state.derive(&product).unwrap());
    }

    #[test]
    fn test_mutations_do_not_recompute_until_derive() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());
        let before = state.derive(&product).unwrap();

        state.set_variant(VariantGroup::Color, "gold");
        state.set_downpayment(40).unwrap();
        assert_eq!(before.unit_price, 55000);

        let after = state.derive(&product).unwrap();
        assert_eq!(after.unit_price, 57000);
        assert_eq!(after.downpayment_percent, 40);
        assert_eq!(after.downpayment, 22800);
        assert_eq!(after.principal, 34200);
    }

    #[test]
    fn test_set_downpayment_rejects_unoffered() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());

        let err = state.set_downpayment(30).unwrap_err();
        assert!(matches!(err, PricingError::InvalidSelection(_)));
        assert_eq!(state.downpayment_percent(), 20);
    }

    #[test]
    fn test_set_plan() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());

        assert!(state.set_plan(&product, &PlanId::from("six")));
        let derived = state.derive(&product).unwrap();
        let selected = derived.selected().unwrap();
        assert_eq!(selected.tenure_months, 6);
        assert_eq!(selected.installment.monthly_amount, 7723);
        assert_eq!(derived.total_payable(), Some(11000 + 46338));
    }

    #[test]
    fn test_set_unknown_plan_clears_selection() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());

        assert!(!state.set_plan(&product, &PlanId::from("thirty-six")));
        assert!(state.plan_id().is_none());
        assert!(state.derive(&product).unwrap().selected().is_none());
    }

    #[test]
    fn test_selected_plan_missing_after_product_swap() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());
        state.set_plan(&product, &PlanId::from("twelve"));

        let mut other = make_product();
        other.emi_plans.truncate(1);

        let derived = state.derive(&other).unwrap();
        assert_eq!(derived.plans.len(), 1);
        assert!(derived.selected_plan.is_none());
        assert!(derived.selected().is_none());
    }

    #[test]
    fn test_stale_variant_is_tolerated() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());
        state.set_variant(VariantGroup::Storage, "2tb");

        let derived = state.derive(&product).unwrap();
        assert_eq!(derived.unit_price, 50000);
        assert!(!derived.price_adjusted());
    }

    #[test]
    fn test_clear_variant() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());
        state.clear_variant(VariantGroup::Storage);
        assert!(state.variants().storage.is_none());
        assert_eq!(state.derive(&product).unwrap().unit_price, 50000);
    }

    #[test]
    fn test_malformed_plan_surfaces() {
        let mut product = make_product();
        product.emi_plans.push(EmiPlan::new("bad", -1.0, 6));
        let state = SelectionState::for_product(&product, DownpaymentOptions::default());

        let err = state.derive(&product).unwrap_err();
        assert!(matches!(err, PricingError::InvalidPlan(_)));
    }

    #[test]
    fn test_negative_tenure_from_catalog_is_invalid_plan() {
        let json = r#"{"_id": "x", "name": "Odd", "price": 10000,
            "emiPlans": [{"_id": "minus-three", "tenureMonths": -3, "interestRate": 1.5}]}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        let state = SelectionState::for_product(&product, DownpaymentOptions::default());

        let err = state.derive(&product).unwrap_err();
        assert!(matches!(err, PricingError::InvalidPlan(_)));
        assert!(err.to_string().contains("minus-three"));
    }

    #[test]
    fn test_overflowing_price_is_invalid_selection() {
        let mut product = make_product();
        product.price = i64::MAX / 10;
        let state = SelectionState::for_product(&product, DownpaymentOptions::default());

        let err = state.derive(&product).unwrap_err();
        assert!(matches!(err, PricingError::InvalidSelection(_)));
    }

    #[test]
    fn test_custom_downpayment_options() {
        let product = make_product();
        let options = DownpaymentOptions::new([10, 25, 50]).unwrap();
        let mut state = SelectionState::for_product(&product, options);
        assert_eq!(state.downpayment_percent(), 10);

        state.set_downpayment(50).unwrap();
        let derived = state.derive(&product).unwrap();
        assert_eq!(derived.downpayment, 27500);
        assert_eq!(derived.principal, 27500);
        assert_eq!(derived.downpayment_options.len(), 3);
    }
}
