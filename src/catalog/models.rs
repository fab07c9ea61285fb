//! Data models for catalog products, variants, and EMI plans.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

/// Opaque EMI plan identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub String);

impl From<&str> for PlanId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product as served by the catalog. Read-only to the pricing engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// URL key used by the catalog API
    #[serde(default)]
    pub slug: String,
    /// Base unit price in whole rupees
    pub price: i64,
    /// List price shown struck through, if any
    #[serde(default)]
    pub mrp: Option<i64>,
    /// Label of the configuration the base price refers to
    #[serde(default, alias = "variant")]
    pub base_variant: String,
    /// Primary image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Gallery image URLs
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Variants,
    #[serde(default)]
    pub emi_plans: Vec<EmiPlan>,
}

impl Product {
    /// Looks up a plan by identifier.
    pub fn plan(&self, id: &PlanId) -> Option<&EmiPlan> {
        self.emi_plans.iter().find(|p| &p.id == id)
    }

    /// Returns true if the given plan identifier exists on this product.
    pub fn has_plan(&self, id: &PlanId) -> bool {
        self.plan(id).is_some()
    }
}

/// Selectable option groups. Groups are independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variants {
    #[serde(default)]
    pub colors: Vec<VariantOption>,
    #[serde(default)]
    pub storage: Vec<VariantOption>,
    #[serde(default)]
    pub finish: Vec<VariantOption>,
}

impl Variants {
    /// Returns the options of a group.
    pub fn group(&self, group: VariantGroup) -> &[VariantOption] {
        match group {
            VariantGroup::Color => &self.colors,
            VariantGroup::Storage => &self.storage,
            VariantGroup::Finish => &self.finish,
        }
    }

    /// Finds an option by value key within a group.
    pub fn find(&self, group: VariantGroup, value: &str) -> Option<&VariantOption> {
        self.group(group).iter().find(|o| o.value == value)
    }

    /// Returns true if no group has any option.
    pub fn is_empty(&self) -> bool {
        VariantGroup::ALL.iter().all(|g| self.group(*g).is_empty())
    }
}

/// One selectable value within a variant group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    /// Key, unique within its group
    pub value: String,
    pub label: String,
    /// Signed amount added to the base price
    #[serde(default)]
    pub price_modifier: i64,
    /// Image shown for this option (colors only)
    #[serde(default)]
    pub image: Option<String>,
}

impl VariantOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, price_modifier: i64) -> Self {
        Self { value: value.into(), label: label.into(), price_modifier, image: None }
    }
}

/// An installment plan offered for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiPlan {
    #[serde(rename = "_id")]
    pub id: PlanId,
    /// Percent per month; 0 means interest-free
    pub interest_rate: f64,
    /// Validated when quoted; non-positive values fail that plan only
    pub tenure_months: i64,
    /// Informational cashback label, never applied to arithmetic
    #[serde(default)]
    pub cashback: Option<String>,
    /// Figure precomputed by the catalog backend; the engine recomputes it
    #[serde(default)]
    pub monthly_amount: Option<i64>,
}

impl EmiPlan {
    pub fn new(id: impl Into<String>, interest_rate: f64, tenure_months: i64) -> Self {
        Self {
            id: PlanId(id.into()),
            interest_rate,
            tenure_months,
            cashback: None,
            monthly_amount: None,
        }
    }

    /// Returns true for interest-free plans.
    pub fn is_interest_free(&self) -> bool {
        self.interest_rate == 0.0
    }
}

/// The three variant groups a product can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantGroup {
    Color,
    Storage,
    Finish,
}

impl VariantGroup {
    pub const ALL: [VariantGroup; 3] =
        [VariantGroup::Color, VariantGroup::Storage, VariantGroup::Finish];

    /// Human-readable group heading.
    pub fn title(&self) -> &'static str {
        match self {
            VariantGroup::Color => "Color",
            VariantGroup::Storage => "Storage",
            VariantGroup::Finish => "Finish",
        }
    }
}

impl FromStr for VariantGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "color" | "colour" | "colors" => Ok(VariantGroup::Color),
            "storage" => Ok(VariantGroup::Storage),
            "finish" => Ok(VariantGroup::Finish),
            _ => Err(format!("Unknown variant group: {}. Use: color, storage, finish", s)),
        }
    }
}

impl fmt::Display for VariantGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantGroup::Color => write!(f, "color"),
            VariantGroup::Storage => write!(f, "storage"),
            VariantGroup::Finish => write!(f, "finish"),
        }
    }
}
