//! Output formatting for quotes and catalog listings (table, JSON, markdown, CSV).

use crate::catalog::{Product, VariantGroup};
use crate::config::OutputFormat;
use crate::pricing::{DerivedPricing, PlanQuote, SelectionState};
use serde::Serialize;

/// Formats a whole-rupee amount with Indian digit grouping, e.g. `₹1,23,456`.
pub fn rupees(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{}₹{}", sign, digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{}₹{},{}", sign, groups.join(","), tail)
}

/// Formats a signed variant modifier, e.g. `+₹5,000`.
fn modifier(amount: i64) -> String {
    if amount > 0 {
        format!("+{}", rupees(amount))
    } else {
        rupees(amount)
    }
}

#[derive(Serialize)]
struct QuoteView<'a> {
    product: ProductSummary<'a>,
    selection: &'a SelectionState,
    pricing: &'a DerivedPricing,
    total_payable: Option<i64>,
}

#[derive(Serialize)]
struct ProductSummary<'a> {
    id: &'a str,
    name: &'a str,
    slug: &'a str,
    base_variant: &'a str,
    price: i64,
    mrp: Option<i64>,
    plans: usize,
    colors: usize,
    storage_options: usize,
}

impl<'a> From<&'a Product> for ProductSummary<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: &product.id.0,
            name: &product.name,
            slug: &product.slug,
            base_variant: &product.base_variant,
            price: product.price,
            mrp: product.mrp,
            plans: product.emi_plans.len(),
            colors: product.variants.colors.len(),
            storage_options: product.variants.storage.len(),
        }
    }
}

/// Formats quotes and listings for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the pricing breakdown for one product view.
    pub fn format_quote(
        &self,
        product: &Product,
        selection: &SelectionState,
        pricing: &DerivedPricing,
    ) -> String {
        match self.format {
            OutputFormat::Json => self.json_quote(product, selection, pricing),
            OutputFormat::Table => self.table_quote(product, selection, pricing),
            OutputFormat::Markdown => self.markdown_quote(product, selection, pricing),
            OutputFormat::Csv => self.csv_quote(pricing),
        }
    }

    /// Formats a catalog listing.
    pub fn format_catalog(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_catalog_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_catalog(products),
            OutputFormat::Table => self.table_catalog(products),
            OutputFormat::Markdown => self.markdown_catalog(products),
            OutputFormat::Csv => self.csv_catalog(products),
        }
    }

    /// Label of the selected option in a group, or the raw key if it is stale.
    fn selected_label(product: &Product, selection: &SelectionState, group: VariantGroup) -> Option<String> {
        let key = selection.variants().get(group)?;
        Some(match product.variants.find(group, key) {
            Some(option) if option.price_modifier != 0 => {
                format!("{} ({})", option.label, modifier(option.price_modifier))
            }
            Some(option) => option.label.clone(),
            None => format!("{} (unavailable)", key),
        })
    }

    fn plan_badges(plan: &PlanQuote) -> String {
        let mut badges = Vec::new();
        if plan.is_interest_free() {
            badges.push("NO COST EMI".to_string());
        }
        if let Some(cashback) = &plan.cashback {
            badges.push(cashback.clone());
        }
        badges.join(", ")
    }

    fn rate_label(plan: &PlanQuote) -> String {
        if plan.is_interest_free() {
            "0%".to_string()
        } else {
            format!("{}%/mo", plan.interest_rate)
        }
    }

    // JSON formatting

    fn json_quote(&self, product: &Product, selection: &SelectionState, pricing: &DerivedPricing) -> String {
        let view = QuoteView {
            product: product.into(),
            selection,
            pricing,
            total_payable: pricing.total_payable(),
        };
        serde_json::to_string_pretty(&view).unwrap_or_else(|_| "{}".to_string())
    }

    fn json_catalog(&self, products: &[Product]) -> String {
        let summaries: Vec<ProductSummary> = products.iter().map(ProductSummary::from).collect();
        serde_json::to_string_pretty(&summaries).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_quote(&self, product: &Product, selection: &SelectionState, pricing: &DerivedPricing) -> String {
        let mut lines = Vec::new();

        if product.base_variant.is_empty() {
            lines.push(product.name.clone());
        } else {
            lines.push(format!("{} ({})", product.name, product.base_variant));
        }

        if pricing.price_adjusted() {
            lines.push(format!(
                "Price:       {} (base {})",
                rupees(pricing.unit_price),
                rupees(pricing.base_price)
            ));
        } else {
            lines.push(format!("Price:       {}", rupees(pricing.unit_price)));
        }

        if let Some(mrp) = product.mrp {
            lines.push(format!("MRP:         {}", rupees(mrp)));
        }

        for group in VariantGroup::ALL {
            if product.variants.group(group).is_empty() {
                continue;
            }
            let label = Self::selected_label(product, selection, group).unwrap_or_else(|| "-".to_string());
            lines.push(format!("{:<13}{}", format!("{}:", group.title()), label));
        }

        lines.push(String::new());
        lines.push("Downpayment:".to_string());
        for option in &pricing.downpayment_options {
            let marker = if option.percent == pricing.downpayment_percent { "(*)" } else { "( )" };
            lines.push(format!("  {} {:>3}%  {:>12}", marker, option.percent, rupees(option.downpayment)));
        }

        lines.push(String::new());
        if pricing.plans.is_empty() {
            lines.push("No EMI plans available".to_string());
        } else {
            lines.push(format!("EMI plans on {} financed:", rupees(pricing.principal)));
            lines.push(format!(
                "  {:<3} {:>6}  {:>12}  {:>8}  {:>12}  {:>12}  {}",
                "", "Months", "Monthly", "Rate", "Interest", "Total", "Offers"
            ));
            for plan in &pricing.plans {
                let marker =
                    if pricing.selected_plan.as_ref() == Some(&plan.plan_id) { "(*)" } else { "( )" };
                lines.push(format!(
                    "  {:<3} {:>6}  {:>12}  {:>8}  {:>12}  {:>12}  {}",
                    marker,
                    plan.tenure_months,
                    rupees(plan.installment.monthly_amount),
                    Self::rate_label(plan),
                    rupees(plan.installment.interest_amount),
                    rupees(plan.installment.total_amount),
                    Self::plan_badges(plan)
                ));
            }
        }

        lines.push(String::new());
        lines.push(format!("Product price:          {:>12}", rupees(pricing.unit_price)));
        lines.push(format!(
            "Downpayment ({}%):       {:>12}",
            pricing.downpayment_percent,
            format!("-{}", rupees(pricing.downpayment))
        ));
        lines.push(format!("Amount to be financed:  {:>12}", rupees(pricing.principal)));

        match (pricing.selected(), pricing.total_payable()) {
            (Some(plan), Some(total)) => {
                lines.push(format!("Total amount payable:   {:>12}", rupees(total)));
                lines.push(format!(
                    "Pay {} x {} months",
                    rupees(plan.installment.monthly_amount),
                    plan.tenure_months
                ));
            }
            _ => lines.push("No plan selected".to_string()),
        }

        lines.join("\n")
    }

    fn table_catalog(&self, products: &[Product]) -> String {
        let slug_width = 24;
        let price_width = 12;
        let count_width = 6;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<slug_width$}  {:>price_width$}  {:>price_width$}  {:>count_width$}  {:>count_width$}  {:>count_width$}  {}",
            "Slug", "Price", "MRP", "Plans", "Colors", "Stor.", "Name"
        ));
        lines.push(format!(
            "{:-<slug_width$}  {:-<price_width$}  {:-<price_width$}  {:-<count_width$}  {:-<count_width$}  {:-<count_width$}  {:-<30}",
            "", "", "", "", "", "", ""
        ));

        for product in products {
            let mrp = product.mrp.map(rupees).unwrap_or_else(|| "-".to_string());
            let name = if product.base_variant.is_empty() {
                product.name.clone()
            } else {
                format!("{} ({})", product.name, product.base_variant)
            };

            lines.push(format!(
                "{:<slug_width$}  {:>price_width$}  {:>price_width$}  {:>count_width$}  {:>count_width$}  {:>count_width$}  {}",
                product.slug,
                rupees(product.price),
                mrp,
                product.emi_plans.len(),
                product.variants.colors.len(),
                product.variants.storage.len(),
                name
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_quote(&self, product: &Product, selection: &SelectionState, pricing: &DerivedPricing) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.name));
        lines.push(String::new());

        if !product.base_variant.is_empty() {
            lines.push(format!("- **Variant:** {}", product.base_variant));
        }
        lines.push(format!("- **Price:** {}", rupees(pricing.unit_price)));
        if let Some(mrp) = product.mrp {
            lines.push(format!("- **MRP:** ~~{}~~", rupees(mrp)));
        }
        for group in VariantGroup::ALL {
            if let Some(label) = Self::selected_label(product, selection, group) {
                lines.push(format!("- **{}:** {}", group.title(), label));
            }
        }
        lines.push(format!(
            "- **Downpayment ({}%):** {}",
            pricing.downpayment_percent,
            rupees(pricing.downpayment)
        ));
        lines.push(format!("- **Amount financed:** {}", rupees(pricing.principal)));
        if let Some(total) = pricing.total_payable() {
            lines.push(format!("- **Total payable:** {}", rupees(total)));
        }

        lines.push(String::new());
        if pricing.plans.is_empty() {
            lines.push("*No EMI plans available*".to_string());
            return lines.join("\n");
        }

        lines.push("| | Months | Monthly | Rate | Interest | Total | Offers |".to_string());
        lines.push("|-|--------|---------|------|----------|-------|--------|".to_string());
        for plan in &pricing.plans {
            let marker = if pricing.selected_plan.as_ref() == Some(&plan.plan_id) { "✓" } else { "" };
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} | {} |",
                marker,
                plan.tenure_months,
                rupees(plan.installment.monthly_amount),
                Self::rate_label(plan),
                rupees(plan.installment.interest_amount),
                rupees(plan.installment.total_amount),
                Self::plan_badges(plan)
            ));
        }

        lines.join("\n")
    }

    fn markdown_catalog(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| Name | Variant | Price | MRP | EMI Plans |".to_string());
        lines.push("|------|---------|-------|-----|-----------|".to_string());

        for product in products {
            let mrp = product.mrp.map(|m| format!("~~{}~~", rupees(m))).unwrap_or_default();
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                product.name,
                product.base_variant,
                rupees(product.price),
                mrp,
                product.emi_plans.len()
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_quote_header(&self) -> String {
        "plan_id,tenure_months,interest_rate,principal,monthly_amount,total_amount,interest_amount,cashback,selected"
            .to_string()
    }

    fn csv_quote(&self, pricing: &DerivedPricing) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_quote_header());

        for plan in &pricing.plans {
            let cashback = plan.cashback.as_deref().map(Self::csv_escape).unwrap_or_default();
            lines.push(format!(
                "{},{},{},{},{},{},{},{},{}",
                Self::csv_escape(&plan.plan_id.0),
                plan.tenure_months,
                plan.interest_rate,
                pricing.principal,
                plan.installment.monthly_amount,
                plan.installment.total_amount,
                plan.installment.interest_amount,
                cashback,
                pricing.selected_plan.as_ref() == Some(&plan.plan_id)
            ));
        }

        lines.join("\n")
    }

    fn csv_catalog_header(&self) -> String {
        "id,slug,name,base_variant,price,mrp,plans,colors,storage_options".to_string()
    }

    fn csv_catalog(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_catalog_header());

        for product in products {
            lines.push(format!(
                "{},{},{},{},{},{},{},{},{}",
                Self::csv_escape(&product.id.0),
                Self::csv_escape(&product.slug),
                Self::csv_escape(&product.name),
                Self::csv_escape(&product.base_variant),
                product.price,
                product.mrp.map(|m| m.to_string()).unwrap_or_default(),
                product.emi_plans.len(),
                product.variants.colors.len(),
                product.variants.storage.len()
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EmiPlan, PlanId, ProductId, VariantOption, Variants};
    use crate::pricing::DownpaymentOptions;

    fn make_product() -> Product {
        let mut cashback_plan = EmiPlan::new("p3", 0.0, 3);
        cashback_plan.cashback = Some("₹2,000 cashback, HDFC".to_string());

        Product {
            id: ProductId("p1".to_string()),
            name: "Test Phone".to_string(),
            slug: "test-phone".to_string(),
            price: 50000,
            mrp: Some(54900),
            base_variant: "128 GB".to_string(),
            image: None,
            images: Vec::new(),
            variants: Variants {
                colors: vec![VariantOption::new("black", "Black", 0)],
                storage: vec![
                    VariantOption::new("128", "128 GB", 0),
                    VariantOption::new("256", "256 GB", 5000),
                ],
                finish: Vec::new(),
            },
            emi_plans: vec![cashback_plan, EmiPlan::new("p6", 1.5, 6)],
        }
    }

    fn make_quote(product: &Product) -> (SelectionState, DerivedPricing) {
        let state = SelectionState::for_product(product, DownpaymentOptions::default());
        let pricing = state.derive(product).unwrap();
        (state, pricing)
    }

    #[test]
    fn test_rupees_grouping() {
        assert_eq!(rupees(0), "₹0");
        assert_eq!(rupees(999), "₹999");
        assert_eq!(rupees(1000), "₹1,000");
        assert_eq!(rupees(44001), "₹44,001");
        assert_eq!(rupees(123456), "₹1,23,456");
        assert_eq!(rupees(1234567), "₹12,34,567");
        assert_eq!(rupees(12345678), "₹1,23,45,678");
        assert_eq!(rupees(-1), "-₹1");
        assert_eq!(rupees(-55000), "-₹55,000");
    }

    #[test]
    fn test_modifier_sign() {
        assert_eq!(modifier(5000), "+₹5,000");
        assert_eq!(modifier(-500), "-₹500");
        assert_eq!(modifier(0), "₹0");
    }

    #[test]
    fn test_table_quote() {
        let product = make_product();
        let (state, pricing) = make_quote(&product);
        let output = Formatter::new(OutputFormat::Table).format_quote(&product, &state, &pricing);

        assert!(output.contains("Test Phone (128 GB)"));
        assert!(output.contains("₹55,000 (base ₹50,000)"));
        assert!(output.contains("256 GB (+₹5,000)"));
        assert!(output.contains("₹11,000"));
        assert!(output.contains("₹44,000 financed"));
        assert!(output.contains("₹14,667"));
        assert!(output.contains("NO COST EMI"));
        assert!(output.contains("₹7,723"));
        assert!(output.contains("Total amount payable:"));
        assert!(output.contains("₹55,001"));
        assert!(output.contains("Pay ₹14,667 x 3 months"));
        assert!(!output.contains("Finish:"));
    }

    #[test]
    fn test_table_quote_no_plans() {
        let mut product = make_product();
        product.emi_plans.clear();
        let (state, pricing) = make_quote(&product);
        let output = Formatter::new(OutputFormat::Table).format_quote(&product, &state, &pricing);

        assert!(output.contains("No EMI plans available"));
        assert!(output.contains("No plan selected"));
    }

    #[test]
    fn test_table_quote_stale_variant() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());
        state.set_variant(VariantGroup::Storage, "1tb");
        let pricing = state.derive(&product).unwrap();
        let output = Formatter::new(OutputFormat::Table).format_quote(&product, &state, &pricing);

        assert!(output.contains("1tb (unavailable)"));
        assert!(!output.contains("(base"));
    }

    #[test]
    fn test_json_quote() {
        let product = make_product();
        let (state, pricing) = make_quote(&product);
        let output = Formatter::new(OutputFormat::Json).format_quote(&product, &state, &pricing);

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["product"]["slug"], "test-phone");
        assert_eq!(value["pricing"]["unit_price"], 55000);
        assert_eq!(value["pricing"]["principal"], 44000);
        assert_eq!(value["pricing"]["plans"][1]["monthly_amount"], 7723);
        assert_eq!(value["selection"]["downpayment_percent"], 20);
        assert_eq!(value["total_payable"], 55001);
    }

    #[test]
    fn test_markdown_quote() {
        let product = make_product();
        let mut state = SelectionState::for_product(&product, DownpaymentOptions::default());
        state.set_plan(&product, &PlanId::from("p6"));
        let pricing = state.derive(&product).unwrap();
        let output = Formatter::new(OutputFormat::Markdown).format_quote(&product, &state, &pricing);

        assert!(output.contains("## Test Phone"));
        assert!(output.contains("- **MRP:** ~~₹54,900~~"));
        assert!(output.contains("| ✓ | 6 | ₹7,723 | 1.5%/mo | ₹2,338 | ₹46,338 |  |"));
        assert!(output.contains("- **Total payable:** ₹57,338"));
    }

    #[test]
    fn test_csv_quote() {
        let product = make_product();
        let (state, pricing) = make_quote(&product);
        let output = Formatter::new(OutputFormat::Csv).format_quote(&product, &state, &pricing);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("plan_id,tenure_months"));
        assert_eq!(lines[1], "p3,3,0,44000,14667,44001,1,\"₹2,000 cashback, HDFC\",true");
        assert_eq!(lines[2], "p6,6,1.5,44000,7723,46338,2338,,false");
    }

    #[test]
    fn test_table_catalog() {
        let products = vec![make_product()];
        let output = Formatter::new(OutputFormat::Table).format_catalog(&products);

        assert!(output.contains("Slug"));
        assert!(output.contains("test-phone"));
        assert!(output.contains("₹50,000"));
        assert!(output.contains("₹54,900"));
        assert!(output.contains("Total: 1 products"));
    }

    #[test]
    fn test_catalog_empty() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_catalog(&[]), "[]");
        assert_eq!(Formatter::new(OutputFormat::Table).format_catalog(&[]), "No products found.");
        assert!(Formatter::new(OutputFormat::Csv).format_catalog(&[]).starts_with("id,slug"));
    }

    #[test]
    fn test_json_catalog() {
        let output = Formatter::new(OutputFormat::Json).format_catalog(&[make_product()]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["plans"], 2);
        assert_eq!(value[0]["storage_options"], 2);
    }

    #[test]
    fn test_markdown_catalog() {
        let output = Formatter::new(OutputFormat::Markdown).format_catalog(&[make_product()]);
        assert!(output.contains("| Test Phone | 128 GB | ₹50,000 | ~~₹54,900~~ | 2 |"));
        assert!(output.contains("*1 products found*"));
    }

    #[test]
    fn test_csv_catalog() {
        let mut product = make_product();
        product.name = "Phone \"Pro\", Max".to_string();
        let output = Formatter::new(OutputFormat::Csv).format_catalog(&[product]);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "p1,test-phone,\"Phone \"\"Pro\"\", Max\",128 GB,50000,54900,2,1,2");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("a,b"), "\"a,b\"");
        assert_eq!(Formatter::csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
