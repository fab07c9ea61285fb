//! Reducing-balance EMI computation.

use super::PricingError;
use crate::catalog::{EmiPlan, PlanId};
use serde::{Deserialize, Serialize};

/// Monthly installment with the totals derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub monthly_amount: i64,
    /// Always `monthly_amount * tenure`
    pub total_amount: i64,
    /// `total_amount - principal`; a rounding residue on interest-free plans
    pub interest_amount: i64,
}

/// A plan from the catalog with its installment for the current principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanQuote {
    pub plan_id: PlanId,
    pub tenure_months: i64,
    pub interest_rate: f64,
    pub cashback: Option<String>,
    #[serde(flatten)]
    pub installment: Installment,
}

impl PlanQuote {
    /// Returns true for interest-free plans.
    pub fn is_interest_free(&self) -> bool {
        self.interest_rate == 0.0
    }
}

/// Amortizes `principal` over `tenure_months` at `monthly_rate_percent` per month.
///
/// Uses the annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)` with `r` as a
/// fraction. The monthly amount is rounded once, to the nearest rupee; the
/// total and interest are derived from the rounded figure so that the total is
/// an exact multiple of what the shopper pays each month.
pub fn calculate_installment(
    principal: i64,
    monthly_rate_percent: f64,
    tenure_months: i64,
) -> Result<Installment, PricingError> {
    if tenure_months <= 0 {
        return Err(PricingError::plan("tenure must be at least one month"));
    }
    if !monthly_rate_percent.is_finite() || monthly_rate_percent < 0.0 {
        return Err(PricingError::plan(format!(
            "interest rate {}% per month must be a non-negative number",
            monthly_rate_percent
        )));
    }
    if principal < 0 {
        return Err(PricingError::selection(format!("principal {} is negative", principal)));
    }

    let p = principal as f64;
    let n = tenure_months as f64;

    let monthly = if monthly_rate_percent == 0.0 {
        p / n
    } else {
        let r = monthly_rate_percent / 100.0;
        // (1+r)^n - 1 without cancellation for rates close to zero
        let growth_minus_one = (n * r.ln_1p()).exp_m1();
        if growth_minus_one > 0.0 {
            p * r * (growth_minus_one + 1.0) / growth_minus_one
        } else {
            p / n
        }
    };

    let overflow = || {
        PricingError::plan(format!(
            "installment for {} at {}% over {} months is out of range",
            principal, monthly_rate_percent, tenure_months
        ))
    };

    let monthly = monthly.round();
    if !monthly.is_finite() || monthly >= i64::MAX as f64 {
        return Err(overflow());
    }

    let monthly_amount = monthly as i64;
    let total_amount = monthly_amount.checked_mul(tenure_months).ok_or_else(overflow)?;

    Ok(Installment { monthly_amount, total_amount, interest_amount: total_amount - principal })
}

/// Quotes every plan for the same principal. Plans are computed independently.
pub fn calculate_plans(principal: i64, plans: &[EmiPlan]) -> Result<Vec<PlanQuote>, PricingError> {
    plans
        .iter()
        .map(|plan| {
            let installment =
                calculate_installment(principal, plan.interest_rate, plan.tenure_months).map_err(
                    |e| match e {
                        PricingError::InvalidPlan(msg) => {
                            PricingError::InvalidPlan(format!("plan {}: {}", plan.id, msg))
                        }
                        other => other,
                    },
                )?;

            Ok(PlanQuote {
                plan_id: plan.id.clone(),
                tenure_months: plan.tenure_months,
                interest_rate: plan.interest_rate,
                cashback: plan.cashback.clone(),
                installment,
            })
        })
        .collect()
}
