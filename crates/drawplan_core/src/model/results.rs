//! Plan result types
//!
//! All results are plain values computed fresh per call and serialize to
//! camelCase JSON for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::model::{AccountKind, WithdrawalSet};

/// Income composition and tax components behind a `TaxResult`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    /// IRA plus short-term gains
    pub ordinary_income: f64,
    pub long_term_gains: f64,
    pub muni_bonds: f64,
    /// Ordinary income after the standard deduction
    pub taxable_ordinary_income: f64,
    pub federal_ordinary_tax: f64,
    pub federal_capital_gains_tax: f64,
}

/// Taxes owed on one withdrawal set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub total_income: f64,
    pub federal_tax: f64,
    /// Jurisdiction (state) tax
    pub state_tax: f64,
    pub total_tax: f64,
    /// Total tax as a percentage of total income
    pub effective_rate: f64,
    pub breakdown: TaxBreakdown,
}

/// A single-period withdrawal plan with its tax outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalPlan {
    pub withdrawals: WithdrawalSet,
    pub tax_result: TaxResult,
    /// Unmet part of the target
    pub shortfall: f64,
    pub total_withdrawn: f64,
    pub feasible: bool,
}

impl WithdrawalPlan {
    /// Withdrawn amount left after taxes
    #[must_use]
    pub fn post_tax_income(&self) -> f64 {
        self.total_withdrawn - self.tax_result.total_tax
    }
}

/// One simulated year of a multi-year plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPlan {
    /// 1-based year number
    pub year_index: u32,
    pub withdrawals: WithdrawalSet,
    pub gross_income: f64,
    pub tax_result: TaxResult,
    pub post_tax_income: f64,
    /// Set on the year that drains the remaining balances
    pub is_final_year: bool,
}

impl YearPlan {
    /// Tax as a percentage of this year's gross withdrawal
    #[must_use]
    pub fn tax_percentage(&self) -> f64 {
        if self.gross_income > 0.0 {
            self.tax_result.total_tax / self.gross_income * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub total_years: usize,
    pub total_taxes_paid: f64,
    pub total_withdrawn: f64,
    pub avg_effective_rate: f64,
    pub total_post_tax_income: f64,
}

impl PlanSummary {
    #[must_use]
    pub fn from_years(years: &[YearPlan]) -> Self {
        let total_taxes_paid: f64 = years.iter().map(|y| y.tax_result.total_tax).sum();
        let total_withdrawn: f64 = years.iter().map(|y| y.gross_income).sum();
        let avg_effective_rate = if total_withdrawn > 0.0 {
            total_taxes_paid / total_withdrawn * 100.0
        } else {
            0.0
        };

        Self {
            total_years: years.len(),
            total_taxes_paid,
            total_withdrawn,
            avg_effective_rate,
            total_post_tax_income: total_withdrawn - total_taxes_paid,
        }
    }
}

/// Year-by-year depletion schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiYearPlan {
    /// Chronological, year indices 1..N
    pub years: Vec<YearPlan>,
    pub summary: PlanSummary,
}

impl MultiYearPlan {
    #[must_use]
    pub fn from_years(years: Vec<YearPlan>) -> Self {
        let summary = PlanSummary::from_years(&years);
        Self { years, summary }
    }

    /// Sum of withdrawals per account across all years
    #[must_use]
    pub fn total_withdrawals(&self) -> WithdrawalSet {
        WithdrawalSet::from_fn(|kind| self.years.iter().map(|y| y.withdrawals.get(kind)).sum())
    }
}

/// A withdrawal that exceeds the account's balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub account: AccountKind,
    pub requested: f64,
    pub available: f64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// Which of two compared plans pays less tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BetterPlan {
    First,
    Second,
}

/// Coarse outcome of a comparison, with sub-dollar differences treated as a tie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonVerdict {
    Equivalent,
    SecondPaysLess,
    SecondPaysMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    /// Second plan's tax minus the first plan's tax
    pub tax_difference: f64,
    /// `tax_difference` relative to the first plan's tax, in percent
    pub percent_difference: f64,
    pub better_plan: BetterPlan,
    pub savings: f64,
    pub verdict: ComparisonVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(index: u32, gross: f64, tax: f64) -> YearPlan {
        YearPlan {
            year_index: index,
            withdrawals: WithdrawalSet::new(0.0, 0.0, 0.0, gross),
            gross_income: gross,
            tax_result: TaxResult {
                total_tax: tax,
                ..Default::default()
            },
            post_tax_income: gross - tax,
            is_final_year: false,
        }
    }

    #[test]
    fn test_summary_totals() {
        let plan = MultiYearPlan::from_years(vec![year(1, 1000.0, 100.0), year(2, 500.0, 50.0)]);

        assert_eq!(plan.summary.total_years, 2);
        assert_eq!(plan.summary.total_taxes_paid, 150.0);
        assert_eq!(plan.summary.total_withdrawn, 1500.0);
        assert_eq!(plan.summary.total_post_tax_income, 1350.0);
        assert!((plan.summary.avg_effective_rate - 10.0).abs() < 1e-9);
        assert_eq!(plan.total_withdrawals().ira, 1500.0);
    }

    #[test]
    fn test_empty_summary_has_zero_rate() {
        let plan = MultiYearPlan::from_years(vec![]);
        assert_eq!(plan.summary, PlanSummary::default());
    }

    #[test]
    fn test_tax_percentage_zero_gross() {
        assert_eq!(year(1, 0.0, 0.0).tax_percentage(), 0.0);
        assert!((year(1, 200.0, 30.0).tax_percentage() - 15.0).abs() < 1e-9);
    }
}
