//! Custom withdrawal scenarios
//!
//! Evaluates caller-chosen withdrawals, checks them against balances and
//! compares the tax outcome of two plans.

use crate::model::{
    AccountBalances, BetterPlan, ComparisonVerdict, MultiYearPlan, PlanComparison, TaxResult,
    ValidationIssue, ValidationReport, WithdrawalPlan, WithdrawalSet, YearPlan,
};
use crate::taxes::TaxContext;

/// Differences below this many dollars count as equivalent plans
pub const EQUIVALENCE_THRESHOLD: f64 = 1.0;

/// Anything that carries a total tax bill
pub trait TaxedOutcome {
    fn total_tax(&self) -> f64;
}

impl TaxedOutcome for TaxResult {
    fn total_tax(&self) -> f64 {
        self.total_tax
    }
}

impl TaxedOutcome for WithdrawalPlan {
    fn total_tax(&self) -> f64 {
        self.tax_result.total_tax
    }
}

impl TaxedOutcome for YearPlan {
    fn total_tax(&self) -> f64 {
        self.tax_result.total_tax
    }
}

impl TaxedOutcome for MultiYearPlan {
    fn total_tax(&self) -> f64 {
        self.summary.total_taxes_paid
    }
}

/// Tax a caller-supplied withdrawal set as-is
///
/// Always reported feasible: checking the withdrawals against balances is the
/// caller's job (see [`validate_withdrawals`]).
pub fn evaluate_custom(withdrawals: &WithdrawalSet, tax: &TaxContext<'_>) -> WithdrawalPlan {
    WithdrawalPlan {
        withdrawals: *withdrawals,
        tax_result: tax.total_tax(withdrawals),
        shortfall: 0.0,
        total_withdrawn: withdrawals.total(),
        feasible: true,
    }
}

/// Flag every account whose requested withdrawal exceeds its balance
pub fn validate_withdrawals(
    withdrawals: &WithdrawalSet,
    balances: &AccountBalances,
) -> ValidationReport {
    let errors: Vec<ValidationIssue> = withdrawals
        .iter()
        .filter_map(|(account, requested)| {
            let available = balances.get(account);
            (requested > available).then(|| ValidationIssue {
                account,
                requested,
                available,
                message: format!("Insufficient funds in {account}"),
            })
        })
        .collect();

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Compare the tax paid under two plans
///
/// `tax_difference` is second minus first, so a negative value means the
/// second plan pays less.
pub fn compare_plans<A, B>(first: &A, second: &B) -> PlanComparison
where
    A: TaxedOutcome + ?Sized,
    B: TaxedOutcome + ?Sized,
{
    let first_tax = first.total_tax();
    let tax_difference = second.total_tax() - first_tax;
    let percent_difference = if first_tax > 0.0 {
        tax_difference / first_tax * 100.0
    } else {
        0.0
    };

    let verdict = if tax_difference.abs() < EQUIVALENCE_THRESHOLD {
        ComparisonVerdict::Equivalent
    } else if tax_difference < 0.0 {
        ComparisonVerdict::SecondPaysLess
    } else {
        ComparisonVerdict::SecondPaysMore
    };

    PlanComparison {
        tax_difference,
        percent_difference,
        better_plan: if tax_difference < 0.0 {
            BetterPlan::Second
        } else {
            BetterPlan::First
        },
        savings: tax_difference.abs(),
        verdict,
    }
}
