//! Proportional allocation
//!
//! Draws from every account in proportion to its share of the total balance,
//! which spreads ordinary income and gains across the year instead of
//! exhausting one account at a time.

use serde::{Deserialize, Serialize};

use super::config::SolverConfig;
use super::solver::{SolveStatus, solve_net_to_gross};
use crate::model::{AccountBalances, WithdrawalPlan, WithdrawalSet};
use crate::taxes::TaxContext;

/// Whether a target amount is measured before or after tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKind {
    /// Amount to withdraw
    Gross,
    /// Amount to keep after taxes
    #[default]
    Net,
}

/// Split `gross` across accounts by balance share, clipped to each balance
///
/// `total` must be the positive sum of `balances`.
fn proportional_split(balances: &AccountBalances, total: f64, gross: f64) -> WithdrawalSet {
    WithdrawalSet::from_fn(|kind| {
        let balance = balances.get(kind);
        (balance / total * gross).min(balance)
    })
}

fn empty_plan(target: f64, tax: &TaxContext<'_>) -> WithdrawalPlan {
    WithdrawalPlan {
        withdrawals: WithdrawalSet::ZERO,
        tax_result: tax.total_tax(&WithdrawalSet::ZERO),
        shortfall: target,
        total_withdrawn: 0.0,
        feasible: false,
    }
}

/// Allocate a target amount proportionally
pub fn allocate_proportional(
    balances: &AccountBalances,
    target: f64,
    kind: TargetKind,
    tax: &TaxContext<'_>,
    solver: &SolverConfig,
) -> WithdrawalPlan {
    match kind {
        TargetKind::Gross => allocate_proportional_gross(balances, target, tax),
        TargetKind::Net => allocate_proportional_net(balances, target, tax, solver),
    }
}

/// Withdraw `target_gross` (capped at the total balance) proportionally
///
/// Feasible when the total balance covers the target.
pub fn allocate_proportional_gross(
    balances: &AccountBalances,
    target_gross: f64,
    tax: &TaxContext<'_>,
) -> WithdrawalPlan {
    let total_available = balances.total();
    if total_available <= 0.0 {
        return empty_plan(target_gross, tax);
    }

    let capped_gross = target_gross.min(total_available);
    let withdrawals = proportional_split(balances, total_available, capped_gross);
    let actual_gross = withdrawals.total();
    let feasible = target_gross <= total_available;

    WithdrawalPlan {
        withdrawals,
        tax_result: tax.total_tax(&withdrawals),
        shortfall: if feasible {
            0.0
        } else {
            target_gross - actual_gross
        },
        total_withdrawn: actual_gross,
        feasible,
    }
}

/// Withdraw proportionally so that `target_net` remains after taxes
///
/// Solves for the gross amount with [`solve_net_to_gross`], bounded by the
/// total balance. When the balances cannot cover the target, everything is
/// withdrawn and the plan reports the post-tax shortfall.
pub fn allocate_proportional_net(
    balances: &AccountBalances,
    target_net: f64,
    tax: &TaxContext<'_>,
    solver: &SolverConfig,
) -> WithdrawalPlan {
    let total_available = balances.total();
    if total_available <= 0.0 {
        return empty_plan(target_net, tax);
    }

    let net_at = |gross: f64| {
        let withdrawals = proportional_split(balances, total_available, gross.min(total_available));
        withdrawals.total() - tax.total_tax(&withdrawals).total_tax
    };
    let solution = solve_net_to_gross(target_net, net_at, solver, Some(total_available));

    match solution.status {
        SolveStatus::Converged => {
            let withdrawals =
                proportional_split(balances, total_available, solution.gross.min(total_available));
            WithdrawalPlan {
                withdrawals,
                tax_result: tax.total_tax(&withdrawals),
                shortfall: 0.0,
                total_withdrawn: withdrawals.total(),
                feasible: true,
            }
        }
        SolveStatus::ExceedsCapacity => {
            let withdrawals = *balances;
            let tax_result = tax.total_tax(&withdrawals);
            tracing::debug!(
                target_net,
                total_available,
                "balances cannot cover net target, withdrawing everything"
            );
            WithdrawalPlan {
                withdrawals,
                tax_result,
                shortfall: target_net - (total_available - tax_result.total_tax),
                total_withdrawn: total_available,
                feasible: false,
            }
        }
        SolveStatus::IterationLimit => {
            let withdrawals =
                proportional_split(balances, total_available, solution.gross.min(total_available));
            let tax_result = tax.total_tax(&withdrawals);
            let total_withdrawn = withdrawals.total();
            let residual = target_net - (total_withdrawn - tax_result.total_tax);
            WithdrawalPlan {
                withdrawals,
                tax_result,
                shortfall: residual.max(0.0),
                total_withdrawn,
                feasible: residual.abs() < solver.acceptable_residual,
            }
        }
    }
}
