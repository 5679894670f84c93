//! Greedy withdrawal ladder
//!
//! Draws from accounts in order of tax efficiency: municipal bonds, long-term
//! gains, short-term gains, then IRA. This is a baseline strategy; it does not
//! minimize aggregate tax once the target exceeds the tax-preferred balances.

use crate::model::{AccountBalances, AccountKind, WithdrawalPlan, WithdrawalSet};
use crate::taxes::TaxContext;

/// Withdraw `desired_income` greedily in ladder order
pub fn optimize_ladder(
    balances: &AccountBalances,
    desired_income: f64,
    tax: &TaxContext<'_>,
) -> WithdrawalPlan {
    let mut remaining = desired_income;
    let mut withdrawals = WithdrawalSet::ZERO;

    for kind in AccountKind::ALL {
        let balance = balances.get(kind);
        if remaining > 0.0 && balance > 0.0 {
            let amount = remaining.min(balance);
            withdrawals.set(kind, amount);
            remaining -= amount;
        }
    }

    let tax_result = tax.total_tax(&withdrawals);

    WithdrawalPlan {
        withdrawals,
        tax_result,
        shortfall: remaining,
        total_withdrawn: desired_income - remaining,
        feasible: remaining == 0.0,
    }
}
