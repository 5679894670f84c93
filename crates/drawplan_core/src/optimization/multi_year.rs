//! Multi-year depletion planning
//!
//! Repeats a proportional, net-targeted withdrawal year after year until the
//! balances run out. Every year reuses the same tax tables; balances do not
//! grow between years.

use super::config::PlannerConfig;
use super::proportional::allocate_proportional_gross;
use super::solver::{GrossSolution, solve_net_to_gross};
use crate::model::{AccountBalances, MultiYearPlan, YearPlan};
use crate::taxes::TaxContext;

/// Gross withdrawal needed from `balances` to keep `desired_net` after tax
///
/// The search is not bounded by the balances; a result above the total
/// balance signals that the year cannot be fully funded.
pub fn gross_needed_for_net(
    balances: &AccountBalances,
    desired_net: f64,
    tax: &TaxContext<'_>,
    config: &PlannerConfig,
) -> GrossSolution {
    let net_at = |gross: f64| {
        let trial = allocate_proportional_gross(balances, gross, tax);
        gross - trial.tax_result.total_tax
    };
    solve_net_to_gross(desired_net, net_at, &config.solver, None)
}

/// Plan withdrawals of `desired_net` per year until the balances are depleted
///
/// Stops when every balance is at or below `config.balance_threshold`, when a
/// year cannot be funded (that year withdraws everything left), or after
/// `config.max_years` years. The year that exhausts the balances is marked
/// final either way.
pub fn plan_multi_year(
    balances: &AccountBalances,
    desired_net: f64,
    tax: &TaxContext<'_>,
    config: &PlannerConfig,
) -> MultiYearPlan {
    let mut years = Vec::new();
    let mut current = *balances;

    for year_index in 1..=config.max_years {
        if !current.any_above(config.balance_threshold) {
            tracing::debug!(year_index, "balances depleted");
            break;
        }

        let solution = gross_needed_for_net(&current, desired_net, tax, config);
        let gross_needed = solution.gross;
        if gross_needed <= 0.0 {
            tracing::debug!(year_index, desired_net, "no withdrawal needed, stopping");
            break;
        }
        if !solution.converged() {
            tracing::debug!(
                year_index,
                residual = solution.residual,
                "gross estimate did not converge"
            );
        }

        let year = allocate_proportional_gross(&current, gross_needed, tax);

        if !year.feasible {
            let remaining = current.total();
            let tax_result = tax.total_tax(&current);
            years.push(YearPlan {
                year_index,
                withdrawals: current,
                gross_income: remaining,
                tax_result,
                post_tax_income: remaining - tax_result.total_tax,
                is_final_year: true,
            });
            tracing::debug!(year_index, remaining, "final year withdraws remaining balances");
            break;
        }

        years.push(YearPlan {
            year_index,
            withdrawals: year.withdrawals,
            gross_income: gross_needed,
            tax_result: year.tax_result,
            post_tax_income: gross_needed - year.tax_result.total_tax,
            is_final_year: false,
        });

        current = current.saturating_sub(&year.withdrawals);
        if !current.any_above(config.balance_threshold) {
            if let Some(last) = years.last_mut() {
                last.is_final_year = true;
            }
            tracing::debug!(year_index, "year drew the balances down to the threshold");
            break;
        }
    }

    let ended_on_final_year = years.last().is_some_and(|y| y.is_final_year);
    if years.len() as u32 == config.max_years && !ended_on_final_year {
        tracing::warn!(max_years = config.max_years, "multi-year plan hit the year cap");
    }

    MultiYearPlan::from_years(years)
}
