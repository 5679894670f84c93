//! Withdrawal planning algorithms
//!
//! Every strategy uses the tax calculator as its cost function:
//! - `ladder` - greedy draw in order of tax efficiency
//! - `proportional` - draw from all accounts by balance share, for a gross or net target
//! - `solver` - net-to-gross fixed-point search shared by the strategies above
//! - `multi_year` - repeat net-targeted proportional draws until balances run out
//! - `custom` - evaluate, validate and compare caller-chosen withdrawals
//!
//! # Example
//!
//! ```ignore
//! use drawplan_core::model::{AccountBalances, FilingStatus, TaxConfig};
//! use drawplan_core::optimization::Planner;
//!
//! let planner = Planner::new(&reference_data);
//! let config = TaxConfig::new(FilingStatus::Single, "CA");
//! let balances = AccountBalances::new(100_000.0, 150_000.0, 50_000.0, 300_000.0);
//!
//! let plan = planner.plan_multi_year(&balances, 60_000.0, &config)?;
//! println!("Lasts {} years", plan.summary.total_years);
//! ```

mod config;
mod custom;
mod ladder;
mod multi_year;
mod proportional;
mod solver;

pub use config::{PlannerConfig, SolverConfig};
pub use custom::{
    EQUIVALENCE_THRESHOLD, TaxedOutcome, compare_plans, evaluate_custom, validate_withdrawals,
};
pub use ladder::optimize_ladder;
pub use multi_year::{gross_needed_for_net, plan_multi_year};
pub use proportional::{
    TargetKind, allocate_proportional, allocate_proportional_gross, allocate_proportional_net,
};
pub use solver::{GrossSolution, SolveStatus, solve_net_to_gross};

use crate::error::{PlanError, Result};
use crate::model::{
    AccountBalances, MultiYearPlan, PlanComparison, TaxConfig, TaxReferenceData,
    ValidationReport, WithdrawalPlan, WithdrawalSet,
};
use crate::taxes::TaxCalculator;

fn ensure_target(target: f64, field: &str) -> Result<()> {
    if !target.is_finite() {
        return Err(PlanError::input(field, "must be a finite number"));
    }
    if target < 0.0 {
        return Err(PlanError::input(
            field,
            format!("must be non-negative, got {target}"),
        ));
    }
    Ok(())
}

/// Entry point for withdrawal planning against one reference table
///
/// Validates inputs, resolves the `TaxConfig` once per call (unknown filing
/// status or jurisdiction fails fast) and runs the requested strategy.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    calculator: TaxCalculator<'a>,
    config: PlannerConfig,
}

impl<'a> Planner<'a> {
    #[must_use]
    pub fn new(data: &'a TaxReferenceData) -> Self {
        Self::with_config(data, PlannerConfig::default())
    }

    #[must_use]
    pub fn with_config(data: &'a TaxReferenceData, config: PlannerConfig) -> Self {
        Self {
            calculator: TaxCalculator::new(data),
            config,
        }
    }

    #[must_use]
    pub fn calculator(&self) -> &TaxCalculator<'a> {
        &self.calculator
    }

    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Greedy ladder for a gross income target
    pub fn optimize(
        &self,
        balances: &AccountBalances,
        desired_income: f64,
        tax_config: &TaxConfig,
    ) -> Result<WithdrawalPlan> {
        balances.ensure_valid("balances")?;
        ensure_target(desired_income, "desiredIncome")?;
        let tax = self.calculator.resolve(tax_config)?;
        Ok(optimize_ladder(balances, desired_income, &tax))
    }

    /// Proportional allocation for a gross or net target
    pub fn allocate_proportional(
        &self,
        balances: &AccountBalances,
        target: f64,
        kind: TargetKind,
        tax_config: &TaxConfig,
    ) -> Result<WithdrawalPlan> {
        balances.ensure_valid("balances")?;
        ensure_target(target, "target")?;
        let tax = self.calculator.resolve(tax_config)?;
        Ok(allocate_proportional(
            balances,
            target,
            kind,
            &tax,
            &self.config.solver,
        ))
    }

    /// Gross proportional withdrawal needed to net `desired_net` this year
    pub fn gross_needed(
        &self,
        balances: &AccountBalances,
        desired_net: f64,
        tax_config: &TaxConfig,
    ) -> Result<GrossSolution> {
        balances.ensure_valid("balances")?;
        ensure_target(desired_net, "desiredNetIncome")?;
        let tax = self.calculator.resolve(tax_config)?;
        Ok(gross_needed_for_net(balances, desired_net, &tax, &self.config))
    }

    /// Year-by-year plan that nets `desired_net` until the balances run out
    pub fn plan_multi_year(
        &self,
        balances: &AccountBalances,
        desired_net: f64,
        tax_config: &TaxConfig,
    ) -> Result<MultiYearPlan> {
        balances.ensure_valid("balances")?;
        ensure_target(desired_net, "desiredNetIncome")?;
        if desired_net == 0.0 {
            return Err(PlanError::input(
                "desiredNetIncome",
                "must be greater than zero",
            ));
        }
        let tax = self.calculator.resolve(tax_config)?;
        Ok(plan_multi_year(balances, desired_net, &tax, &self.config))
    }

    /// Tax on caller-chosen withdrawals, without optimization
    pub fn evaluate_custom(
        &self,
        withdrawals: &WithdrawalSet,
        tax_config: &TaxConfig,
    ) -> Result<WithdrawalPlan> {
        withdrawals.ensure_valid("withdrawals")?;
        let tax = self.calculator.resolve(tax_config)?;
        Ok(evaluate_custom(withdrawals, &tax))
    }

    #[must_use]
    pub fn validate(withdrawals: &WithdrawalSet, balances: &AccountBalances) -> ValidationReport {
        validate_withdrawals(withdrawals, balances)
    }

    #[must_use]
    pub fn compare<A, B>(first: &A, second: &B) -> PlanComparison
    where
        A: TaxedOutcome + ?Sized,
        B: TaxedOutcome + ?Sized,
    {
        compare_plans(first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilingStatus;
    use crate::test_support::reference_data;

    #[test]
    fn test_planner_rejects_unknown_jurisdiction() {
        let data = reference_data();
        let planner = Planner::new(&data);
        let config = TaxConfig::new(FilingStatus::Single, "XX");

        let result = planner.optimize(&AccountBalances::new(1.0, 0.0, 0.0, 0.0), 1.0, &config);

        assert_eq!(result, Err(PlanError::UnknownJurisdiction("XX".to_string())));
    }

    #[test]
    fn test_planner_rejects_bad_inputs() {
        let data = reference_data();
        let planner = Planner::new(&data);
        let config = TaxConfig::default();
        let balances = AccountBalances::new(10_000.0, 0.0, 0.0, 0.0);

        assert!(planner.optimize(&balances, f64::NAN, &config).is_err());
        assert!(planner.optimize(&balances, -1.0, &config).is_err());
        assert!(
            planner
                .optimize(&AccountBalances::new(-1.0, 0.0, 0.0, 0.0), 1.0, &config)
                .is_err()
        );
        assert!(planner.plan_multi_year(&balances, 0.0, &config).is_err());
        assert!(
            planner
                .evaluate_custom(&WithdrawalSet::new(0.0, f64::INFINITY, 0.0, 0.0), &config)
                .is_err()
        );
    }

    #[test]
    fn test_gross_needed_exceeds_net() {
        let data = reference_data();
        let planner = Planner::new(&data);
        let balances = AccountBalances::new(0.0, 0.0, 0.0, 500_000.0);

        let solution = planner
            .gross_needed(&balances, 60_000.0, &TaxConfig::default())
            .unwrap();

        assert!(solution.converged());
        assert!(solution.gross > 60_000.0);
        assert!(solution.residual.abs() < 1.0);
    }
}
