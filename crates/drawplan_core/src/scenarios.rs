//! Batch scenario evaluation
//!
//! Runs independent planning scenarios, in parallel when the `parallel`
//! feature is enabled. Scenarios share the reference data read-only, so no
//! locking is involved. Results keep the input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{AccountBalances, MultiYearPlan, TaxConfig, WithdrawalPlan};
use crate::optimization::{Planner, TargetKind, TaxedOutcome};

/// Which planning strategy a scenario runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Greedy ladder with a gross target
    Ladder,
    ProportionalGross,
    ProportionalNet,
    /// Depletion plan with a yearly net target
    #[default]
    MultiYear,
}

/// One planning question: balances, target and tax situation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub tax_config: TaxConfig,
    pub balances: AccountBalances,
    /// Gross or net amount depending on the strategy
    pub target: f64,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScenarioOutcome {
    SingleYear { plan: WithdrawalPlan },
    MultiYear { plan: MultiYearPlan },
}

impl TaxedOutcome for ScenarioOutcome {
    fn total_tax(&self) -> f64 {
        match self {
            ScenarioOutcome::SingleYear { plan } => plan.total_tax(),
            ScenarioOutcome::MultiYear { plan } => plan.total_tax(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ScenarioOutcome>,
    /// Set instead of `outcome` when the scenario could not be planned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run a single scenario
pub fn run_scenario(planner: &Planner<'_>, scenario: &Scenario) -> Result<ScenarioOutcome> {
    let Scenario {
        tax_config,
        balances,
        target,
        strategy,
        ..
    } = scenario;

    let outcome = match strategy {
        Strategy::Ladder => ScenarioOutcome::SingleYear {
            plan: planner.optimize(balances, *target, tax_config)?,
        },
        Strategy::ProportionalGross => ScenarioOutcome::SingleYear {
            plan: planner.allocate_proportional(balances, *target, TargetKind::Gross, tax_config)?,
        },
        Strategy::ProportionalNet => ScenarioOutcome::SingleYear {
            plan: planner.allocate_proportional(balances, *target, TargetKind::Net, tax_config)?,
        },
        Strategy::MultiYear => ScenarioOutcome::MultiYear {
            plan: planner.plan_multi_year(balances, *target, tax_config)?,
        },
    };

    Ok(outcome)
}

fn report(planner: &Planner<'_>, scenario: &Scenario) -> ScenarioReport {
    let (outcome, error) = match run_scenario(planner, scenario) {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => {
            tracing::warn!(scenario = %scenario.name, error = %e, "scenario failed");
            (None, Some(e.to_string()))
        }
    };

    ScenarioReport {
        name: scenario.name.clone(),
        strategy: scenario.strategy,
        outcome,
        error,
    }
}

/// Evaluate every scenario; a failing scenario is reported, not propagated
pub fn evaluate_scenarios(planner: &Planner<'_>, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
    #[cfg(feature = "parallel")]
    let reports = scenarios
        .par_iter()
        .map(|scenario| report(planner, scenario))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let reports = scenarios
        .iter()
        .map(|scenario| report(planner, scenario))
        .collect();

    reports
}

/// Successful report with the smallest total tax
#[must_use]
pub fn lowest_tax(reports: &[ScenarioReport]) -> Option<&ScenarioReport> {
    reports
        .iter()
        .filter_map(|r| r.outcome.as_ref().map(|o| (r, o.total_tax())))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(r, _)| r)
}
