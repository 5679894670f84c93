//! Planner configuration
//!
//! Iteration limits and tolerances for the net-to-gross solver and the
//! multi-year depletion loop.

use serde::{Deserialize, Serialize};

/// Settings for the net-to-gross fixed-point solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Maximum number of substitution steps
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Converged once |target net - achieved net| is below this amount
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Tax rate assumed for the initial gross estimate (target / (1 - rate))
    #[serde(default = "default_assumed_tax_rate")]
    pub assumed_tax_rate: f64,

    /// A non-converged result still counts as feasible below this residual
    #[serde(default = "default_acceptable_residual")]
    pub acceptable_residual: f64,
}

fn default_max_iterations() -> u32 {
    30
}

fn default_tolerance() -> f64 {
    1.0
}

fn default_assumed_tax_rate() -> f64 {
    0.20
}

fn default_acceptable_residual() -> f64 {
    100.0
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            assumed_tax_rate: default_assumed_tax_rate(),
            acceptable_residual: default_acceptable_residual(),
        }
    }
}

/// Settings for the withdrawal planner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerConfig {
    #[serde(default)]
    pub solver: SolverConfig,

    /// Safety cap on simulated years
    #[serde(default = "default_max_years")]
    pub max_years: u32,

    /// Balances at or below this amount count as depleted
    #[serde(default = "default_balance_threshold")]
    pub balance_threshold: f64,
}

fn default_max_years() -> u32 {
    100
}

fn default_balance_threshold() -> f64 {
    1.0
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            max_years: default_max_years(),
            balance_threshold: default_balance_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"maxYears": 40}"#).unwrap();
        assert_eq!(config.max_years, 40);
        assert_eq!(config.solver, SolverConfig::default());
        assert_eq!(config.balance_threshold, 1.0);
    }
}
