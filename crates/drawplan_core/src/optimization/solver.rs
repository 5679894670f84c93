//! Net-to-gross solver
//!
//! Finds the gross withdrawal whose post-tax value equals a target net income.
//! Tax depends on the gross amount through the bracket tables, so the inverse
//! has no closed form; this uses successive substitution:
//!
//! ```text
//! G[0]   = target / (1 - assumed_tax_rate)
//! G[k+1] = G[k] + (target - net(G[k]))
//! ```
//!
//! The contract assumes `net(G)` is non-decreasing in `G` with slope in
//! (0, 1], which holds while every marginal rate is below 100%. Under that
//! assumption each step moves toward the fixed point, but convergence within
//! the iteration budget is not guaranteed for arbitrary bracket structures,
//! so the outcome always reports its final residual.

use serde::{Deserialize, Serialize};

use super::config::SolverConfig;

/// How a solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SolveStatus {
    /// Residual fell below the tolerance
    Converged,
    /// The estimate rose above the caller's upper bound
    ExceedsCapacity,
    /// Iteration budget used up without converging
    IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrossSolution {
    /// Last evaluated gross, or for `ExceedsCapacity` the estimate that
    /// crossed the upper bound
    pub gross: f64,
    /// Net income at the last evaluated gross
    pub net: f64,
    /// target - net at the last evaluated gross
    pub residual: f64,
    /// Number of evaluations of the net function
    pub iterations: u32,
    pub status: SolveStatus,
}

impl GrossSolution {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// Solve `net_at(gross) == target_net` for `gross`
///
/// `net_at` maps a trial gross withdrawal to the post-tax income it yields.
/// If `max_gross` is set, the search stops with `ExceedsCapacity` as soon as
/// an estimate rises above it. Negative estimates reset to `target_net`.
pub fn solve_net_to_gross(
    target_net: f64,
    mut net_at: impl FnMut(f64) -> f64,
    config: &SolverConfig,
    max_gross: Option<f64>,
) -> GrossSolution {
    let mut gross = target_net / (1.0 - config.assumed_tax_rate);
    let mut last = GrossSolution {
        gross,
        net: 0.0,
        residual: target_net,
        iterations: 0,
        status: SolveStatus::IterationLimit,
    };

    for iteration in 1..=config.max_iterations {
        let net = net_at(gross);
        let residual = target_net - net;
        last = GrossSolution {
            gross,
            net,
            residual,
            iterations: iteration,
            status: SolveStatus::IterationLimit,
        };

        tracing::trace!(iteration, gross, net, residual, "net-to-gross step");

        if residual.abs() < config.tolerance {
            last.status = SolveStatus::Converged;
            return last;
        }

        gross += residual;
        if gross < 0.0 {
            gross = target_net;
        }

        if max_gross.is_some_and(|limit| gross > limit) {
            return GrossSolution {
                gross,
                status: SolveStatus::ExceedsCapacity,
                ..last
            };
        }
    }

    tracing::debug!(
        target_net,
        gross = last.gross,
        residual = last.residual,
        "net-to-gross solver hit iteration limit"
    );
    last
}
