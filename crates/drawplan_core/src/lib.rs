//! Tax-aware retirement withdrawal planning library
//!
//! Given balances in four account kinds, this crate decides how much to
//! withdraw from each to meet an income target, and what that costs in tax.
//! It supports:
//! - US federal ordinary income tax with a per-filing-status standard deduction
//! - Long-term capital gains stacked above ordinary taxable income
//! - Jurisdiction (state) tax: none, flat or progressive
//! - Greedy ladder, proportional (gross or net target) and multi-year depletion plans
//! - Evaluation, validation and comparison of caller-chosen withdrawals
//! - Batch evaluation of independent scenarios
//!
//! # Example
//!
//! ```ignore
//! use drawplan_core::{Planner, model::{AccountBalances, TaxConfig}};
//!
//! let planner = Planner::new(&reference_data);
//! let balances = AccountBalances::new(50_000.0, 50_000.0, 50_000.0, 50_000.0);
//! let plan = planner.allocate_proportional(
//!     &balances,
//!     50_000.0,
//!     TargetKind::Net,
//!     &TaxConfig::default(),
//! )?;
//! assert!(plan.feasible);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod optimization;
pub mod scenarios;
pub mod taxes;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{PlanError, Result};
pub use model::{
    AccountBalances, AccountKind, FilingStatus, MultiYearPlan, TaxConfig, TaxReferenceData,
    TaxResult, WithdrawalPlan, WithdrawalSet,
};
pub use optimization::{Planner, PlannerConfig, SolverConfig, TargetKind};
pub use scenarios::{Scenario, ScenarioReport, Strategy, evaluate_scenarios};
pub use taxes::{TaxCalculator, TaxContext};
