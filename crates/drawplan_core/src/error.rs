use thiserror::Error;

use crate::model::FilingStatus;

/// Errors reported by the tax calculator and withdrawal planner.
///
/// Infeasible targets are not errors: plans report them through their
/// `feasible` flag and `shortfall` amount.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Jurisdiction code is not present in the reference data
    #[error("unknown jurisdiction code '{0}'")]
    UnknownJurisdiction(String),

    /// Filing status string does not name one of the supported statuses
    #[error(
        "unknown filing status '{0}', expected one of single, marriedFilingJointly, marriedFilingSeparately, headOfHousehold"
    )]
    UnknownFilingStatus(String),

    /// Reference data carries no table for this filing status
    #[error("reference data has no tables for filing status {0}")]
    MissingFilingStatus(FilingStatus),

    /// Reference data violates its schema contract
    #[error("invalid reference data ({context}): {reason}")]
    InvalidReferenceData { context: String, reason: String },

    /// Caller input is outside the accepted domain
    #[error("invalid input '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
}

impl PlanError {
    pub(crate) fn reference(context: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::InvalidReferenceData {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
