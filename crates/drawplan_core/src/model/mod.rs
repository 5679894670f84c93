mod accounts;
mod filing_status;
mod results;
mod tax_tables;

pub use accounts::{AccountAmounts, AccountBalances, AccountKind, WithdrawalSet};
pub use filing_status::FilingStatus;
pub use results::{
    BetterPlan, ComparisonVerdict, MultiYearPlan, PlanComparison, PlanSummary, TaxBreakdown,
    TaxResult, ValidationIssue, ValidationReport, WithdrawalPlan, YearPlan,
};
pub use tax_tables::{
    FilingTable, Jurisdiction, JurisdictionRule, TaxBracket, TaxConfig, TaxReferenceData,
    validate_brackets,
};
