//! Tax reference data schema
//!
//! Defines tax brackets, filing tables and jurisdiction rules. The data is
//! loaded once (see the `drawplan` binary for the bundled YAML table), checked
//! with [`TaxReferenceData::validate`] and then shared by reference.
//! The actual tax calculation logic is in the `taxes` module.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::model::FilingStatus;

/// A single bracket in a progressive tax system, covering `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Income threshold where this bracket begins
    pub min: f64,
    /// Income threshold where this bracket ends; `None` for the open top bracket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Marginal tax rate for income in this bracket (e.g., 0.22 for 22%)
    pub rate: f64,
}

impl TaxBracket {
    #[must_use]
    pub fn new(min: f64, max: Option<f64>, rate: f64) -> Self {
        Self { min, max, rate }
    }

    /// Upper bound, with the open top bracket mapped to infinity
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    #[must_use]
    pub fn contains(&self, income: f64) -> bool {
        income >= self.min && income < self.upper()
    }
}

/// How a jurisdiction taxes income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JurisdictionRule {
    /// No income tax
    None,
    /// Single rate on all income
    Flat { rate: f64 },
    /// Marginal brackets applied to gross income
    Progressive { brackets: Vec<TaxBracket> },
}

/// A taxing jurisdiction (state or district)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub name: String,
    pub rule: JurisdictionRule,
}

/// Federal tables for one filing status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingTable {
    /// Ordinary income brackets (sorted ascending, covering [0, ∞))
    pub federal_brackets: Vec<TaxBracket>,
    pub standard_deduction: f64,
    /// Long-term capital gains brackets, applied above ordinary taxable income
    pub capital_gains_brackets: Vec<TaxBracket>,
}

/// Versioned tax reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxReferenceData {
    pub tax_year: i16,
    pub filing_statuses: FxHashMap<FilingStatus, FilingTable>,
    pub jurisdictions: FxHashMap<String, Jurisdiction>,
}

impl TaxReferenceData {
    pub fn filing_table(&self, status: FilingStatus) -> Result<&FilingTable> {
        self.filing_statuses
            .get(&status)
            .ok_or(PlanError::MissingFilingStatus(status))
    }

    pub fn jurisdiction(&self, code: &str) -> Result<&Jurisdiction> {
        self.jurisdictions
            .get(code)
            .ok_or_else(|| PlanError::UnknownJurisdiction(code.to_string()))
    }

    /// Jurisdictions as `(code, jurisdiction)` sorted by display name
    #[must_use]
    pub fn jurisdictions_by_name(&self) -> Vec<(&str, &Jurisdiction)> {
        let mut list: Vec<_> = self
            .jurisdictions
            .iter()
            .map(|(code, j)| (code.as_str(), j))
            .collect();
        list.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));
        list
    }

    /// Check the schema contract: every filing status present, brackets
    /// ascending and contiguous from 0 with an open top bracket, rates in [0, 1].
    pub fn validate(&self) -> Result<()> {
        for status in FilingStatus::ALL {
            let table = self.filing_table(status)?;
            validate_brackets(&table.federal_brackets, &format!("{status} federal brackets"))?;
            validate_brackets(
                &table.capital_gains_brackets,
                &format!("{status} capital gains brackets"),
            )?;
            if !table.standard_deduction.is_finite() || table.standard_deduction < 0.0 {
                return Err(PlanError::reference(
                    format!("{status} standard deduction"),
                    format!("must be a non-negative amount, got {}", table.standard_deduction),
                ));
            }
        }

        for (code, jurisdiction) in &self.jurisdictions {
            match &jurisdiction.rule {
                JurisdictionRule::None => {}
                JurisdictionRule::Flat { rate } => validate_rate(*rate, &format!("{code} flat rate"))?,
                JurisdictionRule::Progressive { brackets } => {
                    validate_brackets(brackets, &format!("{code} brackets"))?
                }
            }
        }

        Ok(())
    }
}

fn validate_rate(rate: f64, context: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(PlanError::reference(
            context,
            format!("rate {rate} is outside [0, 1]"),
        ));
    }
    Ok(())
}

/// Brackets must start at 0, be contiguous and ascending, and end unbounded
pub fn validate_brackets(brackets: &[TaxBracket], context: &str) -> Result<()> {
    let Some(first) = brackets.first() else {
        return Err(PlanError::reference(context, "no brackets defined"));
    };
    if first.min != 0.0 {
        return Err(PlanError::reference(
            context,
            format!("first bracket starts at {} instead of 0", first.min),
        ));
    }

    let last_index = brackets.len() - 1;
    for (i, bracket) in brackets.iter().enumerate() {
        validate_rate(bracket.rate, context)?;

        match bracket.max {
            None if i != last_index => {
                return Err(PlanError::reference(
                    context,
                    format!("bracket {i} is unbounded but is not the last bracket"),
                ));
            }
            None => {}
            Some(_) if i == last_index => {
                return Err(PlanError::reference(
                    context,
                    "last bracket must be unbounded",
                ));
            }
            Some(max) => {
                if max <= bracket.min {
                    return Err(PlanError::reference(
                        context,
                        format!("bracket {i} has max {max} <= min {}", bracket.min),
                    ));
                }
                let next_min = brackets[i + 1].min;
                if next_min != max {
                    return Err(PlanError::reference(
                        context,
                        format!("gap or overlap between bracket {i} (max {max}) and next (min {next_min})"),
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Which filing status and jurisdiction to tax a plan under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    pub filing_status: FilingStatus,
    pub jurisdiction_code: String,
}

impl TaxConfig {
    #[must_use]
    pub fn new(filing_status: FilingStatus, jurisdiction_code: impl Into<String>) -> Self {
        Self {
            filing_status,
            jurisdiction_code: jurisdiction_code.into(),
        }
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self::new(FilingStatus::Single, "CA")
    }
}
