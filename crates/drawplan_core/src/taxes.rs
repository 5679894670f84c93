//! Tax calculation for withdrawal modeling
//!
//! Ordinary income (IRA and short-term gains) is taxed on federal progressive
//! brackets after the standard deduction. Long-term gains are stacked on top
//! of ordinary taxable income and taxed on the capital gains brackets.
//! Jurisdiction tax applies to gross ordinary income plus long-term gains,
//! with no deduction. Municipal bonds are untaxed.

use crate::error::Result;
use crate::model::{
    FilingStatus, FilingTable, JurisdictionRule, TaxBracket, TaxBreakdown, TaxConfig,
    TaxReferenceData, TaxResult, WithdrawalSet,
};

/// Calculate tax on `income` using progressive brackets
///
/// Each bracket taxes the part of income inside `[min, max)` at its rate.
/// Returns 0 for non-positive income.
pub fn calculate_bracket_tax(income: f64, brackets: &[TaxBracket]) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }

    let mut tax = 0.0;
    for bracket in brackets {
        if income > bracket.min {
            let taxable_in_bracket = income.min(bracket.upper()) - bracket.min;
            tax += taxable_in_bracket * bracket.rate;
        }

        if income <= bracket.upper() {
            break;
        }
    }

    tax
}

/// Calculate tax on `amount` stacked on top of `base_income`
///
/// The stacked amount fills the remaining room of each bracket, starting at
/// `base_income`. This is how long-term gains sit above ordinary income.
pub fn calculate_stacked_tax(amount: f64, base_income: f64, brackets: &[TaxBracket]) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }

    let mut tax = 0.0;
    let mut remaining = amount;
    let mut current_income = base_income;

    for bracket in brackets {
        let upper = bracket.upper();
        if current_income < upper {
            let room = upper - current_income;
            let in_bracket = remaining.min(room);

            tax += in_bracket * bracket.rate;
            remaining -= in_bracket;
            current_income += in_bracket;
        }

        if remaining <= 0.0 {
            break;
        }
    }

    tax
}

/// Rate of the first bracket with `min <= income < max`, or 0 if none matches
pub fn bracket_rate_at(income: f64, brackets: &[TaxBracket]) -> f64 {
    brackets
        .iter()
        .find(|b| b.contains(income))
        .map_or(0.0, |b| b.rate)
}

/// Jurisdiction tax on gross income
pub fn calculate_jurisdiction_tax(income: f64, rule: &JurisdictionRule) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }

    match rule {
        JurisdictionRule::None => 0.0,
        JurisdictionRule::Flat { rate } => income * rate,
        JurisdictionRule::Progressive { brackets } => calculate_bracket_tax(income, brackets),
    }
}

/// Jurisdiction rate applicable to the next dollar at `income`
pub fn jurisdiction_rate_at(income: f64, rule: &JurisdictionRule) -> f64 {
    match rule {
        JurisdictionRule::None => 0.0,
        JurisdictionRule::Flat { rate } => *rate,
        JurisdictionRule::Progressive { brackets } => bracket_rate_at(income, brackets),
    }
}

/// Tax calculator bound to a reference table
///
/// Methods taking a filing status or jurisdiction code look them up on every
/// call and fail with a configuration error if either is unknown. Use
/// [`TaxCalculator::resolve`] to look them up once.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    data: &'a TaxReferenceData,
}

impl<'a> TaxCalculator<'a> {
    #[must_use]
    pub fn new(data: &'a TaxReferenceData) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn reference_data(&self) -> &'a TaxReferenceData {
        self.data
    }

    /// Look up the tables for `config`
    pub fn resolve(&self, config: &TaxConfig) -> Result<TaxContext<'a>> {
        Ok(TaxContext {
            filing: self.data.filing_table(config.filing_status)?,
            jurisdiction: &self.data.jurisdiction(&config.jurisdiction_code)?.rule,
        })
    }

    /// Federal ordinary income tax on already-deducted taxable income
    pub fn federal_tax(&self, taxable_income: f64, filing_status: FilingStatus) -> Result<f64> {
        let table = self.data.filing_table(filing_status)?;
        Ok(calculate_bracket_tax(taxable_income, &table.federal_brackets))
    }

    pub fn jurisdiction_tax(&self, income: f64, code: &str) -> Result<f64> {
        let jurisdiction = self.data.jurisdiction(code)?;
        Ok(calculate_jurisdiction_tax(income, &jurisdiction.rule))
    }

    /// Long-term capital gains tax with gains stacked above ordinary taxable income
    pub fn capital_gains_tax(
        &self,
        gains: f64,
        ordinary_taxable_income: f64,
        filing_status: FilingStatus,
    ) -> Result<f64> {
        let table = self.data.filing_table(filing_status)?;
        Ok(calculate_stacked_tax(
            gains,
            ordinary_taxable_income,
            &table.capital_gains_brackets,
        ))
    }

    pub fn total_tax(&self, withdrawals: &WithdrawalSet, config: &TaxConfig) -> Result<TaxResult> {
        Ok(self.resolve(config)?.total_tax(withdrawals))
    }

    /// Combined federal and jurisdiction rate on the next dollar of ordinary income
    pub fn marginal_rate(
        &self,
        current_income: f64,
        filing_status: FilingStatus,
        code: &str,
    ) -> Result<f64> {
        let config = TaxConfig::new(filing_status, code);
        Ok(self.resolve(&config)?.marginal_rate(current_income))
    }
}

/// Filing table and jurisdiction rule resolved for one `TaxConfig`
///
/// All methods are infallible; this is the cost function the optimizer calls
/// for every trial allocation.
#[derive(Debug, Clone, Copy)]
pub struct TaxContext<'a> {
    filing: &'a FilingTable,
    jurisdiction: &'a JurisdictionRule,
}

impl<'a> TaxContext<'a> {
    #[must_use]
    pub fn new(filing: &'a FilingTable, jurisdiction: &'a JurisdictionRule) -> Self {
        Self {
            filing,
            jurisdiction,
        }
    }

    #[must_use]
    pub fn filing_table(&self) -> &'a FilingTable {
        self.filing
    }

    #[must_use]
    pub fn jurisdiction_rule(&self) -> &'a JurisdictionRule {
        self.jurisdiction
    }

    /// Full tax breakdown for a withdrawal set
    #[must_use]
    pub fn total_tax(&self, withdrawals: &WithdrawalSet) -> TaxResult {
        let ordinary_income = withdrawals.ira + withdrawals.short_term_gains;
        let long_term_gains = withdrawals.long_term_gains;
        let muni_bonds = withdrawals.muni_bonds;

        // Federal
        let taxable_ordinary_income = (ordinary_income - self.filing.standard_deduction).max(0.0);
        let federal_ordinary_tax =
            calculate_bracket_tax(taxable_ordinary_income, &self.filing.federal_brackets);
        let federal_capital_gains_tax = calculate_stacked_tax(
            long_term_gains,
            taxable_ordinary_income,
            &self.filing.capital_gains_brackets,
        );
        let federal_tax = federal_ordinary_tax + federal_capital_gains_tax;

        // Jurisdiction: gross ordinary income plus gains, no deduction
        let state_tax =
            calculate_jurisdiction_tax(ordinary_income + long_term_gains, self.jurisdiction);

        let total_income = ordinary_income + long_term_gains + muni_bonds;
        let total_tax = federal_tax + state_tax;
        let effective_rate = if total_income > 0.0 {
            total_tax / total_income * 100.0
        } else {
            0.0
        };

        TaxResult {
            total_income,
            federal_tax,
            state_tax,
            total_tax,
            effective_rate,
            breakdown: TaxBreakdown {
                ordinary_income,
                long_term_gains,
                muni_bonds,
                taxable_ordinary_income,
                federal_ordinary_tax,
                federal_capital_gains_tax,
            },
        }
    }

    #[must_use]
    pub fn marginal_rate(&self, current_income: f64) -> f64 {
        bracket_rate_at(current_income, &self.filing.federal_brackets)
            + jurisdiction_rate_at(current_income, self.jurisdiction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::test_support::reference_data;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "Expected {expected}, got {actual}"
        );
    }

    fn simple_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(0.0, Some(10_000.0), 0.10),
            TaxBracket::new(10_000.0, Some(40_000.0), 0.12),
            TaxBracket::new(40_000.0, Some(90_000.0), 0.22),
            TaxBracket::new(90_000.0, None, 0.24),
        ]
    }

    #[test]
    fn test_bracket_tax_first_bracket() {
        assert_close(calculate_bracket_tax(5_000.0, &simple_brackets()), 500.0);
    }

    #[test]
    fn test_bracket_tax_multiple_brackets() {
        // $10,000 at 10% + $30,000 at 12% + $10,000 at 22%
        assert_close(calculate_bracket_tax(50_000.0, &simple_brackets()), 6_800.0);
    }

    #[test]
    fn test_bracket_tax_top_bracket() {
        // 1,000 + 3,600 + 11,000 + 10,000 * 24%
        assert_close(calculate_bracket_tax(100_000.0, &simple_brackets()), 18_000.0);
    }

    #[test]
    fn test_bracket_tax_non_positive_income() {
        assert_eq!(calculate_bracket_tax(0.0, &simple_brackets()), 0.0);
        assert_eq!(calculate_bracket_tax(-500.0, &simple_brackets()), 0.0);
    }

    #[test]
    fn test_capital_gains_stacking_from_zero() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        // (60,000 - 47,025) * 15%
        let tax = calc
            .capital_gains_tax(60_000.0, 0.0, FilingStatus::Single)
            .unwrap();
        assert_close(tax, 1_946.25);
    }

    #[test]
    fn test_capital_gains_stacking_above_ordinary_income() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        // Ordinary income already fills the 0% bracket
        let tax = calc
            .capital_gains_tax(10_000.0, 50_000.0, FilingStatus::Single)
            .unwrap();
        assert_close(tax, 1_500.0);

        // Straddling the 0%/15% boundary: 7,025 at 0%, 2,975 at 15%
        let tax = calc
            .capital_gains_tax(10_000.0, 40_000.0, FilingStatus::Single)
            .unwrap();
        assert_close(tax, 446.25);
    }

    #[test]
    fn test_capital_gains_zero_gains() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        assert_eq!(
            calc.capital_gains_tax(0.0, 80_000.0, FilingStatus::Single)
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn test_federal_tax_2024_single() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        // 11,600 * 10% + (47,150 - 11,600) * 12% + (50,000 - 47,150) * 22%
        let tax = calc.federal_tax(50_000.0, FilingStatus::Single).unwrap();
        assert_close(tax, 1_160.0 + 4_266.0 + 627.0);
    }

    #[test]
    fn test_jurisdiction_variants() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);

        assert_eq!(calc.jurisdiction_tax(100_000.0, "TX").unwrap(), 0.0);
        assert_close(calc.jurisdiction_tax(100_000.0, "IL").unwrap(), 4_950.0);
        // CA: 10,412 * 1% + 14,272 * 2% + 14,275 * 4% + 1,041 * 6%
        assert_close(
            calc.jurisdiction_tax(40_000.0, "CA").unwrap(),
            104.12 + 285.44 + 571.0 + 62.46,
        );
        assert_eq!(calc.jurisdiction_tax(-1.0, "IL").unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_jurisdiction_fails_fast() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        assert_eq!(
            calc.jurisdiction_tax(1_000.0, "ZZ"),
            Err(PlanError::UnknownJurisdiction("ZZ".to_string()))
        );
        let config = TaxConfig::new(FilingStatus::Single, "ZZ");
        assert!(calc.total_tax(&WithdrawalSet::ZERO, &config).is_err());
    }

    #[test]
    fn test_missing_filing_status_fails_fast() {
        let mut data = reference_data();
        data.filing_statuses.remove(&FilingStatus::HeadOfHousehold);
        let calc = TaxCalculator::new(&data);
        assert_eq!(
            calc.federal_tax(10_000.0, FilingStatus::HeadOfHousehold),
            Err(PlanError::MissingFilingStatus(FilingStatus::HeadOfHousehold))
        );
    }

    #[test]
    fn test_total_tax_breakdown() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        let config = TaxConfig::new(FilingStatus::Single, "IL");
        let withdrawals = WithdrawalSet::new(10_000.0, 20_000.0, 5_000.0, 30_000.0);

        let result = calc.total_tax(&withdrawals, &config).unwrap();
        let b = result.breakdown;

        assert_eq!(b.ordinary_income, 35_000.0);
        assert_eq!(b.long_term_gains, 20_000.0);
        assert_eq!(b.muni_bonds, 10_000.0);
        assert_eq!(b.taxable_ordinary_income, 35_000.0 - 14_600.0);
        assert_close(
            b.federal_ordinary_tax,
            calc.federal_tax(20_400.0, FilingStatus::Single).unwrap(),
        );
        // 20,400 + 20,000 stays under 47,025
        assert_eq!(b.federal_capital_gains_tax, 0.0);
        assert_close(result.state_tax, 55_000.0 * 0.0495);
        assert_eq!(result.total_income, 65_000.0);
        assert_close(result.federal_tax, b.federal_ordinary_tax + b.federal_capital_gains_tax);
        assert_close(result.total_tax, result.federal_tax + result.state_tax);
        assert_close(result.effective_rate, result.total_tax / 65_000.0 * 100.0);
    }

    #[test]
    fn test_total_tax_zero_income() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        let result = calc
            .total_tax(&WithdrawalSet::ZERO, &TaxConfig::default())
            .unwrap();
        assert_eq!(result, TaxResult::default());
    }

    #[test]
    fn test_muni_only_is_untaxed() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);
        let result = calc
            .total_tax(
                &WithdrawalSet::new(80_000.0, 0.0, 0.0, 0.0),
                &TaxConfig::default(),
            )
            .unwrap();
        assert_eq!(result.total_tax, 0.0);
        assert_eq!(result.effective_rate, 0.0);
        assert_eq!(result.total_income, 80_000.0);
    }

    #[test]
    fn test_marginal_rate() {
        let data = reference_data();
        let calc = TaxCalculator::new(&data);

        assert_close(
            calc.marginal_rate(50_000.0, FilingStatus::Single, "TX").unwrap(),
            0.22,
        );
        assert_close(
            calc.marginal_rate(50_000.0, FilingStatus::Single, "IL").unwrap(),
            0.22 + 0.0495,
        );
        // CA 38,959-54,081 bracket: 6%
        assert_close(
            calc.marginal_rate(50_000.0, FilingStatus::Single, "CA").unwrap(),
            0.22 + 0.06,
        );
        // Bracket boundaries belong to the upper bracket
        assert_close(
            calc.marginal_rate(11_600.0, FilingStatus::Single, "TX").unwrap(),
            0.12,
        );
    }
}
