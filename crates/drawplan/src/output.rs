//! Text rendering of plans and reports
//!
//! JSON output serializes the core result types directly; this module only
//! deals with the human-readable form.

use std::fmt::Write;

use drawplan_core::model::{
    ComparisonVerdict, JurisdictionRule, MultiYearPlan, PlanComparison, TaxResult,
    ValidationReport,
};
use drawplan_core::scenarios::{ScenarioOutcome, ScenarioReport, Strategy};
use drawplan_core::{TaxReferenceData, WithdrawalPlan, WithdrawalSet};

use crate::util::format::{format_currency, format_percent_value, format_percentage};

const LABEL_WIDTH: usize = 22;
const AMOUNT_WIDTH: usize = 14;

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{value:>AMOUNT_WIDTH$}");
}

fn render_withdrawals(out: &mut String, withdrawals: &WithdrawalSet) {
    out.push_str("Withdrawals\n");
    for (kind, amount) in withdrawals.iter() {
        row(out, kind.label(), &format_currency(amount));
    }
}

fn render_taxes(out: &mut String, tax: &TaxResult) {
    out.push_str("Taxes\n");
    row(out, "Federal", &format_currency(tax.federal_tax));
    row(out, "State", &format_currency(tax.state_tax));
    row(out, "Total", &format_currency(tax.total_tax));
    row(out, "Effective rate", &format_percent_value(tax.effective_rate));
}

/// Single-year plan: withdrawals, taxes and post-tax income
pub fn render_plan(title: &str, plan: &WithdrawalPlan) -> String {
    let mut out = format!("{title}\n\n");
    render_withdrawals(&mut out, &plan.withdrawals);
    row(&mut out, "Total withdrawn", &format_currency(plan.total_withdrawn));
    out.push('\n');
    render_taxes(&mut out, &plan.tax_result);
    out.push('\n');
    row(&mut out, "Post-tax income", &format_currency(plan.post_tax_income()));
    if !plan.feasible {
        row(&mut out, "Shortfall", &format_currency(plan.shortfall));
        out.push_str("\nBalances cannot cover the target.\n");
    }
    out
}

/// Summary block followed by one row per year; the final year is starred
pub fn render_multi_year(plan: &MultiYearPlan) -> String {
    let summary = &plan.summary;
    let mut out = String::from("Multi-year withdrawal plan\n\n");
    row(&mut out, "Years funded", &summary.total_years.to_string());
    row(&mut out, "Total withdrawn", &format_currency(summary.total_withdrawn));
    row(&mut out, "Total taxes paid", &format_currency(summary.total_taxes_paid));
    row(
        &mut out,
        "Post-tax income",
        &format_currency(summary.total_post_tax_income),
    );
    row(
        &mut out,
        "Avg effective rate",
        &format_percent_value(summary.avg_effective_rate),
    );
    out.push('\n');

    let _ = writeln!(
        out,
        "{:>6} {:>11} {:>11} {:>11} {:>11} {:>11} {:>10} {:>7} {:>11}",
        "Year", "Muni", "LT Gains", "ST Gains", "IRA", "Gross", "Tax", "Tax %", "Post-tax"
    );
    for year in &plan.years {
        let marker = if year.is_final_year { "*" } else { " " };
        let w = &year.withdrawals;
        let _ = writeln!(
            out,
            "{:>5}{} {:>11} {:>11} {:>11} {:>11} {:>11} {:>10} {:>7} {:>11}",
            year.year_index,
            marker,
            format_currency(w.muni_bonds),
            format_currency(w.long_term_gains),
            format_currency(w.short_term_gains),
            format_currency(w.ira),
            format_currency(year.gross_income),
            format_currency(year.tax_result.total_tax),
            format_percent_value(year.tax_percentage()),
            format_currency(year.post_tax_income),
        );
    }
    if plan.years.iter().any(|y| y.is_final_year) {
        out.push_str("\n* final year withdraws the remaining balances\n");
    }
    out
}

pub fn render_validation(report: &ValidationReport) -> String {
    if report.valid {
        return "Withdrawals fit within the balances.\n".to_string();
    }
    let mut out = String::from("Withdrawals exceed balances:\n");
    for issue in &report.errors {
        let _ = writeln!(
            out,
            "  {}: requested {}, available {}",
            issue.message,
            format_currency(issue.requested),
            format_currency(issue.available)
        );
    }
    out
}

/// One-line verdict on a custom plan measured against the optimized one
pub fn render_comparison(comparison: &PlanComparison) -> String {
    match comparison.verdict {
        ComparisonVerdict::Equivalent => "Matches the optimized plan\n".to_string(),
        ComparisonVerdict::SecondPaysLess => format!(
            "{} less tax than the optimized plan\n",
            format_currency(comparison.savings)
        ),
        ComparisonVerdict::SecondPaysMore => format!(
            "{} more tax than the optimized plan ({:+.2}%)\n",
            format_currency(comparison.savings),
            comparison.percent_difference
        ),
    }
}

fn strategy_name(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Ladder => "ladder",
        Strategy::ProportionalGross => "proportional (gross)",
        Strategy::ProportionalNet => "proportional (net)",
        Strategy::MultiYear => "multi-year",
    }
}

/// Table of batch results, flagging the lowest-tax scenario
pub fn render_batch(reports: &[ScenarioReport], best: Option<&ScenarioReport>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<22} {:>13} {:>13} {:>6}",
        "Scenario", "Strategy", "Withdrawn", "Tax", "Years"
    );
    for report in reports {
        let name = &report.name;
        let strategy = strategy_name(report.strategy);
        match (&report.outcome, &report.error) {
            (Some(ScenarioOutcome::SingleYear { plan }), _) => {
                let _ = writeln!(
                    out,
                    "{name:<24} {strategy:<22} {:>13} {:>13} {:>6}",
                    format_currency(plan.total_withdrawn),
                    format_currency(plan.tax_result.total_tax),
                    "-"
                );
            }
            (Some(ScenarioOutcome::MultiYear { plan }), _) => {
                let _ = writeln!(
                    out,
                    "{name:<24} {strategy:<22} {:>13} {:>13} {:>6}",
                    format_currency(plan.summary.total_withdrawn),
                    format_currency(plan.summary.total_taxes_paid),
                    plan.summary.total_years
                );
            }
            (None, error) => {
                let _ = writeln!(
                    out,
                    "{name:<24} {strategy:<22} error: {}",
                    error.as_deref().unwrap_or("unknown failure")
                );
            }
        }
    }
    if let Some(best) = best {
        let _ = writeln!(out, "\nLowest tax: {}", best.name);
    }
    out
}

fn describe_rule(rule: &JurisdictionRule) -> String {
    match rule {
        JurisdictionRule::None => "no income tax".to_string(),
        JurisdictionRule::Flat { rate } => format!("flat {}", format_percentage(*rate)),
        JurisdictionRule::Progressive { brackets } => {
            let top = brackets.last().map_or(0.0, |b| b.rate);
            format!(
                "progressive, {} brackets, top {}",
                brackets.len(),
                format_percentage(top)
            )
        }
    }
}

/// Jurisdictions sorted by name
pub fn render_jurisdictions(data: &TaxReferenceData) -> String {
    let mut out = format!("Jurisdictions ({} tax year)\n\n", data.tax_year);
    for (code, jurisdiction) in data.jurisdictions_by_name() {
        let _ = writeln!(
            out,
            "  {code:<4} {:<22} {}",
            jurisdiction.name,
            describe_rule(&jurisdiction.rule)
        );
    }
    out
}

pub fn render_marginal(income: f64, federal: f64, jurisdiction: f64) -> String {
    let mut out = format!("Marginal rate at {}\n\n", format_currency(income));
    row(&mut out, "Federal", &format_percentage(federal));
    row(&mut out, "State", &format_percentage(jurisdiction));
    row(&mut out, "Combined", &format_percentage(federal + jurisdiction));
    out
}
