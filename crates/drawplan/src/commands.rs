//! Subcommand execution
//!
//! Each command runs against an already-loaded reference table and returns
//! the rendered output, so the binary only has to print it.

use color_eyre::eyre::eyre;
use drawplan_core::model::{JurisdictionRule, PlanComparison, ValidationReport};
use drawplan_core::scenarios::{ScenarioReport, evaluate_scenarios, lowest_tax};
use drawplan_core::taxes::{bracket_rate_at, jurisdiction_rate_at};
use drawplan_core::{AccountBalances, Planner, TargetKind, TaxReferenceData, WithdrawalPlan};
use serde::Serialize;

use crate::cli::{Command, OutputFormat, to_withdrawals};
use crate::output;
use crate::reference::load_scenarios;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomOutput {
    plan: WithdrawalPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareOutput {
    optimized: WithdrawalPlan,
    custom: WithdrawalPlan,
    validation: ValidationReport,
    comparison: PlanComparison,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchOutput {
    reports: Vec<ScenarioReport>,
    lowest_tax: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JurisdictionEntry<'a> {
    code: &'a str,
    name: &'a str,
    rule: &'a JurisdictionRule,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarginalOutput {
    income: f64,
    federal_rate: f64,
    jurisdiction_rate: f64,
    combined_rate: f64,
}

fn to_json<T: Serialize>(value: &T) -> color_eyre::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> color_eyre::Result<String> {
    match format {
        OutputFormat::Json => to_json(value),
        OutputFormat::Text => Ok(text(value)),
    }
}

/// Planning needs something to draw from
fn require_balances(balances: &AccountBalances) -> color_eyre::Result<()> {
    if balances.total() <= 0.0 {
        return Err(eyre!("at least one account balance is required"));
    }
    Ok(())
}

/// Run one subcommand and return its rendered output
pub fn execute(
    command: &Command,
    data: &TaxReferenceData,
    format: OutputFormat,
) -> color_eyre::Result<String> {
    let planner = Planner::new(data);

    match command {
        Command::Plan { balances, tax, net } => {
            let balances = balances.to_balances();
            require_balances(&balances)?;
            let plan = planner.plan_multi_year(&balances, *net, &tax.to_config())?;
            tracing::info!(years = plan.summary.total_years, "multi-year plan complete");
            render(format, &plan, output::render_multi_year)
        }

        Command::Ladder {
            balances,
            tax,
            income,
        } => {
            let balances = balances.to_balances();
            require_balances(&balances)?;
            let plan = planner.optimize(&balances, *income, &tax.to_config())?;
            render(format, &plan, |p| output::render_plan("Ladder withdrawal", p))
        }

        Command::Proportional {
            balances,
            tax,
            target,
            gross,
        } => {
            let balances = balances.to_balances();
            require_balances(&balances)?;
            let kind = if *gross {
                TargetKind::Gross
            } else {
                TargetKind::Net
            };
            let plan = planner.allocate_proportional(&balances, *target, kind, &tax.to_config())?;
            render(format, &plan, |p| {
                output::render_plan("Proportional withdrawal", p)
            })
        }

        Command::Custom {
            withdraw,
            balances,
            tax,
        } => {
            let withdrawals = to_withdrawals(withdraw);
            let balances = balances.to_balances();
            let plan = planner.evaluate_custom(&withdrawals, &tax.to_config())?;
            // Balances are optional here; only check when some were given
            let validation =
                (balances.total() > 0.0).then(|| Planner::validate(&withdrawals, &balances));
            let result = CustomOutput { plan, validation };
            render(format, &result, |r| {
                let mut text = output::render_plan("Custom withdrawal", &r.plan);
                if let Some(validation) = &r.validation {
                    text.push('\n');
                    text.push_str(&output::render_validation(validation));
                }
                text
            })
        }

        Command::Compare {
            withdraw,
            balances,
            tax,
            net,
        } => {
            let balances = balances.to_balances();
            require_balances(&balances)?;
            let config = tax.to_config();
            let withdrawals = to_withdrawals(withdraw);

            let optimized =
                planner.allocate_proportional(&balances, *net, TargetKind::Net, &config)?;
            let custom = planner.evaluate_custom(&withdrawals, &config)?;
            let validation = Planner::validate(&withdrawals, &balances);
            let comparison = Planner::compare(&optimized, &custom);

            let result = CompareOutput {
                optimized,
                custom,
                validation,
                comparison,
            };
            render(format, &result, |r| {
                let mut text = output::render_plan("Optimized (proportional)", &r.optimized);
                text.push('\n');
                text.push_str(&output::render_plan("Custom", &r.custom));
                text.push('\n');
                text.push_str(&output::render_validation(&r.validation));
                text.push_str(&output::render_comparison(&r.comparison));
                text
            })
        }

        Command::Batch { file } => {
            let scenarios = load_scenarios(file)?;
            tracing::info!(count = scenarios.len(), "evaluating scenarios");
            let reports = evaluate_scenarios(&planner, &scenarios);
            let best = lowest_tax(&reports).map(|r| r.name.clone());
            let result = BatchOutput {
                reports,
                lowest_tax: best,
            };
            render(format, &result, |r| {
                let best = r
                    .lowest_tax
                    .as_ref()
                    .and_then(|name| r.reports.iter().find(|report| &report.name == name));
                output::render_batch(&r.reports, best)
            })
        }

        Command::Jurisdictions => match format {
            OutputFormat::Json => {
                let entries: Vec<_> = data
                    .jurisdictions_by_name()
                    .into_iter()
                    .map(|(code, j)| JurisdictionEntry {
                        code,
                        name: &j.name,
                        rule: &j.rule,
                    })
                    .collect();
                to_json(&entries)
            }
            OutputFormat::Text => Ok(output::render_jurisdictions(data)),
        },

        Command::Marginal { tax, income } => {
            let context = planner.calculator().resolve(&tax.to_config())?;
            let federal_rate = bracket_rate_at(*income, &context.filing_table().federal_brackets);
            let jurisdiction_rate = jurisdiction_rate_at(*income, context.jurisdiction_rule());
            let result = MarginalOutput {
                income: *income,
                federal_rate,
                jurisdiction_rate,
                combined_rate: context.marginal_rate(*income),
            };
            render(format, &result, |r| {
                output::render_marginal(r.income, r.federal_rate, r.jurisdiction_rate)
            })
        }
    }
}
