//! Criterion benchmarks for drawplan_core planning
//!
//! Run with: cargo bench -p drawplan_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drawplan_core::model::{
    AccountBalances, FilingStatus, FilingTable, Jurisdiction, JurisdictionRule, TaxBracket,
    TaxConfig, TaxReferenceData,
};
use drawplan_core::scenarios::{Scenario, Strategy, evaluate_scenarios};
use drawplan_core::{Planner, TargetKind};

fn brackets(bounds: &[(f64, f64)], top_rate: f64) -> Vec<TaxBracket> {
    let mut out = Vec::with_capacity(bounds.len() + 1);
    let mut min = 0.0;
    for &(max, rate) in bounds {
        out.push(TaxBracket::new(min, Some(max), rate));
        min = max;
    }
    out.push(TaxBracket::new(min, None, top_rate));
    out
}

fn create_reference_data() -> TaxReferenceData {
    let mut data = TaxReferenceData {
        tax_year: 2024,
        filing_statuses: Default::default(),
        jurisdictions: Default::default(),
    };
    data.filing_statuses.insert(
        FilingStatus::Single,
        FilingTable {
            federal_brackets: brackets(
                &[
                    (11_600.0, 0.10),
                    (47_150.0, 0.12),
                    (100_525.0, 0.22),
                    (191_950.0, 0.24),
                    (243_725.0, 0.32),
                    (609_350.0, 0.35),
                ],
                0.37,
            ),
            standard_deduction: 14_600.0,
            capital_gains_brackets: brackets(&[(47_025.0, 0.0), (518_900.0, 0.15)], 0.20),
        },
    );
    data.jurisdictions.insert(
        "CA".to_string(),
        Jurisdiction {
            name: "California".to_string(),
            rule: JurisdictionRule::Progressive {
                brackets: brackets(
                    &[
                        (10_412.0, 0.01),
                        (24_684.0, 0.02),
                        (38_959.0, 0.04),
                        (54_081.0, 0.06),
                        (68_350.0, 0.08),
                        (349_137.0, 0.093),
                        (418_961.0, 0.103),
                        (698_271.0, 0.113),
                    ],
                    0.123,
                ),
            },
        },
    );
    data.jurisdictions.insert(
        "TX".to_string(),
        Jurisdiction {
            name: "Texas".to_string(),
            rule: JurisdictionRule::None,
        },
    );
    data
}

fn bench_net_allocation(c: &mut Criterion) {
    let data = create_reference_data();
    let planner = Planner::new(&data);
    let config = TaxConfig::default();
    let balances = AccountBalances::new(100_000.0, 150_000.0, 50_000.0, 300_000.0);

    c.bench_function("proportional_net_60k", |b| {
        b.iter(|| {
            planner.allocate_proportional(
                black_box(&balances),
                black_box(60_000.0),
                TargetKind::Net,
                &config,
            )
        })
    });
}

fn bench_multi_year(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_year");
    let data = create_reference_data();
    let planner = Planner::new(&data);
    let config = TaxConfig::default();
    let balances = AccountBalances::new(100_000.0, 150_000.0, 50_000.0, 300_000.0);

    // Lower targets mean more simulated years
    for desired_net in [10_000.0, 30_000.0, 60_000.0] {
        group.bench_with_input(
            BenchmarkId::new("desired_net", desired_net),
            &desired_net,
            |b, &net| b.iter(|| planner.plan_multi_year(black_box(&balances), net, &config)),
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let data = create_reference_data();
    let planner = Planner::new(&data);
    let scenarios: Vec<Scenario> = (0..64)
        .map(|i| Scenario {
            name: format!("scenario-{i}"),
            tax_config: TaxConfig::new(
                FilingStatus::Single,
                if i % 2 == 0 { "CA" } else { "TX" },
            ),
            balances: AccountBalances::new(50_000.0, 50_000.0, 50_000.0, 50_000.0 + i as f64 * 10_000.0),
            target: 40_000.0,
            strategy: Strategy::MultiYear,
        })
        .collect();

    c.bench_function("batch_64_multi_year", |b| {
        b.iter(|| evaluate_scenarios(&planner, black_box(&scenarios)))
    });
}

criterion_group!(benches, bench_net_allocation, bench_multi_year, bench_batch);
criterion_main!(benches);
