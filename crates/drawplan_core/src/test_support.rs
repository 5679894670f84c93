//! Shared fixtures for unit tests: 2024 federal tables plus a few jurisdictions

use rustc_hash::FxHashMap;

use crate::model::{
    FilingStatus, FilingTable, Jurisdiction, JurisdictionRule, TaxBracket, TaxReferenceData,
};

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

fn filing_table(
    federal: &[(f64, f64)],
    standard_deduction: f64,
    capital_gains: &[(f64, f64)],
) -> FilingTable {
    FilingTable {
        federal_brackets: brackets(federal, 0.37),
        standard_deduction,
        capital_gains_brackets: brackets(capital_gains, 0.20),
    }
}

pub(crate) fn reference_data() -> TaxReferenceData {
    let mut filing_statuses = FxHashMap::default();
    filing_statuses.insert(
        FilingStatus::Single,
        filing_table(
            &[
                (11_600.0, 0.10),
                (47_150.0, 0.12),
                (100_525.0, 0.22),
                (191_950.0, 0.24),
                (243_725.0, 0.32),
                (609_350.0, 0.35),
            ],
            14_600.0,
            &[(47_025.0, 0.0), (518_900.0, 0.15)],
        ),
    );
    filing_statuses.insert(
        FilingStatus::MarriedFilingJointly,
        filing_table(
            &[
                (23_200.0, 0.10),
                (94_300.0, 0.12),
                (201_050.0, 0.22),
                (383_900.0, 0.24),
                (487_450.0, 0.32),
                (731_200.0, 0.35),
            ],
            29_200.0,
            &[(94_050.0, 0.0), (583_750.0, 0.15)],
        ),
    );
    filing_statuses.insert(
        FilingStatus::MarriedFilingSeparately,
        filing_table(
            &[
                (11_600.0, 0.10),
                (47_150.0, 0.12),
                (100_525.0, 0.22),
                (191_950.0, 0.24),
                (243_725.0, 0.32),
                (365_600.0, 0.35),
            ],
            14_600.0,
            &[(47_025.0, 0.0), (291_850.0, 0.15)],
        ),
    );
    filing_statuses.insert(
        FilingStatus::HeadOfHousehold,
        filing_table(
            &[
                (16_550.0, 0.10),
                (63_100.0, 0.12),
                (100_500.0, 0.22),
                (191_950.0, 0.24),
                (243_700.0, 0.32),
                (609_350.0, 0.35),
            ],
            21_900.0,
            &[(63_000.0, 0.0), (551_350.0, 0.15)],
        ),
    );

    let mut jurisdictions = FxHashMap::default();
    jurisdictions.insert(
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
    jurisdictions.insert(
        "IL".to_string(),
        Jurisdiction {
            name: "Illinois".to_string(),
            rule: JurisdictionRule::Flat { rate: 0.0495 },
        },
    );
    jurisdictions.insert(
        "TX".to_string(),
        Jurisdiction {
            name: "Texas".to_string(),
            rule: JurisdictionRule::None,
        },
    );

    TaxReferenceData {
        tax_year: 2024,
        filing_statuses,
        jurisdictions,
    }
}
