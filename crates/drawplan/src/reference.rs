//! Tax reference data and scenario file loading
//!
//! Lookup order for the reference table:
//! 1. `--tax-data <path>` when given
//! 2. `{data_dir}/tax_reference.yaml` when it exists
//! 3. the bundled 2024 table
//!
//! Every table is validated before use.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use drawplan_core::TaxReferenceData;
use drawplan_core::scenarios::Scenario;
use serde::{Deserialize, Serialize};

/// Reference table shipped with the binary
pub const BUNDLED_TAX_DATA: &str = include_str!("../data/tax_reference_2024.yaml");

/// File name looked up in the data directory
pub const TAX_DATA_FILE_NAME: &str = "tax_reference.yaml";

/// Default data directory (`~/.drawplan/`)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".drawplan")
}

/// Where a loaded reference table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    Bundled,
    File(PathBuf),
}

impl fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceSource::Bundled => f.write_str("bundled 2024 table"),
            ReferenceSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse and validate a reference table from YAML
pub fn parse_reference_data(yaml: &str) -> color_eyre::Result<TaxReferenceData> {
    let data: TaxReferenceData =
        serde_saphyr::from_str(yaml).wrap_err("Failed to parse tax reference data")?;
    data.validate()
        .wrap_err("Tax reference data failed validation")?;
    Ok(data)
}

/// The bundled 2024 reference table
pub fn bundled_reference_data() -> color_eyre::Result<TaxReferenceData> {
    parse_reference_data(BUNDLED_TAX_DATA)
}

fn read_reference_file(path: &Path) -> color_eyre::Result<TaxReferenceData> {
    let yaml = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read tax data from {}", path.display()))?;
    parse_reference_data(&yaml).wrap_err_with(|| format!("Invalid tax data in {}", path.display()))
}

/// Resolve and load the reference table
pub fn load_reference_data(
    explicit: Option<&Path>,
    data_dir: &Path,
) -> color_eyre::Result<(TaxReferenceData, ReferenceSource)> {
    if let Some(path) = explicit {
        let data = read_reference_file(path)?;
        return Ok((data, ReferenceSource::File(path.to_path_buf())));
    }

    let user_path = data_dir.join(TAX_DATA_FILE_NAME);
    if user_path.exists() {
        let data = read_reference_file(&user_path)?;
        return Ok((data, ReferenceSource::File(user_path)));
    }

    Ok((bundled_reference_data()?, ReferenceSource::Bundled))
}

/// Contents of a batch scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub scenarios: Vec<Scenario>,
}

pub fn parse_scenarios(yaml: &str) -> color_eyre::Result<Vec<Scenario>> {
    let file: ScenarioFile =
        serde_saphyr::from_str(yaml).wrap_err("Failed to parse scenario file")?;
    if file.scenarios.is_empty() {
        return Err(eyre!("Scenario file contains no scenarios"));
    }
    Ok(file.scenarios)
}

pub fn load_scenarios(path: &Path) -> color_eyre::Result<Vec<Scenario>> {
    let yaml = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read scenarios from {}", path.display()))?;
    parse_scenarios(&yaml).wrap_err_with(|| format!("Invalid scenario file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawplan_core::FilingStatus;
    use drawplan_core::model::JurisdictionRule;
    use drawplan_core::scenarios::Strategy;
    use tempfile::tempdir;

    const SMALL_TABLE: &str = r#"
taxYear: 2025
filingStatuses:
  single:
    standardDeduction: 15000
    federalBrackets:
      - { min: 0, max: 10000, rate: 0.1 }
      - { min: 10000, rate: 0.2 }
    capitalGainsBrackets:
      - { min: 0, max: 50000, rate: 0 }
      - { min: 50000, rate: 0.15 }
  marriedFilingJointly:
    standardDeduction: 30000
    federalBrackets:
      - { min: 0, rate: 0.1 }
    capitalGainsBrackets:
      - { min: 0, rate: 0.15 }
  marriedFilingSeparately:
    standardDeduction: 15000
    federalBrackets:
      - { min: 0, rate: 0.1 }
    capitalGainsBrackets:
      - { min: 0, rate: 0.15 }
  headOfHousehold:
    standardDeduction: 22500
    federalBrackets:
      - { min: 0, rate: 0.1 }
    capitalGainsBrackets:
      - { min: 0, rate: 0.15 }
jurisdictions:
  ZZ:
    name: Nowhere
    rule: { type: flat, rate: 0.03 }
"#;

    #[test]
    fn test_bundled_table_is_complete() {
        let data = bundled_reference_data().unwrap();

        assert_eq!(data.tax_year, 2024);
        assert_eq!(data.filing_statuses.len(), 4);
        // 50 states plus DC
        assert_eq!(data.jurisdictions.len(), 51);

        let single = data.filing_table(FilingStatus::Single).unwrap();
        assert_eq!(single.standard_deduction, 14_600.0);
        assert_eq!(single.federal_brackets.last().unwrap().max, None);

        assert_eq!(data.jurisdiction("TX").unwrap().rule, JurisdictionRule::None);
        assert_eq!(
            data.jurisdiction("IL").unwrap().rule,
            JurisdictionRule::Flat { rate: 0.0495 }
        );
        assert!(matches!(
            data.jurisdiction("CA").unwrap().rule,
            JurisdictionRule::Progressive { ref brackets } if brackets.len() == 9
        ));
    }

    #[test]
    fn test_bundled_table_matches_reference_tax() {
        let data = bundled_reference_data().unwrap();
        let calculator = drawplan_core::TaxCalculator::new(&data);

        let tax = calculator
            .capital_gains_tax(60_000.0, 0.0, FilingStatus::Single)
            .unwrap();
        assert!((tax - 1_946.25).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let broken = SMALL_TABLE.replace("- { min: 10000, rate: 0.2 }", "- { min: 12000, rate: 0.2 }");
        let err = parse_reference_data(&broken).unwrap_err();
        assert!(
            err.chain()
                .any(|cause| cause.to_string().contains("single federal brackets"))
        );
    }

    #[test]
    fn test_load_prefers_explicit_then_data_dir_then_bundled() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();

        let (_, source) = load_reference_data(None, &data_dir).unwrap();
        assert_eq!(source, ReferenceSource::Bundled);

        let user_path = data_dir.join(TAX_DATA_FILE_NAME);
        fs::write(&user_path, SMALL_TABLE).unwrap();
        let (data, source) = load_reference_data(None, &data_dir).unwrap();
        assert_eq!(source, ReferenceSource::File(user_path));
        assert_eq!(data.tax_year, 2025);

        let explicit = dir.path().join("explicit.yaml");
        fs::write(&explicit, BUNDLED_TAX_DATA).unwrap();
        let (data, source) = load_reference_data(Some(&explicit), &data_dir).unwrap();
        assert_eq!(source, ReferenceSource::File(explicit));
        assert_eq!(data.tax_year, 2024);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = load_reference_data(Some(&dir.path().join("nope.yaml")), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_scenarios() {
        let yaml = r#"
scenarios:
  - name: texas retirement
    taxConfig: { filingStatus: marriedFilingJointly, jurisdictionCode: TX }
    balances: { muniBonds: 50000, ira: 400000 }
    target: 60000
  - name: ladder
    balances: { longTermGains: 100000 }
    target: 40000
    strategy: ladder
"#;
        let scenarios = parse_scenarios(yaml).unwrap();

        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].strategy, Strategy::MultiYear);
        assert_eq!(scenarios[0].tax_config.jurisdiction_code, "TX");
        assert_eq!(scenarios[0].balances.ira, 400_000.0);
        assert_eq!(scenarios[0].balances.short_term_gains, 0.0);
        assert_eq!(scenarios[1].strategy, Strategy::Ladder);
        assert_eq!(scenarios[1].tax_config.jurisdiction_code, "CA");

        assert!(parse_scenarios("scenarios: []").is_err());
    }
}
