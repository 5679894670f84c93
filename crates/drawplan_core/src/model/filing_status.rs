use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Federal filing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedFilingJointly,
        FilingStatus::MarriedFilingSeparately,
        FilingStatus::HeadOfHousehold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedFilingJointly => "marriedFilingJointly",
            FilingStatus::MarriedFilingSeparately => "marriedFilingSeparately",
            FilingStatus::HeadOfHousehold => "headOfHousehold",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatus {
    type Err = PlanError;

    /// Accepts the camelCase names plus kebab-case and short aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(FilingStatus::Single),
            "marriedFilingJointly" | "married-filing-jointly" | "mfj" => {
                Ok(FilingStatus::MarriedFilingJointly)
            }
            "marriedFilingSeparately" | "married-filing-separately" | "mfs" => {
                Ok(FilingStatus::MarriedFilingSeparately)
            }
            "headOfHousehold" | "head-of-household" | "hoh" => Ok(FilingStatus::HeadOfHousehold),
            other => Err(PlanError::UnknownFilingStatus(other.to_string())),
        }
    }
}
