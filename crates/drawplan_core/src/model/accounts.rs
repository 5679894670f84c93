//! Account balances and withdrawal amounts
//!
//! The set of account kinds is closed: every balance record carries exactly
//! the four fields below, and `AccountKind` enumerates them in ladder order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// One of the four supported account kinds, each with its own tax treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    /// Municipal bonds, federally tax-exempt
    MuniBonds,
    /// Long-term capital gains, taxed at stacked preferential rates
    LongTermGains,
    /// Short-term capital gains, taxed as ordinary income
    ShortTermGains,
    /// Traditional IRA, fully taxable as ordinary income
    Ira,
}

impl AccountKind {
    /// All kinds in order of tax efficiency (the greedy ladder order)
    pub const ALL: [AccountKind; 4] = [
        AccountKind::MuniBonds,
        AccountKind::LongTermGains,
        AccountKind::ShortTermGains,
        AccountKind::Ira,
    ];

    /// Field name used in serialized records and error messages
    pub fn key(self) -> &'static str {
        match self {
            AccountKind::MuniBonds => "muniBonds",
            AccountKind::LongTermGains => "longTermGains",
            AccountKind::ShortTermGains => "shortTermGains",
            AccountKind::Ira => "ira",
        }
    }

    /// Human-readable account name
    pub fn label(self) -> &'static str {
        match self {
            AccountKind::MuniBonds => "Municipal Bonds",
            AccountKind::LongTermGains => "Long-Term Gains",
            AccountKind::ShortTermGains => "Short-Term Gains",
            AccountKind::Ira => "Traditional IRA",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AccountKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "muniBonds" | "muni-bonds" | "muni" => Ok(AccountKind::MuniBonds),
            "longTermGains" | "long-term-gains" | "ltcg" => Ok(AccountKind::LongTermGains),
            "shortTermGains" | "short-term-gains" | "stcg" => Ok(AccountKind::ShortTermGains),
            "ira" => Ok(AccountKind::Ira),
            other => Err(PlanError::InvalidInput {
                field: "account".to_string(),
                reason: format!("unknown account kind '{other}'"),
            }),
        }
    }
}

/// Amounts held in (or drawn from) each account kind
///
/// Used both for balances and for withdrawal sets; see the `AccountBalances`
/// and `WithdrawalSet` aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountAmounts {
    pub muni_bonds: f64,
    pub long_term_gains: f64,
    pub short_term_gains: f64,
    pub ira: f64,
}

/// Current balance of every account
pub type AccountBalances = AccountAmounts;

/// Amount withdrawn from every account in one period
pub type WithdrawalSet = AccountAmounts;

impl AccountAmounts {
    pub const ZERO: AccountAmounts = AccountAmounts {
        muni_bonds: 0.0,
        long_term_gains: 0.0,
        short_term_gains: 0.0,
        ira: 0.0,
    };

    #[must_use]
    pub fn new(muni_bonds: f64, long_term_gains: f64, short_term_gains: f64, ira: f64) -> Self {
        Self {
            muni_bonds,
            long_term_gains,
            short_term_gains,
            ira,
        }
    }

    #[must_use]
    pub fn get(&self, kind: AccountKind) -> f64 {
        match kind {
            AccountKind::MuniBonds => self.muni_bonds,
            AccountKind::LongTermGains => self.long_term_gains,
            AccountKind::ShortTermGains => self.short_term_gains,
            AccountKind::Ira => self.ira,
        }
    }

    pub fn set(&mut self, kind: AccountKind, amount: f64) {
        match kind {
            AccountKind::MuniBonds => self.muni_bonds = amount,
            AccountKind::LongTermGains => self.long_term_gains = amount,
            AccountKind::ShortTermGains => self.short_term_gains = amount,
            AccountKind::Ira => self.ira = amount,
        }
    }

    /// Build a record by evaluating `f` for every account kind
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(AccountKind) -> f64) -> Self {
        let mut amounts = Self::ZERO;
        for kind in AccountKind::ALL {
            amounts.set(kind, f(kind));
        }
        amounts
    }

    /// Iterate `(kind, amount)` pairs in ladder order
    pub fn iter(&self) -> impl Iterator<Item = (AccountKind, f64)> + '_ {
        AccountKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.muni_bonds + self.long_term_gains + self.short_term_gains + self.ira
    }

    /// Remaining balances after a withdrawal, floored at zero per account
    #[must_use]
    pub fn saturating_sub(&self, withdrawals: &WithdrawalSet) -> Self {
        Self::from_fn(|kind| (self.get(kind) - withdrawals.get(kind)).max(0.0))
    }

    /// True if any account holds more than `threshold`
    #[must_use]
    pub fn any_above(&self, threshold: f64) -> bool {
        self.iter().any(|(_, amount)| amount > threshold)
    }

    /// Reject negative or non-finite amounts
    pub fn ensure_valid(&self, what: &str) -> Result<(), PlanError> {
        for (kind, amount) in self.iter() {
            if !amount.is_finite() {
                return Err(PlanError::InvalidInput {
                    field: format!("{what}.{kind}"),
                    reason: "must be a finite number".to_string(),
                });
            }
            if amount < 0.0 {
                return Err(PlanError::InvalidInput {
                    field: format!("{what}.{kind}"),
                    reason: format!("must be non-negative, got {amount}"),
                });
            }
        }
        Ok(())
    }
}
