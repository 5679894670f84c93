//! Command-line arguments

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use drawplan_core::{AccountBalances, AccountKind, FilingStatus, TaxConfig, WithdrawalSet};

#[derive(Parser, Debug)]
#[command(name = "drawplan")]
#[command(about = "Tax-aware retirement withdrawal planner")]
pub struct Args {
    /// Path to the data directory (default: ~/.drawplan/)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Write logs to drawplan.log in the data directory instead of stderr
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Tax reference table (YAML) to use instead of the bundled 2024 table
    #[arg(long, global = true)]
    pub tax_data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Year-by-year plan that nets a yearly income until the balances run out
    Plan {
        #[command(flatten)]
        balances: BalanceArgs,
        #[command(flatten)]
        tax: TaxArgs,
        /// Desired post-tax income per year
        #[arg(long)]
        net: f64,
    },

    /// Greedy ladder: muni bonds, long-term gains, short-term gains, then IRA
    Ladder {
        #[command(flatten)]
        balances: BalanceArgs,
        #[command(flatten)]
        tax: TaxArgs,
        /// Gross amount to withdraw
        #[arg(long)]
        income: f64,
    },

    /// Withdraw from every account in proportion to its balance
    Proportional {
        #[command(flatten)]
        balances: BalanceArgs,
        #[command(flatten)]
        tax: TaxArgs,
        /// Target amount (post-tax unless --gross)
        #[arg(long)]
        target: f64,
        /// Treat the target as a gross withdrawal
        #[arg(long)]
        gross: bool,
    },

    /// Tax a hand-picked withdrawal set, optionally checking it against balances
    Custom {
        /// Withdrawal as ACCOUNT=AMOUNT (muni, ltcg, stcg, ira); repeatable
        #[arg(short, long = "withdraw", value_parser = parse_account_amount, required = true)]
        withdraw: Vec<(AccountKind, f64)>,
        #[command(flatten)]
        balances: BalanceArgs,
        #[command(flatten)]
        tax: TaxArgs,
    },

    /// Compare a hand-picked withdrawal set against the proportional plan for the same net income
    Compare {
        /// Withdrawal as ACCOUNT=AMOUNT (muni, ltcg, stcg, ira); repeatable
        #[arg(short, long = "withdraw", value_parser = parse_account_amount, required = true)]
        withdraw: Vec<(AccountKind, f64)>,
        #[command(flatten)]
        balances: BalanceArgs,
        #[command(flatten)]
        tax: TaxArgs,
        /// Post-tax income the optimized plan targets
        #[arg(long)]
        net: f64,
    },

    /// Evaluate every scenario in a YAML file
    Batch {
        /// Scenario file with a top-level `scenarios` list
        file: PathBuf,
    },

    /// List jurisdictions in the reference table
    Jurisdictions,

    /// Marginal rate on the next dollar of ordinary income
    Marginal {
        #[command(flatten)]
        tax: TaxArgs,
        /// Current taxable ordinary income
        #[arg(long)]
        income: f64,
    },
}

/// Account balances, all defaulting to zero
#[derive(ClapArgs, Debug, Clone, Copy, Default)]
pub struct BalanceArgs {
    /// Municipal bond balance
    #[arg(long, default_value_t = 0.0)]
    pub muni: f64,
    /// Long-term capital gains balance
    #[arg(long, default_value_t = 0.0)]
    pub ltcg: f64,
    /// Short-term capital gains balance
    #[arg(long, default_value_t = 0.0)]
    pub stcg: f64,
    /// Traditional IRA balance
    #[arg(long, default_value_t = 0.0)]
    pub ira: f64,
}

impl BalanceArgs {
    pub fn to_balances(self) -> AccountBalances {
        AccountBalances::new(self.muni, self.ltcg, self.stcg, self.ira)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TaxArgs {
    /// Filing status (single, mfj, mfs, hoh)
    #[arg(long, default_value = "single")]
    pub filing_status: FilingStatus,
    /// Two-letter jurisdiction code
    #[arg(long, default_value = "CA")]
    pub jurisdiction: String,
}

impl TaxArgs {
    pub fn to_config(&self) -> TaxConfig {
        TaxConfig::new(self.filing_status, self.jurisdiction.to_uppercase())
    }
}

/// Parse `ACCOUNT=AMOUNT`, e.g. `ira=40000`
pub fn parse_account_amount(s: &str) -> Result<(AccountKind, f64), String> {
    let (account, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ACCOUNT=AMOUNT, got '{s}'"))?;
    let kind = account.trim().parse::<AccountKind>().map_err(|e| e.to_string())?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok((kind, amount))
}

/// Sum repeated `ACCOUNT=AMOUNT` pairs into a withdrawal set
pub fn to_withdrawals(pairs: &[(AccountKind, f64)]) -> WithdrawalSet {
    let mut withdrawals = WithdrawalSet::ZERO;
    for &(kind, amount) in pairs {
        withdrawals.set(kind, withdrawals.get(kind) + amount);
    }
    withdrawals
}
