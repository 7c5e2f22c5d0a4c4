use lazy_static::lazy_static;
use regex::Regex;

/// 100 years of simulated months.
pub const MAX_MONTHS: u32 = 1200;

pub const DEBT_ARG: &str = "debt";
pub const DEBTS_FILE_ARG: &str = "debts-file";
pub const DEBTS_FILE_ENV: &str = "DEBT_PAYOFF_DEBTS_FILE";
pub const BUDGET_ARG: &str = "budget";
pub const EXTRA_ARG: &str = "extra";
pub const STRATEGY_ARG: &str = "strategy";
pub const STRATEGY_ENV: &str = "DEBT_PAYOFF_STRATEGY";
pub const START_DATE_ARG: &str = "start-date";
pub const SCHEDULE_ARG: &str = "schedule";
pub const JSON_ARG: &str = "json";
pub const CURRENCY_SYMBOL_ARG: &str = "currency-symbol";
pub const CURRENCY_SYMBOL_ENV: &str = "DEBT_PAYOFF_CURRENCY_SYMBOL";
pub const DATE_FORMAT_ARG: &str = "date-format";
pub const DATE_FORMAT_ENV: &str = "DEBT_PAYOFF_DATE_FORMAT";

pub const AVALANCHE_TAG: &str = "avalanche";
pub const SNOWBALL_TAG: &str = "snowball";
pub const POSSIBLE_STRATEGY_VALUES: [&str; 2] = [AVALANCHE_TAG, SNOWBALL_TAG];

pub const DEFAULT_STRATEGY: &str = AVALANCHE_TAG;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

lazy_static! {
    /// `NAME:BALANCE:RATE:MIN`, where the name may itself contain colons.
    pub static ref DEBT_SPEC_REGEX: Regex =
        Regex::new(r"^\s*(.*\S)\s*:\s*([^:]+?)\s*:\s*([^:]+?)%?\s*:\s*([^:]+?)\s*$")
            .expect("DEBT_SPEC_REGEX should be valid");
}
