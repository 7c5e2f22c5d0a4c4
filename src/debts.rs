use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::constants::*;
use crate::errors::*;
use crate::types::*;
use crate::utilities::*;

/// One balance being paid down, as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    name: String,
    balance: Money,
    annual_rate: AnnualRate,
    min_payment: Money,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest annual rate first.
    Avalanche,
    /// Lowest remaining balance first.
    Snowball,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPolicy {
    strategy: Strategy,
    monthly_budget: Money,
    extra_payment: Money,
}

/// What the ordering of a month needs to know about a debt.
pub trait Prioritized {
    fn annual_rate(&self) -> AnnualRate;
    fn remaining_balance(&self) -> Money;
}

pub type Comparator<T> = fn(&T, &T) -> Ordering;

#[derive(Debug, Deserialize)]
struct DebtRecord {
    name: String,
    balance: f64,
    #[serde(alias = "annualRate", alias = "rate")]
    annual_rate: f64,
    #[serde(alias = "minPayment")]
    min_payment: f64,
}

impl Debt {
    pub fn new(
        name: &str,
        balance: Money,
        annual_rate: AnnualRate,
        min_payment: Money,
    ) -> Result<Debt> {
        let invalid = |reason: &str| ErrorKind::InvalidDebtInput(name.to_string(), reason.into());
        ensure!(!balance.is_negative(), invalid("balance may not be negative"));
        ensure!(
            !annual_rate.is_negative(),
            invalid("annual rate may not be negative")
        );
        ensure!(
            !min_payment.is_negative(),
            invalid("minimum payment may not be negative")
        );
        ensure!(
            balance.is_within_limit() && min_payment.is_within_limit(),
            invalid(&format!("amounts may not exceed {}", Money::limit()))
        );
        ensure!(
            annual_rate.is_within_limit(),
            invalid(&format!("annual rate may not exceed {}", AnnualRate::limit()))
        );
        Ok(Debt {
            name: name.to_string(),
            balance,
            annual_rate,
            min_payment,
        })
    }

    pub fn from_f64(name: &str, balance: f64, annual_rate: f64, min_payment: f64) -> Result<Debt> {
        let invalid = |reason: &str| ErrorKind::InvalidDebtInput(name.to_string(), reason.into());
        Debt::new(
            name,
            Money::from_f64(balance).ok_or_else(|| invalid("balance must be a finite number in range"))?,
            AnnualRate::from_f64(annual_rate)
                .ok_or_else(|| invalid("annual rate must be a finite number in range"))?,
            Money::from_f64(min_payment)
                .ok_or_else(|| invalid("minimum payment must be a finite number in range"))?,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn annual_rate(&self) -> AnnualRate {
        self.annual_rate
    }

    pub fn min_payment(&self) -> Money {
        self.min_payment
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} at {}, minimum {})",
            self.name, self.balance, self.annual_rate, self.min_payment
        )
    }
}

/// Parses a command-line debt of the form `NAME:BALANCE:RATE:MIN`.
pub fn parse_debt_spec(spec: &str) -> Result<Debt> {
    let captures = DEBT_SPEC_REGEX.captures(spec).chain_err(|| {
        ErrorKind::InvalidDebtInput(
            spec.to_string(),
            "expected NAME:BALANCE:RATE:MIN".to_string(),
        )
    })?;
    let field = |index: usize| captures.get(index).map_or("", |m| m.as_str());
    let name = field(1);
    let number = |index: usize, what: &str| {
        parse_decimal(field(index))
            .chain_err(|| ErrorKind::InvalidDebtInput(name.to_string(), format!("bad {}", what)))
    };
    Debt::new(
        name,
        Money::from_decimal(number(2, "balance")?),
        AnnualRate::from_decimal(number(3, "annual rate")?),
        Money::from_decimal(number(4, "minimum payment")?),
    )
}

/// Reads a JSON array of `{name, balance, annualRate, minPayment}` objects.
pub fn load_debts_json<R: Read>(reader: R) -> Result<Vec<Debt>> {
    let records: Vec<DebtRecord> = serde_json::from_reader(reader)?;
    debug!("Debt records read from JSON: {:#?}", &records);
    records
        .into_iter()
        .map(|record| {
            Debt::from_f64(
                &record.name,
                record.balance,
                record.annual_rate,
                record.min_payment,
            )
        })
        .collect()
}

pub fn total_balance(debts: &[Debt]) -> Money {
    debts.iter().map(Debt::balance).sum()
}

pub fn total_min_payment(debts: &[Debt]) -> Money {
    debts.iter().map(Debt::min_payment).sum()
}

impl Strategy {
    /// Orders debts so that the one owed the surplus comes first. Both
    /// comparators are meant for a stable sort, so ties keep their order.
    pub fn comparator<T: Prioritized>(self) -> Comparator<T> {
        match self {
            Strategy::Avalanche => highest_rate_first::<T>,
            Strategy::Snowball => lowest_balance_first::<T>,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Strategy::Avalanche => AVALANCHE_TAG,
            Strategy::Snowball => SNOWBALL_TAG,
        }
    }
}

fn highest_rate_first<T: Prioritized>(a: &T, b: &T) -> Ordering {
    b.annual_rate().cmp(&a.annual_rate())
}

fn lowest_balance_first<T: Prioritized>(a: &T, b: &T) -> Ordering {
    a.remaining_balance().cmp(&b.remaining_balance())
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Strategy> {
        match tag.trim().to_lowercase().as_str() {
            AVALANCHE_TAG => Ok(Strategy::Avalanche),
            SNOWBALL_TAG => Ok(Strategy::Snowball),
            _ => bail!(ErrorKind::InvalidPolicyInput(format!(
                "unrecognized strategy: {}",
                tag
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl PaymentPolicy {
    pub fn new(
        strategy: Strategy,
        monthly_budget: Money,
        extra_payment: Money,
    ) -> Result<PaymentPolicy> {
        ensure!(
            !monthly_budget.is_negative(),
            ErrorKind::InvalidPolicyInput("monthly budget may not be negative".to_string())
        );
        ensure!(
            !extra_payment.is_negative(),
            ErrorKind::InvalidPolicyInput("extra payment may not be negative".to_string())
        );
        ensure!(
            monthly_budget.is_within_limit() && extra_payment.is_within_limit(),
            ErrorKind::InvalidPolicyInput(format!("amounts may not exceed {}", Money::limit()))
        );
        Ok(PaymentPolicy {
            strategy,
            monthly_budget,
            extra_payment,
        })
    }

    pub fn from_f64(strategy: Strategy, monthly_budget: f64, extra_payment: f64) -> Result<PaymentPolicy> {
        let invalid = |reason: &str| ErrorKind::InvalidPolicyInput(reason.to_string());
        PaymentPolicy::new(
            strategy,
            Money::from_f64(monthly_budget)
                .ok_or_else(|| invalid("monthly budget must be a finite number in range"))?,
            Money::from_f64(extra_payment).ok_or_else(|| invalid("extra payment must be a finite number in range"))?,
        )
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn monthly_budget(&self) -> Money {
        self.monthly_budget
    }

    pub fn extra_payment(&self) -> Money {
        self.extra_payment
    }

    /// Everything available to spend in one month.
    pub fn available_per_month(&self) -> Money {
        self.monthly_budget + self.extra_payment
    }

    /// The same policy with no extra payment.
    pub fn baseline(&self) -> PaymentPolicy {
        PaymentPolicy {
            extra_payment: Money::zero(),
            ..*self
        }
    }
}
