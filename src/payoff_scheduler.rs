use chrono::NaiveDate;
use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::*;
use crate::debts::*;
use crate::types::*;
use crate::utilities::*;

/// One debt's payment in one simulated month.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub month_index: u32,
    pub calendar_date: NaiveDate,
    /// Position of the debt in the caller's input, since names need not be unique.
    pub debt_index: usize,
    pub debt_name: String,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Part of `payment` taken from the month's surplus.
    pub surplus_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffResult {
    pub start_date: NaiveDate,
    pub available_per_month: Money,
    pub schedule: Vec<ScheduleEntry>,
    pub months_to_payoff: u32,
    pub total_interest_paid: Money,
    /// Balance still owed when the simulation hit the month cap.
    pub unpaid_balance: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummary {
    pub debt_index: usize,
    pub debt_name: String,
    pub months_to_payoff: u32,
    pub payoff_date: Option<NaiveDate>,
    pub interest_paid: Money,
    pub total_paid: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotal {
    pub month_index: u32,
    pub calendar_date: NaiveDate,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Budget left unspent because every active debt was paid off.
    pub unallocated: Money,
    /// Spend above the budget, from minimum floors the budget could not cover.
    pub overspend: Money,
}

/// An accelerated run next to its zero-extra-payment baseline.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffComparison {
    pub total_debt: Money,
    pub interest_saved: Money,
    pub months_saved: u32,
    pub accelerated: PayoffResult,
    pub baseline: PayoffResult,
}

#[derive(Clone, Debug)]
struct WorkingDebt {
    debt_index: usize,
    name: String,
    balance: Money,
    annual_rate: AnnualRate,
    min_payment: Money,
}

#[derive(Clone, Copy, Debug)]
struct MonthlyPayment {
    interest: Money,
    amount: Money,
    surplus: Money,
}

impl Prioritized for WorkingDebt {
    fn annual_rate(&self) -> AnnualRate {
        self.annual_rate
    }

    fn remaining_balance(&self) -> Money {
        self.balance
    }
}

impl WorkingDebt {
    fn new(debt_index: usize, debt: &Debt) -> WorkingDebt {
        WorkingDebt {
            debt_index,
            name: debt.name().to_string(),
            balance: debt.balance(),
            annual_rate: debt.annual_rate(),
            min_payment: debt.min_payment(),
        }
    }

    fn payoff_amount(&self, interest: Money) -> Money {
        self.balance + interest
    }

    /// The larger of the declared minimum and interest plus one unit, but
    /// never more than clears the debt.
    fn minimum_payment(&self) -> MonthlyPayment {
        let interest = self.annual_rate.monthly_interest(self.balance);
        let floor = self.min_payment.max(interest + Money::one_unit());
        MonthlyPayment {
            interest,
            amount: floor.min(self.payoff_amount(interest)),
            surplus: Money::zero(),
        }
    }

    fn add_surplus(&self, payment: &mut MonthlyPayment, surplus: Money) {
        let room = self.payoff_amount(payment.interest) - payment.amount;
        payment.surplus = surplus.min(room);
        payment.amount += payment.surplus;
    }
}

/// Simulates paying down `debts` month by month under `policy`.
///
/// Each run works on its own copy of the debts, so the same input can be
/// run again (for example as a baseline). The simulation stops once every
/// debt is paid off, or after `MAX_MONTHS` months; in the latter case
/// `PayoffResult::exceeds_horizon` is true.
///
/// Money left after minimum payments all goes to the month's first debt,
/// but only up to what clears it. Any rest is reported as
/// `MonthTotal::unallocated` instead of being recorded as an overpayment,
/// so an entry's `payment` never exceeds its balance plus interest.
pub fn run_schedule(debts: &[Debt], policy: &PaymentPolicy, start_date: NaiveDate) -> PayoffResult {
    let comparator = policy.strategy().comparator::<WorkingDebt>();
    let available = policy.available_per_month();
    let mut active: Vec<WorkingDebt> = debts
        .iter()
        .enumerate()
        .map(|(debt_index, debt)| WorkingDebt::new(debt_index, debt))
        .filter(|debt| !debt.balance.settle().is_zero())
        .collect();
    debug!(
        "Running {} schedule for {} active debts with {} available per month",
        policy.strategy(),
        active.len(),
        available
    );

    let mut schedule = Vec::new();
    let mut total_interest_paid = Money::zero();
    let mut month_index = 0;
    while !active.is_empty() && month_index < MAX_MONTHS {
        active.sort_by(comparator);
        let calendar_date = month_start_after(start_date, month_index);

        let mut payments: Vec<MonthlyPayment> =
            active.iter().map(WorkingDebt::minimum_payment).collect();
        let remaining_budget =
            available - payments.iter().map(|payment| payment.amount).sum::<Money>();
        if remaining_budget.is_positive() {
            active[0].add_surplus(&mut payments[0], remaining_budget);
        } else if remaining_budget.is_negative() {
            debug!(
                "Month {}: minimum payments exceed budget by {}",
                month_index, -remaining_budget
            );
        }

        for (debt, payment) in active.iter_mut().zip(&payments) {
            let principal = payment.amount - payment.interest;
            debt.balance = (debt.balance - principal).settle();
            total_interest_paid += payment.interest;
            schedule.push(ScheduleEntry {
                month_index,
                calendar_date,
                debt_index: debt.debt_index,
                debt_name: debt.name.clone(),
                payment: payment.amount,
                principal_portion: principal,
                interest_portion: payment.interest,
                surplus_portion: payment.surplus,
                remaining_balance: debt.balance,
            });
        }

        active.retain(|debt| {
            if debt.balance.is_zero() {
                trace!("Month {}: paid off {}", month_index, debt.name);
                false
            } else {
                true
            }
        });
        month_index += 1;
    }

    let unpaid_balance: Money = active.iter().map(|debt| debt.balance).sum();
    debug!(
        "Schedule finished after {} months with {} interest paid and {} unpaid",
        month_index, total_interest_paid, unpaid_balance
    );
    PayoffResult {
        start_date,
        available_per_month: available,
        schedule,
        months_to_payoff: month_index,
        total_interest_paid,
        unpaid_balance,
    }
}

/// Runs `policy` and its zero-extra-payment baseline over the same debts.
pub fn compare(debts: &[Debt], policy: &PaymentPolicy, start_date: NaiveDate) -> PayoffComparison {
    let accelerated = run_schedule(debts, policy, start_date);
    let baseline = run_schedule(debts, &policy.baseline(), start_date);
    let interest_saved = (baseline.total_interest_paid - accelerated.total_interest_paid)
        .max(Money::zero());
    PayoffComparison {
        total_debt: total_balance(debts),
        interest_saved,
        months_saved: baseline
            .months_to_payoff
            .saturating_sub(accelerated.months_to_payoff),
        accelerated,
        baseline,
    }
}

impl PayoffResult {
    /// True when debts were still owed after `MAX_MONTHS` months, meaning
    /// they do not pay off within 100 years.
    pub fn exceeds_horizon(&self) -> bool {
        self.unpaid_balance.is_positive()
    }

    /// The month the last debt was paid off.
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        if self.exceeds_horizon() {
            None
        } else {
            self.schedule.last().map(|entry| entry.calendar_date)
        }
    }

    pub fn total_paid(&self) -> Money {
        self.schedule.iter().map(|entry| entry.payment).sum()
    }

    /// Per-debt totals, in the caller's input order.
    pub fn debt_summaries(&self) -> Vec<DebtSummary> {
        let mut summaries: BTreeMap<usize, DebtSummary> = BTreeMap::new();
        for entry in &self.schedule {
            let summary = summaries
                .entry(entry.debt_index)
                .or_insert_with(|| DebtSummary {
                    debt_index: entry.debt_index,
                    debt_name: entry.debt_name.clone(),
                    months_to_payoff: 0,
                    payoff_date: None,
                    interest_paid: Money::zero(),
                    total_paid: Money::zero(),
                });
            summary.months_to_payoff += 1;
            summary.interest_paid += entry.interest_portion;
            summary.total_paid += entry.payment;
            if entry.remaining_balance.is_zero() {
                summary.payoff_date = Some(entry.calendar_date);
            }
        }
        summaries.into_iter().map(|(_, summary)| summary).collect()
    }

    /// Spending per simulated month, compared against the budget.
    pub fn monthly_totals(&self) -> Vec<MonthTotal> {
        let mut totals: Vec<MonthTotal> = Vec::new();
        for entry in &self.schedule {
            let is_new_month = totals
                .last()
                .map_or(true, |total| total.month_index != entry.month_index);
            if is_new_month {
                totals.push(MonthTotal {
                    month_index: entry.month_index,
                    calendar_date: entry.calendar_date,
                    payment: Money::zero(),
                    principal: Money::zero(),
                    interest: Money::zero(),
                    unallocated: Money::zero(),
                    overspend: Money::zero(),
                });
            }
            if let Some(total) = totals.last_mut() {
                total.payment += entry.payment;
                total.principal += entry.principal_portion;
                total.interest += entry.interest_portion;
            }
        }
        for total in &mut totals {
            total.unallocated = (self.available_per_month - total.payment).max(Money::zero());
            total.overspend = (total.payment - self.available_per_month).max(Money::zero());
        }
        totals
    }

    /// Months whose minimum floors cost more than the budget allowed.
    pub fn overspent_months(&self) -> Vec<MonthTotal> {
        self.monthly_totals()
            .into_iter()
            .filter(|total| total.overspend.is_positive())
            .collect()
    }
}
