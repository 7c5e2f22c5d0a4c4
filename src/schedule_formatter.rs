use chrono::NaiveDate;
use rust_decimal::prelude::Zero;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cell::RefCell;

use crate::payoff_scheduler::*;
use crate::types::*;

/// How amounts and dates are shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrencyFormat {
    pub currency_symbol: String,
    pub decimal_digits: u32,
    pub decimal_separator: String,
    pub group_separator: String,
    pub symbol_first: bool,
    pub display_symbol: bool,
    /// A pattern such as `MM/DD/YYYY`.
    pub date_format: String,
}

impl Default for CurrencyFormat {
    fn default() -> CurrencyFormat {
        CurrencyFormat {
            currency_symbol: "$".to_string(),
            decimal_digits: 2,
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
            symbol_first: true,
            display_symbol: true,
            date_format: "YYYY-MM-DD".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ScheduleFormatter<'a> {
    currency_format: &'a CurrencyFormat,
    date_format: RefCell<Option<String>>,
}

impl<'a> ScheduleFormatter<'a> {
    pub fn new(currency_format: &CurrencyFormat) -> ScheduleFormatter {
        ScheduleFormatter {
            currency_format,
            date_format: RefCell::new(None),
        }
    }

    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency_custom(amount.to_decimal())
    }

    pub fn format_rate(&self, rate: AnnualRate) -> String {
        rate.to_string()
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut fmt_opt = self.date_format.borrow_mut();
        let fmt = fmt_opt.get_or_insert_with(|| {
            self.currency_format
                .date_format
                .replace("YYYY", "%Y")
                .replace("MM", "%m")
                .replace("DD", "%d")
        });
        date.format(fmt).to_string()
    }

    pub fn format_month_count(&self, months: u32) -> String {
        let (years, months) = (months / 12, months % 12);
        match (years, months) {
            (0, 1) => "1 month".to_string(),
            (0, m) => format!("{} months", m),
            (1, 0) => "1 year".to_string(),
            (y, 0) => format!("{} years", y),
            (y, m) => format!("{} ({} months)", self.format_month_count(y * 12), y * 12 + m),
        }
    }

    /// The headline numbers of an accelerated run and its baseline.
    pub fn format_summary(&self, comparison: &PayoffComparison) -> String {
        let accelerated = &comparison.accelerated;
        let baseline = &comparison.baseline;
        let mut lines = vec![
            format!("Total debt:            {}", self.format_money(comparison.total_debt)),
            format!(
                "Monthly payment:       {}",
                self.format_money(accelerated.available_per_month)
            ),
            format!("Time to payoff:        {}", self.format_payoff_time(accelerated)),
            format!(
                "Total interest:        {}",
                self.format_money(accelerated.total_interest_paid)
            ),
        ];
        if accelerated.available_per_month != baseline.available_per_month {
            lines.push(format!(
                "Without extra payment: {}",
                self.format_payoff_time(baseline)
            ));
            lines.push(format!(
                "  interest:            {}",
                self.format_money(baseline.total_interest_paid)
            ));
            lines.push(format!(
                "Interest saved:        {}",
                self.format_money(comparison.interest_saved)
            ));
            lines.push(format!(
                "Time saved:            {}",
                self.format_month_count(comparison.months_saved)
            ));
        }
        lines.extend(accelerated.debt_summaries().into_iter().map(|summary| {
            format!(
                "  {}: {} ({} interest)",
                summary.debt_name,
                match summary.payoff_date {
                    Some(date) => format!("paid off {}", self.format_date(date)),
                    None => "not paid off".to_string(),
                },
                self.format_money(summary.interest_paid)
            )
        }));
        join_lines(lines)
    }

    /// One line per schedule entry.
    pub fn format_schedule(&self, result: &PayoffResult) -> String {
        let mut lines = vec![format!(
            "{:>5}  {:<10}  {:<20}  {:>14}  {:>14}  {:>14}  {:>16}",
            "Month", "Date", "Debt", "Payment", "Principal", "Interest", "Balance"
        )];
        lines.extend(result.schedule.iter().map(|entry| {
            format!(
                "{:>5}  {:<10}  {:<20}  {:>14}  {:>14}  {:>14}  {:>16}",
                entry.month_index + 1,
                self.format_date(entry.calendar_date),
                entry.debt_name,
                self.format_money(entry.payment),
                self.format_money(entry.principal_portion),
                self.format_money(entry.interest_portion),
                self.format_money(entry.remaining_balance)
            )
        }));
        join_lines(lines)
    }

    fn format_payoff_time(&self, result: &PayoffResult) -> String {
        match result.payoff_date() {
            Some(date) => format!(
                "{} (paid off {})",
                self.format_month_count(result.months_to_payoff),
                self.format_date(date)
            ),
            None if result.schedule.is_empty() => "nothing owed".to_string(),
            None => "does not pay off within 100 years".to_string(),
        }
    }

    fn format_currency_custom(&self, amount: Decimal) -> String {
        let currency_format = self.currency_format;
        let abs_amount: Decimal = amount.abs().round_dp_with_strategy(
            currency_format.decimal_digits,
            RoundingStrategy::MidpointAwayFromZero,
        );
        let raw_formatted = format!("{:.*}", currency_format.decimal_digits as usize, abs_amount);
        let mut split_around_decimal = raw_formatted.splitn(2, '.');
        let group_separated_before_decimal =
            self.add_group_separators(split_around_decimal.next().unwrap_or("0"));
        let group_separated = match split_around_decimal.next() {
            Some(after_decimal) => format!(
                "{}{}{}",
                group_separated_before_decimal, currency_format.decimal_separator, after_decimal
            ),
            None => group_separated_before_decimal,
        };
        let group_separated_with_symbol = if currency_format.display_symbol {
            if currency_format.symbol_first {
                format!("{}{}", currency_format.currency_symbol, group_separated)
            } else {
                format!("{}{}", group_separated, currency_format.currency_symbol)
            }
        } else {
            group_separated
        };
        if amount < Decimal::zero() && !abs_amount.is_zero() {
            format!("-{}", group_separated_with_symbol)
        } else {
            group_separated_with_symbol
        }
    }

    fn add_group_separators(&self, before_decimal: &str) -> String {
        before_decimal
            .chars()
            .rev()
            .collect::<Vec<char>>()
            .chunks(3)
            .map(|chunk| chunk.iter().collect())
            .collect::<Vec<String>>()
            .join(&self.currency_format.group_separator)
            .chars()
            .rev()
            .collect()
    }
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debts::*;
    use lazy_static::lazy_static;

    lazy_static! {
        pub static ref US_FORMAT: CurrencyFormat = CurrencyFormat {
            date_format: "MM/DD/YYYY".to_string(),
            ..CurrencyFormat::default()
        };
        pub static ref OTHER_FORMAT: CurrencyFormat = CurrencyFormat {
            currency_symbol: "X".to_string(),
            decimal_digits: 3,
            decimal_separator: ",".to_string(),
            group_separator: ".".to_string(),
            symbol_first: false,
            display_symbol: true,
            date_format: "YYYY-MM-DD".to_string(),
        };
        pub static ref NO_SYMBOL_FORMAT: CurrencyFormat = CurrencyFormat {
            display_symbol: false,
            ..OTHER_FORMAT.clone()
        };
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_format_money() {
        assert_eq!(
            ScheduleFormatter::new(&US_FORMAT).format_money(Money::from_cents(-12_345)),
            "-$123.45"
        );
        assert_eq!(
            ScheduleFormatter::new(&US_FORMAT)
                .format_money(Money::from_decimal(Decimal::new(123_456_789_012_345, 3))),
            "$123,456,789,012.35"
        );
        assert_eq!(
            ScheduleFormatter::new(&US_FORMAT).format_money(Money::from_cents(12)),
            "$0.12"
        );
        assert_eq!(
            ScheduleFormatter::new(&OTHER_FORMAT)
                .format_money(Money::from_decimal(Decimal::new(-12_345_678, 3))),
            "-12.345,678X"
        );
        assert_eq!(
            ScheduleFormatter::new(&NO_SYMBOL_FORMAT)
                .format_money(Money::from_decimal(Decimal::new(-123_456, 3))),
            "-123,456"
        );
        assert_eq!(
            ScheduleFormatter::new(&US_FORMAT)
                .format_money(Money::from_decimal(Decimal::new(-1, 4))),
            "$0.00"
        );
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2011, 4, 27).unwrap();
        assert_eq!(ScheduleFormatter::new(&US_FORMAT).format_date(date), "04/27/2011");
        assert_eq!(ScheduleFormatter::new(&OTHER_FORMAT).format_date(date), "2011-04-27");
    }

    #[test]
    fn test_format_month_count() {
        let formatter = ScheduleFormatter::new(&US_FORMAT);
        assert_eq!(formatter.format_month_count(1), "1 month");
        assert_eq!(formatter.format_month_count(10), "10 months");
        assert_eq!(formatter.format_month_count(12), "1 year");
        assert_eq!(formatter.format_month_count(36), "3 years");
        assert_eq!(formatter.format_month_count(14), "1 year (14 months)");
    }

    #[test]
    fn test_format_summary() {
        let debts = vec![
            Debt::from_f64("A", 1000.0, 0.0, 100.0).unwrap(),
            Debt::from_f64("B", 1000.0, 0.0, 100.0).unwrap(),
        ];
        let policy = PaymentPolicy::from_f64(Strategy::Snowball, 200.0, 50.0).unwrap();
        let summary = ScheduleFormatter::new(&US_FORMAT).format_summary(&compare(
            &debts,
            &policy,
            start(),
        ));
        assert!(summary.contains("Total debt:            $2,000.00"));
        assert!(summary.contains("Monthly payment:       $250.00"));
        assert!(summary.contains("Time to payoff:        9 months (paid off 11/01/2024)"));
        assert!(summary.contains("Without extra payment: 10 months (paid off 12/01/2024)"));
        assert!(summary.contains("Time saved:            1 month"));
        assert!(summary.contains("  A: paid off"));
        assert!(summary.ends_with(")\n"));
        assert_eq!(summary.lines().count(), 10);
    }

    #[test]
    fn test_format_summary_beyond_horizon() {
        let debts = vec![Debt::from_f64("House", 1_000_000.0, 24.0, 0.0).unwrap()];
        let policy = PaymentPolicy::from_f64(Strategy::Avalanche, 0.0, 0.0).unwrap();
        let summary = ScheduleFormatter::new(&US_FORMAT).format_summary(&compare(
            &debts,
            &policy,
            start(),
        ));
        assert!(summary.contains("does not pay off within 100 years"));
        assert!(summary.contains("House: not paid off"));
        assert!(!summary.contains("Interest saved"));
    }

    #[test]
    fn test_format_schedule() {
        let debts = vec![Debt::from_f64("Loan", 200.0, 0.0, 100.0).unwrap()];
        let policy = PaymentPolicy::from_f64(Strategy::Avalanche, 100.0, 0.0).unwrap();
        let result = run_schedule(&debts, &policy, start());
        let lines: Vec<String> = ScheduleFormatter::new(&US_FORMAT)
            .format_schedule(&result)
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("03/01/2024"));
        assert!(lines[1].contains("$100.00"));
        assert!(lines[2].trim_end().ends_with("$0.00"));
    }
}
