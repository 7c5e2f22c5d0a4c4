use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use std::env;
use std::ffi::OsStr;
use std::str::FromStr;

use crate::errors::*;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn parse_iso_date(iso_date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(iso_date, ISO_DATE_FORMAT)
        .chain_err(|| format!("Invalid ISO date string (YYYY-MM-DD): {}", iso_date))
}

pub fn parse_decimal(value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim()).chain_err(|| format!("Invalid number: {}", value))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .expect("every month should have a first day")
}

/// First day of the month `months` after `start`'s month, saturating at
/// the largest representable date.
pub fn month_start_after(start: NaiveDate, months: u32) -> NaiveDate {
    first_of_month(start)
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

pub fn default_env<V: AsRef<OsStr>>(var_name: &str, default_value: V) {
    if let Err(env::VarError::NotPresent) = env::var(var_name) {
        env::set_var(var_name, default_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_iso_date() {
        let date = parse_iso_date("2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(format_iso_date(date), "2024-02-29");
        assert!(parse_iso_date("2023-02-29").is_err());
        assert!(parse_iso_date("02/03/2024").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert!(parse_decimal("NaN").is_err());
        assert!(parse_decimal("twelve").is_err());
    }

    #[test]
    fn test_month_start_after() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            month_start_after(start, 0),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            month_start_after(start, 1),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(
            month_start_after(start, 23),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
        assert_eq!(month_start_after(NaiveDate::MAX, 1), NaiveDate::MAX);
    }
}
