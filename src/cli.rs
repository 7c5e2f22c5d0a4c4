use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, Write};

use crate::constants::*;
use crate::debts::*;
use crate::errors::*;
use crate::payoff_scheduler::*;
use crate::schedule_formatter::*;
use crate::types::*;
use crate::utilities::*;

pub fn run() -> Result<()> {
    initialize();
    run_clap_matches(get_clap_matches())
}

fn initialize() {
    dotenv::dotenv().ok();
    env_logger::init();

    default_env(STRATEGY_ENV, DEFAULT_STRATEGY);
    default_env(CURRENCY_SYMBOL_ENV, DEFAULT_CURRENCY_SYMBOL);
    default_env(DATE_FORMAT_ENV, DEFAULT_DATE_FORMAT);
}

fn get_clap_matches() -> clap::ArgMatches<'static> {
    clap::App::new(clap::crate_name!())
        .version(option_env!("CI_BUILD_VERSION").unwrap_or(clap::crate_version!()))
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .arg(
            clap::Arg::with_name(DEBT_ARG)
                .long(DEBT_ARG)
                .short("d")
                .value_name("NAME:BALANCE:RATE:MIN")
                .help("A debt to pay off, with its annual rate in percent (may be repeated)")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|value| {
                    parse_debt_spec(&value)
                        .map(|_| ())
                        .map_err(|err| err.to_string())
                }),
        )
        .arg(
            clap::Arg::with_name(DEBTS_FILE_ARG)
                .env(DEBTS_FILE_ENV)
                .long(DEBTS_FILE_ARG)
                .value_name("PATH")
                .help("JSON file with an array of {name, balance, annualRate, minPayment} debts")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(BUDGET_ARG)
                .long(BUDGET_ARG)
                .short("b")
                .value_name("AMOUNT")
                .help("Total amount available for debt payments each month")
                .takes_value(true)
                .required(true)
                .validator(validate_amount),
        )
        .arg(
            clap::Arg::with_name(EXTRA_ARG)
                .long(EXTRA_ARG)
                .short("e")
                .value_name("AMOUNT")
                .help("Extra amount paid each month on top of the budget, compared against paying without it")
                .takes_value(true)
                .default_value("0")
                .validator(validate_amount),
        )
        .arg(
            clap::Arg::with_name(STRATEGY_ARG)
                .env(STRATEGY_ENV)
                .long(STRATEGY_ARG)
                .short("s")
                .value_name("STRATEGY")
                .help("Which debt gets any money left over after minimum payments: highest rate first (avalanche) or lowest balance first (snowball)")
                .takes_value(true)
                .possible_values(&POSSIBLE_STRATEGY_VALUES),
        )
        .arg(
            clap::Arg::with_name(START_DATE_ARG)
                .long(START_DATE_ARG)
                .value_name("YYYY-MM-DD")
                .help("Month of the first payment.  Defaults to the current month.")
                .takes_value(true)
                .validator(|value| {
                    parse_iso_date(&value)
                        .map(|_| ())
                        .map_err(|err| err.to_string())
                }),
        )
        .arg(
            clap::Arg::with_name(SCHEDULE_ARG)
                .long(SCHEDULE_ARG)
                .help("Print the full month-by-month payment schedule"),
        )
        .arg(
            clap::Arg::with_name(JSON_ARG)
                .long(JSON_ARG)
                .help("Print the result as JSON instead of text"),
        )
        .arg(
            clap::Arg::with_name(CURRENCY_SYMBOL_ARG)
                .env(CURRENCY_SYMBOL_ENV)
                .long(CURRENCY_SYMBOL_ARG)
                .value_name("SYMBOL")
                .help("Currency symbol shown before amounts")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(DATE_FORMAT_ARG)
                .env(DATE_FORMAT_ENV)
                .long(DATE_FORMAT_ARG)
                .value_name("PATTERN")
                .help("Date pattern using YYYY, MM and DD")
                .takes_value(true),
        )
        .get_matches()
}

fn validate_amount(value: String) -> std::result::Result<(), String> {
    let amount = parse_decimal(&value).map_err(|err| err.to_string())?;
    if amount.is_sign_negative() && !amount.is_zero() {
        Err(format!("Amount may not be negative: {}", value))
    } else if !Money::from_decimal(amount).is_within_limit() {
        Err(format!("Amount may not exceed {}: {}", Money::limit(), value))
    } else {
        Ok(())
    }
}

fn run_clap_matches(matches: clap::ArgMatches) -> Result<()> {
    let debts = load_debts(&matches)?;
    let strategy: Strategy = matches
        .value_of(STRATEGY_ARG)
        .expect("CLAP matches should have STRATEGY_ARG")
        .parse()?;
    let policy = PaymentPolicy::new(
        strategy,
        parse_amount(&matches, BUDGET_ARG)?,
        parse_amount(&matches, EXTRA_ARG)?,
    )?;
    let start_date = matches
        .value_of(START_DATE_ARG)
        .map(parse_iso_date)
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let currency_format = CurrencyFormat {
        currency_symbol: matches
            .value_of(CURRENCY_SYMBOL_ARG)
            .expect("CLAP matches should have CURRENCY_SYMBOL_ARG")
            .to_string(),
        date_format: matches
            .value_of(DATE_FORMAT_ARG)
            .expect("CLAP matches should have DATE_FORMAT_ARG")
            .to_string(),
        ..CurrencyFormat::default()
    };
    debug!("Debts: {:#?}", &debts);
    debug!("Payment policy: {:?}", &policy);
    debug!("Start date: {}", format_iso_date(start_date));

    let min_payments = total_min_payment(&debts);
    if policy.monthly_budget() < min_payments {
        warn!(
            "Monthly budget {} is below the sum of minimum payments {}",
            policy.monthly_budget(),
            min_payments
        );
    }

    let comparison = compare(&debts, &policy, start_date);

    if matches.is_present(JSON_ARG) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &comparison)?;
        writeln!(out)?;
        return Ok(());
    }

    let formatter = ScheduleFormatter::new(&currency_format);
    println!(
        "Paying off {} debts using the {} strategy, starting {}...",
        debts.len(),
        policy.strategy(),
        formatter.format_date(first_of_month(start_date))
    );
    print!("{}", formatter.format_summary(&comparison));
    let overspent_months = comparison.accelerated.overspent_months();
    if let Some(first) = overspent_months.first() {
        println!(
            "Warning: minimum payments exceed the monthly budget in {} month(s), by {} in {}",
            overspent_months.len(),
            formatter.format_money(first.overspend),
            formatter.format_date(first.calendar_date)
        );
    }
    if comparison.accelerated.exceeds_horizon() {
        println!(
            "Warning: {} is still owed after {} months",
            formatter.format_money(comparison.accelerated.unpaid_balance),
            MAX_MONTHS
        );
    }
    if matches.is_present(SCHEDULE_ARG) {
        println!();
        print!("{}", formatter.format_schedule(&comparison.accelerated));
    }
    Ok(())
}

fn load_debts(matches: &clap::ArgMatches) -> Result<Vec<Debt>> {
    let mut debts = Vec::new();
    if let Some(path) = matches.value_of(DEBTS_FILE_ARG) {
        let file = File::open(path).chain_err(|| format!("Failed to open debts file: {}", path))?;
        debts.extend(
            load_debts_json(BufReader::new(file))
                .chain_err(|| format!("Failed to read debts file: {}", path))?,
        );
    }
    if let Some(specs) = matches.values_of(DEBT_ARG) {
        for spec in specs {
            debts.push(parse_debt_spec(spec)?);
        }
    }
    ensure!(
        !debts.is_empty(),
        format!("No debts given; use --{} or --{}", DEBT_ARG, DEBTS_FILE_ARG)
    );
    Ok(debts)
}

fn parse_amount(matches: &clap::ArgMatches, arg: &str) -> Result<Money> {
    let value = matches
        .value_of(arg)
        .chain_err(|| format!("Missing --{}", arg))?;
    Ok(Money::from_decimal(parse_decimal(value).chain_err(|| {
        ErrorKind::InvalidPolicyInput(format!("bad --{}: {}", arg, value))
    })?))
}
