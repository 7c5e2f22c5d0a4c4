#![warn(clippy::all)]

#[macro_use]
extern crate error_chain;

mod cli;
mod constants;
pub mod debts;
pub mod payoff_scheduler;
pub mod schedule_formatter;
pub mod types;
mod utilities;

pub mod errors {
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
            Json(::serde_json::Error);
        }

        errors {
            InvalidDebtInput(name: String, reason: String) {
                description("invalid debt input")
                display("Invalid debt '{}': {}", name, reason)
            }
            InvalidPolicyInput(reason: String) {
                description("invalid payment policy input")
                display("Invalid payment policy: {}", reason)
            }
        }
    }
}

pub use cli::run;
pub use debts::{Debt, PaymentPolicy, Strategy};
pub use payoff_scheduler::{compare, run_schedule, PayoffComparison, PayoffResult, ScheduleEntry};
