use error_chain::ChainedError;

fn main() {
    if let Err(err) = debt_payoff::run() {
        eprintln!("{}", err.display_chain());
        std::process::exit(1);
    }
}
