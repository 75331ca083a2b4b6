use std::process::ExitCode;

use donation_hub::cli::{output, run_cli};

fn main() -> ExitCode {
    donation_hub::init();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::FAILURE
        }
    }
}
