use std::process::ExitCode;

use clap::Parser;
use prodline::cli::{self, Cli};
use prodline_core::{init_detailed_simulation_logging, init_simulation_logging_with_level};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.detailed_logs {
        init_detailed_simulation_logging();
    } else {
        init_simulation_logging_with_level(&cli.log_level);
    }

    match cli::run(&cli) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("prodline: {e}");
            ExitCode::FAILURE
        }
    }
}
