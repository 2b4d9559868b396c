mod cli;
mod config;
mod error;
mod feed;
mod logging;
mod open;
mod paths;
mod report;
mod theme;
mod tui;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if let Err(err) = logging::init(cli.log_level.as_deref()) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    let command = match cli.command {
        Some(command) => command,
        None => {
            let is_tty = io::stdin().is_terminal() && io::stdout().is_terminal();
            if is_tty {
                cli::Commands::Watch
            } else {
                cli::Commands::Status { json: false }
            }
        }
    };

    cli::run_command(command, &cli.settings)
}
