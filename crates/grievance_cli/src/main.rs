//! grievance-tracker entry point.
//!
//! Loads the config file (written with defaults on first run), sets up
//! file logging, runs one subcommand against the archive and prints its
//! result and notice.

mod cli;
mod render;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use grievance_core::{init_logging, AppConfig, ArchiveService, Notice, ServiceError};
use log::warn;
use std::io::{self, Write};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .map_err(|err| CliError::Config(err.to_string()))?;

    if let Err(err) = init_logging(config.effective_log_level(), &config.log_path()) {
        // Logging is optional; the archive still works without it.
        eprintln!("{} logging disabled: {err}", "Warning:".yellow().bold());
    }

    if let Commands::Delete { filename, yes } = &cli.command {
        let prompt = format!("Delete '{filename}' and its stored document?");
        if !yes && !cli.quiet && !confirm(&prompt)? {
            println!("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let mut service = ArchiveService::open(&config)?;
    let command = cli.command.into_command();
    let action = command.name();

    match service.dispatch(command) {
        Ok(response) => {
            render::response(&response, cli.quiet);
            if !cli.quiet {
                if let Some(notice) = Notice::for_response(&response) {
                    render::notice(&notice);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(
                "event=command module=cli status=error action={} error={}",
                action, err
            );
            render::notice(&Notice::for_error(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/n]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
