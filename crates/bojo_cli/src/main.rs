//! `bojo` executable entry point.
//!
//! # Responsibility
//! - Resolve settings, start logging and open the journal database.
//! - Map command outcomes to process exit codes.

mod cli;
mod commands;
mod prompt;
mod render;
mod when;

use bojo_core::{
    init_logging, open_db, JournalError, JournalService, Settings, SqliteDisplayStore,
    SqliteItemStore,
};
use clap::Parser;
use cli::Cli;
use commands::{CliError, Options};
use std::io::IsTerminal;
use std::process::ExitCode;
use when::LocalTimeResolver;
use yansi::Paint;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.no_color || !std::io::stdout().is_terminal() {
        Paint::disable();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Aborted) => {
            println!("Aborted");
            ExitCode::from(CliError::Aborted.exit_code())
        }
        Err(err) => {
            log::error!("event=cli_failed module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::from_env().map_err(JournalError::from)?;
    run_with(&settings, cli)
}

fn run_with(settings: &Settings, cli: Cli) -> Result<(), CliError> {
    if let Err(err) = init_logging(settings.log_level, &settings.log_dir()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(&settings.root).map_err(JournalError::from)?;
    let items = SqliteItemStore::try_new(&conn).map_err(JournalError::from)?;
    let service = JournalService::new(items, SqliteDisplayStore::new(&conn), LocalTimeResolver);

    let options = Options {
        by_id: cli.id,
        verbose: cli.verbose || settings.verbose,
        default_count: settings.num_items,
    };
    commands::run(&service, cli.command, options)
}
