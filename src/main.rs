mod cli;
mod commands;
mod config;
mod display;
mod manifest;
mod paths;
mod progress;
mod snapshot;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Schema { type_name } => commands::schema::run(type_name.as_deref()),
        Command::Check { manifest } => commands::check::run(&ctx, &manifest),
        Command::Plan(args) => commands::reconcile::plan(&ctx, args),
        Command::Apply(args) => commands::reconcile::apply(&ctx, args),
        Command::Config(cmd) => commands::config::run(cmd),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rhsmctl", &mut io::stdout());
            Ok(())
        }
    }
}
