//! `dataview` CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use dataview_cli::logging::{LogConfig, init_logging};
use dataview_config::load_settings;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_properties, run_render, run_validate_form};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = match load_settings(&cli.config) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };
    let exit_code = match &cli.command {
        Command::Properties(args) => match run_properties(args, &settings) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Render(args) => match run_render(args, &settings) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::ValidateForm(args) => match run_validate_form(args, &settings) {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// `--log-level` beats `-v/-q`; either one pins the level over `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let config = LogConfig::default()
        .with_format(cli.log_format.into())
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone());
    match cli.log_level {
        Some(level) => config.with_explicit_level(level.into()),
        None if cli.verbosity.is_present() => {
            config.with_explicit_level(cli.verbosity.tracing_level_filter())
        }
        None => config.with_level_filter(cli.verbosity.tracing_level_filter()),
    }
}
