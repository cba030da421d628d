//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dataview_cli::logging::LogFormat;
use dataview_cli::report::{FormKind, parse_field};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "dataview",
    version,
    about = "Inspect report view configuration, run report filters and validate login forms",
    long_about = "Inspect how a report view is configured for a request.\n\n\
                  Shows display properties after query-string overrides, runs the\n\
                  filter pipeline over report rows and validates login form submissions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (TOML). Defaults apply when it does not exist.
    #[arg(
        long = "config",
        value_name = "PATH",
        default_value = "dataview.toml",
        global = true
    )]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the display properties of a report view.
    Properties(PropertiesArgs),

    /// Run a view's filters over report rows and print the result.
    Render(RenderArgs),

    /// Validate a login form submission.
    ValidateForm(ValidateFormArgs),
}

#[derive(Parser)]
pub struct PropertiesArgs {
    /// Report as `Module.action`, e.g. `Referrers.getKeywords`.
    #[arg(value_name = "REPORT_ID")]
    pub report_id: String,

    /// Query string of the request, e.g. `show_goals=1&filter_limit=10`.
    #[arg(long = "query", default_value = "")]
    pub query: String,

    /// JSON file of report metadata keyed by `Module.action`.
    #[arg(long = "metadata", value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Only print properties exposed to browser code.
    #[arg(long = "client-side")]
    pub client_side: bool,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// JSON file with `rows` and an optional `filters` list.
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Report as `Module.action`.
    #[arg(value_name = "REPORT_ID")]
    pub report_id: String,

    /// Query string of the request.
    #[arg(long = "query", default_value = "")]
    pub query: String,
}

#[derive(Parser)]
pub struct ValidateFormArgs {
    #[arg(value_name = "FORM", value_enum)]
    pub form: FormKind,

    /// Submitted value as `name=value`. Repeat for each field.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Seconds between rendering the form and submitting it.
    #[arg(long = "submit-after", value_name = "SECS", default_value_t = 0)]
    pub submit_after: i64,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
