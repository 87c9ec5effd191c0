//! CLI argument definitions for the run design builder.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use fmri_cli::config::SeparatorChoice;

#[derive(Parser)]
#[command(
    name = "fmri-designer",
    version,
    about = "Build first-level fMRI run designs from events and confound tables",
    long_about = "Build first-level fMRI run designs from events and confound tables.\n\n\
                  Produces the per-run design record (conditions, onsets, durations,\n\
                  amplitudes, nuisance regressors) as JSON and writes the motion\n\
                  parameter file next to it. Supports standard and LSS designs."
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

    /// TOML file with design options.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Field separator of the input tables (default: detect per file).
    #[arg(long = "separator", value_enum, global = true)]
    pub separator: Option<SeparatorChoice>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the condition column and final condition names of an events file.
    Conditions(ConditionsArgs),

    /// Build the standard design of one run.
    Design(DesignArgs),

    /// Build LSS designs isolating single trials.
    Lss(LssArgs),
}

#[derive(Args)]
pub struct ConditionsArgs {
    /// Events file (tab- or comma-separated).
    #[arg(long = "events", value_name = "FILE")]
    pub events: PathBuf,
}

/// Run inputs and design option overrides shared by the builders.
#[derive(Args)]
pub struct RunArgs {
    /// JSON bundle with `bold`, `events`, `regressors` and optional
    /// `mask`, `repetition_time`, `trial_ID`.
    #[arg(
        long = "inputs",
        value_name = "FILE",
        conflicts_with_all = ["scan", "events", "regressors"]
    )]
    pub inputs: Option<PathBuf>,

    /// Preprocessed BOLD image recorded as the design's scans.
    #[arg(long = "scan", value_name = "PATH", required_unless_present = "inputs")]
    pub scan: Option<PathBuf>,

    /// Events file (tab- or comma-separated).
    #[arg(long = "events", value_name = "FILE", required_unless_present = "inputs")]
    pub events: Option<PathBuf>,

    /// Confounds file (tab- or comma-separated).
    #[arg(
        long = "regressors",
        value_name = "FILE",
        required_unless_present = "inputs"
    )]
    pub regressors: Option<PathBuf>,

    /// BIDS JSON sidecar of the BOLD image, read for `RepetitionTime`.
    #[arg(long = "sidecar", value_name = "FILE")]
    pub sidecar: Option<PathBuf>,

    /// Write the design JSON to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Decimal places for onsets, durations and amplitudes.
    #[arg(long = "decimals", value_name = "N")]
    pub decimals: Option<u32>,

    /// Amplitude for events without one.
    #[arg(long = "amplitude", value_name = "VALUE")]
    pub amplitude: Option<f64>,

    /// Nuisance regressor to include (repeatable; default: all non-motion columns).
    #[arg(long = "regressor", value_name = "NAME")]
    pub regressors_wanted: Vec<String>,

    /// Motion parameter column (repeatable; default: trans/rot x/y/z).
    #[arg(long = "motion-column", value_name = "NAME")]
    pub motion_columns: Vec<String>,

    /// Where to write the motion parameter file.
    #[arg(long = "motion-file", value_name = "PATH")]
    pub motion_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct DesignArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args)]
pub struct LssArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Trial to isolate (defaults to the `trial_ID` of the inputs bundle).
    #[arg(long = "trial-id", value_name = "ID", conflicts_with = "all")]
    pub trial_id: Option<i64>,

    /// Build one design per distinct trial ID.
    #[arg(long = "all")]
    pub all: bool,
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
