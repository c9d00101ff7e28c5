//! CLI argument definitions for `NuPathways`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use nu_pathways::config::ConfigOverrides;
use nu_pathways::core::models::TermIndex;
use nu_pathways::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `max_terms`, `catalog`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Options shared by commands that print structured results
#[derive(Debug, Clone, clap::Args)]
pub struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON result to the configured `out_dir`
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Build a multi-semester plan for a student profile.
    ///
    /// Stops with the list of open choice groups when a track or elective
    /// selection is missing; pass them back with `--choose`.
    Plan {
        /// Student profile (TOML)
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Catalog snapshot (TOML); defaults to config `catalog`
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Choice selection as GROUP=OPTION[,OPTION...] (repeatable)
        #[arg(long = "choose", value_name = "GROUP=OPTIONS")]
        choices: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List every transitive prerequisite of a course, deepest first.
    Chain {
        /// Course code
        #[arg(value_name = "COURSE")]
        course: String,

        /// Catalog snapshot (TOML); defaults to config `catalog`
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List every course that cannot be taken without a course.
    Blocked {
        /// Course code
        #[arg(value_name = "COURSE")]
        course: String,

        /// Catalog snapshot (TOML); defaults to config `catalog`
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analyze the impact of failing a course.
    Failure {
        /// Student profile (TOML)
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Failed course code
        #[arg(value_name = "COURSE")]
        course: String,

        /// Term of the failure as SEASON:YEAR (default: the profile's current term)
        #[arg(long, value_name = "SEASON:YEAR")]
        term: Option<TermIndex>,

        /// Catalog snapshot (TOML); defaults to config `catalog`
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rank summer sessions that would shorten the timeline.
    Accelerate {
        /// Student profile (TOML)
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Catalog snapshot (TOML); defaults to config `catalog`
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "nupathways",
    about = "NuPathways degree planning command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the regular-term search horizon
    #[arg(long = "max-terms", value_name = "TERMS")]
    pub max_terms: Option<usize>,

    /// Allow summer sessions in every plan (true/false)
    #[arg(long = "allow-summer", value_parser = BoolishValueParser::new())]
    pub allow_summer: Option<bool>,

    /// Override config output directory
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides. `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            max_terms: self.max_terms,
            allow_summer: self.allow_summer,
            catalog: None,
            out_dir: self
                .out_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
