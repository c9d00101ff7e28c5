//! Command-line interface entry point for `NuPathways`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use nu_pathways::config::Config;
use nu_pathways::info;
use nu_pathways::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::from_name(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
            Ok(())
        }
        Command::Plan {
            profile,
            catalog,
            choices,
            output,
        } => commands::plan::run(&profile, catalog.as_deref(), &choices, &output, &config),
        Command::Chain {
            course,
            catalog,
            output,
        } => commands::analyze::chain(&course, catalog.as_deref(), &output, &config),
        Command::Blocked {
            course,
            catalog,
            output,
        } => commands::analyze::blocked(&course, catalog.as_deref(), &output, &config),
        Command::Failure {
            profile,
            course,
            term,
            catalog,
            output,
        } => commands::analyze::failure(
            &profile,
            &course,
            term,
            catalog.as_deref(),
            &output,
            &config,
        ),
        Command::Accelerate {
            profile,
            catalog,
            output,
        } => commands::analyze::accelerate(&profile, catalog.as_deref(), &output, &config),
    };

    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
