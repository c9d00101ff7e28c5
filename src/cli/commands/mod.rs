//! CLI command handlers for `NuPathways`.
//!
//! Each command is implemented in its own submodule; handlers return a
//! `✗`-prefixed message on failure and `main` prints it.

pub mod analyze;
pub mod config;
pub mod plan;

use crate::args::OutputArgs;
use nu_pathways::config::Config;
use nu_pathways::core::catalog::{load_catalog, load_profile};
use nu_pathways::core::models::StudentProfile;
use nu_pathways::core::Advisor;
use nu_pathways::{error, verbose};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the catalog (argument first, then config `catalog`) into an advisor
pub fn load_advisor(catalog: Option<&Path>, config: &Config) -> Result<Advisor, String> {
    let path = match catalog {
        Some(path) => path.to_path_buf(),
        None if !config.paths.catalog.is_empty() => PathBuf::from(&config.paths.catalog),
        None => {
            return Err(
                "✗ No catalog given; pass --catalog or run `nupathways config set catalog <FILE>`"
                    .to_string(),
            )
        }
    };

    let snapshot = load_catalog(&path).map_err(|e| {
        error!("Failed to load catalog {}: {e}", path.display());
        format!("✗ Failed to load {}: {e}", path.display())
    })?;
    verbose!(
        "✓ Catalog '{}' loaded with {} courses",
        snapshot.name(),
        snapshot.graph().course_count()
    );
    Ok(Advisor::new(snapshot, config.planner_settings()))
}

/// Read a student profile
pub fn read_profile(path: &Path) -> Result<StudentProfile, String> {
    load_profile(path).map_err(|e| format!("✗ Failed to load {}: {e}", path.display()))
}

/// Print `value` as text or JSON, and save the JSON when asked
pub fn emit<T: Serialize>(
    value: &T,
    text: impl FnOnce() -> String,
    name: &str,
    output: &OutputArgs,
    config: &Config,
) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("✗ Failed to serialize result: {e}"))?;

    if output.json {
        println!("{json}");
    } else {
        print!("{}", text());
    }

    if output.save {
        let path = save_json(&json, name, config)?;
        println!("✓ Saved {}", path.display());
    }
    Ok(())
}

fn save_json(json: &str, name: &str, config: &Config) -> Result<PathBuf, String> {
    let dir = PathBuf::from(&config.paths.out_dir);
    fs::create_dir_all(&dir)
        .map_err(|e| format!("✗ Failed to create output directory {}: {e}", dir.display()))?;
    let path = dir.join(format!("{name}.json"));
    fs::write(&path, json).map_err(|e| format!("✗ Failed to write {}: {e}", path.display()))?;
    Ok(path)
}
