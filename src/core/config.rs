//! Configuration module for `NuPathways`

use crate::core::settings::PlannerSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$NU_PATHWAYS";

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

const fn default_max_terms() -> usize {
    12
}

const fn default_flexible_extra_terms() -> usize {
    2
}

const fn default_standard_terms() -> usize {
    8
}

const fn default_typical_max_credits() -> f32 {
    18.0
}

const fn default_typical_track_credits() -> f32 {
    30.0
}

const fn default_strict_early_goal() -> bool {
    true
}

/// Planning parameters handed to the core as [`PlannerSettings`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Regular-term search horizon
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,
    /// Extra regular terms for flexible goals
    #[serde(default = "default_flexible_extra_terms")]
    pub flexible_extra_terms: usize,
    /// Regular terms in a standard degree
    #[serde(default = "default_standard_terms")]
    pub standard_terms: usize,
    /// Credits above which a term is flagged as overloaded
    #[serde(default = "default_typical_max_credits")]
    pub typical_max_credits: f32,
    /// Track coursework credits above which a plan is flagged
    #[serde(default = "default_typical_track_credits")]
    pub typical_track_credits: f32,
    /// Allow summer sessions for every plan, not only early ones
    #[serde(default)]
    pub allow_summer: bool,
    /// Fail early-goal plans that cannot beat the standard pace
    #[serde(default = "default_strict_early_goal")]
    pub strict_early_goal: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            max_terms: default_max_terms(),
            flexible_extra_terms: default_flexible_extra_terms(),
            standard_terms: default_standard_terms(),
            typical_max_credits: default_typical_max_credits(),
            typical_track_credits: default_typical_track_credits(),
            allow_summer: false,
            strict_early_goal: default_strict_early_goal(),
        }
    }
}

/// Paths configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Catalog used when a command is not given one
    #[serde(default)]
    pub catalog: String,
    /// Directory for JSON plan and report output
    #[serde(default)]
    pub out_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Planning settings
    #[serde(default)]
    pub planning: PlanningConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override the term horizon
    pub max_terms: Option<usize>,
    /// Override summer enablement
    pub allow_summer: Option<bool>,
    /// Override the default catalog
    pub catalog: Option<String>,
    /// Override the output directory
    pub out_dir: Option<String>,
}

impl Config {
    /// Get the `$NU_PATHWAYS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/nupathways`
    /// - macOS: `~/Library/Application Support/nupathways`
    /// - Windows: `%APPDATA%\nupathways`
    #[must_use]
    pub fn get_nupathways_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nupathways")
    }

    /// Fill empty string fields from `defaults`.
    ///
    /// Numeric and boolean planning fields already fall back to their serde
    /// defaults when missing, so only string fields need merging.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let fields = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.catalog, &defaults.paths.catalog),
            (&mut self.paths.out_dir, &defaults.paths.out_dir),
        ];

        let mut changed = false;
        for (value, default) in fields {
            if value.is_empty() && !default.is_empty() {
                value.clone_from(default);
                changed = true;
            }
        }
        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration.
    /// The config file itself is not touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(max_terms) = overrides.max_terms {
            self.planning.max_terms = max_terms;
        }
        if let Some(allow_summer) = overrides.allow_summer {
            self.planning.allow_summer = allow_summer;
        }
        if let Some(catalog) = &overrides.catalog {
            self.paths.catalog.clone_from(catalog);
        }
        if let Some(out_dir) = &overrides.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
    }

    /// Planner settings derived from the `[planning]` section.
    /// Cap tables and severity thresholds keep their built-in values.
    #[must_use]
    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            horizon: self.planning.max_terms,
            flexible_extra_terms: self.planning.flexible_extra_terms,
            standard_terms: self.planning.standard_terms,
            typical_max_credits: self.planning.typical_max_credits,
            typical_track_credits: self.planning.typical_track_credits,
            allow_summer: self.planning.allow_summer,
            strict_early_goal: self.planning.strict_early_goal,
            ..PlannerSettings::default()
        }
    }

    /// Get the user config file path
    ///
    /// Returns the full path to the configuration file:
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds (allows separate debug config)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_nupathways_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$NU_PATHWAYS` in a config value
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_nupathways_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses a TOML configuration string and expands any `$NU_PATHWAYS`
    /// variables in path values. Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = Config::from_toml(r#"
    /// [logging]
    /// level = "info"
    /// file = "$NU_PATHWAYS/app.log"
    /// "#)?;
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.catalog = Self::expand_variables(&config.paths.catalog);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);

        Ok(config)
    }

    /// Load the compiled-in defaults for this build profile.
    /// Falls back to built-in values if the bundled file does not parse.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_default()
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from
    ///   defaults and saves the merged config
    /// - On first run: creates the config directory and saves the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save();
            return defaults;
        }

        match fs::read_to_string(&config_file)
            .ok()
            .and_then(|content| Self::from_toml(&content).ok())
        {
            Some(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            None => defaults,
        }
    }

    /// Save configuration to the platform-specific config file, creating
    /// the config directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, or the file
    /// cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `max_terms`,
    /// `flexible_extra_terms`, `standard_terms`, `typical_max_credits`,
    /// `typical_track_credits`, `allow_summer`, `strict_early_goal`,
    /// `catalog`, `out_dir`.
    /// Dashed spellings (`max-terms`) are accepted too.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match normalize_key(key).as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "max_terms" => self.planning.max_terms.to_string(),
            "flexible_extra_terms" => self.planning.flexible_extra_terms.to_string(),
            "standard_terms" => self.planning.standard_terms.to_string(),
            "typical_max_credits" => self.planning.typical_max_credits.to_string(),
            "typical_track_credits" => self.planning.typical_track_credits.to_string(),
            "allow_summer" => self.planning.allow_summer.to_string(),
            "strict_early_goal" => self.planning.strict_early_goal.to_string(),
            "catalog" => self.paths.catalog.clone(),
            "out_dir" => self.paths.out_dir.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value does not
    /// parse as the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match normalize_key(key).as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_value(key, value)?,
            "max_terms" => self.planning.max_terms = parse_value(key, value)?,
            "flexible_extra_terms" => {
                self.planning.flexible_extra_terms = parse_value(key, value)?;
            }
            "standard_terms" => self.planning.standard_terms = parse_value(key, value)?,
            "typical_max_credits" => {
                self.planning.typical_max_credits = parse_value(key, value)?;
            }
            "typical_track_credits" => {
                self.planning.typical_track_credits = parse_value(key, value)?;
            }
            "allow_summer" => self.planning.allow_summer = parse_value(key, value)?,
            "strict_early_goal" => self.planning.strict_early_goal = parse_value(key, value)?,
            "catalog" => self.paths.catalog = value.to_string(),
            "out_dir" => self.paths.out_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single value to its default. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match normalize_key(key).as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "max_terms" => self.planning.max_terms = defaults.planning.max_terms,
            "flexible_extra_terms" => {
                self.planning.flexible_extra_terms = defaults.planning.flexible_extra_terms;
            }
            "standard_terms" => self.planning.standard_terms = defaults.planning.standard_terms,
            "typical_max_credits" => {
                self.planning.typical_max_credits = defaults.planning.typical_max_credits;
            }
            "typical_track_credits" => {
                self.planning.typical_track_credits = defaults.planning.typical_track_credits;
            }
            "allow_summer" => self.planning.allow_summer = defaults.planning.allow_summer,
            "strict_early_goal" => {
                self.planning.strict_early_goal = defaults.planning.strict_early_goal;
            }
            "catalog" => self.paths.catalog.clone_from(&defaults.paths.catalog),
            "out_dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the config file so the next [`load()`](Config::load) recreates
    /// it from defaults. Succeeds if no file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().replace('-', "_")
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[planning]")?;
        writeln!(f, "  max_terms = {}", self.planning.max_terms)?;
        writeln!(
            f,
            "  flexible_extra_terms = {}",
            self.planning.flexible_extra_terms
        )?;
        writeln!(f, "  standard_terms = {}", self.planning.standard_terms)?;
        writeln!(
            f,
            "  typical_max_credits = {}",
            self.planning.typical_max_credits
        )?;
        writeln!(
            f,
            "  typical_track_credits = {}",
            self.planning.typical_track_credits
        )?;
        writeln!(f, "  allow_summer = {}", self.planning.allow_summer)?;
        writeln!(f, "  strict_early_goal = {}", self.planning.strict_early_goal)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  catalog = \"{}\"", self.paths.catalog)?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;

        Ok(())
    }
}
