//! Shared library for `NuPathways`
//! Degree progression planning used by the CLI and embedding services

pub mod core;
pub mod logger;

pub use crate::core::config;

/// Returns the current version of the `NuPathways` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
