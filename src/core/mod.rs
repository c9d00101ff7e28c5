//! Planning core: catalog, requirement resolution, scheduling and analysis

pub mod acceleration;
pub mod advisor;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod error;
pub mod failure;
pub mod models;
pub mod resolver;
pub mod scheduler;
pub mod scoring;
pub mod settings;
pub mod tracks;

pub use advisor::Advisor;
pub use error::{Advisory, PlanningError};
pub use settings::PlannerSettings;
