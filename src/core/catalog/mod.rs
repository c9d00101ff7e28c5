//! Course catalog: graph construction, TOML loading and shared snapshots

pub mod graph;
pub mod loader;
pub mod snapshot;

pub use graph::{CatalogBuilder, CatalogGraph};
pub use loader::{load_catalog, load_profile, parse_catalog_str, parse_profile_str};
pub use snapshot::{CatalogHandle, CatalogSnapshot};
