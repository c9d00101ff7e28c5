//! Immutable catalog snapshots and the shared handle used to swap them

use super::graph::CatalogGraph;
use crate::core::error::PlanningError;
use crate::core::tracks::TrackCatalog;
use crate::info;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// A loaded catalog: course graph plus majors and tracks. Never mutated.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    name: String,
    graph: CatalogGraph,
    tracks: TrackCatalog,
}

impl CatalogSnapshot {
    /// Bundle a graph and track catalog into a snapshot
    #[must_use]
    pub const fn new(name: String, graph: CatalogGraph, tracks: TrackCatalog) -> Self {
        Self {
            name,
            graph,
            tracks,
        }
    }

    /// Catalog name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Course graph
    #[must_use]
    pub const fn graph(&self) -> &CatalogGraph {
        &self.graph
    }

    /// Majors and tracks
    #[must_use]
    pub const fn tracks(&self) -> &TrackCatalog {
        &self.tracks
    }
}

/// Shared reference to the current snapshot.
///
/// Readers clone the inner `Arc` and keep working on it; a refresh builds a
/// complete new snapshot first and only then swaps the reference, so in-flight
/// requests never observe a partially updated catalog.
#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogHandle {
    /// Wrap an initial snapshot
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in effect right now
    #[must_use]
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the current snapshot
    pub fn refresh(&self, snapshot: CatalogSnapshot) {
        let next = Arc::new(snapshot);
        info!("Catalog refreshed to '{}'", next.name());
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Load a catalog file and swap it in. The current snapshot stays
    /// in place if loading fails.
    ///
    /// # Errors
    /// Returns any error of [`super::load_catalog`].
    pub fn reload_from(&self, path: &Path) -> Result<(), PlanningError> {
        let snapshot = super::load_catalog(path)?;
        self.refresh(snapshot);
        Ok(())
    }
}
