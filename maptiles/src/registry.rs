//! Name-to-source lookup.
//!
//! [`TileSourceRegistry`] holds an ordered list of tile sources. The order is
//! part of the contract: map style pickers refer to sources by position, so
//! the default list must not be reordered.
//!
//! # Example
//!
//! ```
//! use maptiles::registry::TileSourceRegistry;
//!
//! let registry = TileSourceRegistry::with_defaults();
//! let source = registry.get("OpenTopoMap").unwrap();
//! assert_eq!(source.max_zoom(), 17);
//! assert!(registry.get("Nope").is_err());
//! ```

use thiserror::Error;
use tracing::debug;

use crate::catalog;
use crate::source::TileSource;

/// Errors raised by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No registered source has this name.
    #[error("No such tile source: {0}")]
    NotFound(String),

    /// A source with this name is already registered.
    #[error("Tile source already registered: {0}")]
    DuplicateName(String),
}

/// Ordered collection of tile sources with unique names.
#[derive(Debug, Clone, Default)]
pub struct TileSourceRegistry {
    sources: Vec<TileSource>,
}

impl TileSourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the default sources in display order.
    pub fn with_defaults() -> Self {
        Self {
            sources: catalog::default_sources(),
        }
    }

    /// Builds a registry from `sources`, rejecting duplicate names.
    pub fn from_sources(
        sources: impl IntoIterator<Item = TileSource>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for source in sources {
            registry.register(source)?;
        }
        Ok(registry)
    }

    /// Appends a source to the end of the list.
    pub fn register(&mut self, source: TileSource) -> Result<(), RegistryError> {
        if self.contains(source.name()) {
            return Err(RegistryError::DuplicateName(source.name().to_string()));
        }
        debug!(
            name = source.name(),
            position = self.sources.len(),
            "Registered tile source"
        );
        self.sources.push(source);
        Ok(())
    }

    /// Returns the source named exactly `name`.
    pub fn get(&self, name: &str) -> Result<&TileSource, RegistryError> {
        self.sources
            .iter()
            .find(|source| source.name() == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Returns the source at `index` in display order.
    pub fn get_by_index(&self, index: usize) -> Option<&TileSource> {
        self.sources.get(index)
    }

    /// Display position of the source named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|source| source.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The configured fallback source, if it is registered.
    pub fn default_source(&self) -> Result<&TileSource, RegistryError> {
        self.get(catalog::DEFAULT_TILE_SOURCE)
    }

    /// Registered names in display order.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(TileSource::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<'a> IntoIterator for &'a TileSourceRegistry {
    type Item = &'a TileSource;
    type IntoIter = std::slice::Iter<'a, TileSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}
