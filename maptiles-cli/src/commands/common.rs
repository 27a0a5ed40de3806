//! Common types and utilities shared across CLI commands.

use clap::Args;
use maptiles::{catalog, ConfigFile, TileIndex, TileSource, TileSourceRegistry};
use tracing::warn;

use crate::error::CliError;

/// Tile address arguments.
#[derive(Debug, Clone, Args)]
pub struct TileArgs {
    /// Zoom level
    pub zoom: u8,
    /// Column (x, west to east)
    pub x: u32,
    /// Row (y, north to south)
    pub y: u32,
}

impl TileArgs {
    pub fn to_index(&self) -> Result<TileIndex, CliError> {
        Ok(TileIndex::new(self.zoom, self.x, self.y)?)
    }
}

/// Loads the config file and builds the registry from it.
///
/// A config file that cannot be read falls back to the defaults so a broken
/// file never hides the built-in sources.
pub fn load_registry() -> (ConfigFile, TileSourceRegistry) {
    let config = match ConfigFile::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable config file");
            ConfigFile::default()
        }
    };
    let registry = registry_from_config(&config);
    (config, registry)
}

/// Default sources followed by the config's custom sources.
///
/// Custom sources that reuse a registered name are skipped with a warning.
pub fn registry_from_config(config: &ConfigFile) -> TileSourceRegistry {
    let mut registry = TileSourceRegistry::with_defaults();
    for source in &config.custom_sources {
        if let Err(e) = registry.register(source.clone()) {
            warn!(error = %e, "Skipping custom tile source");
        }
    }
    registry
}

/// Finds `name` in the registry, then among every built-in source.
///
/// Overlays and WMS layers are not part of the default registry but can
/// still be addressed by name from the command line.
pub fn find_source(registry: &TileSourceRegistry, name: &str) -> Result<TileSource, CliError> {
    match registry.get(name) {
        Ok(source) => Ok(source.clone()),
        Err(e) => catalog::find(name).ok_or_else(|| e.into()),
    }
}

/// Picks the source name from the CLI argument or the configured default.
pub fn resolve_source_name(cli_name: Option<String>, config: &ConfigFile) -> String {
    cli_name.unwrap_or_else(|| config.map.tile_source.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_args_validation() {
        let ok = TileArgs { zoom: 2, x: 3, y: 1 };
        assert_eq!(ok.to_index().unwrap(), TileIndex::new(2, 3, 1).unwrap());

        let bad = TileArgs { zoom: 2, x: 4, y: 1 };
        assert!(matches!(bad.to_index(), Err(CliError::Tile(_))));
    }

    #[test]
    fn test_resolve_source_name_prefers_cli() {
        let config = ConfigFile::default();
        assert_eq!(
            resolve_source_name(Some("OpenTopoMap".to_string()), &config),
            "OpenTopoMap"
        );
        assert_eq!(resolve_source_name(None, &config), "Mapnik");
    }

    #[test]
    fn test_duplicate_custom_source_is_skipped() {
        let config = ConfigFile::parse(
            "[source:Mapnik]\nurls = https://x/\n\n[source:Extra]\nurls = https://extra/\n",
        )
        .unwrap();
        let registry = registry_from_config(&config);
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.get("Mapnik").unwrap().base_urls()[0],
            "https://a.tile.openstreetmap.org/"
        );
        assert_eq!(registry.position("Extra"), Some(5));
    }

    #[test]
    fn test_find_source_falls_back_to_catalog() {
        let registry = TileSourceRegistry::with_defaults();
        assert_eq!(find_source(&registry, "Mapnik").unwrap().name(), "Mapnik");
        assert_eq!(
            find_source(&registry, "OpenSeaMap").unwrap().min_zoom(),
            3
        );

        let err = find_source(&registry, "Nowhere").unwrap_err();
        assert_eq!(err.to_string(), "No such tile source: Nowhere");
    }
}
