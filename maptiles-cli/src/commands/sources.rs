//! `list` and `show` commands.

use console::style;
use maptiles::{catalog, TileSource, TileSourceRegistry, UrlLayout};

use super::common::find_source;
use crate::error::CliError;

/// Sources to list with their registry position.
///
/// With `all`, built-in sources outside the registry follow the registered
/// ones without a position.
pub fn listed_sources(registry: &TileSourceRegistry, all: bool) -> Vec<(Option<usize>, TileSource)> {
    let mut listed: Vec<_> = registry
        .iter()
        .enumerate()
        .map(|(index, source)| (Some(index), source.clone()))
        .collect();
    if all {
        listed.extend(
            catalog::all_sources()
                .into_iter()
                .filter(|source| !registry.contains(source.name()))
                .map(|source| (None, source)),
        );
    }
    listed
}

/// Prints the registered sources in display order.
pub fn run_list(
    registry: &TileSourceRegistry,
    selected: &str,
    all: bool,
    json: bool,
) -> Result<(), CliError> {
    let listed = listed_sources(registry, all);

    if json {
        let summaries: Vec<_> = listed.iter().map(|(_, source)| source.summary()).collect();
        let text = serde_json::to_string_pretty(&summaries)
            .map_err(|e| CliError::Serialize(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Tile Sources");
    println!("============");
    println!();

    for (position, source) in &listed {
        let marker = if source.name() == selected { "*" } else { " " };
        let position = position.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{} {:>2}  {:<28} zoom {:>2}-{:<2}  {}",
            marker,
            position,
            style(source.name()).bold(),
            source.min_zoom(),
            source.max_zoom(),
            source.layout().name()
        );
    }

    Ok(())
}

/// Prints the full description of one source.
pub fn run_show(registry: &TileSourceRegistry, name: &str) -> Result<(), CliError> {
    let source = find_source(registry, name)?;
    let policy = source.policy();

    println!("{}", style(source.name()).bold());
    match registry.position(name) {
        Some(position) => println!("  Position:     {}", position),
        None => println!("  Position:     built-in, not registered"),
    }
    println!("  Zoom range:   {}-{}", source.min_zoom(), source.max_zoom());
    println!("  Tile size:    {}px", source.tile_size());
    println!("  Layout:       {}", source.layout().name());
    if !source.image_extension().is_empty() {
        println!("  Extension:    {}", source.image_extension());
    }
    for url in source.base_urls() {
        println!("  Base URL:     {}", url);
    }
    if let UrlLayout::Wms(params) = source.layout() {
        println!("  WMS layers:   {}", params.layers);
        println!("  WMS version:  {}", params.version);
        println!("  WMS format:   {}", params.format);
    }
    if !source.attribution().is_empty() {
        println!("  Attribution:  {}", source.attribution());
    }
    let connections = match policy.max_concurrent_downloads() {
        0 => "unlimited".to_string(),
        n => n.to_string(),
    };
    println!("  Connections:  {}", connections);
    println!("  Policy:       {}", policy.flags());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_sources_default() {
        let registry = TileSourceRegistry::with_defaults();
        let listed = listed_sources(&registry, false);
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0].0, Some(0));
        assert_eq!(listed[4].1.name(), "ESRI World Overview");
    }

    #[test]
    fn test_listed_sources_all_appends_catalog() {
        let registry = TileSourceRegistry::with_defaults();
        let listed = listed_sources(&registry, true);
        assert_eq!(listed.len(), catalog::all_sources().len());
        assert_eq!(listed[5], (None, catalog::open_seamap()));
        assert!(listed
            .iter()
            .any(|(position, source)| position.is_none()
                && source.name() == catalog::NOAA_SATELLITE_RADAR_WMS));
    }

    #[test]
    fn test_listed_sources_all_skips_registered_overlay() {
        let mut registry = TileSourceRegistry::with_defaults();
        registry.register(catalog::open_seamap()).unwrap();
        let listed = listed_sources(&registry, true);
        assert_eq!(listed.len(), catalog::all_sources().len());
        assert_eq!(listed[5], (Some(5), catalog::open_seamap()));
    }

    #[test]
    fn test_show_registered_and_catalog_sources() {
        let registry = TileSourceRegistry::with_defaults();
        assert!(run_show(&registry, "Mapnik").is_ok());
        assert!(run_show(&registry, "Recent Weather Radar").is_ok());
    }

    #[test]
    fn test_show_unknown_source() {
        let registry = TileSourceRegistry::with_defaults();
        let err = run_show(&registry, "mapnik").unwrap_err();
        assert_eq!(err.to_string(), "No such tile source: mapnik");
    }

    #[test]
    fn test_list_runs() {
        let registry = TileSourceRegistry::with_defaults();
        assert!(run_list(&registry, "Mapnik", true, false).is_ok());
        assert!(run_list(&registry, "Mapnik", false, true).is_ok());
    }
}
