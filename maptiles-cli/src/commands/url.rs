//! `url` command: print the request URL of one tile.

use maptiles::TileSourceRegistry;
use tracing::debug;

use super::common::{find_source, TileArgs};
use crate::error::CliError;

pub fn run(
    registry: &TileSourceRegistry,
    source_name: &str,
    tile: &TileArgs,
    unchecked: bool,
) -> Result<(), CliError> {
    let url = format_url(registry, source_name, tile, unchecked)?;
    println!("{}", url);
    Ok(())
}

/// Formats the URL of `tile` for the named source.
pub fn format_url(
    registry: &TileSourceRegistry,
    source_name: &str,
    tile: &TileArgs,
    unchecked: bool,
) -> Result<String, CliError> {
    let source = find_source(registry, source_name)?;
    let index = tile.to_index()?;

    let url = if unchecked {
        source.tile_url(&index)
    } else {
        source.checked_tile_url(&index)?
    };
    debug!(source = source.name(), %index, "Formatted tile URL");
    Ok(url)
}
