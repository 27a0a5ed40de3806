//! `fetch` command: download one tile to a file.

use std::path::Path;

use maptiles::policy::DEFAULT_USER_AGENT;
use maptiles::{ConfigFile, ReqwestClient, TileFetcher, TileSourceRegistry};
use tracing::info;

use super::common::{find_source, TileArgs};
use crate::error::CliError;

pub fn run(
    config: &ConfigFile,
    registry: &TileSourceRegistry,
    source_name: &str,
    tile: &TileArgs,
    output: &Path,
    user_agent: Option<String>,
) -> Result<(), CliError> {
    let source = find_source(registry, source_name)?;
    let index = tile.to_index()?;

    let user_agent = user_agent
        .or_else(|| config.map.user_agent.clone())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    let client = ReqwestClient::with_timeout(config.http.timeout_secs)?;
    let fetcher = TileFetcher::new(client).with_user_agent(user_agent);
    let bytes = fetcher.fetch(&source, &index)?;

    std::fs::write(output, &bytes).map_err(|e| CliError::Write {
        path: output.to_path_buf(),
        source: e,
    })?;

    info!(source = source.name(), %index, bytes = bytes.len(), "Tile saved");
    println!(
        "Saved {} tile {} ({} bytes) to {}",
        source.name(),
        index,
        bytes.len(),
        output.display()
    );
    Ok(())
}
