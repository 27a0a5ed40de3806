//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use maptiles::{ConfigError, FetchError, HttpError, RegistryError, SourceError, TileError};

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or saved.
    Config(String),

    /// Tile source lookup failed.
    Registry(RegistryError),

    /// Tile address was invalid.
    Tile(TileError),

    /// Tile is outside what the source serves.
    Source(SourceError),

    /// Download failed.
    Fetch(FetchError),

    /// Output file could not be written.
    Write { path: PathBuf, source: std::io::Error },

    /// JSON serialization failed.
    Serialize(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Registry(e) => write!(f, "{}", e),
            CliError::Tile(e) => write!(f, "Invalid tile: {}", e),
            CliError::Source(e) => write!(f, "{}", e),
            CliError::Fetch(e) => write!(f, "Download failed: {}", e),
            CliError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            CliError::Serialize(msg) => write!(f, "Failed to serialize output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Registry(e) => Some(e),
            CliError::Tile(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::Write { source, .. } => Some(source),
            CliError::Config(_) | CliError::Serialize(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Registry(registry) => CliError::Registry(registry),
            other => CliError::Config(other.to_string()),
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        CliError::Registry(e)
    }
}

impl From<TileError> for CliError {
    fn from(e: TileError) -> Self {
        CliError::Tile(e)
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Source(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::Fetch(FetchError::Http(e))
    }
}
