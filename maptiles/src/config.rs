//! INI configuration file.
//!
//! Settings live in `~/.maptiles/config.ini`:
//!
//! ```ini
//! [map]
//! tile_source = Mapnik
//! user_agent = my-app/1.0 (me@example.com)
//!
//! [http]
//! timeout = 30
//!
//! [source:Local Tiles]
//! urls = https://a.tiles.example.com/, https://b.tiles.example.com/
//! layout = zxy
//! extension = .png
//! min_zoom = 0
//! max_zoom = 18
//! attribution = Example
//! flags = no_bulk, user_agent_meaningful
//! ```
//!
//! Every `[source:NAME]` section defines an extra tile source that is
//! appended to the default registry in file order. WMS sources use
//! `layout = wms` and the `wms_*` keys.
//!
//! Base URLs in `urls` are separated by whitespace, so a URL may itself
//! contain commas (WMS query strings often do). A comma directly before the
//! whitespace is accepted as a separator too.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::DEFAULT_TILE_SOURCE;
use crate::policy::{PolicyFlags, TileSourcePolicy};
use crate::registry::{RegistryError, TileSourceRegistry};
use crate::source::{TileSource, TileSourceBuilder, UrlLayout, DEFAULT_TILE_SIZE};
use crate::wms::WmsParams;

/// Directory under the home directory holding the config file.
pub const CONFIG_DIR_NAME: &str = ".maptiles";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SOURCE_SECTION_PREFIX: &str = "source:";

/// Errors from loading or interpreting the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("[{section}] missing required key '{key}'")]
    MissingValue { section: String, key: String },

    #[error("[{section}] invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<ini::Error> for ConfigError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(parse) => ConfigError::Parse(parse.to_string()),
        }
    }
}

/// `[map]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSettings {
    /// Name of the source selected on start-up.
    pub tile_source: String,
    /// User agent sent to tile servers.
    pub user_agent: Option<String>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tile_source: DEFAULT_TILE_SOURCE.to_string(),
            user_agent: None,
        }
    }
}

/// `[http]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub map: MapSettings,
    pub http: HttpSettings,
    /// Sources defined by `[source:NAME]` sections, in file order.
    pub custom_sources: Vec<TileSource>,
}

/// Returns the path of the user's config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

impl ConfigFile {
    /// Loads the user's config file. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads a config file from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_ini(&ini)
    }

    /// Parses configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(map) = ini.section(Some("map")) {
            if let Some(name) = non_empty(map.get("tile_source")) {
                config.map.tile_source = name.to_string();
            }
            config.map.user_agent = non_empty(map.get("user_agent")).map(str::to_string);
        }

        if let Some(http) = ini.section(Some("http")) {
            if let Some(value) = non_empty(http.get("timeout")) {
                config.http.timeout_secs = parse_number("http", "timeout", value)?;
            }
        }

        for (section, props) in ini.iter() {
            let Some(section) = section else { continue };
            match section.strip_prefix(SOURCE_SECTION_PREFIX) {
                Some(name) => {
                    let source = SourceSection::new(section, props).build(name.trim())?;
                    config.custom_sources.push(source);
                }
                None if section != "map" && section != "http" => {
                    warn!(section, "Ignoring unknown config section");
                }
                None => {}
            }
        }

        Ok(config)
    }

    /// Saves to the user's config file, creating its directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Saves to `path`, creating its parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_ini().write_to_file(path)?;
        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("map"))
            .set("tile_source", self.map.tile_source.as_str())
            .set("user_agent", self.map.user_agent.as_deref().unwrap_or(""));
        ini.with_section(Some("http"))
            .set("timeout", self.http.timeout_secs.to_string());

        for source in &self.custom_sources {
            let section = format!("{}{}", SOURCE_SECTION_PREFIX, source.name());
            let policy = source.policy();
            ini.with_section(Some(section.as_str()))
                .set("urls", source.base_urls().join(" "))
                .set("layout", source.layout().name())
                .set("extension", source.image_extension())
                .set("min_zoom", source.min_zoom().to_string())
                .set("max_zoom", source.max_zoom().to_string())
                .set("tile_size", source.tile_size().to_string())
                .set("attribution", source.attribution())
                .set("max_downloads", policy.max_concurrent_downloads().to_string())
                .set("flags", policy.flags().names().join(", "));
            if let UrlLayout::Wms(params) = source.layout() {
                ini.with_section(Some(section.as_str()))
                    .set("wms_layers", params.layers.as_str())
                    .set("wms_version", params.version.as_str())
                    .set("wms_time", params.time.as_str())
                    .set("wms_style", params.style.as_str())
                    .set("wms_srs", params.srs.as_str())
                    .set("wms_format", params.format.as_str());
            }
        }
        ini
    }

    /// Default sources followed by the custom ones.
    pub fn build_registry(&self) -> Result<TileSourceRegistry, ConfigError> {
        let mut registry = TileSourceRegistry::with_defaults();
        for source in &self.custom_sources {
            registry.register(source.clone())?;
        }
        Ok(registry)
    }
}

/// View over one `[source:NAME]` section.
struct SourceSection<'a> {
    section: &'a str,
    props: &'a ini::Properties,
}

impl<'a> SourceSection<'a> {
    fn new(section: &'a str, props: &'a ini::Properties) -> Self {
        Self { section, props }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        non_empty(self.props.get(key))
    }

    fn required(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingValue {
            section: self.section.to_string(),
            key: key.to_string(),
        })
    }

    fn number<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(value) => parse_number(self.section, key, value),
            None => Ok(default),
        }
    }

    fn invalid(&self, key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn layout(&self) -> Result<UrlLayout, ConfigError> {
        let value = self.get("layout").unwrap_or("zxy");
        match value.to_lowercase().as_str() {
            "zxy" => Ok(UrlLayout::ZoomColRow),
            "zyx" => Ok(UrlLayout::ZoomRowCol),
            "wms" => {
                let defaults = WmsParams::default();
                let text = |key: &str, default: &str| {
                    self.get(key).unwrap_or(default).to_string()
                };
                Ok(UrlLayout::Wms(WmsParams {
                    layers: self.required("wms_layers")?.to_string(),
                    version: text("wms_version", &defaults.version),
                    time: text("wms_time", &defaults.time),
                    style: text("wms_style", &defaults.style),
                    srs: text("wms_srs", &defaults.srs),
                    format: text("wms_format", &defaults.format),
                }))
            }
            _ => Err(self.invalid("layout", value, "expected zyx, zxy or wms")),
        }
    }

    fn flags(&self) -> Result<PolicyFlags, ConfigError> {
        let Some(value) = self.get("flags") else {
            return Ok(PolicyFlags::NONE);
        };
        value
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(PolicyFlags::NONE, |acc, name| {
                PolicyFlags::from_name(&name.to_lowercase())
                    .map(|flag| acc | flag)
                    .ok_or_else(|| self.invalid("flags", name, "unknown policy flag"))
            })
    }

    fn build(&self, name: &str) -> Result<TileSource, ConfigError> {
        if name.is_empty() {
            return Err(self.invalid("name", name, "source name must not be empty"));
        }

        let urls: Vec<String> = self
            .required("urls")?
            .split_whitespace()
            .map(|url| url.trim_end_matches(','))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            return Err(ConfigError::MissingValue {
                section: self.section.to_string(),
                key: "urls".to_string(),
            });
        }

        let min_zoom: u8 = self.number("min_zoom", 0)?;
        let max_zoom: u8 = self.number("max_zoom", 18)?;
        if min_zoom > max_zoom {
            return Err(self.invalid(
                "min_zoom",
                &min_zoom.to_string(),
                format!("greater than max_zoom {}", max_zoom),
            ));
        }
        let tile_size: u32 = self.number("tile_size", DEFAULT_TILE_SIZE)?;
        if tile_size == 0 {
            return Err(self.invalid("tile_size", "0", "must be positive"));
        }
        let max_downloads: u8 = self.number("max_downloads", 0)?;

        let source = TileSourceBuilder::new(name, urls)
            .zoom_range(min_zoom, max_zoom)
            .tile_size(tile_size)
            .image_extension(self.get("extension").unwrap_or(""))
            .attribution(self.get("attribution").unwrap_or(""))
            .policy(TileSourcePolicy::new(max_downloads, self.flags()?))
            .layout(self.layout()?)
            .build();
        debug!(name, layout = source.layout().name(), "Parsed custom tile source");
        Ok(source)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
