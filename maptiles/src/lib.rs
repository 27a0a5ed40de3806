//! MapTiles - map tile source registry
//!
//! Declares the tile servers a map view can draw from (URL layout, zoom
//! range, attribution, usage policy) and looks them up by name.
//!
//! ```
//! use maptiles::{TileIndex, TileSourceRegistry};
//!
//! let registry = TileSourceRegistry::with_defaults();
//! let esri = registry.get("ESRI World Overview").unwrap();
//! let tile = TileIndex::new(3, 4, 2).unwrap();
//! assert_eq!(
//!     esri.tile_url(&tile),
//!     "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/3/2/4.jpg"
//! );
//! ```

pub mod catalog;
pub mod config;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod policy;
pub mod registry;
pub mod source;
pub mod tile;
pub mod wms;

pub use config::{ConfigError, ConfigFile};
pub use fetch::{FetchError, TileFetcher};
pub use http::{HttpClient, HttpError, ReqwestClient};
pub use policy::{PolicyFlags, TileSourcePolicy};
pub use registry::{RegistryError, TileSourceRegistry};
pub use source::{SourceError, TileSource, UrlLayout};
pub use tile::{TileError, TileIndex};
pub use wms::WmsParams;

#[cfg(test)]
pub use http::tests::MockHttpClient;
