//! Tile source descriptions.
//!
//! A [`TileSource`] is pure metadata about one imagery provider: where its
//! tiles live, which zoom levels it serves, how it must be credited, and the
//! usage policy of its servers. Formatting a tile URL is the only behaviour.
//!
//! # URL Layouts
//!
//! - [`UrlLayout::ZoomRowCol`]: `{base}{z}/{y}/{x}{ext}` (ArcGIS MapServer tiles)
//! - [`UrlLayout::ZoomColRow`]: `{base}{z}/{x}/{y}{ext}` (OSM slippy map tiles)
//! - [`UrlLayout::Wms`]: a WMS `GetMap` request, see [`crate::wms`]

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::policy::TileSourcePolicy;
use crate::tile::{TileError, TileIndex};
use crate::wms::WmsParams;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Errors from checked URL formatting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Zoom level outside the source's range.
    #[error("{source_name} does not serve zoom {zoom} (range {min}-{max})")]
    UnsupportedZoom {
        source_name: String,
        zoom: u8,
        min: u8,
        max: u8,
    },

    /// Tile address is not valid at its zoom.
    #[error(transparent)]
    InvalidTile(#[from] TileError),
}

/// How tile addresses map onto a request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlLayout {
    ZoomRowCol,
    ZoomColRow,
    Wms(WmsParams),
}

impl UrlLayout {
    /// Short configuration name of the layout.
    pub fn name(&self) -> &'static str {
        match self {
            UrlLayout::ZoomRowCol => "zyx",
            UrlLayout::ZoomColRow => "zxy",
            UrlLayout::Wms(_) => "wms",
        }
    }
}

/// Metadata describing a map tile provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileSource {
    name: String,
    min_zoom: u8,
    max_zoom: u8,
    tile_size: u32,
    image_extension: String,
    base_urls: Vec<String>,
    attribution: String,
    policy: TileSourcePolicy,
    layout: UrlLayout,
}

impl TileSource {
    /// Starts a builder for a source with the given name and base URLs.
    pub fn builder(name: impl Into<String>, base_urls: &[&str]) -> TileSourceBuilder {
        TileSourceBuilder::new(name, base_urls.iter().map(|u| u.to_string()).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn image_extension(&self) -> &str {
        &self.image_extension
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn policy(&self) -> &TileSourcePolicy {
        &self.policy
    }

    pub fn layout(&self) -> &UrlLayout {
        &self.layout
    }

    /// Returns true if `zoom` lies within the source's range.
    pub fn supports_zoom(&self, zoom: u8) -> bool {
        (self.min_zoom..=self.max_zoom).contains(&zoom)
    }

    /// Base URL used for `tile`.
    ///
    /// Sources with several mirrors spread tiles across them by `(x + y) mod n`
    /// so the same tile always hits the same mirror.
    pub fn base_url_for(&self, tile: &TileIndex) -> &str {
        match self.base_urls.len() {
            0 => "",
            1 => &self.base_urls[0],
            n => {
                let slot = (u64::from(tile.x) + u64::from(tile.y)) % n as u64;
                &self.base_urls[slot as usize]
            }
        }
    }

    /// Formats the request URL for `tile`.
    ///
    /// No validation is performed; see [`TileSource::checked_tile_url`].
    pub fn tile_url(&self, tile: &TileIndex) -> String {
        let base = self.base_url_for(tile);
        match &self.layout {
            UrlLayout::ZoomRowCol => format!(
                "{}{}/{}/{}{}",
                base, tile.zoom, tile.y, tile.x, self.image_extension
            ),
            UrlLayout::ZoomColRow => format!(
                "{}{}/{}/{}{}",
                base, tile.zoom, tile.x, tile.y, self.image_extension
            ),
            UrlLayout::Wms(params) => params.tile_url(base, tile, self.tile_size),
        }
    }

    /// Formats the request URL after validating the tile against this source.
    pub fn checked_tile_url(&self, tile: &TileIndex) -> Result<String, SourceError> {
        if !self.supports_zoom(tile.zoom) {
            return Err(SourceError::UnsupportedZoom {
                source_name: self.name.clone(),
                zoom: tile.zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        TileIndex::new(tile.zoom, tile.x, tile.y)?;
        Ok(self.tile_url(tile))
    }

    /// Serializable summary for listings.
    pub fn summary(&self) -> TileSourceSummary {
        TileSourceSummary {
            name: self.name.clone(),
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            tile_size: self.tile_size,
            layout: self.layout.name(),
            image_extension: self.image_extension.clone(),
            base_urls: self.base_urls.clone(),
            wms: match &self.layout {
                UrlLayout::Wms(params) => Some(params.clone()),
                _ => None,
            },
            attribution: self.attribution.clone(),
            max_concurrent_downloads: self.policy.max_concurrent_downloads(),
            policy_flags: self.policy.flags().names(),
        }
    }
}

impl fmt::Display for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (zoom {}-{}, {})",
            self.name,
            self.min_zoom,
            self.max_zoom,
            self.layout.name()
        )
    }
}

/// Flat view of a tile source used for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct TileSourceSummary {
    pub name: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_size: u32,
    pub layout: &'static str,
    pub image_extension: String,
    pub base_urls: Vec<String>,
    /// `GetMap` parameters, present only for WMS sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wms: Option<WmsParams>,
    pub attribution: String,
    pub max_concurrent_downloads: u8,
    pub policy_flags: Vec<&'static str>,
}

/// Builder for [`TileSource`].
#[derive(Debug, Clone)]
pub struct TileSourceBuilder {
    source: TileSource,
}

impl TileSourceBuilder {
    pub fn new(name: impl Into<String>, base_urls: Vec<String>) -> Self {
        Self {
            source: TileSource {
                name: name.into(),
                min_zoom: 0,
                max_zoom: 18,
                tile_size: DEFAULT_TILE_SIZE,
                image_extension: String::new(),
                base_urls,
                attribution: String::new(),
                policy: TileSourcePolicy::default(),
                layout: UrlLayout::ZoomColRow,
            },
        }
    }

    /// Sets the zoom range. Bounds are swapped if given in reverse.
    pub fn zoom_range(mut self, min: u8, max: u8) -> Self {
        self.source.min_zoom = min.min(max);
        self.source.max_zoom = min.max(max);
        self
    }

    pub fn tile_size(mut self, size: u32) -> Self {
        self.source.tile_size = size;
        self
    }

    pub fn image_extension(mut self, ext: impl Into<String>) -> Self {
        self.source.image_extension = ext.into();
        self
    }

    pub fn attribution(mut self, text: impl Into<String>) -> Self {
        self.source.attribution = text.into();
        self
    }

    pub fn policy(mut self, policy: TileSourcePolicy) -> Self {
        self.source.policy = policy;
        self
    }

    pub fn layout(mut self, layout: UrlLayout) -> Self {
        self.source.layout = layout;
        self
    }

    pub fn build(self) -> TileSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyFlags;

    fn arcgis() -> TileSource {
        TileSource::builder(
            "Imagery",
            &["https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/"],
        )
        .zoom_range(0, 18)
        .image_extension(".jpg")
        .layout(UrlLayout::ZoomRowCol)
        .build()
    }

    fn mirrored() -> TileSource {
        TileSource::builder(
            "Mirrored",
            &["https://a.example.com/", "https://b.example.com/", "https://c.example.com/"],
        )
        .image_extension(".png")
        .build()
    }

    #[test]
    fn test_zoom_row_col_url() {
        let tile = TileIndex::new(15, 200, 100).unwrap();
        assert_eq!(
            arcgis().tile_url(&tile),
            "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/15/100/200.jpg"
        );
    }

    #[test]
    fn test_zoom_col_row_url() {
        let tile = TileIndex::new(3, 5, 2).unwrap();
        let source = TileSource::builder("Osm", &["https://tile.example.org/"])
            .image_extension(".png")
            .build();
        assert_eq!(source.tile_url(&tile), "https://tile.example.org/3/5/2.png");
    }

    #[test]
    fn test_empty_extension() {
        let source = TileSource::builder("Bare", &["https://host/tile/"])
            .layout(UrlLayout::ZoomRowCol)
            .build();
        let tile = TileIndex::new(0, 0, 0).unwrap();
        assert_eq!(source.tile_url(&tile), "https://host/tile/0/0/0");
    }

    #[test]
    fn test_mirror_selection_is_deterministic() {
        let source = mirrored();
        let t0 = TileIndex::new(4, 0, 0).unwrap();
        let t1 = TileIndex::new(4, 1, 0).unwrap();
        let t2 = TileIndex::new(4, 1, 1).unwrap();
        let t3 = TileIndex::new(4, 2, 1).unwrap();
        assert_eq!(source.base_url_for(&t0), "https://a.example.com/");
        assert_eq!(source.base_url_for(&t1), "https://b.example.com/");
        assert_eq!(source.base_url_for(&t2), "https://c.example.com/");
        assert_eq!(source.base_url_for(&t3), "https://a.example.com/");
        assert_eq!(source.tile_url(&t2), "https://c.example.com/4/1/1.png");
    }

    #[test]
    fn test_supports_zoom() {
        let source = TileSource::builder("Sea", &["https://x/"])
            .zoom_range(3, 18)
            .build();
        assert!(!source.supports_zoom(2));
        assert!(source.supports_zoom(3));
        assert!(source.supports_zoom(18));
        assert!(!source.supports_zoom(19));
    }

    #[test]
    fn test_zoom_range_swapped() {
        let source = TileSource::builder("Rev", &["https://x/"])
            .zoom_range(12, 4)
            .build();
        assert_eq!(source.min_zoom(), 4);
        assert_eq!(source.max_zoom(), 12);
    }

    #[test]
    fn test_checked_tile_url_rejects_zoom() {
        let tile = TileIndex::new(19, 0, 0).unwrap();
        match arcgis().checked_tile_url(&tile) {
            Err(SourceError::UnsupportedZoom { zoom, max, .. }) => {
                assert_eq!(zoom, 19);
                assert_eq!(max, 18);
            }
            other => panic!("Expected UnsupportedZoom, got {:?}", other),
        }
    }

    #[test]
    fn test_checked_tile_url_rejects_unvalidated_tile() {
        let tile = TileIndex { zoom: 2, x: 9, y: 0 };
        assert!(matches!(
            arcgis().checked_tile_url(&tile),
            Err(SourceError::InvalidTile(TileError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_summary_and_display() {
        let source = TileSource::builder("Esri", &["https://h/"])
            .zoom_range(0, 18)
            .layout(UrlLayout::ZoomRowCol)
            .policy(TileSourcePolicy::new(4, PolicyFlags::NO_BULK))
            .build();
        let summary = source.summary();
        assert_eq!(summary.layout, "zyx");
        assert_eq!(summary.max_concurrent_downloads, 4);
        assert_eq!(summary.policy_flags, vec!["no_bulk"]);
        assert_eq!(source.to_string(), "Esri (zoom 0-18, zyx)");
    }

    #[test]
    fn test_summary_json_carries_url_parts() {
        let slippy = TileSource::builder("Slippy", &["https://a/"])
            .image_extension(".png")
            .build();
        let json = serde_json::to_value(slippy.summary()).unwrap();
        assert_eq!(json["image_extension"], ".png");
        assert_eq!(json["layout"], "zxy");
        assert!(json.get("wms").is_none());

        let wms = TileSource::builder("Radar", &["https://wms/?"])
            .layout(UrlLayout::Wms(WmsParams::new("1,5").with_version("1.1.1")))
            .build();
        let json = serde_json::to_value(wms.summary()).unwrap();
        assert_eq!(json["wms"]["layers"], "1,5");
        assert_eq!(json["wms"]["version"], "1.1.1");
        assert_eq!(json["wms"]["srs"], "EPSG%3A3857");
        assert_eq!(json["image_extension"], "");
    }
}
