//! OGC Web Map Service tile requests.
//!
//! WMS servers do not address tiles by `z/x/y`; each tile is requested as a
//! `GetMap` call for the tile's EPSG:3857 bounding box.
//!
//! # URL Pattern
//!
//! `{base}service=WMS&request=GetMap&version={v}&layers={l}&bbox={minx},{miny},{maxx},{maxy}&crs={srs}&format={f}&transparent=true&styles={s}&width={size}&height={size}`
//!
//! - WMS 1.3.0 and later name the projection parameter `crs`, older versions `srs`
//! - `&time={t}` is appended only when a time is configured
//! - The base URL is expected to end in `?` or `&`

use serde::Serialize;

use crate::tile::TileIndex;

/// Query parameters for a WMS `GetMap` layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WmsParams {
    /// Comma separated layer ids.
    pub layers: String,
    pub version: String,
    /// Optional time dimension; empty means "server default".
    pub time: String,
    pub style: String,
    /// Spatial reference, already URL encoded (e.g. `EPSG%3A3857`).
    pub srs: String,
    /// Image MIME type.
    pub format: String,
}

impl Default for WmsParams {
    fn default() -> Self {
        Self {
            layers: String::new(),
            version: "1.3.0".to_string(),
            time: String::new(),
            style: String::new(),
            srs: "EPSG%3A3857".to_string(),
            format: "image/png".to_string(),
        }
    }
}

impl WmsParams {
    pub fn new(layers: impl Into<String>) -> Self {
        Self {
            layers: layers.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = srs.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Name of the projection query parameter for this protocol version.
    pub fn projection_param(&self) -> &'static str {
        if version_at_least(&self.version, (1, 3)) {
            "crs"
        } else {
            "srs"
        }
    }

    /// Formats the `GetMap` URL for `tile`.
    pub fn tile_url(&self, base_url: &str, tile: &TileIndex, tile_size: u32) -> String {
        let bbox = tile.bounding_box();
        let mut url = format!(
            "{}service=WMS&request=GetMap&version={}&layers={}&bbox={},{},{},{}&{}={}&format={}&transparent=true&styles={}&width={}&height={}",
            base_url,
            self.version,
            self.layers,
            bbox.min_x,
            bbox.min_y,
            bbox.max_x,
            bbox.max_y,
            self.projection_param(),
            self.srs,
            self.format,
            self.style,
            tile_size,
            tile_size,
        );
        if !self.time.is_empty() {
            url.push_str("&time=");
            url.push_str(&self.time);
        }
        url
    }
}

/// Compares the leading `major.minor` of a dotted version string.
fn version_at_least(version: &str, wanted: (u32, u32)) -> bool {
    let mut parts = version
        .trim()
        .split('.')
        .map(|p| p.parse::<u32>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    (major, minor) >= wanted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::WEB_MERCATOR_EXTENT;

    const BASE: &str = "https://wms.example.com/MapServer/WmsServer?";

    #[test]
    fn test_projection_param_by_version() {
        assert_eq!(WmsParams::new("1").projection_param(), "crs");
        assert_eq!(
            WmsParams::new("1").with_version("1.1.1").projection_param(),
            "srs"
        );
        assert_eq!(
            WmsParams::new("1").with_version("2.0").projection_param(),
            "crs"
        );
    }

    #[test]
    fn test_zoom_0_url() {
        let params = WmsParams::new("1");
        let tile = TileIndex::new(0, 0, 0).unwrap();
        let e = WEB_MERCATOR_EXTENT;
        assert_eq!(
            params.tile_url(BASE, &tile, 256),
            format!(
                "https://wms.example.com/MapServer/WmsServer?service=WMS&request=GetMap&version=1.3.0&layers=1\
                 &bbox={},{},{},{}\
                 &crs=EPSG%3A3857&format=image/png&transparent=true&styles=&width=256&height=256",
                -e, -e, e, e
            )
        );
    }

    #[test]
    fn test_zoom_1_bbox() {
        let params = WmsParams::new("1,5,9");
        let tile = TileIndex::new(1, 1, 0).unwrap();
        let url = params.tile_url(BASE, &tile, 512);
        assert!(url.contains("&layers=1,5,9&"));
        assert!(url.contains(&format!(
            "&bbox=0,0,{},{}&",
            WEB_MERCATOR_EXTENT, WEB_MERCATOR_EXTENT
        )));
        assert!(url.ends_with("&width=512&height=512"));
    }

    #[test]
    fn test_time_appended_when_set() {
        let params = WmsParams::new("1").with_time("2024-01-01T00:00:00Z");
        let tile = TileIndex::new(0, 0, 0).unwrap();
        assert!(params
            .tile_url(BASE, &tile, 256)
            .ends_with("&height=256&time=2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_legacy_version_uses_srs() {
        let params = WmsParams::new("0").with_version("1.1.1").with_style("default");
        let tile = TileIndex::new(0, 0, 0).unwrap();
        let url = params.tile_url(BASE, &tile, 256);
        assert!(url.contains("&srs=EPSG%3A3857&"));
        assert!(url.contains("&styles=default&"));
    }
}
