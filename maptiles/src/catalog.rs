//! Built-in tile source catalog.
//!
//! Every provider the application knows about, as constructors returning a
//! fresh [`TileSource`]. Only some of them are part of the default registry
//! (see [`crate::registry::TileSourceRegistry::with_defaults`]); the rest are
//! overlays and experimental layers a caller may register explicitly.
//!
//! # Terms of Use
//!
//! Public servers listed here have their own usage policies; the
//! [`TileSourcePolicy`] attached to each source encodes them. See
//! <https://operations.osmfoundation.org/policies/tiles/> and
//! <https://www.esri.com/en-us/legal/terms/full-master-agreement>.

use crate::policy::{PolicyFlags, TileSourcePolicy};
use crate::source::{TileSource, UrlLayout};
use crate::wms::WmsParams;

pub const MAPNIK: &str = "Mapnik";
pub const USGS_TOPO: &str = "USGS National Map Topo";
pub const OPEN_TOPO: &str = "OpenTopoMap";
pub const USGS_SAT: &str = "USGS National Map Sat";
pub const ESRI_IMAGERY: &str = "ESRI World Overview";
pub const OPEN_SEAMAP: &str = "OpenSeaMap";
pub const NOAA_RADAR: &str = "NOAA GOES Radar";
pub const USGS_HYDRO_CACHE: &str = "USGS Hydro Cache";
pub const USGS_SHADED_RELIEF: &str = "USGS Shaded Relief Only";
pub const NOAA_RADAR_WMS: &str = "Recent Weather Radar";
pub const NOAA_SATELLITE_RADAR_WMS: &str = "Weather Satellite Imagery";

/// Name of the source used when nothing else is configured.
pub const DEFAULT_TILE_SOURCE: &str = MAPNIK;

const USGS_ATTRIBUTION: &str = "USGS";

const NOAA_GOES_CITATION: &str = "Dataset Citation: GOES-R Calibration Working Group and GOES-R Series Program, (2017): NOAA GOES-R Series Advanced Baseline Imager (ABI) Level 1b Radiances Band 13. NOAA National Centers for Environmental Information. doi:10.7289/V5BV7DSR";

fn strict_flags() -> PolicyFlags {
    PolicyFlags::NO_BULK
        | PolicyFlags::NO_PREVENTIVE
        | PolicyFlags::USER_AGENT_MEANINGFUL
        | PolicyFlags::USER_AGENT_NORMALIZED
}

fn no_preventive_flags() -> PolicyFlags {
    PolicyFlags::NO_PREVENTIVE
        | PolicyFlags::USER_AGENT_MEANINGFUL
        | PolicyFlags::USER_AGENT_NORMALIZED
}

/// ArcGIS MapServer tile cache: `{base}{z}/{y}/{x}`, 256px, zoom 0-18.
fn map_server(
    name: &str,
    base_url: &str,
    attribution: &str,
    policy: TileSourcePolicy,
) -> TileSource {
    TileSource::builder(name, &[base_url])
        .zoom_range(0, 18)
        .layout(UrlLayout::ZoomRowCol)
        .attribution(attribution)
        .policy(policy)
        .build()
}

/// OpenStreetMap standard tiles.
pub fn mapnik() -> TileSource {
    TileSource::builder(
        MAPNIK,
        &[
            "https://a.tile.openstreetmap.org/",
            "https://b.tile.openstreetmap.org/",
            "https://c.tile.openstreetmap.org/",
        ],
    )
    .zoom_range(0, 19)
    .image_extension(".png")
    .attribution("© OpenStreetMap contributors")
    .policy(TileSourcePolicy::new(2, strict_flags()))
    .build()
}

/// USGS National Map topographic basemap (US coverage).
pub fn usgs_topo() -> TileSource {
    map_server(
        USGS_TOPO,
        "https://basemap.nationalmap.gov/arcgis/rest/services/USGSTopo/MapServer/tile/",
        USGS_ATTRIBUTION,
        TileSourcePolicy::default(),
    )
}

/// OpenTopoMap topographic rendering of OSM and SRTM data.
pub fn open_topo() -> TileSource {
    TileSource::builder(
        OPEN_TOPO,
        &[
            "https://a.tile.opentopomap.org/",
            "https://b.tile.opentopomap.org/",
            "https://c.tile.opentopomap.org/",
        ],
    )
    .zoom_range(0, 17)
    .image_extension(".png")
    .attribution(
        "Kartendaten: © OpenStreetMap-Mitwirkende, SRTM | Kartendarstellung: © OpenTopoMap (CC-BY-SA)",
    )
    .build()
}

/// USGS National Map imagery with topo overlay (US coverage).
pub fn usgs_sat() -> TileSource {
    map_server(
        USGS_SAT,
        "https://basemap.nationalmap.gov/arcgis/rest/services/USGSImageryTopo/MapServer/tile/",
        USGS_ATTRIBUTION,
        TileSourcePolicy::default(),
    )
}

/// Esri World Imagery.
pub fn esri_imagery() -> TileSource {
    TileSource::builder(
        ESRI_IMAGERY,
        &["https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/"],
    )
    .zoom_range(0, 18)
    .image_extension(".jpg")
    .layout(UrlLayout::ZoomRowCol)
    .attribution("Esri, Maxar, Earthstar Geographics, and the GIS User Community")
    .policy(TileSourcePolicy::new(4, strict_flags()))
    .build()
}

/// OpenSeaMap seamark overlay.
pub fn open_seamap() -> TileSource {
    TileSource::builder(OPEN_SEAMAP, &["https://tiles.openseamap.org/seamark/"])
        .zoom_range(3, 18)
        .image_extension(".png")
        .attribution("OpenSeaMap")
        .build()
}

/// GOES satellite infrared overlay with a transparent background.
pub fn noaa_radar() -> TileSource {
    map_server(
        NOAA_RADAR,
        "https://earthlive.maptiles.arcgis.com/arcgis/rest/services/GOES/GOES31C/MapServer/tile/",
        NOAA_GOES_CITATION,
        TileSourcePolicy::new(2, strict_flags()),
    )
}

/// USGS hydrography overlay.
pub fn usgs_hydro_cache() -> TileSource {
    map_server(
        USGS_HYDRO_CACHE,
        "https://basemap.nationalmap.gov/arcgis/rest/services/USGSHydroCached/MapServer/tile/",
        USGS_ATTRIBUTION,
        TileSourcePolicy::new(2, no_preventive_flags()),
    )
}

/// USGS shaded relief without labels.
pub fn usgs_shaded_relief() -> TileSource {
    map_server(
        USGS_SHADED_RELIEF,
        "https://basemap.nationalmap.gov/arcgis/rest/services/USGSShadedReliefOnly/MapServer/tile/",
        USGS_ATTRIBUTION,
        TileSourcePolicy::new(2, no_preventive_flags()),
    )
}

fn nowcoast_wms(name: &str, base_url: &str, layers: &str) -> TileSource {
    TileSource::builder(name, &[base_url])
        .zoom_range(0, 18)
        .layout(UrlLayout::Wms(WmsParams::new(layers)))
        .build()
}

/// NEXRAD weather radar from NOAA nowCOAST.
pub fn noaa_radar_wms() -> TileSource {
    nowcoast_wms(
        NOAA_RADAR_WMS,
        "https://new.nowcoast.noaa.gov/arcgis/services/nowcoast/radar_meteo_imagery_nexrad_time/MapServer/WmsServer?",
        "1",
    )
}

/// Weather satellite imagery from NOAA nowCOAST.
pub fn noaa_satellite_radar_wms() -> TileSource {
    nowcoast_wms(
        NOAA_SATELLITE_RADAR_WMS,
        "https://new.nowcoast.noaa.gov/arcgis/services/nowcoast/sat_meteo_imagery_time/MapServer/WmsServer?",
        "1,5,9,13,17,21,25",
    )
}

/// Sources shown by default, in display order.
pub fn default_sources() -> Vec<TileSource> {
    vec![mapnik(), usgs_topo(), open_topo(), usgs_sat(), esri_imagery()]
}

/// Every built-in source.
pub fn all_sources() -> Vec<TileSource> {
    let mut sources = default_sources();
    sources.extend([
        open_seamap(),
        noaa_radar(),
        usgs_hydro_cache(),
        usgs_shaded_relief(),
        noaa_radar_wms(),
        noaa_satellite_radar_wms(),
    ]);
    sources
}

/// Looks up a built-in source by exact name, including those outside the
/// default list.
pub fn find(name: &str) -> Option<TileSource> {
    all_sources().into_iter().find(|source| source.name() == name)
}
