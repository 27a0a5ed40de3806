//! Tile addressing.
//!
//! A [`TileIndex`] is the `(zoom, x, y)` address of one tile in the Web
//! Mercator tile pyramid:
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level (0 to 29)
//!
//! Rendering libraries usually pass tiles around as a single packed `u64`;
//! [`TileIndex::pack`] and [`TileIndex::unpack`] convert between the two forms.

use std::fmt;

use thiserror::Error;

/// Highest zoom level that fits in a packed index.
pub const MAX_ZOOM: u8 = 29;

/// Half the width of the EPSG:3857 world, in metres.
pub const WEB_MERCATOR_EXTENT: f64 = 20_037_508.342_789_244;

const COORD_BITS: u32 = MAX_ZOOM as u32;
const COORD_MASK: u64 = (1 << COORD_BITS) - 1;
const ZOOM_SHIFT: u32 = COORD_BITS * 2;

/// Errors produced when building or decoding a tile index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Zoom level beyond [`MAX_ZOOM`].
    #[error("Invalid zoom level: {0} (max: {MAX_ZOOM})")]
    InvalidZoom(u8),

    /// Column or row does not exist at the given zoom.
    #[error("Tile {x}/{y} is out of range at zoom {zoom}")]
    OutOfRange { zoom: u8, x: u32, y: u32 },

    /// Packed value carries bits outside the zoom/x/y fields.
    #[error("Malformed packed tile index: {0:#x}")]
    MalformedIndex(u64),
}

/// The address of a single map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

/// A rectangle in EPSG:3857 metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl TileIndex {
    /// Creates a validated tile index.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, TileError> {
        if zoom > MAX_ZOOM {
            return Err(TileError::InvalidZoom(zoom));
        }
        let tiles = tiles_at_zoom(zoom);
        if u64::from(x) >= tiles || u64::from(y) >= tiles {
            return Err(TileError::OutOfRange { zoom, x, y });
        }
        Ok(Self { zoom, x, y })
    }

    /// Returns true if the column and row exist at this zoom.
    pub fn is_valid(&self) -> bool {
        Self::new(self.zoom, self.x, self.y).is_ok()
    }

    /// Packs the index as `zoom << 58 | x << 29 | y`.
    pub fn pack(&self) -> u64 {
        (u64::from(self.zoom) << ZOOM_SHIFT)
            | (u64::from(self.x) << COORD_BITS)
            | u64::from(self.y)
    }

    /// Decodes a packed index produced by [`TileIndex::pack`].
    pub fn unpack(packed: u64) -> Result<Self, TileError> {
        let zoom = packed >> ZOOM_SHIFT;
        if zoom > u64::from(MAX_ZOOM) {
            return Err(TileError::MalformedIndex(packed));
        }
        let x = ((packed >> COORD_BITS) & COORD_MASK) as u32;
        let y = (packed & COORD_MASK) as u32;
        Self::new(zoom as u8, x, y)
    }

    /// Web Mercator bounds of this tile.
    pub fn bounding_box(&self) -> BoundingBox {
        let size = 2.0 * WEB_MERCATOR_EXTENT / tiles_at_zoom(self.zoom) as f64;
        let min_x = -WEB_MERCATOR_EXTENT + f64::from(self.x) * size;
        let max_y = WEB_MERCATOR_EXTENT - f64::from(self.y) * size;
        BoundingBox {
            min_x,
            min_y: max_y - size,
            max_x: min_x + size,
            max_y,
        }
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Number of tiles along one axis at `zoom`.
#[inline]
pub fn tiles_at_zoom(zoom: u8) -> u64 {
    1u64 << zoom
}
