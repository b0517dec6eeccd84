//! Tile partitioning.
//!
//! Cuts a padded square canvas into the quadtree of tiles for a zoom range.
//!
//! At zoom `z` the canvas is split into a `2^z × 2^z` grid of square regions
//! of `side / 2^z` pixels. Each region is cropped and resampled to
//! `tile_size × tile_size`. Because the canvas side is a multiple of the
//! largest factor in the range, the regions at any level cover the canvas
//! exactly, with no gaps or overlaps.
//!
//! ```text
//!   zoom 0          zoom 1              zoom 2
//! ┌────────┐     ┌────┬────┐     ┌──┬──┬──┬──┐
//! │        │     │0,0 │1,0 │     │  │  │  │  │
//! │  0,0   │     ├────┼────┤     ├──┼──┼──┼──┤
//! │        │     │0,1 │1,1 │     │  │  │  │  │   (col,row)
//! └────────┘     └────┴────┘     └──┴──┴──┴──┘
//! ```

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::TileError;

use super::codec::ImageCodec;
use super::coord::{tiles_per_side, TileCoord, TileCoords, ZoomRange};

/// Edge length of an output tile in pixels.
pub const TILE_SIZE: u32 = 256;

// =============================================================================
// Level Layout
// =============================================================================

/// Grid geometry for one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelLayout {
    /// Zoom level
    pub zoom: u8,
    /// Tiles along each side (`2^zoom`)
    pub tiles_per_side: u32,
    /// Edge of each source region on the canvas
    pub tile_length: u32,
}

impl LevelLayout {
    /// Total tiles at this level.
    pub fn tile_count(&self) -> u64 {
        u64::from(self.tiles_per_side).pow(2)
    }

    /// Canvas region that feeds the tile at `(col, row)`.
    pub fn region(&self, col: u32, row: u32) -> CropRegion {
        CropRegion {
            x: col * self.tile_length,
            y: row * self.tile_length,
            size: self.tile_length,
        }
    }
}

/// Square area of the canvas, top-left corner plus edge length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

// =============================================================================
// Tile
// =============================================================================

/// One output tile and its position in the pyramid.
#[derive(Debug, Clone)]
pub struct Tile<I> {
    pub coord: TileCoord,
    pub image: I,
}

// =============================================================================
// Tile Partitioner
// =============================================================================

/// Splits a padded canvas into tiles for every level of a [`ZoomRange`].
///
/// Construction checks the canvas geometry up front; after that, [`tiles`]
/// can be called any number of times and yields the same sequence each time.
///
/// # Example
///
/// ```ignore
/// use image_tiler::tile::{prepare_canvas, RasterCodec, TilePartitioner, ZoomRange, TILE_SIZE};
///
/// let codec = RasterCodec::new();
/// let zooms = ZoomRange::new(0, 2)?;
/// let canvas = prepare_canvas(&codec, &source, zooms.max(), Default::default())?;
///
/// let partitioner = TilePartitioner::new(&codec, &canvas, zooms, TILE_SIZE)?;
/// for tile in partitioner.tiles() {
///     println!("{} -> {}x{}", tile.coord, tile.image.width(), tile.image.height());
/// }
/// ```
///
/// [`tiles`]: TilePartitioner::tiles
pub struct TilePartitioner<'a, C: ImageCodec> {
    codec: &'a C,
    canvas: &'a C::Image,
    side: u32,
    zooms: ZoomRange,
    tile_size: u32,
}

impl<'a, C: ImageCodec> TilePartitioner<'a, C> {
    /// Create a partitioner over `canvas`.
    ///
    /// # Errors
    ///
    /// - [`TileError::NonSquareCanvas`] if width and height differ
    /// - [`TileError::EmptyImage`] if the canvas has no pixels
    /// - [`TileError::IndivisibleCanvas`] if the side cannot be split evenly
    ///   at the highest zoom in `zooms` (the canvas was not produced by
    ///   [`prepare_canvas`](super::canvas::prepare_canvas) for this range)
    pub fn new(
        codec: &'a C,
        canvas: &'a C::Image,
        zooms: ZoomRange,
        tile_size: u32,
    ) -> Result<Self, TileError> {
        let (width, height) = codec.dimensions(canvas);
        if width != height {
            return Err(TileError::NonSquareCanvas { width, height });
        }
        if width == 0 {
            return Err(TileError::EmptyImage { width, height });
        }

        // Lower factors divide the highest one, so one check covers the range
        let factor = tiles_per_side(zooms.max());
        if width % factor != 0 {
            return Err(TileError::IndivisibleCanvas {
                side: width,
                zoom: zooms.max(),
                factor,
            });
        }

        Ok(Self {
            codec,
            canvas,
            side: width,
            zooms,
            tile_size,
        })
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn zooms(&self) -> ZoomRange {
        self.zooms
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Grid geometry at `zoom`, or `None` if the level is outside the range.
    pub fn layout(&self, zoom: u8) -> Option<LevelLayout> {
        if !self.zooms.contains(zoom) {
            return None;
        }
        let tiles_per_side = tiles_per_side(zoom);
        Some(LevelLayout {
            zoom,
            tiles_per_side,
            tile_length: self.side / tiles_per_side,
        })
    }

    /// Layouts for every level, lowest zoom first.
    pub fn layouts(&self) -> Vec<LevelLayout> {
        self.zooms
            .levels()
            .filter_map(|zoom| self.layout(zoom))
            .collect()
    }

    /// Canvas region that feeds the tile at `coord`.
    pub fn region(&self, coord: TileCoord) -> Option<CropRegion> {
        let layout = self.layout(coord.zoom)?;
        (coord.col < layout.tiles_per_side && coord.row < layout.tiles_per_side)
            .then(|| layout.region(coord.col, coord.row))
    }

    /// Crop and resample the single tile at `coord`.
    pub fn tile(&self, coord: TileCoord) -> Option<Tile<C::Image>> {
        let region = self.region(coord)?;
        trace!(%coord, x = region.x, y = region.y, size = region.size, "Cutting tile");

        let cropped = self
            .codec
            .crop(self.canvas, region.x, region.y, region.size, region.size);
        let image = self.codec.resample(cropped, self.tile_size, self.tile_size);

        Some(Tile { coord, image })
    }

    /// Lazily produce every tile in the range.
    ///
    /// Order is ascending zoom, then column, then row.
    pub fn tiles(&self) -> Tiles<'_, 'a, C> {
        Tiles {
            partitioner: self,
            coords: self.zooms.coords(),
            current_zoom: None,
        }
    }
}

/// Iterator returned by [`TilePartitioner::tiles`].
pub struct Tiles<'p, 'a, C: ImageCodec> {
    partitioner: &'p TilePartitioner<'a, C>,
    coords: TileCoords,
    current_zoom: Option<u8>,
}

impl<C: ImageCodec> Iterator for Tiles<'_, '_, C> {
    type Item = Tile<C::Image>;

    fn next(&mut self) -> Option<Self::Item> {
        let coord = self.coords.next()?;

        if self.current_zoom != Some(coord.zoom) {
            self.current_zoom = Some(coord.zoom);
            if let Some(layout) = self.partitioner.layout(coord.zoom) {
                debug!(
                    zoom = layout.zoom,
                    tiles = layout.tile_count(),
                    tile_length = layout.tile_length,
                    "Partitioning zoom level"
                );
            }
        }

        self.partitioner.tile(coord)
    }
}
