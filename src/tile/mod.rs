//! Tile pyramid construction.
//!
//! # Architecture
//!
//! ```text
//!        source image
//!              │
//!              ▼
//! ┌─────────────────────────────┐
//! │       prepare_canvas        │  pad to a square whose side
//! │  (canvas.rs)                │  divides by 2^max_zoom
//! └──────────────┬──────────────┘
//!                │ padded canvas
//!                ▼
//! ┌─────────────────────────────┐
//! │      TilePartitioner        │  per zoom: crop 2^z × 2^z regions,
//! │  (partition.rs)             │  resample each to tile_size
//! └──────────────┬──────────────┘
//!                │ (zoom, col, row) + tile
//!                ▼
//! ┌─────────────────────────────┐
//! │  encode_tile → TileWriter   │  {prefix}_{zoom}_{col}_{row}.{ext}
//! └─────────────────────────────┘
//! ```
//!
//! All raster work goes through the [`ImageCodec`] trait; [`RasterCodec`] is
//! the implementation backed by the `image` crate.
//!
//! # Components
//!
//! - [`prepare_canvas`] / [`padded_side_length`]: canvas preparation
//! - [`TilePartitioner`]: lazy, restartable tile generation
//! - [`TileCoord`] / [`ZoomRange`]: pyramid addressing
//! - [`TileFormat`] / [`encode_tile`]: output encoding
//! - [`TileWriter`]: output directory and file naming

mod canvas;
mod codec;
mod coord;
mod encoder;
mod partition;
mod writer;

pub use canvas::{
    canvas_bytes, native_resolution_zoom, padded_side_length, prepare_canvas, BackgroundColor,
    MAX_CANVAS_BYTES,
};
pub use codec::{ImageCodec, RasterCodec, ResampleFilter};
pub use coord::{tiles_per_side, TileCoord, TileCoords, ZoomRange, MAX_ZOOM};
pub use encoder::{
    clamp_quality, encode_tile, is_valid_quality, TileFormat, DEFAULT_JPEG_QUALITY,
    MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use partition::{CropRegion, LevelLayout, Tile, TilePartitioner, Tiles, TILE_SIZE};
pub use writer::{TileWriter, DEFAULT_PREFIX};
