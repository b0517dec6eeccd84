//! # Image Tiler
//!
//! Slices a single raster image into a pyramid of fixed-size square tiles at
//! multiple zoom levels, for tile-based map viewers (Google-Maps-style slippy
//! maps).
//!
//! ## How it works
//!
//! - **Canvas preparation**: the image is padded to a square whose side is a
//!   multiple of `2^max_zoom`, so every zoom level divides it into whole-pixel
//!   tiles. The source sits at the top-left; padding uses a background color.
//! - **Partitioning**: at zoom `z` the canvas is cut into `2^z × 2^z` regions,
//!   each resampled to 256×256 and written as `{prefix}_{zoom}_{col}_{row}.{ext}`.
//!
//! ## Architecture
//!
//! - [`tile`] - Canvas preparation, partitioning, encoding and tile output
//! - [`tiler`] - The [`Tiler`] that runs a whole job and reports on it
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_tiler::{Tiler, TilerConfig, ZoomRange};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TilerConfig::new("./tiles").with_zoom_levels(ZoomRange::new(0, 3)?);
//!     let tiler = Tiler::new(config)?;
//!
//!     let report = tiler.make_tiles("map.jpg")?;
//!     println!("Wrote {} tiles", report.tiles_written);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod tile;
pub mod tiler;

// Re-export commonly used types
pub use config::{Cli, Command, SummaryFormat, TileArgs, TilerConfig, ZoomArgs};
pub use error::{ConfigError, TileError};
pub use tile::{
    native_resolution_zoom, padded_side_length, prepare_canvas, BackgroundColor, CropRegion,
    ImageCodec, LevelLayout, RasterCodec, ResampleFilter, Tile, TileCoord, TileFormat,
    TilePartitioner, TileWriter, ZoomRange, MAX_CANVAS_BYTES, MAX_ZOOM, TILE_SIZE,
};
pub use tiler::{NativeZoom, TileReport, Tiler};
