//! Tiling run orchestration.
//!
//! [`Tiler`] ties the pieces together for one source image:
//!
//! 1. Decode the source (or take an already decoded image)
//! 2. Pad it to a square canvas for the highest requested zoom
//! 3. Make sure the output directory exists
//! 4. Partition the canvas level by level, encoding and writing each tile
//!
//! Any failure stops the run. Tiles written before the failure stay on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TilerConfig;
use crate::error::{ConfigError, TileError};
use crate::tile::{
    native_resolution_zoom, padded_side_length, prepare_canvas, ImageCodec, LevelLayout,
    RasterCodec, TileFormat, TilePartitioner, TileWriter, ZoomRange,
};

// =============================================================================
// Reports
// =============================================================================

/// Summary of a completed tiling run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileReport {
    /// Source width in pixels
    pub source_width: u32,
    /// Source height in pixels
    pub source_height: u32,
    /// Side of the padded square canvas
    pub canvas_side: u32,
    /// Levels that were generated
    pub zoom_levels: ZoomRange,
    /// Output tile edge in pixels
    pub tile_size: u32,
    /// Output codec
    pub format: TileFormat,
    /// Directory holding the tiles
    pub output_dir: PathBuf,
    /// Grid geometry per level, lowest zoom first
    pub levels: Vec<LevelLayout>,
    /// Number of tile files written
    pub tiles_written: u64,
}

/// Native-resolution zoom estimate for an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NativeZoom {
    /// Source width in pixels
    pub width: u32,
    /// Source height in pixels
    pub height: u32,
    /// Padded canvas side used for the estimate
    pub canvas_side: u32,
    /// Output tile edge in pixels
    pub tile_size: u32,
    /// Fractional zoom where one tile pixel covers one canvas pixel
    pub zoom: f64,
}

impl NativeZoom {
    /// Lowest integer zoom that does not downsample the source.
    pub fn zoom_ceil(&self) -> u32 {
        self.zoom.ceil() as u32
    }
}

// =============================================================================
// Tiler
// =============================================================================

/// Builds a tile pyramid from one source image.
///
/// # Example
///
/// ```ignore
/// use image_tiler::{Tiler, TilerConfig};
///
/// let config = TilerConfig::new("./tiles").with_zoom_levels("0..3".parse()?);
/// let tiler = Tiler::new(config)?;
/// let report = tiler.make_tiles("map.jpg")?;
///
/// println!("{} tiles written", report.tiles_written);
/// ```
pub struct Tiler<C: ImageCodec = RasterCodec> {
    config: TilerConfig,
    codec: C,
}

impl Tiler<RasterCodec> {
    /// Create a tiler backed by the `image` crate.
    pub fn new(config: TilerConfig) -> Result<Self, ConfigError> {
        let codec = RasterCodec::new()
            .with_filter(config.filter)
            .with_jpeg_quality(config.jpeg_quality);
        Self::with_codec(config, codec)
    }
}

impl<C: ImageCodec> Tiler<C> {
    /// Create a tiler using a custom codec.
    pub fn with_codec(config: TilerConfig, codec: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, codec })
    }

    pub fn config(&self) -> &TilerConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Read and decode an image file.
    pub fn load_image(&self, path: impl AsRef<Path>) -> Result<C::Image, TileError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| TileError::io(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read source image");
        self.codec.decode(&bytes)
    }

    /// Tile the image file at `source`.
    pub fn make_tiles(&self, source: impl AsRef<Path>) -> Result<TileReport, TileError> {
        let source = source.as_ref();
        info!(source = %source.display(), "Loading source image");
        let image = self.load_image(source)?;
        self.make_tiles_from_image(&image)
    }

    /// Tile an image that is already in memory.
    pub fn make_tiles_from_image(&self, image: &C::Image) -> Result<TileReport, TileError> {
        let started = Instant::now();
        let config = &self.config;
        let (source_width, source_height) = self.codec.dimensions(image);

        let canvas = prepare_canvas(
            &self.codec,
            image,
            config.zoom_levels.max(),
            config.bg_color,
        )?;

        if !config.format.supports_alpha() && config.bg_color.a < u8::MAX {
            warn!(
                format = %config.format,
                background = %config.bg_color,
                "Output format has no alpha channel; padding will be opaque"
            );
        }

        let writer = TileWriter::new(&config.output_dir, config.prefix.as_str(), config.format);
        writer.prepare_dir(config.autocreate_dirs)?;

        let partitioner =
            TilePartitioner::new(&self.codec, &canvas, config.zoom_levels, config.tile_size)?;

        info!(
            width = source_width,
            height = source_height,
            canvas = partitioner.side(),
            zooms = %config.zoom_levels,
            tiles = config.zoom_levels.tile_count(),
            "Tiling image"
        );

        let mut tiles_written = 0u64;
        for tile in partitioner.tiles() {
            let data = self.codec.encode(&tile.image, config.format)?;
            writer.write(tile.coord, &data)?;
            tiles_written += 1;
        }

        info!(
            tiles = tiles_written,
            dir = %config.output_dir.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tiling complete"
        );

        Ok(TileReport {
            source_width,
            source_height,
            canvas_side: partitioner.side(),
            zoom_levels: config.zoom_levels,
            tile_size: config.tile_size,
            format: config.format,
            output_dir: config.output_dir.clone(),
            levels: partitioner.layouts(),
            tiles_written,
        })
    }

    /// Native-resolution zoom estimate for the image file at `source`.
    pub fn native_zoom(&self, source: impl AsRef<Path>) -> Result<NativeZoom, TileError> {
        let image = self.load_image(source)?;
        self.native_zoom_of(&image)
    }

    /// Native-resolution zoom estimate for an in-memory image.
    pub fn native_zoom_of(&self, image: &C::Image) -> Result<NativeZoom, TileError> {
        let (width, height) = self.codec.dimensions(image);
        let max_zoom = self.config.zoom_levels.max();
        let tile_size = self.config.tile_size;

        Ok(NativeZoom {
            width,
            height,
            canvas_side: padded_side_length(width, height, max_zoom)?,
            tile_size,
            zoom: native_resolution_zoom(width, height, max_zoom, tile_size)?,
        })
    }
}
