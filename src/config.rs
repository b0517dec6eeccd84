//! Configuration management for the image tiler.
//!
//! Two layers:
//! - [`Cli`]: command-line arguments via clap, with environment variable
//!   fallbacks using the `TILER_` prefix
//! - [`TilerConfig`]: the validated settings the [`Tiler`](crate::Tiler) runs
//!   with, usable directly from library code
//!
//! Malformed values (zoom ranges, colors, formats) are rejected while the
//! arguments are parsed, before any image is opened.
//!
//! # Environment Variables
//!
//! - `TILER_OUTPUT_DIR` - Directory where tiles are written
//! - `TILER_FORMAT` - Output format (default: png)
//! - `TILER_ZOOM_LEVELS` - Zoom range, `A..B` or `N` (default: 0..4)
//! - `TILER_BACKGROUND` - Padding color `R,G,B,A` (default: 255,255,255,0)
//! - `TILER_PREFIX` - Tile filename prefix (default: tile)
//! - `TILER_TILE_SIZE` - Output tile edge in pixels (default: 256)
//! - `TILER_JPEG_QUALITY` - JPEG quality 1-100 (default: 80)

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::ConfigError;
use crate::tile::{
    is_valid_quality, BackgroundColor, ResampleFilter, TileFormat, ZoomRange,
    DEFAULT_JPEG_QUALITY, DEFAULT_PREFIX, TILE_SIZE,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default output directory for library use.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Default zoom range.
pub const DEFAULT_ZOOM_LEVELS: &str = "0..4";

/// Default padding color (transparent white).
pub const DEFAULT_BACKGROUND: &str = "255,255,255,0";

/// Default output format.
pub const DEFAULT_FORMAT: &str = "png";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Tiler - slice an image into a zoomable tile pyramid.
///
/// Pads the image to a square and cuts it into 256×256 tiles at each zoom
/// level, ready for Google-Maps-style viewers.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-tiler")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Example: image-tiler tile -o ./tiles -z 0..3 ./input_files/map.jpg")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Cut an image into tiles.
    Tile(TileArgs),

    /// Estimate the zoom level closest to the image's native resolution.
    Zoom(ZoomArgs),
}

/// How the run summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Arguments for `image-tiler tile`.
#[derive(Parser, Debug, Clone)]
pub struct TileArgs {
    /// Source image. Only the first file is tiled; the rest are ignored.
    #[arg(value_name = "IMAGE_FILE", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Directory where the tiles will be created.
    #[arg(short, long = "output", value_name = "OUTPUT_DIR", env = "TILER_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Image format of the tiles (png, jpg, gif, bmp, tiff, webp).
    #[arg(short, long, default_value = DEFAULT_FORMAT, env = "TILER_FORMAT")]
    pub format: TileFormat,

    /// Prefix for tile file names.
    #[arg(short, long, default_value = DEFAULT_PREFIX, env = "TILER_PREFIX")]
    pub prefix: String,

    /// Fail instead of creating the output directory when it is missing.
    #[arg(long, default_value_t = false)]
    pub no_autocreate: bool,

    // =========================================================================
    // Tiling Configuration
    // =========================================================================
    /// Range of zoom levels to generate, inclusive (`A..B`, or `N` for one level).
    #[arg(
        short,
        long,
        value_name = "ZOOM_RANGE",
        default_value = DEFAULT_ZOOM_LEVELS,
        env = "TILER_ZOOM_LEVELS"
    )]
    pub zoom_levels: ZoomRange,

    /// Padding color as `R,G,B,A` components (0-255).
    #[arg(
        short,
        long,
        value_name = "COLOR",
        default_value = DEFAULT_BACKGROUND,
        env = "TILER_BACKGROUND"
    )]
    pub background: BackgroundColor,

    /// Edge length of output tiles in pixels.
    #[arg(long, default_value_t = TILE_SIZE, env = "TILER_TILE_SIZE")]
    pub tile_size: u32,

    /// JPEG quality (1-100), used only for jpg output.
    #[arg(
        long,
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100),
        env = "TILER_JPEG_QUALITY"
    )]
    pub jpeg_quality: u8,

    /// Resampling filter used when scaling regions to tile size.
    #[arg(long, value_enum, default_value_t = ResampleFilter::Lanczos3)]
    pub filter: ResampleFilter,

    // =========================================================================
    // Reporting
    // =========================================================================
    /// Format of the summary printed after tiling.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl TileArgs {
    /// The image that will be tiled.
    pub fn input(&self) -> &Path {
        &self.inputs[0]
    }

    /// Inputs past the first, which are not processed.
    pub fn ignored_inputs(&self) -> &[PathBuf] {
        &self.inputs[1..]
    }

    /// Build and validate the tiler configuration.
    pub fn to_config(&self) -> Result<TilerConfig, ConfigError> {
        let config = TilerConfig::new(&self.output_dir)
            .with_format(self.format)
            .with_zoom_levels(self.zoom_levels)
            .with_bg_color(self.background)
            .with_prefix(self.prefix.clone())
            .with_autocreate_dirs(!self.no_autocreate)
            .with_tile_size(self.tile_size)
            .with_jpeg_quality(self.jpeg_quality)
            .with_filter(self.filter);

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for `image-tiler zoom`.
#[derive(Parser, Debug, Clone)]
pub struct ZoomArgs {
    /// Source image.
    #[arg(value_name = "IMAGE_FILE")]
    pub input: PathBuf,

    /// Zoom range the canvas would be padded for; only the maximum matters.
    #[arg(
        short,
        long,
        value_name = "ZOOM_RANGE",
        default_value = DEFAULT_ZOOM_LEVELS,
        env = "TILER_ZOOM_LEVELS"
    )]
    pub zoom_levels: ZoomRange,

    /// Edge length of output tiles in pixels.
    #[arg(long, default_value_t = TILE_SIZE, env = "TILER_TILE_SIZE")]
    pub tile_size: u32,

    /// Output format of the estimate.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ZoomArgs {
    pub fn to_config(&self) -> Result<TilerConfig, ConfigError> {
        let config = TilerConfig::default()
            .with_zoom_levels(self.zoom_levels)
            .with_tile_size(self.tile_size);

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Tiler Configuration
// =============================================================================

/// Validated settings for a tiling run.
///
/// Build with [`TilerConfig::new`] or [`Default`] and the `with_*` methods,
/// then call [`validate`](TilerConfig::validate).
#[derive(Debug, Clone, PartialEq)]
pub struct TilerConfig {
    /// Directory where tiles are written
    pub output_dir: PathBuf,

    /// Output codec
    pub format: TileFormat,

    /// Zoom levels to generate; the maximum also sets the canvas padding
    pub zoom_levels: ZoomRange,

    /// Padding fill color
    pub bg_color: BackgroundColor,

    /// Tile filename prefix
    pub prefix: String,

    /// Create the output directory when it is missing
    pub autocreate_dirs: bool,

    /// Output tile edge in pixels
    pub tile_size: u32,

    /// JPEG quality, 1-100
    pub jpeg_quality: u8,

    /// Resampling filter
    pub filter: ResampleFilter,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: TileFormat::default(),
            zoom_levels: ZoomRange::default(),
            bg_color: BackgroundColor::default(),
            prefix: DEFAULT_PREFIX.to_string(),
            autocreate_dirs: true,
            tile_size: TILE_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            filter: ResampleFilter::default(),
        }
    }
}

impl TilerConfig {
    /// Defaults with the given output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_zoom_levels(mut self, zoom_levels: ZoomRange) -> Self {
        self.zoom_levels = zoom_levels;
        self
    }

    pub fn with_bg_color(mut self, bg_color: BackgroundColor) -> Self {
        self.bg_color = bg_color;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_autocreate_dirs(mut self, autocreate: bool) -> Self {
        self.autocreate_dirs = autocreate;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Check the settings that the type system does not already enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() || self.prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidPrefix(self.prefix.clone()));
        }

        if self.tile_size == 0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }

        if !is_valid_quality(self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
