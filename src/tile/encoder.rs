//! Tile encoding.
//!
//! Turns finished RGBA tiles into bytes in the configured output format.
//!
//! # Design Decisions
//!
//! - **RGBA in, format-specific out**: tiles are kept as RGBA until the last
//!   step. Formats without an alpha channel (JPEG) drop it here.
//!
//! - **Quality control**: JPEG quality is configurable; other formats are
//!   lossless or have no quality knob in the codec.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use bytes::Bytes;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage, RgbaImage};
use serde::Serialize;

use crate::error::{ConfigError, TileError};

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// Output Format
// =============================================================================

/// Output codec for tile files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
}

impl TileFormat {
    /// File extension used in tile names, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
            TileFormat::Gif => "gif",
            TileFormat::Bmp => "bmp",
            TileFormat::Tiff => "tiff",
            TileFormat::Webp => "webp",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            TileFormat::Png => ImageFormat::Png,
            TileFormat::Jpeg => ImageFormat::Jpeg,
            TileFormat::Gif => ImageFormat::Gif,
            TileFormat::Bmp => ImageFormat::Bmp,
            TileFormat::Tiff => ImageFormat::Tiff,
            TileFormat::Webp => ImageFormat::WebP,
        }
    }

    /// Whether the format stores an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, TileFormat::Jpeg)
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TileFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => TileFormat::Png,
            "jpg" | "jpeg" => TileFormat::Jpeg,
            "gif" => TileFormat::Gif,
            "bmp" => TileFormat::Bmp,
            "tif" | "tiff" => TileFormat::Tiff,
            "webp" => TileFormat::Webp,
            _ => return Err(ConfigError::UnsupportedFormat(s.to_string())),
        };
        Ok(format)
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode an RGBA tile into `format`.
///
/// `quality` is only consulted for JPEG and is clamped to 1-100.
///
/// # Errors
///
/// Returns [`TileError::Encode`] if the codec rejects the image.
pub fn encode_tile(tile: &RgbaImage, format: TileFormat, quality: u8) -> Result<Bytes, TileError> {
    let mut output = Vec::new();

    match format {
        TileFormat::Jpeg => {
            let rgb: RgbImage = tile.convert();
            let mut encoder = JpegEncoder::new_with_quality(&mut output, clamp_quality(quality));
            encoder
                .encode_image(&rgb)
                .map_err(|e| TileError::Encode {
                    message: e.to_string(),
                })?;
        }
        other => {
            tile.write_to(&mut Cursor::new(&mut output), other.image_format())
                .map_err(|e| TileError::Encode {
                    message: e.to_string(),
                })?;
        }
    }

    Ok(Bytes::from(output))
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Validate JPEG quality parameter.
///
/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}
