//! Image codec abstraction.
//!
//! The canvas preparer and tile partitioner only need a handful of raster
//! operations. They are expressed as the [`ImageCodec`] trait so the tiling
//! logic does not depend on a particular imaging library, and so tests can
//! swap in a codec that records what was asked of it.

use std::io::Cursor;

use bytes::Bytes;
use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::{ImageReader, RgbaImage};
use serde::Serialize;

use crate::error::TileError;

use super::canvas::BackgroundColor;
use super::encoder::{encode_tile, TileFormat, DEFAULT_JPEG_QUALITY};

// =============================================================================
// Codec Trait
// =============================================================================

/// Raster operations required to build a tile pyramid.
pub trait ImageCodec {
    /// In-memory image type produced and consumed by this codec.
    type Image;

    /// Decode an encoded image (any format the codec recognizes).
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, TileError>;

    /// `(width, height)` in pixels.
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// A new `side × side` image filled with `background`.
    fn canvas(&self, side: u32, background: BackgroundColor) -> Self::Image;

    /// Copy `image` onto `canvas` at `(x, y)`, replacing the pixels underneath.
    fn composite(&self, canvas: &mut Self::Image, image: &Self::Image, x: u32, y: u32);

    /// Copy out the `width × height` region whose top-left corner is `(x, y)`.
    fn crop(&self, image: &Self::Image, x: u32, y: u32, width: u32, height: u32) -> Self::Image;

    /// Resize to exactly `width × height`.
    fn resample(&self, image: Self::Image, width: u32, height: u32) -> Self::Image;

    /// Encode into the given output format.
    fn encode(&self, image: &Self::Image, format: TileFormat) -> Result<Bytes, TileError>;
}

// =============================================================================
// Resample Filter
// =============================================================================

/// Interpolation used when a cropped region is scaled to the tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

// =============================================================================
// Raster Codec
// =============================================================================

/// [`ImageCodec`] backed by the `image` crate, working on 8-bit RGBA buffers.
#[derive(Debug, Clone)]
pub struct RasterCodec {
    filter: ResampleFilter,
    jpeg_quality: u8,
}

impl RasterCodec {
    pub fn new() -> Self {
        Self {
            filter: ResampleFilter::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

impl Default for RasterCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for RasterCodec {
    type Image = RgbaImage;

    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, TileError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| TileError::Decode {
                message: e.to_string(),
            })?;

        let img = reader.decode().map_err(|e| TileError::Decode {
            message: e.to_string(),
        })?;

        Ok(img.to_rgba8())
    }

    fn dimensions(&self, image: &RgbaImage) -> (u32, u32) {
        image.dimensions()
    }

    fn canvas(&self, side: u32, background: BackgroundColor) -> RgbaImage {
        RgbaImage::from_pixel(side, side, background.into())
    }

    fn composite(&self, canvas: &mut RgbaImage, image: &RgbaImage, x: u32, y: u32) {
        imageops::replace(canvas, image, i64::from(x), i64::from(y));
    }

    fn crop(&self, image: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
        imageops::crop_imm(image, x, y, width, height).to_image()
    }

    fn resample(&self, image: RgbaImage, width: u32, height: u32) -> RgbaImage {
        if image.dimensions() == (width, height) {
            return image;
        }
        imageops::resize(&image, width, height, self.filter.into())
    }

    fn encode(&self, image: &RgbaImage, format: TileFormat) -> Result<Bytes, TileError> {
        encode_tile(image, format, self.jpeg_quality)
    }
}
