//! Canvas preparation.
//!
//! Before tiling, the source image is placed on a square canvas whose side is
//! the smallest multiple of `2^max_zoom` that fits the image's long side.
//! Every lower zoom factor divides `2^max_zoom`, so the canvas splits into
//! whole-pixel tiles at every level of the pyramid.
//!
//! The source is anchored at the top-left corner; the padding to the right and
//! bottom is filled with the background color.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::Serialize;
use tracing::debug;

use crate::error::{ConfigError, TileError};

use super::codec::ImageCodec;

// =============================================================================
// Background Color
// =============================================================================

/// RGBA fill color for canvas padding.
///
/// Defaults to transparent white (`255,255,255,0`). Formats without alpha
/// render the padding as opaque white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl BackgroundColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const TRANSPARENT_WHITE: Self = Self::new(255, 255, 255, 0);

    pub const OPAQUE_WHITE: Self = Self::new(255, 255, 255, 255);
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::TRANSPARENT_WHITE
    }
}

impl From<BackgroundColor> for Rgba<u8> {
    fn from(color: BackgroundColor) -> Self {
        Rgba([color.r, color.g, color.b, color.a])
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for BackgroundColor {
    type Err = ConfigError;

    /// Parse `"R,G,B,A"` with each component in 0-255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ConfigError::InvalidColor {
            input: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid(format!(
                "expected 4 components (R,G,B,A), got {}",
                parts.len()
            )));
        }

        let mut components = [0u8; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| invalid(format!("component '{}' is not an integer 0-255", part)))?;
        }

        let [r, g, b, a] = components;
        Ok(Self::new(r, g, b, a))
    }
}

// =============================================================================
// Side Length
// =============================================================================

/// Largest padded canvas, in bytes of RGBA pixels, that will be allocated (4 GiB).
pub const MAX_CANVAS_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Bytes needed to hold a `side × side` RGBA canvas.
#[inline]
pub fn canvas_bytes(side: u32) -> u64 {
    u64::from(side).pow(2) * 4
}

/// Side of the padded square canvas for a `width × height` image.
///
/// This is `ceil(max(width, height) / 2^max_zoom) * 2^max_zoom`.
///
/// # Errors
///
/// - [`TileError::EmptyImage`] if either dimension is zero
/// - [`TileError::CanvasTooLarge`] if the result does not fit in a `u32`
pub fn padded_side_length(width: u32, height: u32, max_zoom: u8) -> Result<u32, TileError> {
    if width == 0 || height == 0 {
        return Err(TileError::EmptyImage { width, height });
    }

    let long_side = width.max(height);
    let factor = 1u64
        .checked_shl(u32::from(max_zoom))
        .filter(|f| *f <= u64::from(u32::MAX))
        .ok_or(TileError::CanvasTooLarge {
            long_side,
            max_zoom,
        })?;

    let side = u64::from(long_side).div_ceil(factor) * factor;

    u32::try_from(side).map_err(|_| TileError::CanvasTooLarge {
        long_side,
        max_zoom,
    })
}

/// Zoom level at which one tile pixel roughly matches one source pixel.
///
/// `log2(side) - log2(tile_size)`, clamped at zero, where `side` is the padded
/// side length for `max_zoom`. Fractional; round up for the level that does not
/// downsample the source. Advisory only: the partitioner never consults it.
pub fn native_resolution_zoom(
    width: u32,
    height: u32,
    max_zoom: u8,
    tile_size: u32,
) -> Result<f64, TileError> {
    let side = padded_side_length(width, height, max_zoom)?;
    let zoom = f64::from(side).log2() - f64::from(tile_size.max(1)).log2();
    Ok(zoom.max(0.0))
}

// =============================================================================
// Canvas Preparer
// =============================================================================

/// Place `image` on a square, padded canvas ready for tiling up to `max_zoom`.
///
/// The returned image is `side × side` (see [`padded_side_length`]) with the
/// source copied unscaled at `(0, 0)` and the rest filled with `background`.
///
/// # Errors
///
/// Returns [`TileError::CanvasTooLarge`] without allocating if the canvas
/// would exceed [`MAX_CANVAS_BYTES`].
pub fn prepare_canvas<C: ImageCodec>(
    codec: &C,
    image: &C::Image,
    max_zoom: u8,
    background: BackgroundColor,
) -> Result<C::Image, TileError> {
    let (width, height) = codec.dimensions(image);
    let side = padded_side_length(width, height, max_zoom)?;

    if canvas_bytes(side) > MAX_CANVAS_BYTES {
        return Err(TileError::CanvasTooLarge {
            long_side: width.max(height),
            max_zoom,
        });
    }

    debug!(width, height, side, max_zoom, "Padding image to square canvas");

    let mut canvas = codec.canvas(side, background);
    codec.composite(&mut canvas, image, 0, 0);
    Ok(canvas)
}
