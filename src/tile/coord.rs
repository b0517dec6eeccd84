//! Tile coordinates and zoom ranges.
//!
//! A zoom level `z` splits the canvas into a `2^z × 2^z` grid. Tiles are
//! addressed by `(zoom, col, row)` with column 0 on the left and row 0 at the
//! top, matching the usual slippy-map convention.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// Highest zoom level accepted by [`ZoomRange`].
pub const MAX_ZOOM: u8 = 20;

/// Number of tiles along one side of the grid at `zoom`.
#[inline]
pub fn tiles_per_side(zoom: u8) -> u32 {
    1u32 << zoom
}

// =============================================================================
// Tile Coordinate
// =============================================================================

/// Position of one output tile in the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// X index, 0 at the left edge
    pub col: u32,
    /// Y index, 0 at the top edge
    pub row: u32,
}

impl TileCoord {
    pub fn new(zoom: u8, col: u32, row: u32) -> Self {
        Self { zoom, col, row }
    }

    /// Whether `col` and `row` fall inside the grid for this zoom.
    pub fn is_valid(&self) -> bool {
        self.zoom <= MAX_ZOOM
            && self.col < tiles_per_side(self.zoom)
            && self.row < tiles_per_side(self.zoom)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

// =============================================================================
// Zoom Range
// =============================================================================

/// Inclusive range of zoom levels, `min..=max`.
///
/// Parses from `"A..B"` (inclusive on both ends) or a single `"N"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoomRange {
    min: u8,
    max: u8,
}

impl ZoomRange {
    /// Create a range, rejecting `min > max` and levels above [`MAX_ZOOM`].
    pub fn new(min: u8, max: u8) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidZoomRange {
                input: format!("{}..{}", min, max),
                reason: "start is greater than end".to_string(),
            });
        }
        if max > MAX_ZOOM {
            return Err(ConfigError::ZoomTooLarge {
                zoom: max,
                max: MAX_ZOOM,
            });
        }
        Ok(Self { min, max })
    }

    /// A range containing a single level.
    pub fn single(zoom: u8) -> Result<Self, ConfigError> {
        Self::new(zoom, zoom)
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, zoom: u8) -> bool {
        (self.min..=self.max).contains(&zoom)
    }

    /// Zoom levels in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = u8> {
        self.min..=self.max
    }

    /// Total number of tiles across every level in the range.
    pub fn tile_count(&self) -> u64 {
        self.levels()
            .map(|zoom| u64::from(tiles_per_side(zoom)).pow(2))
            .sum()
    }

    /// Every coordinate in the range, ordered by zoom, then column, then row.
    pub fn coords(&self) -> TileCoords {
        TileCoords {
            range: *self,
            next: Some(TileCoord::new(self.min, 0, 0)),
        }
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 0, max: 4 }
    }
}

impl fmt::Display for ZoomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

impl FromStr for ZoomRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidZoomRange {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let parse_level = |part: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| invalid("zoom levels must be non-negative integers"))
        };

        match s.split_once("..") {
            Some((start, end)) => {
                let end = end.strip_prefix('=').unwrap_or(end);
                ZoomRange::new(parse_level(start)?, parse_level(end)?)
            }
            None => ZoomRange::single(parse_level(s)?),
        }
    }
}

// =============================================================================
// Coordinate Iterator
// =============================================================================

/// Iterator over every [`TileCoord`] in a [`ZoomRange`].
///
/// Yields in ascending zoom, then column, then row, so tile names come out in
/// the same order on every run.
#[derive(Debug, Clone)]
pub struct TileCoords {
    range: ZoomRange,
    next: Option<TileCoord>,
}

impl Iterator for TileCoords {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let side = tiles_per_side(current.zoom);

        self.next = if current.row + 1 < side {
            Some(TileCoord::new(current.zoom, current.col, current.row + 1))
        } else if current.col + 1 < side {
            Some(TileCoord::new(current.zoom, current.col + 1, 0))
        } else if current.zoom < self.range.max {
            Some(TileCoord::new(current.zoom + 1, 0, 0))
        } else {
            None
        };

        Some(current)
    }
}
