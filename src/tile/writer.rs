//! Tile file output.
//!
//! Tiles are written flat into one directory as
//! `{prefix}_{zoom}_{col}_{row}.{ext}`, e.g. `tile_2_1_3.png`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::TileError;

use super::coord::TileCoord;
use super::encoder::TileFormat;

/// Default filename prefix.
pub const DEFAULT_PREFIX: &str = "tile";

/// Writes encoded tiles into an output directory.
#[derive(Debug, Clone)]
pub struct TileWriter {
    output_dir: PathBuf,
    prefix: String,
    format: TileFormat,
}

impl TileWriter {
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>, format: TileFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
            format,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }

    /// File name (without directory) for the tile at `coord`.
    pub fn file_name(&self, coord: TileCoord) -> String {
        format!(
            "{}_{}_{}_{}.{}",
            self.prefix,
            coord.zoom,
            coord.col,
            coord.row,
            self.format.extension()
        )
    }

    /// Full path for the tile at `coord`.
    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        self.output_dir.join(self.file_name(coord))
    }

    /// Make sure the output directory exists.
    ///
    /// With `autocreate` the directory and any missing parents are created.
    /// Without it, a missing directory is an error.
    pub fn prepare_dir(&self, autocreate: bool) -> Result<(), TileError> {
        if self.output_dir.is_dir() {
            return Ok(());
        }

        if !autocreate {
            return Err(TileError::OutputDirMissing(self.output_dir.clone()));
        }

        fs::create_dir_all(&self.output_dir).map_err(|e| TileError::io(&self.output_dir, e))?;
        info!(dir = %self.output_dir.display(), "Created output directory");
        Ok(())
    }

    /// Write one encoded tile, replacing any existing file of the same name.
    pub fn write(&self, coord: TileCoord, data: &[u8]) -> Result<PathBuf, TileError> {
        let path = self.tile_path(coord);
        fs::write(&path, data).map_err(|e| TileError::io(&path, e))?;
        debug!(%coord, path = %path.display(), bytes = data.len(), "Wrote tile");
        Ok(path)
    }
}
