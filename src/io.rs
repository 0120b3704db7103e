//! Versioned binary persistence for [`UniformGrid`] (`.gri` format).
//!
//! Only the configuration is stored; the derived raster is recomputed by
//! running [`UniformGrid::rasterize`] during load, so a file can never carry
//! derived state that disagrees with its configuration.
//!
//! Layout (little-endian throughout):
//!
//! - Bytes 0-3: magic `"UGRD"`
//! - Bytes 4-7: format version (u32)
//! - Bytes 8-11: dimension count D (u32)
//! - Bytes 12-15: reserved
//! - `nodes` (u32 × D), `lower` (f64 × D), `upper` (f64 × D)

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{GridError, Result};
use crate::grid::UniformGrid;

/// Magic bytes identifying a `.gri` grid file.
pub const GRID_MAGIC: [u8; 4] = *b"UGRD";

/// Current format version.
pub const GRID_FORMAT_VERSION: u32 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

// Sanity cap when reading the header, so a corrupt dimension count cannot
// trigger an enormous allocation.
const MAX_DIM: usize = 1024;

/// Compute the on-disk size of a grid file with the given dimension count.
pub fn compute_file_size(dim: usize) -> usize {
    HEADER_SIZE + dim * (4 + 8 + 8)
}

impl UniformGrid {
    /// Write the grid configuration to `writer` in `.gri` binary format.
    ///
    /// The grid does not need to be rasterized; only the configuration is
    /// persisted.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&GRID_MAGIC);
        header[4..8].copy_from_slice(&GRID_FORMAT_VERSION.to_le_bytes());
        header[8..12].copy_from_slice(&(self.dim() as u32).to_le_bytes());
        writer.write_all(&header)?;

        for &n in self.nodes_per_dim() {
            writer.write_all(&n.to_le_bytes())?;
        }
        for &v in self.lower_bound() {
            writer.write_all(&v.to_le_bytes())?;
        }
        for &v in self.upper_bound() {
            writer.write_all(&v.to_le_bytes())?;
        }
        Ok(())
    }

    /// Read a grid from `reader` in `.gri` binary format and rasterize it.
    ///
    /// # Errors
    /// [`GridError::InvalidFormat`] for bad magic or an implausible header,
    /// [`GridError::UnsupportedVersion`] for an unknown format version,
    /// [`GridError::Io`] for truncated or unreadable input, and
    /// [`GridError::DegenerateAxis`] if the stored configuration does not
    /// rasterize.
    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;

        if header[0..4] != GRID_MAGIC {
            return Err(GridError::InvalidFormat {
                message: "bad magic bytes",
            });
        }
        let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if version != GRID_FORMAT_VERSION {
            return Err(GridError::UnsupportedVersion {
                found: version,
                expected: GRID_FORMAT_VERSION,
            });
        }
        let dim = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;
        if dim == 0 || dim > MAX_DIM {
            return Err(GridError::InvalidFormat {
                message: "implausible dimension count",
            });
        }

        let mut nodes = vec![0u32; dim];
        for n in nodes.iter_mut() {
            let mut buf = [0u8; 4];
            reader.read_exact(&mut buf)?;
            *n = u32::from_le_bytes(buf);
        }
        let mut lower = vec![0.0f64; dim];
        for v in lower.iter_mut() {
            let mut buf = [0u8; 8];
            reader.read_exact(&mut buf)?;
            *v = f64::from_le_bytes(buf);
        }
        let mut upper = vec![0.0f64; dim];
        for v in upper.iter_mut() {
            let mut buf = [0u8; 8];
            reader.read_exact(&mut buf)?;
            *v = f64::from_le_bytes(buf);
        }

        UniformGrid::rasterized(&nodes, &lower, &upper)
    }

    /// Save the grid to a file.
    ///
    /// The path's extension is replaced with `.gri`, so
    /// `save_to_file("maps/field.tmp")` writes `maps/field.gri`.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = std::fs::File::create(grid_file_path(path))?;
        self.save(&mut file)
    }

    /// Load and rasterize a grid from a file.
    ///
    /// The path's extension is replaced with `.gri`, mirroring
    /// [`UniformGrid::save_to_file`]. A missing or unreadable file is
    /// reported as [`GridError::Io`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = std::fs::File::open(grid_file_path(path))?;
        Self::load(&mut file)
    }
}

fn grid_file_path<P: AsRef<Path>>(path: P) -> PathBuf {
    path.as_ref().with_extension("gri")
}
