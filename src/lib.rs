//! # unigrid
//!
//! A uniform D-dimensional lattice over a bounded continuous space, with fast
//! conversions between the three representations of a grid position:
//!
//! - **coordinates**: a continuous point in the grid extent,
//! - **dim index**: one integer position per axis,
//! - **flat index**: a single integer in `[0, node_count)` enumerating all
//!   nodes in mixed-radix order, dimension 0 varying fastest.
//!
//! On top of the conversions, the grid offers boundary-aware stencil queries
//! ([`UniformGrid::neighborhood`], [`UniformGrid::enveloping_nodes`]),
//! containment testing, uniform sampling of the extent, and a versioned
//! binary file format (`.gri`).
//!
//! ## Quick Start
//!
//! ```
//! use unigrid::UniformGrid;
//!
//! let mut grid = UniformGrid::new();
//! grid.set_dim(3);
//! grid.set_nodes(&[11, 21, 31])?;
//! grid.set_lower(&[0.0, 0.0, 0.0])?;
//! grid.set_upper(&[1.0, 2.0, 3.0])?;
//! grid.rasterize()?;
//!
//! for n in 0..grid.node_count() {
//!     let coords = grid.node_coordinates_flat(n)?;
//!     let idx = grid.dim_index(n)?;
//!     assert_eq!(grid.node_coordinates(&idx)?, coords);
//! }
//!
//! // Locate the interpolation stencil around a continuous point.
//! let stencil = grid.enveloping_nodes(&[0.31, 0.72, 1.64], 0)?;
//! assert_eq!(stencil.len(), 8);
//! # Ok::<(), unigrid::GridError>(())
//! ```
//!
//! ## Lifecycle
//!
//! A grid is configured with `set_dim` / `set_nodes` / `set_lower` /
//! `set_upper` (any order), then finalized with [`UniformGrid::rasterize`].
//! Rasterization is the only configuration step that allocates the raster
//! tables and should happen outside time-critical loops. Changing the
//! configuration invalidates the raster; queries on a stale grid fail with
//! [`GridError::NotRasterized`] instead of silently using old derived data.
//!
//! ## Real-time queries
//!
//! Once rasterized, all index/coordinate conversions and containment tests
//! are O(D). The `_into` variants write into caller-provided buffers and
//! perform no allocation; the Vec-returning variants allocate only their
//! result. `neighborhood` and `enveloping_nodes` allocate the returned index
//! list and are intended for setup work, not for the hot path.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod grid;
mod io;
mod query;

pub use error::{GridError, Result};
pub use grid::UniformGrid;
pub use io::{compute_file_size, GRID_FORMAT_VERSION, GRID_MAGIC, HEADER_SIZE};

/// Prelude module for convenient imports.
///
/// ```
/// use unigrid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{GridError, Result};
    pub use crate::grid::UniformGrid;
}
