//! The `UniformGrid` structure: configuration and rasterization.
//!
//! A `UniformGrid` discretizes a bounded continuous D-dimensional space into a
//! uniform lattice of nodes, evenly spaced along each axis such that the first
//! node sits on the lower bound and the last node sits on the upper bound.
//!
//! Configuration happens in two phases. First the grid parameters are set via
//! [`UniformGrid::set_dim`], [`UniformGrid::set_nodes`],
//! [`UniformGrid::set_lower`], and [`UniformGrid::set_upper`] (in any order).
//! Then [`UniformGrid::rasterize`] computes the derived representation. Every
//! setter marks the derived state stale, and every query fails with
//! [`GridError::NotRasterized`](crate::GridError::NotRasterized) until
//! `rasterize()` has been (re-)run.
//!
//! `set_dim()` and `rasterize()` allocate heap memory and are not suitable for
//! time-critical loops; once rasterized, all index and coordinate conversions
//! are O(D) without allocation (see the `_into` query variants).

use crate::error::{GridError, Result};

/// A uniform D-dimensional lattice over a bounded continuous space.
///
/// Grid nodes are addressed in three equivalent ways:
///
/// - a **dim index**: one `u32` position per axis,
/// - a **flat index**: a single `usize` in `[0, node_count)` enumerating all
///   nodes with dimension 0 varying fastest,
/// - **coordinates**: the continuous position of a node.
///
/// # Example
///
/// ```
/// use unigrid::UniformGrid;
///
/// let mut grid = UniformGrid::new();
/// grid.set_dim(2);
/// grid.set_nodes(&[3, 3])?;
/// grid.set_lower(&[0.0, 0.0])?;
/// grid.set_upper(&[2.0, 2.0])?;
/// grid.rasterize()?;
///
/// assert_eq!(grid.node_count(), 9);
/// assert_eq!(grid.flat_index(&[1, 1])?, 4);
/// # Ok::<(), unigrid::GridError>(())
/// ```
///
/// # Concurrency
///
/// Configuration and `rasterize()` take `&mut self` and must be serialized
/// before any querying starts. A rasterized grid behind a shared reference is
/// safe to query from multiple threads; every query returns freshly owned
/// values, never references into internal buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformGrid {
    // Configuration.
    dim: usize,
    nodes: Vec<u32>,
    lower: Vec<f64>,
    upper: Vec<f64>,

    // Derived raster, valid only while `rasterized` is set.
    stride: Vec<f64>,
    stride_inv: Vec<f64>,
    raster: Vec<Vec<f64>>,
    index_stride: Vec<usize>,
    node_count: usize,
    rasterized: bool,
}

impl UniformGrid {
    /// Create an empty, unconfigured grid with zero dimensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of dimensions.
    ///
    /// Resizes all per-axis storage to length `dim`; previously configured
    /// axes keep their values, new axes are zeroed. Invalidates any derived
    /// raster.
    pub fn set_dim(&mut self, dim: usize) {
        self.dim = dim;
        self.nodes.resize(dim, 0);
        self.lower.resize(dim, 0.0);
        self.upper.resize(dim, 0.0);
        self.rasterized = false;
    }

    /// Set the number of nodes per axis, one value per dimension.
    ///
    /// # Errors
    /// [`GridError::DimensionMismatch`] if `nodes` does not have exactly one
    /// entry per dimension.
    pub fn set_nodes(&mut self, nodes: &[u32]) -> Result<()> {
        self.check_len(nodes.len())?;
        self.nodes.copy_from_slice(nodes);
        self.rasterized = false;
        Ok(())
    }

    /// Set the same number of nodes on every axis.
    pub fn set_nodes_uniform(&mut self, nodes: u32) {
        self.nodes.fill(nodes);
        self.rasterized = false;
    }

    /// Set the lower bound of the extent, one value per dimension.
    ///
    /// # Errors
    /// [`GridError::DimensionMismatch`] if `lower` does not have exactly one
    /// entry per dimension.
    pub fn set_lower(&mut self, lower: &[f64]) -> Result<()> {
        self.check_len(lower.len())?;
        self.lower.copy_from_slice(lower);
        self.rasterized = false;
        Ok(())
    }

    /// Set the upper bound of the extent, one value per dimension.
    ///
    /// # Errors
    /// [`GridError::DimensionMismatch`] if `upper` does not have exactly one
    /// entry per dimension.
    pub fn set_upper(&mut self, upper: &[f64]) -> Result<()> {
        self.check_len(upper.len())?;
        self.upper.copy_from_slice(upper);
        self.rasterized = false;
        Ok(())
    }

    /// Compute the derived grid representation from the current configuration.
    ///
    /// Distributes `nodes[d]` lattice positions between `lower[d]` and
    /// `upper[d]` on every axis, with the first node exactly on the lower
    /// bound and the last node exactly on the upper bound, and precomputes the
    /// mixed-radix index strides used by the flat/dim index conversions.
    ///
    /// Must be called after configuration and before any query; idempotent for
    /// an unchanged configuration. Allocates the per-axis coordinate tables
    /// and is therefore not real-time safe.
    ///
    /// # Errors
    /// [`GridError::ZeroDimension`] if no dimensions are configured;
    /// [`GridError::DegenerateAxis`] if any axis has fewer than 2 nodes or an
    /// extent with `upper <= lower`. A zero-width axis is rejected because its
    /// inverse stride would be infinite, poisoning every point query.
    pub fn rasterize(&mut self) -> Result<()> {
        if self.dim == 0 {
            return Err(GridError::ZeroDimension);
        }
        for d in 0..self.dim {
            if self.nodes[d] < 2 || self.upper[d] <= self.lower[d] {
                return Err(GridError::DegenerateAxis {
                    axis: d,
                    nodes: self.nodes[d],
                    lower: self.lower[d],
                    upper: self.upper[d],
                });
            }
        }

        self.node_count = self.nodes.iter().map(|&n| n as usize).product();

        // Mixed-radix strides in index space: dimension 0 varies fastest.
        self.index_stride.clear();
        self.index_stride.reserve(self.dim);
        let mut acc = 1usize;
        for d in 0..self.dim {
            self.index_stride.push(acc);
            acc *= self.nodes[d] as usize;
        }

        // Per-axis cell widths and coordinate tables.
        self.stride.clear();
        self.stride_inv.clear();
        self.raster.clear();
        for d in 0..self.dim {
            let n = self.nodes[d] as usize;
            let stride = (self.upper[d] - self.lower[d]) / (n - 1) as f64;
            self.stride.push(stride);
            self.stride_inv.push(1.0 / stride);

            let mut axis = Vec::with_capacity(n);
            for i in 0..n {
                axis.push(self.lower[d] + i as f64 * stride);
            }
            // Pin the endpoint so the last node lands exactly on the upper
            // bound regardless of rounding in the stride.
            axis[n - 1] = self.upper[d];
            self.raster.push(axis);
        }

        self.rasterized = true;
        Ok(())
    }

    /// Number of dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total number of grid nodes. Zero until the grid has been rasterized.
    #[inline]
    pub fn node_count(&self) -> usize {
        if self.rasterized {
            self.node_count
        } else {
            0
        }
    }

    /// Configured node counts per axis.
    #[inline]
    pub fn nodes_per_dim(&self) -> &[u32] {
        &self.nodes
    }

    /// Lower bound of the extent per axis.
    #[inline]
    pub fn lower_bound(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bound of the extent per axis.
    #[inline]
    pub fn upper_bound(&self) -> &[f64] {
        &self.upper
    }

    /// Whether the derived raster is current for the configuration.
    #[inline]
    pub fn is_rasterized(&self) -> bool {
        self.rasterized
    }

    /// Cell width per axis.
    ///
    /// # Errors
    /// [`GridError::NotRasterized`] before `rasterize()`.
    pub fn stride(&self) -> Result<&[f64]> {
        self.ensure_rasterized()?;
        Ok(&self.stride)
    }

    /// The ordered node coordinates along one axis.
    ///
    /// The table has `nodes_per_dim()[axis]` entries; the first equals the
    /// lower bound and the last equals the upper bound exactly.
    ///
    /// # Errors
    /// [`GridError::NotRasterized`] before `rasterize()`;
    /// [`GridError::AxisIndexOutOfRange`] for an invalid axis.
    pub fn axis_coordinates(&self, axis: usize) -> Result<&[f64]> {
        self.ensure_rasterized()?;
        if axis >= self.dim {
            return Err(GridError::AxisIndexOutOfRange {
                axis,
                index: 0,
                nodes: 0,
            });
        }
        Ok(&self.raster[axis])
    }

    #[inline]
    pub(crate) fn ensure_rasterized(&self) -> Result<()> {
        if self.rasterized {
            Ok(())
        } else {
            Err(GridError::NotRasterized)
        }
    }

    #[inline]
    pub(crate) fn stride_inv_raw(&self) -> &[f64] {
        &self.stride_inv
    }

    #[inline]
    pub(crate) fn index_stride_raw(&self) -> &[usize] {
        &self.index_stride
    }

    #[inline]
    pub(crate) fn raster_raw(&self) -> &[Vec<f64>] {
        &self.raster
    }

    #[inline]
    pub(crate) fn node_count_raw(&self) -> usize {
        self.node_count
    }

    fn check_len(&self, got: usize) -> Result<()> {
        if got == self.dim {
            Ok(())
        } else {
            Err(GridError::DimensionMismatch {
                expected: self.dim,
                got,
            })
        }
    }
}

impl UniformGrid {
    /// Build a rasterized grid in one call.
    ///
    /// Convenience constructor equivalent to the set/rasterize sequence, with
    /// the dimension count taken from the length of `nodes`.
    ///
    /// # Example
    ///
    /// ```
    /// use unigrid::UniformGrid;
    ///
    /// let grid = UniformGrid::rasterized(&[3, 3], &[0.0, 0.0], &[2.0, 2.0])?;
    /// assert_eq!(grid.node_count(), 9);
    /// # Ok::<(), unigrid::GridError>(())
    /// ```
    pub fn rasterized(nodes: &[u32], lower: &[f64], upper: &[f64]) -> Result<Self> {
        let mut g = UniformGrid::new();
        g.set_dim(nodes.len());
        g.set_nodes(nodes)?;
        g.set_lower(lower)?;
        g.set_upper(upper)?;
        g.rasterize()?;
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x3() -> UniformGrid {
        UniformGrid::rasterized(&[3, 3], &[0.0, 0.0], &[2.0, 2.0]).unwrap()
    }

    #[test]
    fn test_rasterize_derived_state() {
        let g = grid_3x3();
        assert_eq!(g.node_count(), 9);
        assert_eq!(g.stride().unwrap(), &[1.0, 1.0]);
        assert_eq!(g.axis_coordinates(0).unwrap(), &[0.0, 1.0, 2.0]);
        assert_eq!(g.axis_coordinates(1).unwrap(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rasterize_idempotent() {
        let mut g = grid_3x3();
        let before = g.clone();
        g.rasterize().unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn test_boundary_exactness() {
        let g = UniformGrid::rasterized(&[7], &[0.1], &[0.8]).unwrap();
        let axis = g.axis_coordinates(0).unwrap();
        assert_eq!(axis[0], 0.1);
        assert_eq!(axis[6], 0.8);
    }

    #[test]
    fn test_degenerate_node_count() {
        let mut g = UniformGrid::new();
        g.set_dim(2);
        g.set_nodes(&[3, 1]).unwrap();
        g.set_lower(&[0.0, 0.0]).unwrap();
        g.set_upper(&[1.0, 1.0]).unwrap();
        assert!(matches!(
            g.rasterize(),
            Err(GridError::DegenerateAxis { axis: 1, nodes: 1, .. })
        ));
    }

    #[test]
    fn test_degenerate_extent() {
        let mut g = UniformGrid::new();
        g.set_dim(1);
        g.set_nodes(&[5]).unwrap();
        g.set_lower(&[2.0]).unwrap();
        g.set_upper(&[2.0]).unwrap();
        assert!(matches!(g.rasterize(), Err(GridError::DegenerateAxis { .. })));

        g.set_upper(&[1.0]).unwrap();
        assert!(matches!(g.rasterize(), Err(GridError::DegenerateAxis { .. })));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut g = UniformGrid::new();
        g.set_dim(3);
        assert!(matches!(
            g.set_nodes(&[3, 3]),
            Err(GridError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
        assert!(matches!(
            g.set_lower(&[0.0; 4]),
            Err(GridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_setters_invalidate_raster() {
        let mut g = grid_3x3();
        assert!(g.is_rasterized());
        g.set_upper(&[4.0, 4.0]).unwrap();
        assert!(!g.is_rasterized());
        assert_eq!(g.stride(), Err(GridError::NotRasterized));
        assert_eq!(g.node_count(), 0);

        g.rasterize().unwrap();
        assert_eq!(g.stride().unwrap(), &[2.0, 2.0]);
    }

    #[test]
    fn test_set_nodes_uniform() {
        let mut g = UniformGrid::new();
        g.set_dim(3);
        g.set_nodes_uniform(11);
        assert_eq!(g.nodes_per_dim(), &[11, 11, 11]);
    }

    #[test]
    fn test_rasterize_zero_dim() {
        let mut g = UniformGrid::new();
        assert_eq!(g.rasterize(), Err(GridError::ZeroDimension));
    }

    #[test]
    fn test_query_before_rasterize() {
        let g = UniformGrid::new();
        assert_eq!(g.stride(), Err(GridError::NotRasterized));
        assert_eq!(g.axis_coordinates(0), Err(GridError::NotRasterized));
    }
}
