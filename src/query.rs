//! Query operations over a rasterized [`UniformGrid`].
//!
//! Index and coordinate conversions are O(D) and allocation-free when the
//! `_into` variants are used; [`UniformGrid::neighborhood`] and
//! [`UniformGrid::enveloping_nodes`] allocate their result vector and are not
//! real-time safe.
//!
//! Every operation here requires a rasterized grid and fails with
//! [`GridError::NotRasterized`] otherwise, so stale derived state is never
//! read silently after a reconfiguration.

use rand::Rng;

use crate::error::{GridError, Result};
use crate::grid::UniformGrid;

impl UniformGrid {
    /// Convert a dim index to a flat index.
    ///
    /// Fast path: per-axis bounds are not validated (an out-of-range
    /// component produces a nonsensical flat index). Use
    /// [`UniformGrid::checked_flat_index`] when the input is untrusted.
    ///
    /// # Errors
    /// [`GridError::NotRasterized`] before `rasterize()`.
    #[inline]
    pub fn flat_index(&self, idx: &[u32]) -> Result<usize> {
        self.ensure_rasterized()?;
        debug_assert_eq!(idx.len(), self.dim());
        Ok(self.flat_unchecked(idx))
    }

    /// Convert a dim index to a flat index, validating every component.
    ///
    /// # Errors
    /// [`GridError::DimensionMismatch`] for a wrong-length index,
    /// [`GridError::AxisIndexOutOfRange`] when `idx[d] >= nodes_per_dim()[d]`.
    pub fn checked_flat_index(&self, idx: &[u32]) -> Result<usize> {
        self.ensure_rasterized()?;
        if idx.len() != self.dim() {
            return Err(GridError::DimensionMismatch {
                expected: self.dim(),
                got: idx.len(),
            });
        }
        for (d, (&i, &n)) in idx.iter().zip(self.nodes_per_dim()).enumerate() {
            if i >= n {
                return Err(GridError::AxisIndexOutOfRange {
                    axis: d,
                    index: i,
                    nodes: n,
                });
            }
        }
        Ok(self.flat_unchecked(idx))
    }

    /// Convert a flat index to a dim index.
    ///
    /// Inverse of [`UniformGrid::flat_index`]; the round trip is exact for
    /// every flat index in `[0, node_count)`. A flat index past the node
    /// count wraps around per axis; use [`UniformGrid::checked_dim_index`]
    /// when the input is untrusted.
    ///
    /// # Errors
    /// [`GridError::NotRasterized`] before `rasterize()`.
    pub fn dim_index(&self, flat: usize) -> Result<Vec<u32>> {
        self.ensure_rasterized()?;
        let mut out = vec![0u32; self.dim()];
        self.dim_index_digits(flat, &mut out);
        Ok(out)
    }

    /// Allocation-free variant of [`UniformGrid::dim_index`], writing the
    /// result into `out`.
    #[inline]
    pub fn dim_index_into(&self, flat: usize, out: &mut [u32]) -> Result<()> {
        self.ensure_rasterized()?;
        debug_assert_eq!(out.len(), self.dim());
        self.dim_index_digits(flat, out);
        Ok(())
    }

    /// Convert a flat index to a dim index, validating the range.
    ///
    /// # Errors
    /// [`GridError::FlatIndexOutOfRange`] when `flat >= node_count()`.
    pub fn checked_dim_index(&self, flat: usize) -> Result<Vec<u32>> {
        self.ensure_rasterized()?;
        if flat >= self.node_count_raw() {
            return Err(GridError::FlatIndexOutOfRange {
                index: flat,
                node_count: self.node_count_raw(),
            });
        }
        self.dim_index(flat)
    }

    /// Continuous coordinates of the node at a dim index.
    ///
    /// # Panics
    /// Panics if any index component is out of range for its axis.
    ///
    /// # Errors
    /// [`GridError::NotRasterized`] before `rasterize()`.
    pub fn node_coordinates(&self, idx: &[u32]) -> Result<Vec<f64>> {
        self.ensure_rasterized()?;
        debug_assert_eq!(idx.len(), self.dim());
        let raster = self.raster_raw();
        Ok(idx
            .iter()
            .enumerate()
            .map(|(d, &i)| raster[d][i as usize])
            .collect())
    }

    /// Allocation-free variant of [`UniformGrid::node_coordinates`].
    #[inline]
    pub fn node_coordinates_into(&self, idx: &[u32], out: &mut [f64]) -> Result<()> {
        self.ensure_rasterized()?;
        debug_assert_eq!(idx.len(), self.dim());
        debug_assert_eq!(out.len(), self.dim());
        let raster = self.raster_raw();
        for (d, &i) in idx.iter().enumerate() {
            out[d] = raster[d][i as usize];
        }
        Ok(())
    }

    /// Continuous coordinates of the node at a flat index.
    ///
    /// # Errors
    /// [`GridError::NotRasterized`] before `rasterize()`.
    pub fn node_coordinates_flat(&self, flat: usize) -> Result<Vec<f64>> {
        self.ensure_rasterized()?;
        let raster = self.raster_raw();
        let mut rem = flat;
        let mut out = Vec::with_capacity(self.dim());
        for d in 0..self.dim() {
            let n = self.nodes_per_dim()[d] as usize;
            out.push(raster[d][rem % n]);
            rem /= n;
        }
        Ok(out)
    }

    /// Dim index of the grid node nearest to a point.
    ///
    /// Out-of-range coordinates are silently clamped to the nearest valid
    /// lattice position; use [`UniformGrid::contains_point`] or
    /// [`UniformGrid::checked_nearest_node_index`] to distinguish in-bounds
    /// from out-of-bounds points. Ties exactly halfway between two nodes
    /// round away from zero (`f64::round`).
    pub fn nearest_node_index(&self, x: &[f64]) -> Result<Vec<u32>> {
        self.ensure_rasterized()?;
        let mut out = vec![0u32; self.dim()];
        self.nearest_digits(x, &mut out);
        Ok(out)
    }

    /// Allocation-free variant of [`UniformGrid::nearest_node_index`].
    #[inline]
    pub fn nearest_node_index_into(&self, x: &[f64], out: &mut [u32]) -> Result<()> {
        self.ensure_rasterized()?;
        debug_assert_eq!(out.len(), self.dim());
        self.nearest_digits(x, out);
        Ok(())
    }

    /// Flat index of the grid node nearest to a point.
    pub fn nearest_node_flat_index(&self, x: &[f64]) -> Result<usize> {
        self.ensure_rasterized()?;
        debug_assert_eq!(x.len(), self.dim());
        let strides = self.index_stride_raw();
        let inv = self.stride_inv_raw();
        let mut flat = 0usize;
        for d in 0..self.dim() {
            let n = self.nodes_per_dim()[d];
            let t = ((x[d] - self.lower_bound()[d]) * inv[d]).round();
            flat += t.clamp(0.0, (n - 1) as f64) as usize * strides[d];
        }
        Ok(flat)
    }

    /// Variant of [`UniformGrid::nearest_node_index`] that rejects points
    /// outside the grid extent instead of clamping.
    ///
    /// # Errors
    /// [`GridError::PointOutOfBounds`] for the first out-of-range axis.
    pub fn checked_nearest_node_index(&self, x: &[f64]) -> Result<Vec<u32>> {
        self.check_in_bounds(x)?;
        self.nearest_node_index(x)
    }

    /// Dim index of the "bottom left" node of the cell containing a point:
    /// the node with the smallest coordinate on every axis among those
    /// bounding the point's hyper-cell.
    ///
    /// The result is clamped to `[0, nodes_per_dim()[d] - 2]` per axis so
    /// that `idx[d] + 1` is always a valid node; out-of-range points are
    /// silently clamped onto the boundary cell.
    pub fn bottom_left_node_index(&self, x: &[f64]) -> Result<Vec<u32>> {
        self.ensure_rasterized()?;
        let mut out = vec![0u32; self.dim()];
        self.bottom_left_digits(x, &mut out);
        Ok(out)
    }

    /// Allocation-free variant of [`UniformGrid::bottom_left_node_index`].
    #[inline]
    pub fn bottom_left_node_index_into(&self, x: &[f64], out: &mut [u32]) -> Result<()> {
        self.ensure_rasterized()?;
        debug_assert_eq!(out.len(), self.dim());
        self.bottom_left_digits(x, out);
        Ok(())
    }

    /// Flat index of the "bottom left" node of the cell containing a point.
    pub fn bottom_left_flat_index(&self, x: &[f64]) -> Result<usize> {
        self.ensure_rasterized()?;
        debug_assert_eq!(x.len(), self.dim());
        let strides = self.index_stride_raw();
        let inv = self.stride_inv_raw();
        let mut flat = 0usize;
        for d in 0..self.dim() {
            let n = self.nodes_per_dim()[d];
            let t = ((x[d] - self.lower_bound()[d]) * inv[d]).floor();
            flat += t.clamp(0.0, (n - 2) as f64) as usize * strides[d];
        }
        Ok(flat)
    }

    /// Variant of [`UniformGrid::bottom_left_node_index`] that rejects points
    /// outside the grid extent instead of clamping.
    ///
    /// # Errors
    /// [`GridError::PointOutOfBounds`] for the first out-of-range axis.
    pub fn checked_bottom_left_node_index(&self, x: &[f64]) -> Result<Vec<u32>> {
        self.check_in_bounds(x)?;
        self.bottom_left_node_index(x)
    }

    /// Flat indices of all nodes within `radius` steps of `center` on every
    /// axis, clipped to the grid and excluding the center itself.
    ///
    /// The enumerated set is the axis-aligned box `[center[d] - radius,
    /// center[d] + radius]` per axis (a Chebyshev ball in index space),
    /// traversed in row-major order with dimension 0 varying fastest.
    /// `radius == 0` yields an empty result.
    ///
    /// Allocates the result vector; not real-time safe.
    ///
    /// # Errors
    /// [`GridError::DimensionMismatch`] / [`GridError::AxisIndexOutOfRange`]
    /// for an invalid center.
    pub fn neighborhood(&self, center: &[u32], radius: u32) -> Result<Vec<usize>> {
        let center_flat = self.checked_flat_index(center)?;

        let mut lo = vec![0u32; self.dim()];
        let mut hi = vec![0u32; self.dim()];
        for d in 0..self.dim() {
            lo[d] = center[d].saturating_sub(radius);
            hi[d] = (center[d] + radius).min(self.nodes_per_dim()[d] - 1);
        }
        Ok(self.enumerate_box(&lo, &hi, Some(center_flat)))
    }

    /// Variant of [`UniformGrid::neighborhood`] taking a flat center index.
    ///
    /// # Errors
    /// [`GridError::FlatIndexOutOfRange`] for an invalid center.
    pub fn neighborhood_flat(&self, center: usize, radius: u32) -> Result<Vec<usize>> {
        let idx = self.checked_dim_index(center)?;
        self.neighborhood(&idx, radius)
    }

    /// Flat indices of the interpolation stencil around a point: the nodes of
    /// the hyper-cell containing `x`, expanded by `radius` extra node layers
    /// per axis and clipped to the grid.
    ///
    /// Unlike [`UniformGrid::neighborhood`], every node in the box is
    /// included; for an in-range point, `radius == 0` yields exactly the
    /// `2^D` corners of the enclosing cell. The traversal order is row-major
    /// with dimension 0 varying fastest.
    ///
    /// Allocates the result vector; not real-time safe.
    pub fn enveloping_nodes(&self, x: &[f64], radius: u32) -> Result<Vec<usize>> {
        self.ensure_rasterized()?;
        debug_assert_eq!(x.len(), self.dim());

        let mut bl = vec![0u32; self.dim()];
        self.bottom_left_digits(x, &mut bl);

        let mut lo = vec![0u32; self.dim()];
        let mut hi = vec![0u32; self.dim()];
        for d in 0..self.dim() {
            lo[d] = bl[d].saturating_sub(radius);
            hi[d] = (bl[d] + radius + 1).min(self.nodes_per_dim()[d] - 1);
        }
        Ok(self.enumerate_box(&lo, &hi, None))
    }

    /// Whether a point lies within the grid extent, bounds inclusive.
    pub fn contains_point(&self, x: &[f64]) -> Result<bool> {
        self.ensure_rasterized()?;
        debug_assert_eq!(x.len(), self.dim());
        Ok(x.iter()
            .zip(self.lower_bound().iter().zip(self.upper_bound()))
            .all(|(&v, (&lo, &hi))| v >= lo && v <= hi))
    }

    /// Draw a point uniformly from the grid extent, with independent draws
    /// per axis.
    ///
    /// # Example
    ///
    /// ```
    /// use unigrid::UniformGrid;
    ///
    /// let grid = UniformGrid::rasterized(&[3, 3], &[0.0, 0.0], &[2.0, 2.0])?;
    /// let x = grid.uniform_sample(&mut rand::rng())?;
    /// assert!(grid.contains_point(&x)?);
    /// # Ok::<(), unigrid::GridError>(())
    /// ```
    pub fn uniform_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>> {
        self.ensure_rasterized()?;
        Ok(self
            .lower_bound()
            .iter()
            .zip(self.upper_bound())
            .map(|(&lo, &hi)| rng.random_range(lo..=hi))
            .collect())
    }

    #[inline]
    fn flat_unchecked(&self, idx: &[u32]) -> usize {
        idx.iter()
            .zip(self.index_stride_raw())
            .map(|(&i, &s)| i as usize * s)
            .sum()
    }

    #[inline]
    fn dim_index_digits(&self, flat: usize, out: &mut [u32]) {
        let mut rem = flat;
        for (d, slot) in out.iter_mut().enumerate() {
            let n = self.nodes_per_dim()[d] as usize;
            *slot = (rem % n) as u32;
            rem /= n;
        }
    }

    #[inline]
    fn nearest_digits(&self, x: &[f64], out: &mut [u32]) {
        debug_assert_eq!(x.len(), self.dim());
        let inv = self.stride_inv_raw();
        for d in 0..self.dim() {
            let n = self.nodes_per_dim()[d];
            let t = ((x[d] - self.lower_bound()[d]) * inv[d]).round();
            out[d] = t.clamp(0.0, (n - 1) as f64) as u32;
        }
    }

    #[inline]
    fn bottom_left_digits(&self, x: &[f64], out: &mut [u32]) {
        debug_assert_eq!(x.len(), self.dim());
        let inv = self.stride_inv_raw();
        for d in 0..self.dim() {
            let n = self.nodes_per_dim()[d];
            let t = ((x[d] - self.lower_bound()[d]) * inv[d]).floor();
            out[d] = t.clamp(0.0, (n - 2) as f64) as u32;
        }
    }

    fn check_in_bounds(&self, x: &[f64]) -> Result<()> {
        self.ensure_rasterized()?;
        debug_assert_eq!(x.len(), self.dim());
        for d in 0..self.dim() {
            let (lo, hi) = (self.lower_bound()[d], self.upper_bound()[d]);
            if x[d] < lo || x[d] > hi {
                return Err(GridError::PointOutOfBounds {
                    axis: d,
                    value: x[d],
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(())
    }

    /// Odometer traversal of the index-space box `[lo, hi]` (inclusive),
    /// dimension 0 varying fastest, optionally skipping one flat index.
    fn enumerate_box(&self, lo: &[u32], hi: &[u32], skip: Option<usize>) -> Vec<usize> {
        let count: usize = lo
            .iter()
            .zip(hi)
            .map(|(&l, &h)| (h - l + 1) as usize)
            .product();

        let mut out = Vec::with_capacity(count);
        let mut cursor = lo.to_vec();
        for _ in 0..count {
            let flat = self.flat_unchecked(&cursor);
            if Some(flat) != skip {
                out.push(flat);
            }
            let mut d = 0;
            while d < self.dim() {
                cursor[d] += 1;
                if cursor[d] <= hi[d] {
                    break;
                }
                cursor[d] = lo[d];
                d += 1;
            }
        }
        out
    }
}
