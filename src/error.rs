//! Error types for unigrid operations.

use thiserror::Error;

/// Errors that can occur during grid configuration, rasterization, queries,
/// and persistence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A per-axis argument did not have exactly one value per dimension.
    #[error("dimension mismatch: expected {expected} values, got {got}")]
    DimensionMismatch {
        /// Number of values required (the grid's dimension count).
        expected: usize,
        /// Number of values provided.
        got: usize,
    },

    /// The grid has no dimensions configured.
    #[error("grid has zero dimensions: call set_dim() first")]
    ZeroDimension,

    /// An axis cannot be rasterized: fewer than two nodes, or an empty or
    /// inverted extent.
    #[error("degenerate axis {axis}: {nodes} nodes over [{lower}, {upper}]")]
    DegenerateAxis {
        /// The offending axis.
        axis: usize,
        /// Configured node count on that axis.
        nodes: u32,
        /// Lower bound on that axis.
        lower: f64,
        /// Upper bound on that axis.
        upper: f64,
    },

    /// A per-axis index component exceeds the node count on its axis.
    #[error("index {index} out of range on axis {axis} with {nodes} nodes")]
    AxisIndexOutOfRange {
        /// The offending axis.
        axis: usize,
        /// The out-of-range index component.
        index: u32,
        /// Node count on that axis.
        nodes: u32,
    },

    /// A flat index is not in `[0, node_count)`.
    #[error("flat index {index} out of range for {node_count} nodes")]
    FlatIndexOutOfRange {
        /// The out-of-range flat index.
        index: usize,
        /// Total number of grid nodes.
        node_count: usize,
    },

    /// A continuous coordinate lies outside the grid extent (checked
    /// conversion variants only; the plain variants clamp silently).
    #[error("coordinate {value} on axis {axis} is outside [{lower}, {upper}]")]
    PointOutOfBounds {
        /// The offending axis.
        axis: usize,
        /// The out-of-range coordinate.
        value: f64,
        /// Lower bound on that axis.
        lower: f64,
        /// Upper bound on that axis.
        upper: f64,
    },

    /// A query was invoked before `rasterize()`, or after the configuration
    /// changed without re-rasterizing.
    #[error("grid not rasterized: call rasterize() after configuration")]
    NotRasterized,

    /// Invalid data encountered while loading a grid file.
    #[error("invalid grid file: {message}")]
    InvalidFormat {
        /// Description of the format error.
        message: &'static str,
    },

    /// The grid file was written by an incompatible format version.
    #[error("unsupported grid format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file header.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },

    /// I/O error during save or load.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::Io(err.to_string())
    }
}

/// Result type alias for unigrid operations.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(format!("{}", err), "dimension mismatch: expected 3 values, got 2");

        let err = GridError::NotRasterized;
        assert!(format!("{}", err).contains("rasterize()"));

        let err = GridError::AxisIndexOutOfRange {
            axis: 1,
            index: 9,
            nodes: 5,
        };
        assert!(format!("{}", err).contains("axis 1"));
        assert!(format!("{}", err).contains("9"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(GridError::NotRasterized, GridError::NotRasterized);
        assert_ne!(
            GridError::NotRasterized,
            GridError::DimensionMismatch {
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: GridError = io.into();
        assert!(matches!(err, GridError::Io(_)));
    }
}
