//! Error types for packed-record operations.

/// Result type for packed-record operations
pub type Result<T> = std::result::Result<T, Z2rError>;

/// Validation failures reported by kernels, deduplication and linear algebra.
///
/// Every operation validates its operands before allocating any output, so an
/// error always means that nothing was computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Z2rError {
    /// Buffer length does not match `element_count * itemsize`
    #[error("invalid buffer: {len} bytes cannot hold {element_count} records of {itemsize} bytes")]
    InvalidBuffer {
        len: usize,
        element_count: usize,
        itemsize: usize,
    },

    /// Operands have records of different widths
    #[error("records must have the same itemsize, got {left} and {right}")]
    ItemsizeMismatch { left: usize, right: usize },

    /// Operands hold a different number of records
    #[error("arrays must have the same number of records, got {left} and {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Operands disagree on an axis that must match
    #[error("shapes {left:?} and {right:?} differ on axis {axis}")]
    ShapeMismatch {
        left: Vec<usize>,
        right: Vec<usize>,
        axis: usize,
    },

    /// Operands have a different number of dimensions
    #[error("arrays must have the same rank, got {left} and {right}")]
    RankMismatch { left: usize, right: usize },

    /// The operation does not support arrays of this rank
    #[error("{operation} does not support arrays of rank {rank}")]
    UnsupportedShape { operation: &'static str, rank: usize },

    /// Axis is outside of `-rank..rank`
    #[error("axis {axis} is out of range for an array of rank {rank}")]
    AxisOutOfRange { axis: isize, rank: usize },

    /// More meaningful bits were requested than a record can hold
    #[error("{num_bits} bits exceed the capacity of {capacity} bits per record")]
    BitWidthExceeded { num_bits: usize, capacity: usize },

    /// Bits cannot be spread evenly over the records of a row
    #[error("{num_bits} bits cannot be split evenly over {columns} records per row")]
    UnevenBitSplit { num_bits: usize, columns: usize },

    /// Inverse requested for a non-square bit matrix
    #[error("matrix must be square, got {rows} rows of {num_bits} bits")]
    NotSquare { rows: usize, num_bits: usize },

    /// Matrix product with incompatible inner dimensions
    #[error("matrix product needs A columns ({columns}) to equal B rows ({rows})")]
    InnerDimensionMismatch { columns: usize, rows: usize },

    /// Gauss-Jordan elimination found no pivot
    #[error("matrix is singular: no pivot in column {column}")]
    SingularMatrix { column: usize },
}
