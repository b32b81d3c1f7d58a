//! Explicit matrix representations of Pauli strings.
//!
//! Basis state `r` of `n` qubits is the integer whose bit `q` is the state of
//! qubit `q`.

use crate::error::{PauliError, Result};
use crate::phase::Phase;
use num_complex::Complex64;
use z2r::Z2rError;

/// Largest qubit count accepted by [`sparse_matrix`].
pub const MAX_SPARSE_QUBITS: usize = 24;

/// Largest qubit count accepted by [`DenseMatrix`] constructors.
pub const MAX_MATRIX_QUBITS: usize = 12;

/// Coordinate form of `Z^z X^x`: one nonzero entry per row.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsePauliMatrix {
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
    pub values: Vec<f64>,
}

/// `Z^z X^x` without the `(-i)^{z·x}` factor: row `r`, column `r ^ x`, value `(-1)^{popcount(r & z)}`.
///
/// `z` and `x` hold at least `num_qubits` bits, least-significant bit first.
///
/// # Errors
///
/// [`PauliError::TooManyQubits`] beyond [`MAX_SPARSE_QUBITS`], and
/// [`Z2rError::BitWidthExceeded`] when `z` or `x` holds fewer than `num_qubits` bits.
///
/// # Examples
///
/// ```
/// use pauliarray::matrix::sparse_matrix;
///
/// // Y on one qubit: Z·X = [[0, 1], [-1, 0]]
/// let matrix = sparse_matrix(&[1], &[1], 1).unwrap();
/// assert_eq!(matrix.rows, vec![0, 1]);
/// assert_eq!(matrix.columns, vec![1, 0]);
/// assert_eq!(matrix.values, vec![1.0, -1.0]);
/// ```
pub fn sparse_matrix(z: &[u8], x: &[u8], num_qubits: usize) -> Result<SparsePauliMatrix> {
    if num_qubits > MAX_SPARSE_QUBITS {
        return Err(PauliError::TooManyQubits {
            num_qubits,
            limit: MAX_SPARSE_QUBITS,
        });
    }
    if let Some(short) = [z, x].into_iter().find(|record| record.len() * 8 < num_qubits) {
        return Err(Z2rError::BitWidthExceeded {
            num_bits: num_qubits,
            capacity: short.len() * 8,
        }
        .into());
    }
    let z_mask = low_bits_as_integer(z, num_qubits);
    let x_mask = low_bits_as_integer(x, num_qubits);
    let dimension = 1usize << num_qubits;
    let rows: Vec<usize> = (0..dimension).collect();
    let columns = rows.iter().map(|&row| row ^ x_mask).collect();
    let values = rows
        .iter()
        .map(|&row| if (row & z_mask).count_ones() % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    Ok(SparsePauliMatrix { rows, columns, values })
}

fn low_bits_as_integer(record: &[u8], num_bits: usize) -> usize {
    (0..num_bits)
        .filter(|&bit| (record[bit / 8] >> (bit % 8)) & 1 == 1)
        .fold(0usize, |value, bit| value | (1 << bit))
}

/// Square complex matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    dimension: usize,
    entries: Vec<Complex64>,
}

impl DenseMatrix {
    /// Zero matrix acting on `num_qubits` qubits.
    ///
    /// # Errors
    ///
    /// [`PauliError::TooManyQubits`] beyond [`MAX_MATRIX_QUBITS`].
    pub fn zeros(num_qubits: usize) -> Result<Self> {
        if num_qubits > MAX_MATRIX_QUBITS {
            return Err(PauliError::TooManyQubits {
                num_qubits,
                limit: MAX_MATRIX_QUBITS,
            });
        }
        let dimension = 1usize << num_qubits;
        Ok(Self {
            dimension,
            entries: vec![Complex64::new(0.0, 0.0); dimension * dimension],
        })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Complex64 {
        self.entries[row * self.dimension + column]
    }

    #[must_use]
    pub fn entries(&self) -> &[Complex64] {
        &self.entries
    }

    /// Adds `phase · sparse` to this matrix.
    pub fn add_sparse(&mut self, sparse: &SparsePauliMatrix, phase: Phase) {
        let factor = phase.to_complex();
        for ((&row, &column), &value) in sparse.rows.iter().zip(&sparse.columns).zip(&sparse.values) {
            self.entries[row * self.dimension + column] += factor * value;
        }
    }

    /// Matrix product `self · other`.
    ///
    /// # Errors
    ///
    /// [`PauliError::DimensionMismatch`] when the matrices act on spaces of different dimension.
    pub fn matmul(&self, other: &DenseMatrix) -> Result<DenseMatrix> {
        if self.dimension != other.dimension {
            return Err(PauliError::DimensionMismatch {
                left: self.dimension,
                right: other.dimension,
            });
        }
        let dimension = self.dimension;
        let mut entries = vec![Complex64::new(0.0, 0.0); dimension * dimension];
        for row in 0..dimension {
            for inner in 0..dimension {
                let left = self.entries[row * dimension + inner];
                if left == Complex64::new(0.0, 0.0) {
                    continue;
                }
                for column in 0..dimension {
                    entries[row * dimension + column] += left * other.entries[inner * dimension + column];
                }
            }
        }
        Ok(DenseMatrix { dimension, entries })
    }

    #[must_use]
    pub fn scaled(&self, factor: Complex64) -> DenseMatrix {
        DenseMatrix {
            dimension: self.dimension,
            entries: self.entries.iter().map(|entry| entry * factor).collect(),
        }
    }
}
