use super::{require_capacity, require_flat};
use crate::error::{Result, Z2rError};
use crate::kernel::{Xor, apply_binary_assign};
use crate::policy::ExecutionPolicy;
use crate::records::{PackedRecords, Shape, set_record_bit};

/// Reduced row echelon form together with its pivot columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchelonForm {
    /// Reduced matrix, shaped like the input.
    pub reduced: PackedRecords,
    /// Pivot column of each nonzero row, increasing.
    pub rank_profile: Vec<usize>,
}

impl EchelonForm {
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank_profile.len()
    }
}

/// Reduces `matrix` to reduced row echelon form over its first `num_bits` columns.
///
/// Pivot columns are scanned left to right; the first row at or below the current
/// pivot row with a set bit is swapped up and XORed into every other row with a
/// set bit in that column. Bits beyond `num_bits` ride along with their rows.
///
/// # Errors
///
/// [`Z2rError::UnsupportedShape`] for arrays of rank 2 or more and
/// [`Z2rError::BitWidthExceeded`] when `num_bits` exceeds the record capacity.
///
/// # Examples
///
/// ```
/// use z2r::{ExecutionPolicy, PackedRecords, linalg};
///
/// let matrix = PackedRecords::new(vec![0b110, 0b011, 0b101], 1, [3]).unwrap();
/// let form = linalg::echelonize(&matrix, 3, ExecutionPolicy::default()).unwrap();
/// assert_eq!(form.rank_profile, vec![0, 1]);
/// assert_eq!(form.reduced.as_bytes(), &[0b101, 0b110, 0b000]);
/// ```
pub fn echelonize(matrix: &PackedRecords, num_bits: usize, policy: ExecutionPolicy) -> Result<EchelonForm> {
    require_flat(matrix, "row_echelon")?;
    require_capacity(matrix, num_bits)?;
    tracing::debug!(rows = matrix.element_count(), num_bits, "row echelon");

    let mut augmented = Augmented::new(matrix, None);
    let rank_profile = augmented.eliminate(num_bits, policy);
    let (reduced, _) = augmented.split();
    Ok(EchelonForm {
        reduced: PackedRecords::from_parts(reduced, matrix.itemsize(), matrix.shape().clone()),
        rank_profile,
    })
}

/// Reduced row echelon form of `matrix`; see [`echelonize`].
///
/// # Errors
///
/// See [`echelonize`].
pub fn row_echelon(matrix: &PackedRecords, num_bits: usize, policy: ExecutionPolicy) -> Result<PackedRecords> {
    Ok(echelonize(matrix, num_bits, policy)?.reduced)
}

/// Dimension of the row space spanned by the first `num_bits` columns.
///
/// # Errors
///
/// See [`echelonize`].
pub fn rank(matrix: &PackedRecords, num_bits: usize, policy: ExecutionPolicy) -> Result<usize> {
    Ok(echelonize(matrix, num_bits, policy)?.rank())
}

/// Inverse of a square bit matrix by Gauss-Jordan elimination on `[matrix | identity]`.
///
/// The result has the same itemsize as the input.
///
/// # Errors
///
/// - [`Z2rError::UnsupportedShape`] unless `matrix` has rank 1
/// - [`Z2rError::NotSquare`] unless `num_bits` equals the number of records
/// - [`Z2rError::BitWidthExceeded`] when `num_bits` exceeds the record capacity
/// - [`Z2rError::SingularMatrix`] naming the first column without a pivot
pub fn gauss_jordan_inverse(matrix: &PackedRecords, num_bits: usize, policy: ExecutionPolicy) -> Result<PackedRecords> {
    if matrix.rank() != 1 {
        return Err(Z2rError::UnsupportedShape {
            operation: "gauss_jordan_inverse",
            rank: matrix.rank(),
        });
    }
    let rows = matrix.element_count();
    if num_bits != rows {
        return Err(Z2rError::NotSquare { rows, num_bits });
    }
    require_capacity(matrix, num_bits)?;
    tracing::debug!(rows, "gauss-jordan inverse");

    let mut identity = PackedRecords::zeros([rows], matrix.itemsize());
    for index in 0..rows {
        set_record_bit(identity.record_mut(index), index, true);
    }
    let mut augmented = Augmented::new(matrix, Some(&identity));
    let rank_profile = augmented.eliminate(num_bits, policy);
    if rank_profile.len() < rows {
        let column = rank_profile
            .iter()
            .enumerate()
            .find(|(expected, column)| *expected != **column)
            .map_or(rank_profile.len(), |(expected, _)| expected);
        return Err(Z2rError::SingularMatrix { column });
    }
    let (_, inverse) = augmented.split();
    Ok(PackedRecords::from_parts(inverse, matrix.itemsize(), Shape::from([rows])))
}

/// Private working copy of `[left | right]`, one row per record.
struct Augmented {
    data: Vec<u8>,
    width: usize,
    left_width: usize,
    row_count: usize,
}

impl Augmented {
    fn new(left: &PackedRecords, right: Option<&PackedRecords>) -> Self {
        let row_count = left.element_count();
        let left_width = left.itemsize();
        let right_width = right.map_or(0, PackedRecords::itemsize);
        let width = left_width + right_width;
        let mut data = Vec::with_capacity(row_count * width);
        for index in 0..row_count {
            data.extend_from_slice(left.record(index));
            if let Some(right) = right {
                data.extend_from_slice(right.record(index));
            }
        }
        Self {
            data,
            width,
            left_width,
            row_count,
        }
    }

    fn row(&self, index: usize) -> &[u8] {
        &self.data[index * self.width..(index + 1) * self.width]
    }

    fn has_bit(&self, row_index: usize, column: usize) -> bool {
        (self.data[row_index * self.width + column / 8] >> (column % 8)) & 1 == 1
    }

    fn pivot_of(&self, starting_row: usize, column: usize) -> Option<usize> {
        (starting_row..self.row_count).find(|&row_index| self.has_bit(row_index, column))
    }

    fn swap_rows(&mut self, first: usize, second: usize) {
        if first == second {
            return;
        }
        let (low, high) = (first.min(second), first.max(second));
        let (head, tail) = self.data.split_at_mut(high * self.width);
        head[low * self.width..(low + 1) * self.width].swap_with_slice(&mut tail[..self.width]);
    }

    /// XORs the pivot row into every other row with a set bit in `column`.
    fn reduce(&mut self, pivot_row: usize, column: usize, policy: ExecutionPolicy) {
        let pivot = self.row(pivot_row).to_vec();
        let (byte, mask) = (column / 8, 1u8 << (column % 8));
        let work = self.data.len() / 8;
        policy.for_each_record_mut(&mut self.data, self.width, work, |row_index, row| {
            if row_index != pivot_row && row[byte] & mask != 0 {
                apply_binary_assign::<Xor>(row, &pivot);
            }
        });
    }

    fn eliminate(&mut self, num_bits: usize, policy: ExecutionPolicy) -> Vec<usize> {
        let mut rank_profile = Vec::with_capacity(num_bits.min(self.row_count));
        for column in 0..num_bits {
            let pivot_row = rank_profile.len();
            if pivot_row == self.row_count {
                break;
            }
            let Some(found) = self.pivot_of(pivot_row, column) else {
                continue;
            };
            self.swap_rows(found, pivot_row);
            self.reduce(pivot_row, column, policy);
            rank_profile.push(column);
        }
        rank_profile
    }

    fn split(self) -> (Vec<u8>, Vec<u8>) {
        let mut left = Vec::with_capacity(self.row_count * self.left_width);
        let mut right = Vec::with_capacity(self.row_count * (self.width - self.left_width));
        for index in 0..self.row_count {
            let (left_part, right_part) = self.row(index).split_at(self.left_width);
            left.extend_from_slice(left_part);
            right.extend_from_slice(right_part);
        }
        (left, right)
    }
}
