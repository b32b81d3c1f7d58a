//! Elementwise bitwise kernels over [`PackedRecords`].
//!
//! The binary operations combine two arrays with the same itemsize and the same
//! number of records and return an array shaped like the first operand. Counting
//! operations return [`BitCounts`].

mod counts;
mod ops;

pub use counts::BitCounts;
pub use ops::{
    And, BinaryOp, Lane, Or, Xor, apply_binary, apply_binary_assign, apply_not, complement_low_bits, popcount, popcount_binary,
};

use crate::error::{Result, Z2rError};
use crate::policy::ExecutionPolicy;
use crate::records::PackedRecords;

/// Checks that `left` and `right` can be combined record by record.
///
/// # Errors
///
/// [`Z2rError::ItemsizeMismatch`] or [`Z2rError::LengthMismatch`], reporting both values.
pub fn check_compatible(left: &PackedRecords, right: &PackedRecords) -> Result<()> {
    if left.itemsize() != right.itemsize() {
        return Err(Z2rError::ItemsizeMismatch {
            left: left.itemsize(),
            right: right.itemsize(),
        });
    }
    if left.element_count() != right.element_count() {
        return Err(Z2rError::LengthMismatch {
            left: left.element_count(),
            right: right.element_count(),
        });
    }
    Ok(())
}

/// Applies `Op` to every pair of corresponding records.
///
/// # Errors
///
/// See [`check_compatible`].
pub fn bitwise_binary<Op: BinaryOp>(
    left: &PackedRecords,
    right: &PackedRecords,
    policy: ExecutionPolicy,
) -> Result<PackedRecords> {
    check_compatible(left, right)?;
    tracing::trace!(op = Op::NAME, bytes = left.as_bytes().len(), "bitwise kernel");
    let mut result = PackedRecords::zeros(left.shape().clone(), left.itemsize());
    policy.zip_chunks_mut(
        result.as_bytes_mut(),
        left.as_bytes(),
        right.as_bytes(),
        apply_binary::<Op>,
    );
    Ok(result)
}

/// Record-wise `left AND right`.
///
/// # Errors
///
/// See [`check_compatible`].
///
/// # Examples
///
/// ```
/// use z2r::{ExecutionPolicy, PackedRecords, kernel};
///
/// let left = PackedRecords::new(vec![0b1100, 0b1010], 1, [2]).unwrap();
/// let right = PackedRecords::new(vec![0b1010, 0b1010], 1, [2]).unwrap();
/// let both = kernel::bitwise_and(&left, &right, ExecutionPolicy::default()).unwrap();
/// assert_eq!(both.as_bytes(), &[0b1000, 0b1010]);
/// ```
pub fn bitwise_and(left: &PackedRecords, right: &PackedRecords, policy: ExecutionPolicy) -> Result<PackedRecords> {
    bitwise_binary::<And>(left, right, policy)
}

/// Record-wise `left XOR right`.
///
/// # Errors
///
/// See [`check_compatible`].
pub fn bitwise_xor(left: &PackedRecords, right: &PackedRecords, policy: ExecutionPolicy) -> Result<PackedRecords> {
    bitwise_binary::<Xor>(left, right, policy)
}

/// Record-wise `left OR right`.
///
/// # Errors
///
/// See [`check_compatible`].
pub fn bitwise_or(left: &PackedRecords, right: &PackedRecords, policy: ExecutionPolicy) -> Result<PackedRecords> {
    bitwise_binary::<Or>(left, right, policy)
}

/// Complements every bit, including padding bits beyond the caller's meaningful width.
pub fn bitwise_not(records: &PackedRecords, policy: ExecutionPolicy) -> PackedRecords {
    let mut result = PackedRecords::zeros(records.shape().clone(), records.itemsize());
    policy.zip_chunks_mut(
        result.as_bytes_mut(),
        records.as_bytes(),
        records.as_bytes(),
        |output, input, _| apply_not(output, input),
    );
    result
}

/// Complements the first `num_bits` bits of every record; padding bits keep their value.
///
/// # Errors
///
/// [`Z2rError::BitWidthExceeded`] when `num_bits` exceeds the record capacity.
///
/// # Examples
///
/// ```
/// use z2r::{ExecutionPolicy, PackedRecords, kernel};
///
/// let records = PackedRecords::new(vec![0b0000_0101, 0b1000_0000], 1, [2]).unwrap();
/// let flipped = kernel::bitwise_not_padded(&records, 3, ExecutionPolicy::default()).unwrap();
/// assert_eq!(flipped.as_bytes(), &[0b0000_0010, 0b1000_0111]);
/// ```
pub fn bitwise_not_padded(records: &PackedRecords, num_bits: usize, policy: ExecutionPolicy) -> Result<PackedRecords> {
    if num_bits > records.bit_capacity() {
        return Err(Z2rError::BitWidthExceeded {
            num_bits,
            capacity: records.bit_capacity(),
        });
    }
    let mut result = records.clone();
    let itemsize = result.itemsize();
    let work = words_of(records);
    policy.for_each_record_mut(result.as_bytes_mut(), itemsize, work, |_, record| {
        complement_low_bits(record, num_bits);
    });
    Ok(result)
}

/// Number of set bits in every record.
///
/// # Examples
///
/// ```
/// use z2r::{BitCounts, ExecutionPolicy, PackedRecords, kernel};
///
/// let scalar = PackedRecords::scalar(vec![0xff, 0x01]);
/// assert_eq!(kernel::bitwise_count(&scalar, ExecutionPolicy::default()), BitCounts::Scalar(9));
/// ```
pub fn bitwise_count(records: &PackedRecords, policy: ExecutionPolicy) -> BitCounts {
    let counts = policy.map_indices(records.element_count(), words_of(records), |index| {
        popcount(records.record(index))
    });
    BitCounts::from_counts(records.shape(), counts)
}

/// Number of set bits in `left AND right` for every pair of records.
///
/// # Errors
///
/// See [`check_compatible`].
pub fn bitwise_dot(left: &PackedRecords, right: &PackedRecords, policy: ExecutionPolicy) -> Result<BitCounts> {
    check_compatible(left, right)?;
    let counts = policy.map_indices(left.element_count(), words_of(left), |index| {
        popcount_binary::<And>(left.record(index), right.record(index))
    });
    Ok(BitCounts::from_counts(left.shape(), counts))
}

fn words_of(records: &PackedRecords) -> usize {
    records.as_bytes().len() / 8
}
