use super::{require_capacity, require_flat};
use crate::error::{Result, Z2rError};
use crate::kernel::{Xor, apply_binary_assign};
use crate::policy::ExecutionPolicy;
use crate::records::{PackedRecords, bytes_for_bits, mask_record_tail, record_support};

/// Product `A · B` of bit matrices over GF(2).
///
/// `A` has `a_num_bits` columns and must therefore be multiplied with a `B` of
/// `a_num_bits` records. Row `i` of the result is the XOR of the rows `k` of `B`
/// for which bit `k` of row `i` of `A` is set, truncated to `b_num_bits` bits and
/// stored in records of `ceil(b_num_bits / 8)` bytes.
///
/// # Errors
///
/// - [`Z2rError::UnsupportedShape`] for operands of rank 2 or more
/// - [`Z2rError::BitWidthExceeded`] when a bit count exceeds its record capacity
/// - [`Z2rError::InnerDimensionMismatch`] when `a_num_bits` differs from the number of rows of `B`
///
/// # Examples
///
/// ```
/// use z2r::{ExecutionPolicy, PackedRecords, linalg};
///
/// let a = PackedRecords::new(vec![0b01, 0b11], 1, [2]).unwrap();
/// let b = PackedRecords::new(vec![0b110, 0b011], 1, [2]).unwrap();
/// let product = linalg::matmul(&a, &b, 2, 3, ExecutionPolicy::default()).unwrap();
/// assert_eq!(product.as_bytes(), &[0b110, 0b101]);
/// ```
pub fn matmul(
    a: &PackedRecords,
    b: &PackedRecords,
    a_num_bits: usize,
    b_num_bits: usize,
    policy: ExecutionPolicy,
) -> Result<PackedRecords> {
    require_flat(a, "matmul")?;
    require_flat(b, "matmul")?;
    require_capacity(a, a_num_bits)?;
    require_capacity(b, b_num_bits)?;
    if a_num_bits != b.element_count() {
        return Err(Z2rError::InnerDimensionMismatch {
            columns: a_num_bits,
            rows: b.element_count(),
        });
    }

    let rows = a.element_count();
    let out_itemsize = bytes_for_bits(b_num_bits);
    tracing::debug!(rows, inner = a_num_bits, columns = b_num_bits, "matmul");

    let mut product = PackedRecords::zeros([rows], out_itemsize);
    let work = rows * a_num_bits * out_itemsize.div_ceil(8);
    policy.for_each_record_mut(product.as_bytes_mut(), out_itemsize, work, |row_index, output| {
        for inner in record_support(a.record(row_index)).take_while(|&inner| inner < a_num_bits) {
            apply_binary_assign::<Xor>(output, &b.record(inner)[..out_itemsize]);
        }
        mask_record_tail(output, b_num_bits);
    });
    Ok(product)
}
