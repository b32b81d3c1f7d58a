//! Pauli algebra on the symplectic `(z, x)` encoding.
//!
//! An array of Pauli strings is a pair of [`PackedRecords`] of identical shape
//! and itemsize: bit `q` of the `z` record and of the `x` record of operator `i`
//! together encode the single-qubit Pauli acting on qubit `q` (see
//! [`PauliMatrix`](crate::PauliMatrix)). The operator encoded by `(z, x)` is the
//! Hermitian string `(-i)^{z·x} Z^z X^x`.

use crate::error::{PauliError, Result};
use crate::phase::Phase;
use num_complex::Complex64;
use rand::Rng;
use z2r::kernel::{bitwise_and, bitwise_count, bitwise_dot, bitwise_xor};
use z2r::records::mask_record_tail;
use z2r::{ExecutionPolicy, PackedRecords, Shape, Z2rError, bytes_for_bits};

/// Result of composing two operator arrays: `left · right = phase · P(z, x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub z: PackedRecords,
    pub x: PackedRecords,
    pub phases: Vec<Phase>,
}

impl Composition {
    #[must_use]
    pub fn complex_phases(&self) -> Vec<Complex64> {
        self.phases.iter().map(|phase| phase.to_complex()).collect()
    }
}

/// Checks that `z` and `x` can be the two halves of one operator array.
///
/// # Errors
///
/// [`Z2rError::ItemsizeMismatch`], [`Z2rError::RankMismatch`] or [`Z2rError::ShapeMismatch`].
pub fn check_halves(z: &PackedRecords, x: &PackedRecords) -> Result<()> {
    if z.itemsize() != x.itemsize() {
        return Err(Z2rError::ItemsizeMismatch {
            left: z.itemsize(),
            right: x.itemsize(),
        }
        .into());
    }
    if z.rank() != x.rank() {
        return Err(Z2rError::RankMismatch {
            left: z.rank(),
            right: x.rank(),
        }
        .into());
    }
    if let Some(axis) = (0..z.rank()).find(|&axis| z.shape()[axis] != x.shape()[axis]) {
        return Err(Z2rError::ShapeMismatch {
            left: z.shape().to_vec(),
            right: x.shape().to_vec(),
            axis,
        }
        .into());
    }
    Ok(())
}

fn check_operands(z1: &PackedRecords, x1: &PackedRecords, z2: &PackedRecords, x2: &PackedRecords) -> Result<()> {
    check_halves(z1, x1)?;
    check_halves(z2, x2)?;
    if z1.element_count() != z2.element_count() {
        return Err(PauliError::OperatorCountMismatch {
            left: z1.element_count(),
            right: z2.element_count(),
        });
    }
    if z1.itemsize() != z2.itemsize() {
        return Err(Z2rError::ItemsizeMismatch {
            left: z1.itemsize(),
            right: z2.itemsize(),
        }
        .into());
    }
    Ok(())
}

/// Whether operator `i` of the first array commutes with operator `i` of the second.
///
/// Two Pauli strings commute iff `popcount((z1 & x2) ^ (x1 & z2))` is even.
///
/// # Errors
///
/// Mismatched halves, operator counts or itemsizes.
pub fn commutes(
    z1: &PackedRecords,
    x1: &PackedRecords,
    z2: &PackedRecords,
    x2: &PackedRecords,
    policy: ExecutionPolicy,
) -> Result<Vec<bool>> {
    check_operands(z1, x1, z2, x2)?;
    let forward = bitwise_and(z1, x2, policy)?;
    let backward = bitwise_and(x1, z2, policy)?;
    let symplectic = bitwise_xor(&forward, &backward, policy)?;
    let counts = bitwise_count(&symplectic, policy);
    Ok(counts.values().iter().map(|count| count % 2 == 0).collect())
}

/// Products `left[i] · right[i]` with their phases.
///
/// The symplectic part is `(z1 ^ z2, x1 ^ x2)`. The phase is `(-i)^p` with
/// `p = 2·dot(x1, z2) + dot(z1, x1) + dot(z2, x2) - dot(z, x)` modulo 4.
///
/// # Errors
///
/// Mismatched halves, operator counts or itemsizes.
pub fn compose(
    z1: &PackedRecords,
    x1: &PackedRecords,
    z2: &PackedRecords,
    x2: &PackedRecords,
    policy: ExecutionPolicy,
) -> Result<Composition> {
    check_operands(z1, x1, z2, x2)?;
    tracing::debug!(operators = z1.element_count(), itemsize = z1.itemsize(), "compose");

    let z = bitwise_xor(z1, z2, policy)?;
    let x = bitwise_xor(x1, x2, policy)?;
    let crossed = bitwise_dot(x1, z2, policy)?;
    let left_y = bitwise_dot(z1, x1, policy)?;
    let right_y = bitwise_dot(z2, x2, policy)?;
    let product_y = bitwise_dot(&z, &x, policy)?;

    let phases = crossed
        .values()
        .iter()
        .zip(left_y.values())
        .zip(right_y.values())
        .zip(product_y.values())
        .map(|(((&crossed, &left_y), &right_y), &product_y)| {
            let gained = (2 * crossed + left_y + right_y) % 4;
            Phase::from_count(gained + 4 - product_y % 4)
        })
        .collect();
    Ok(Composition { z, x, phases })
}

/// Qubit-wise concatenation: operator `i` of the result acts as `left[i]` on
/// qubits `0..left_qubits` and as `right[i]` on qubits `left_qubits..left_qubits + right_qubits`.
///
/// Records of the result hold `bytes_for_bits(left_qubits + right_qubits)` bytes
/// and the result takes the shape of the left operand.
///
/// # Errors
///
/// Mismatched halves or operator counts, and qubit counts beyond the record capacity.
#[allow(clippy::too_many_arguments)]
pub fn tensor(
    z1: &PackedRecords,
    x1: &PackedRecords,
    left_qubits: usize,
    z2: &PackedRecords,
    x2: &PackedRecords,
    right_qubits: usize,
    policy: ExecutionPolicy,
) -> Result<(PackedRecords, PackedRecords)> {
    check_halves(z1, x1)?;
    check_halves(z2, x2)?;
    if z1.element_count() != z2.element_count() {
        return Err(PauliError::OperatorCountMismatch {
            left: z1.element_count(),
            right: z2.element_count(),
        });
    }
    for (records, num_qubits) in [(z1, left_qubits), (z2, right_qubits)] {
        if num_qubits > records.bit_capacity() {
            return Err(Z2rError::BitWidthExceeded {
                num_bits: num_qubits,
                capacity: records.bit_capacity(),
            }
            .into());
        }
    }
    tracing::debug!(operators = z1.element_count(), left_qubits, right_qubits, "tensor");
    Ok((
        concatenate_bits(z1, left_qubits, z2, right_qubits, policy),
        concatenate_bits(x1, left_qubits, x2, right_qubits, policy),
    ))
}

fn concatenate_bits(
    low: &PackedRecords,
    low_bits: usize,
    high: &PackedRecords,
    high_bits: usize,
    policy: ExecutionPolicy,
) -> PackedRecords {
    let itemsize = bytes_for_bits(low_bits + high_bits);
    let mut result = PackedRecords::zeros(low.shape().clone(), itemsize);
    let work = result.as_bytes().len() / 8;
    policy.for_each_record_mut(result.as_bytes_mut(), itemsize, work, |index, output| {
        or_bits_at(output, 0, low.record(index), low_bits);
        or_bits_at(output, low_bits, high.record(index), high_bits);
    });
    result
}

/// ORs the first `num_bits` bits of `source` into `target` starting at bit `offset`.
fn or_bits_at(target: &mut [u8], offset: usize, source: &[u8], num_bits: usize) {
    let (byte_offset, shift) = (offset / 8, offset % 8);
    let full_bytes = num_bits / 8;
    let remainder = num_bits % 8;
    let source_bytes = full_bytes + usize::from(remainder > 0);
    for (index, &byte) in source.iter().take(source_bytes).enumerate() {
        let value = if index == full_bytes { byte & ((1u8 << remainder) - 1) } else { byte };
        let position = byte_offset + index;
        target[position] |= value << shift;
        if shift > 0 && position + 1 < target.len() {
            target[position + 1] |= value >> (8 - shift);
        }
    }
}

/// Random Pauli strings: every `z` and `x` bit below `num_qubits` is an independent fair coin.
pub fn random<R: Rng + ?Sized>(shape: impl Into<Shape>, num_qubits: usize, rng: &mut R) -> (PackedRecords, PackedRecords) {
    let shape = shape.into();
    let z = PackedRecords::random_with_rng(shape.clone(), num_qubits, rng);
    let x = PackedRecords::random_with_rng(shape, num_qubits, rng);
    (z, x)
}

/// Clears the bits at positions `num_qubits` and above in every record.
pub(crate) fn clear_padding(records: &mut PackedRecords, num_qubits: usize) {
    let itemsize = records.itemsize();
    if itemsize == 0 {
        return;
    }
    for record in records.as_bytes_mut().chunks_exact_mut(itemsize) {
        mask_record_tail(record, num_qubits);
    }
}
