//! Linear algebra over GF(2) on packed records.
//!
//! A flat array of `N` records whose first `num_bits` bits are meaningful is read
//! as an `N × num_bits` bit matrix: record `i` is row `i`, bit `j` of the record
//! is column `j`.

mod concat;
mod echelon;
mod matmul;
mod transpose;
mod unpack;

pub use concat::concatenate;
pub use echelon::{EchelonForm, echelonize, gauss_jordan_inverse, rank, row_echelon};
pub use matmul::matmul;
pub use transpose::transpose;
pub use unpack::{UnpackedBits, unpack_bits};

use crate::error::{Result, Z2rError};
use crate::records::PackedRecords;

/// Accepts scalar and rank-1 arrays as bit matrices.
fn require_flat(records: &PackedRecords, operation: &'static str) -> Result<()> {
    if records.rank() > 1 {
        return Err(Z2rError::UnsupportedShape {
            operation,
            rank: records.rank(),
        });
    }
    Ok(())
}

fn require_capacity(records: &PackedRecords, num_bits: usize) -> Result<()> {
    if num_bits > records.bit_capacity() {
        return Err(Z2rError::BitWidthExceeded {
            num_bits,
            capacity: records.bit_capacity(),
        });
    }
    Ok(())
}
