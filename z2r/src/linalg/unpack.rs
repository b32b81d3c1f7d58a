use crate::error::{Result, Z2rError};
use crate::records::{PackedRecords, record_bit};

/// Row-major table of bits, one byte (0 or 1) per bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedBits {
    rows: usize,
    num_bits: usize,
    bits: Vec<u8>,
}

impl UnpackedBits {
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.num_bits)
    }

    #[must_use]
    pub fn get(&self, row: usize, bit: usize) -> u8 {
        self.bits[row * self.num_bits + bit]
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        &self.bits[row * self.num_bits..(row + 1) * self.num_bits]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bits
    }
}

/// Expands packed records into a `(rows, num_bits)` table of 0/1 bytes.
///
/// For rank 1 every record contributes its first `num_bits` bits. For rank 2
/// every row of `C` records contributes `num_bits / C` bits from each record,
/// in record order.
///
/// # Errors
///
/// - [`Z2rError::UnsupportedShape`] unless the array has rank 1 or 2
/// - [`Z2rError::UnevenBitSplit`] when `num_bits` is not a multiple of the records per row
/// - [`Z2rError::BitWidthExceeded`] when a record would have to hold more bits than its capacity
///
/// # Examples
///
/// ```
/// use z2r::{PackedRecords, linalg};
///
/// let records = PackedRecords::new(vec![0b01, 0b10, 0b11, 0b00], 1, [2, 2]).unwrap();
/// let bits = linalg::unpack_bits(&records, 4).unwrap();
/// assert_eq!(bits.shape(), (2, 4));
/// assert_eq!(bits.row(0), &[1, 0, 0, 1]);
/// assert_eq!(bits.row(1), &[1, 1, 0, 0]);
/// ```
pub fn unpack_bits(records: &PackedRecords, num_bits: usize) -> Result<UnpackedBits> {
    if !(1..=2).contains(&records.rank()) {
        return Err(Z2rError::UnsupportedShape {
            operation: "unpack_bits",
            rank: records.rank(),
        });
    }
    let columns = records.records_per_row();
    let bits_per_record = match columns {
        0 if num_bits == 0 => 0,
        0 => return Err(Z2rError::UnevenBitSplit { num_bits, columns }),
        _ if num_bits % columns != 0 => return Err(Z2rError::UnevenBitSplit { num_bits, columns }),
        _ => num_bits / columns,
    };
    if bits_per_record > records.bit_capacity() {
        return Err(Z2rError::BitWidthExceeded {
            num_bits: bits_per_record,
            capacity: records.bit_capacity(),
        });
    }

    let rows = records.row_count();
    let mut bits = Vec::with_capacity(rows * num_bits);
    for index in 0..records.element_count() {
        let record = records.record(index);
        bits.extend((0..bits_per_record).map(|bit| u8::from(record_bit(record, bit))));
    }
    Ok(UnpackedBits { rows, num_bits, bits })
}
