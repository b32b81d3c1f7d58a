use crate::error::{Result, Z2rError};
use derive_more::{Deref, From, Into};
use rand::RngCore;
use smallvec::SmallVec;
use sorted_iter::{SortedIterator, assume::AssumeSortedByItemExt};
use std::fmt;

/// Dimensions of a [`PackedRecords`] array, outermost first. Empty for a scalar.
#[derive(Clone, PartialEq, Eq, Hash, Default, Deref, From, Into)]
pub struct Shape(SmallVec<[usize; 2]>);

impl Shape {
    #[must_use]
    pub fn scalar() -> Self {
        Shape(SmallVec::new())
    }

    /// Number of records addressed by this shape; 1 for a scalar.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.0.iter().product()
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.to_vec()
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape(SmallVec::from_slice(dims))
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape(SmallVec::from_slice(&dims))
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape(SmallVec::from_vec(dims))
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Owned array of fixed-width packed-bit records.
///
/// Each record is `itemsize` bytes; bit `j` of a record lives in byte `j / 8`
/// at position `j % 8`, least-significant bit first. The records are stored
/// contiguously in row-major order of `shape`, which has rank 0 (a single
/// scalar record), 1 or 2.
///
/// # Examples
///
/// ```
/// use z2r::PackedRecords;
///
/// let records = PackedRecords::new(vec![0b0000_0101, 0b0000_0010], 1, [2]).unwrap();
/// assert_eq!(records.element_count(), 2);
/// assert!(records.bit(0, 0));
/// assert!(records.bit(0, 2));
/// assert!(records.bit(1, 1));
/// ```
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PackedRecords {
    data: Vec<u8>,
    itemsize: usize,
    shape: Shape,
}

impl PackedRecords {
    /// Wraps `data` as records of `itemsize` bytes laid out with `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2rError::InvalidBuffer`] when `data.len()` differs from
    /// `element_count * itemsize`.
    pub fn new(data: Vec<u8>, itemsize: usize, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        let element_count = shape.element_count();
        if element_count.checked_mul(itemsize) != Some(data.len()) {
            return Err(Z2rError::InvalidBuffer {
                len: data.len(),
                element_count,
                itemsize,
            });
        }
        Ok(Self { data, itemsize, shape })
    }

    /// A single record holding all of `data`.
    pub fn scalar(data: Vec<u8>) -> Self {
        Self {
            itemsize: data.len(),
            data,
            shape: Shape::scalar(),
        }
    }

    pub fn zeros(shape: impl Into<Shape>, itemsize: usize) -> Self {
        let shape = shape.into();
        Self {
            data: vec![0u8; shape.element_count() * itemsize],
            itemsize,
            shape,
        }
    }

    /// Rank-1 array whose record `i` has bit `j` set iff `rows[i][j]`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2rError::LengthMismatch`] when a row does not have exactly `num_bits` entries.
    pub fn from_bit_rows<Row: AsRef<[bool]>>(rows: &[Row], num_bits: usize) -> Result<Self> {
        if let Some(row) = rows.iter().find(|row| row.as_ref().len() != num_bits) {
            return Err(Z2rError::LengthMismatch {
                left: row.as_ref().len(),
                right: num_bits,
            });
        }
        let mut records = Self::zeros([rows.len()], bytes_for_bits(num_bits));
        for (index, row) in rows.iter().enumerate() {
            let record = records.record_mut(index);
            for bit in row.as_ref().iter().enumerate().filter(|pair| *pair.1).map(|pair| pair.0) {
                set_record_bit(record, bit, true);
            }
        }
        Ok(records)
    }

    /// Records of `bytes_for_bits(num_bits)` bytes with each of the first `num_bits`
    /// bits set by an independent fair coin; padding bits are clear.
    pub fn random_with_rng<R: RngCore + ?Sized>(shape: impl Into<Shape>, num_bits: usize, rng: &mut R) -> Self {
        let mut records = Self::zeros(shape, bytes_for_bits(num_bits));
        rng.fill_bytes(&mut records.data);
        if records.itemsize > 0 {
            for record in records.data.chunks_exact_mut(records.itemsize) {
                mask_record_tail(record, num_bits);
            }
        }
        records
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    #[must_use]
    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    /// Bits available in one record.
    #[must_use]
    pub fn bit_capacity(&self) -> usize {
        self.itemsize * 8
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.shape.element_count()
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.rank() == 0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of the record with flat index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= element_count()`.
    #[must_use]
    pub fn record(&self, index: usize) -> &[u8] {
        &self.data[index * self.itemsize..(index + 1) * self.itemsize]
    }

    pub fn record_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.data[index * self.itemsize..(index + 1) * self.itemsize]
    }

    /// Iterates records in flat order. Yields `element_count()` slices even when `itemsize` is zero.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        (0..self.element_count()).map(move |index| self.record(index))
    }

    /// Number of records forming one row: the product of `shape[1..]`, 1 for rank 0 and 1.
    #[must_use]
    pub fn records_per_row(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Number of rows: `shape[0]`, or 1 for a scalar.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self.shape.rank() {
            0 => 1,
            _ => self.shape[0],
        }
    }

    #[must_use]
    pub fn row_bytes(&self) -> usize {
        self.records_per_row() * self.itemsize
    }

    #[must_use]
    pub fn row(&self, index: usize) -> &[u8] {
        let width = self.row_bytes();
        &self.data[index * width..(index + 1) * width]
    }

    /// Bit `bit` of record `index`.
    #[must_use]
    pub fn bit(&self, index: usize, bit: usize) -> bool {
        record_bit(self.record(index), bit)
    }

    pub fn set_bit(&mut self, index: usize, bit: usize, value: bool) {
        set_record_bit(self.record_mut(index), bit, value);
    }

    /// Keeps the records but reinterprets them with a new shape of equal element count.
    ///
    /// # Errors
    ///
    /// Returns [`Z2rError::InvalidBuffer`] when the element counts differ.
    pub fn reshape(self, shape: impl Into<Shape>) -> Result<Self> {
        Self::new(self.data, self.itemsize, shape)
    }

    pub(crate) fn from_parts(data: Vec<u8>, itemsize: usize, shape: Shape) -> Self {
        debug_assert_eq!(data.len(), shape.element_count() * itemsize);
        Self { data, itemsize, shape }
    }
}

impl fmt::Debug for PackedRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedRecords(shape={:?}, itemsize={}, [", self.shape, self.itemsize)?;
        for (index, record) in self.records().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            for byte in record {
                write!(f, "{byte:02x}")?;
            }
        }
        write!(f, "])")
    }
}

/// Minimum number of bytes holding `num_bits` bits.
#[inline]
#[must_use]
pub fn bytes_for_bits(num_bits: usize) -> usize {
    num_bits.div_ceil(8)
}

#[inline]
#[must_use]
pub fn record_bit(record: &[u8], bit: usize) -> bool {
    (record[bit / 8] >> (bit % 8)) & 1 == 1
}

#[inline]
pub fn set_record_bit(record: &mut [u8], bit: usize, value: bool) {
    let mask = 1u8 << (bit % 8);
    if value {
        record[bit / 8] |= mask;
    } else {
        record[bit / 8] &= !mask;
    }
}

/// Positions of the set bits of `record`, in increasing order.
pub fn record_support(record: &[u8]) -> impl SortedIterator<Item = usize> + '_ {
    record
        .iter()
        .enumerate()
        .filter(|pair| *pair.1 != 0)
        .flat_map(|(byte_index, &byte)| {
            (0..8usize)
                .filter(move |offset| (byte >> offset) & 1 == 1)
                .map(move |offset| byte_index * 8 + offset)
        })
        .assume_sorted_by_item()
}

/// Clears every bit at position `num_bits` or above.
pub fn mask_record_tail(record: &mut [u8], num_bits: usize) {
    let full_bytes = num_bits / 8;
    let remainder = num_bits % 8;
    let mut start = full_bytes;
    if remainder > 0 && full_bytes < record.len() {
        record[full_bytes] &= (1u8 << remainder) - 1;
        start += 1;
    }
    if start < record.len() {
        record[start..].fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_is_validated() {
        assert!(PackedRecords::new(vec![0; 6], 2, [3]).is_ok());
        assert!(PackedRecords::new(vec![0; 6], 3, [2, 1]).is_ok());
        assert_eq!(
            PackedRecords::new(vec![0; 5], 2, [3]),
            Err(Z2rError::InvalidBuffer {
                len: 5,
                element_count: 3,
                itemsize: 2
            })
        );
    }

    #[test]
    fn scalar_has_one_record() {
        let scalar = PackedRecords::scalar(vec![1, 2, 3]);
        assert_eq!(scalar.element_count(), 1);
        assert_eq!(scalar.itemsize(), 3);
        assert_eq!(scalar.row_count(), 1);
        assert_eq!(scalar.record(0), &[1, 2, 3]);
    }

    #[test]
    fn rows_of_rank_two() {
        let records = PackedRecords::new((0u8..12).collect(), 2, [2, 3]).unwrap();
        assert_eq!(records.row_count(), 2);
        assert_eq!(records.records_per_row(), 3);
        assert_eq!(records.row(1), &[6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn zero_itemsize_records() {
        let records = PackedRecords::zeros([4], 0);
        assert_eq!(records.records().count(), 4);
        assert!(records.records().all(<[u8]>::is_empty));
    }

    #[test]
    fn support_is_sorted() {
        let support: Vec<usize> = record_support(&[0b1000_0001, 0, 0b0000_0100]).collect();
        assert_eq!(support, vec![0, 7, 18]);
    }

    #[test]
    fn tail_mask() {
        let mut record = [0xff, 0xff, 0xff];
        mask_record_tail(&mut record, 11);
        assert_eq!(record, [0xff, 0b0000_0111, 0]);
        mask_record_tail(&mut record, 0);
        assert_eq!(record, [0, 0, 0]);
    }

    #[test]
    fn random_records_clear_padding() {
        let mut rng = rand::thread_rng();
        let records = PackedRecords::random_with_rng([50, 2], 13, &mut rng);
        assert_eq!(records.itemsize(), 2);
        assert!(records.records().all(|record| record[1] >> 5 == 0));
    }

    #[test]
    fn bit_rows() {
        let records = PackedRecords::from_bit_rows(&[vec![true, false, true], vec![false, true, false]], 3).unwrap();
        assert_eq!(records.as_bytes(), &[0b101, 0b010]);
        assert!(PackedRecords::from_bit_rows(&[vec![true]], 3).is_err());
    }
}
