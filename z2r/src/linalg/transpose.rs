use super::{require_capacity, require_flat};
use crate::error::Result;
use crate::policy::ExecutionPolicy;
use crate::records::{PackedRecords, Shape, bytes_for_bits};
use rayon::prelude::*;

const TILE: usize = 64;

/// Swaps the off-diagonal `block × block` sub-blocks of every `2·block`-sized diagonal block.
///
/// `mask` selects the low `block` bits of every `2·block`-bit group.
#[inline]
fn swap_off_diagonal(tile: &mut [u64; TILE], block: usize, mask: u64) {
    for top in (0..TILE).step_by(2 * block) {
        for upper in top..top + block {
            let lower = upper + block;
            let delta = ((tile[upper] >> block) ^ tile[lower]) & mask;
            tile[lower] ^= delta;
            tile[upper] ^= delta << block;
        }
    }
}

/// Transposes a 64×64 tile where word `r` holds row `r`, column `c` at bit `c`.
///
/// Recursive block swap of Hacker's Delight 7.3: exchanging off-diagonal
/// 32×32 blocks down to 1×1 blocks leaves bit `(r, c)` at `(c, r)`.
pub(crate) fn transpose_tile(tile: &mut [u64; TILE]) {
    const LEVELS: [(usize, u64); 6] = [
        (1, 0x5555_5555_5555_5555),
        (2, 0x3333_3333_3333_3333),
        (4, 0x0f0f_0f0f_0f0f_0f0f),
        (8, 0x00ff_00ff_00ff_00ff),
        (16, 0x0000_ffff_0000_ffff),
        (32, 0x0000_0000_ffff_ffff),
    ];
    for (block, mask) in LEVELS {
        swap_off_diagonal(tile, block, mask);
    }
}

/// Bits `64·word .. 64·word + 64` of `record`, zero beyond its end.
#[inline]
fn read_word(record: &[u8], word: usize) -> u64 {
    let start = (word * 8).min(record.len());
    let end = (start + 8).min(record.len());
    let mut bytes = [0u8; 8];
    bytes[..end - start].copy_from_slice(&record[start..end]);
    u64::from_le_bytes(bytes)
}

#[inline]
fn write_word(record: &mut [u8], word: usize, value: u64) {
    let start = (word * 8).min(record.len());
    let end = (start + 8).min(record.len());
    record[start..end].copy_from_slice(&value.to_le_bytes()[..end - start]);
}

/// Transposes `M` records of `num_bits` meaningful bits into `num_bits` records of `M` bits.
///
/// Output records have the smallest itemsize holding `M` bits. `num_bits`
/// defaults to the full record width. The work is tiled in 64×64 blocks; output
/// column blocks are independent and run in parallel when the policy allows.
///
/// # Errors
///
/// [`UnsupportedShape`](crate::Z2rError::UnsupportedShape) for rank 2 or more,
/// [`BitWidthExceeded`](crate::Z2rError::BitWidthExceeded) when `num_bits` exceeds the record capacity.
///
/// # Examples
///
/// ```
/// use z2r::{ExecutionPolicy, PackedRecords, linalg};
///
/// let records = PackedRecords::new(vec![0b01, 0b11, 0b00], 1, [3]).unwrap();
/// let transposed = linalg::transpose(&records, Some(2), ExecutionPolicy::default()).unwrap();
/// assert_eq!(transposed.shape().to_vec(), vec![2]);
/// assert_eq!(transposed.as_bytes(), &[0b011, 0b010]);
/// ```
pub fn transpose(records: &PackedRecords, num_bits: Option<usize>, policy: ExecutionPolicy) -> Result<PackedRecords> {
    require_flat(records, "transpose")?;
    let num_bits = num_bits.unwrap_or(records.bit_capacity());
    require_capacity(records, num_bits)?;

    let row_count = records.element_count();
    let out_itemsize = bytes_for_bits(row_count);
    tracing::debug!(rows = row_count, num_bits, "transpose");

    let mut data = vec![0u8; num_bits * out_itemsize];
    if out_itemsize > 0 {
        let row_blocks = row_count.div_ceil(TILE);
        let transpose_column_block = |block_column: usize, output: &mut [u8]| {
            let mut tile = [0u64; TILE];
            for block_row in 0..row_blocks {
                let first_row = block_row * TILE;
                let rows_in_tile = (row_count - first_row).min(TILE);
                tile.fill(0);
                for (offset, word) in tile.iter_mut().take(rows_in_tile).enumerate() {
                    *word = read_word(records.record(first_row + offset), block_column);
                }
                transpose_tile(&mut tile);
                for (column, record) in output.chunks_mut(out_itemsize).enumerate() {
                    write_word(record, block_row, tile[column]);
                }
            }
        };
        let chunk = TILE * out_itemsize;
        if policy.is_parallel(row_count * num_bits / 64) {
            data.par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(block_column, output)| transpose_column_block(block_column, output));
        } else {
            data.chunks_mut(chunk)
                .enumerate()
                .for_each(|(block_column, output)| transpose_column_block(block_column, output));
        }
    }
    Ok(PackedRecords::from_parts(data, out_itemsize, Shape::from([num_bits])))
}
