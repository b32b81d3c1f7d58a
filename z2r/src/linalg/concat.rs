use crate::error::{Result, Z2rError};
use crate::records::{PackedRecords, Shape};

/// Joins two arrays along `axis`; negative axes count from the end.
///
/// Rank-1 arrays join along axis 0. Rank-2 arrays join along axis 0 (stacking
/// rows) or axis 1 (extending every row), and must agree on the other axis.
///
/// # Errors
///
/// [`Z2rError::RankMismatch`], [`Z2rError::ItemsizeMismatch`],
/// [`Z2rError::UnsupportedShape`] for scalars and rank above 2,
/// [`Z2rError::AxisOutOfRange`] and [`Z2rError::ShapeMismatch`].
///
/// # Examples
///
/// ```
/// use z2r::{PackedRecords, linalg};
///
/// let left = PackedRecords::new(vec![1, 2, 3, 4], 1, [2, 2]).unwrap();
/// let right = PackedRecords::new(vec![5, 6], 1, [2, 1]).unwrap();
/// let joined = linalg::concatenate(&left, &right, -1).unwrap();
/// assert_eq!(joined.shape().to_vec(), vec![2, 3]);
/// assert_eq!(joined.as_bytes(), &[1, 2, 5, 3, 4, 6]);
/// ```
pub fn concatenate(left: &PackedRecords, right: &PackedRecords, axis: isize) -> Result<PackedRecords> {
    if left.rank() != right.rank() {
        return Err(Z2rError::RankMismatch {
            left: left.rank(),
            right: right.rank(),
        });
    }
    if left.itemsize() != right.itemsize() {
        return Err(Z2rError::ItemsizeMismatch {
            left: left.itemsize(),
            right: right.itemsize(),
        });
    }
    let rank = left.rank();
    if !(1..=2).contains(&rank) {
        return Err(Z2rError::UnsupportedShape {
            operation: "concatenate",
            rank,
        });
    }
    let axis = normalize_axis(axis, rank)?;
    for other in (0..rank).filter(|&other| other != axis) {
        if left.shape()[other] != right.shape()[other] {
            return Err(Z2rError::ShapeMismatch {
                left: left.shape().to_vec(),
                right: right.shape().to_vec(),
                axis: other,
            });
        }
    }

    let mut shape = left.shape().to_vec();
    shape[axis] += right.shape()[axis];
    let mut data = Vec::with_capacity(left.as_bytes().len() + right.as_bytes().len());
    if axis == 0 {
        data.extend_from_slice(left.as_bytes());
        data.extend_from_slice(right.as_bytes());
    } else {
        for row_index in 0..left.row_count() {
            data.extend_from_slice(left.row(row_index));
            data.extend_from_slice(right.row(row_index));
        }
    }
    Ok(PackedRecords::from_parts(data, left.itemsize(), Shape::from(shape)))
}

fn normalize_axis(axis: isize, rank: usize) -> Result<usize> {
    let out_of_range = Z2rError::AxisOutOfRange { axis, rank };
    let signed_rank = isize::try_from(rank).map_err(|_| out_of_range.clone())?;
    let normalized = if axis < 0 { axis + signed_rank } else { axis };
    if (0..signed_rank).contains(&normalized) {
        usize::try_from(normalized).map_err(|_| out_of_range)
    } else {
        Err(out_of_range)
    }
}
