//! Row deduplication.
//!
//! A row is one record for arrays of rank 0 and 1, and the `shape[1..]` block of
//! records under one leading index otherwise. Two rows belong to the same group
//! iff their bytes are identical. [`unique`] numbers groups in lexicographic byte
//! order, [`unordered_unique`] in order of first appearance; both produce the same
//! partition of the rows.

use crate::policy::ExecutionPolicy;
use crate::records::{PackedRecords, Shape};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Which optional outputs [`unique`] computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UniqueOptions {
    pub return_index: bool,
    pub return_inverse: bool,
    pub return_counts: bool,
}

impl UniqueOptions {
    #[must_use]
    pub fn all() -> Self {
        Self {
            return_index: true,
            return_inverse: true,
            return_counts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unique {
    /// One row per group, groups in increasing byte order.
    pub values: PackedRecords,
    /// Smallest original row index of every group.
    pub indices: Option<Vec<usize>>,
    /// Group id of every original row.
    pub inverse: Option<Vec<usize>>,
    /// Number of rows in every group.
    pub counts: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedUnique {
    /// First original row index of every group.
    pub indices: Vec<usize>,
    /// Group id of every original row.
    pub inverse: Vec<usize>,
}

/// Groups identical rows by sorting row indices on their bytes.
///
/// Ties are broken by original index, so the first row of every run is the
/// smallest index of its group.
///
/// # Examples
///
/// ```
/// use z2r::{ExecutionPolicy, PackedRecords};
/// use z2r::unique::{UniqueOptions, unique};
///
/// let records = PackedRecords::new(vec![3, 1, 3, 2], 1, [4]).unwrap();
/// let result = unique(&records, UniqueOptions::all(), ExecutionPolicy::default());
/// assert_eq!(result.values.as_bytes(), &[1, 2, 3]);
/// assert_eq!(result.indices, Some(vec![1, 3, 0]));
/// assert_eq!(result.inverse, Some(vec![2, 0, 2, 1]));
/// assert_eq!(result.counts, Some(vec![1, 1, 2]));
/// ```
pub fn unique(records: &PackedRecords, options: UniqueOptions, policy: ExecutionPolicy) -> Unique {
    if records.is_scalar() {
        return Unique {
            values: records.clone(),
            indices: options.return_index.then(|| vec![0]),
            inverse: options.return_inverse.then(|| vec![0]),
            counts: options.return_counts.then(|| vec![1]),
        };
    }

    let row_count = records.row_count();
    tracing::debug!(rows = row_count, row_bytes = records.row_bytes(), "sorted unique");

    let mut order: Vec<usize> = (0..row_count).collect();
    let compare = |left: &usize, right: &usize| records.row(*left).cmp(records.row(*right)).then(left.cmp(right));
    if policy.is_parallel(row_count) {
        order.par_sort_unstable_by(compare);
    } else {
        order.sort_unstable_by(compare);
    }

    let mut first_rows = Vec::new();
    let mut counts = Vec::new();
    let mut inverse = vec![0usize; row_count];
    for (position, &row_index) in order.iter().enumerate() {
        let starts_group = position == 0 || records.row(order[position - 1]) != records.row(row_index);
        if starts_group {
            first_rows.push(row_index);
            counts.push(0);
        }
        inverse[row_index] = first_rows.len() - 1;
        if let Some(count) = counts.last_mut() {
            *count += 1;
        }
    }

    let mut data = Vec::with_capacity(first_rows.len() * records.row_bytes());
    for &row_index in &first_rows {
        data.extend_from_slice(records.row(row_index));
    }
    let mut shape = records.shape().to_vec();
    shape[0] = first_rows.len();

    Unique {
        values: PackedRecords::from_parts(data, records.itemsize(), Shape::from(shape)),
        indices: options.return_index.then_some(first_rows),
        inverse: options.return_inverse.then_some(inverse),
        counts: options.return_counts.then_some(counts),
    }
}

/// Groups identical rows with a hash map, numbering groups by first appearance.
///
/// # Examples
///
/// ```
/// use z2r::PackedRecords;
/// use z2r::unique::unordered_unique;
///
/// let records = PackedRecords::new(vec![3, 1, 3, 2], 1, [4]).unwrap();
/// let result = unordered_unique(&records);
/// assert_eq!(result.indices, vec![0, 1, 3]);
/// assert_eq!(result.inverse, vec![0, 1, 0, 2]);
/// ```
#[must_use]
pub fn unordered_unique(records: &PackedRecords) -> UnorderedUnique {
    if records.is_scalar() {
        return UnorderedUnique {
            indices: vec![0],
            inverse: vec![0],
        };
    }

    let row_count = records.row_count();
    tracing::debug!(rows = row_count, row_bytes = records.row_bytes(), "hashed unique");

    let mut ids = FxHashMap::<&[u8], usize>::default();
    ids.reserve(row_count);
    let mut indices = Vec::new();
    let mut inverse = Vec::with_capacity(row_count);
    for row_index in 0..row_count {
        let id = match ids.entry(records.row(row_index)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                indices.push(row_index);
                *entry.insert(indices.len() - 1)
            }
        };
        inverse.push(id);
    }
    UnorderedUnique { indices, inverse }
}
