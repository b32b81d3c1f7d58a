use proptest::prelude::*;
use z2r::linalg::{
    concatenate, echelonize, gauss_jordan_inverse, matmul, rank, row_echelon, transpose, unpack_bits,
};
use z2r::{ExecutionPolicy, PackedRecords, Z2rError, bytes_for_bits};

const SEQUENTIAL: ExecutionPolicy = ExecutionPolicy::Sequential;

proptest! {
    #[test]
    fn row_echelon_is_idempotent((matrix, num_bits) in arbitrary_matrix(30, 40)) {
        let reduced = row_echelon(&matrix, num_bits, SEQUENTIAL).unwrap();
        assert_eq!(row_echelon(&reduced, num_bits, SEQUENTIAL).unwrap(), reduced);
    }

    #[test]
    fn row_echelon_is_reduced((matrix, num_bits) in arbitrary_matrix(30, 40)) {
        let form = echelonize(&matrix, num_bits, SEQUENTIAL).unwrap();
        let reduced = &form.reduced;
        for (pivot_row, &column) in form.rank_profile.iter().enumerate() {
            for row in 0..reduced.element_count() {
                assert_eq!(reduced.bit(row, column), row == pivot_row);
            }
            for earlier in 0..column {
                assert!(!reduced.bit(pivot_row, earlier));
            }
        }
        for row in form.rank()..reduced.element_count() {
            assert!((0..num_bits).all(|bit| !reduced.bit(row, bit)));
        }
    }

    #[test]
    fn rank_matches_transpose((matrix, num_bits) in arbitrary_matrix(30, 40)) {
        let transposed = transpose(&matrix, Some(num_bits), SEQUENTIAL).unwrap();
        assert_eq!(
            rank(&matrix, num_bits, SEQUENTIAL).unwrap(),
            rank(&transposed, matrix.element_count(), SEQUENTIAL).unwrap()
        );
    }

    #[test]
    fn inverse_is_correct(matrix in invertible_matrix(40)) {
        let size = matrix.element_count();
        let inverse = gauss_jordan_inverse(&matrix, size, SEQUENTIAL).unwrap();
        let product = matmul(&matrix, &inverse, size, size, SEQUENTIAL).unwrap();
        assert_eq!(product, identity(size));
        let product = matmul(&inverse, &matrix, size, size, SEQUENTIAL).unwrap();
        assert_eq!(product, identity(size));
    }

    #[test]
    fn transpose_moves_bits((matrix, num_bits) in arbitrary_matrix(150, 130)) {
        let transposed = transpose(&matrix, Some(num_bits), SEQUENTIAL).unwrap();
        assert_eq!(transposed.element_count(), num_bits);
        assert_eq!(transposed.itemsize(), bytes_for_bits(matrix.element_count()));
        for row in 0..matrix.element_count() {
            for bit in 0..num_bits {
                assert_eq!(transposed.bit(bit, row), matrix.bit(row, bit));
            }
        }
        let twice = transpose(&transposed, Some(matrix.element_count()), SEQUENTIAL).unwrap();
        for row in 0..matrix.element_count() {
            for bit in 0..num_bits {
                assert_eq!(twice.bit(row, bit), matrix.bit(row, bit));
            }
        }
    }

    #[test]
    fn matmul_matches_definition(
        (a, b, inner, columns) in (1..20usize, 1..20usize, 1..20usize).prop_flat_map(|(rows, inner, columns)| {
            (matrix_of(rows, inner), matrix_of(inner, columns), Just(inner), Just(columns))
        })
    ) {
        let product = matmul(&a, &b, inner, columns, SEQUENTIAL).unwrap();
        assert_eq!(product.itemsize(), bytes_for_bits(columns));
        for row in 0..a.element_count() {
            for column in 0..product.bit_capacity() {
                let expected = column < columns
                    && (0..inner).filter(|&k| a.bit(row, k) && b.bit(k, column)).count() % 2 == 1;
                assert_eq!(product.bit(row, column), expected);
            }
        }
    }

    #[test]
    fn policies_agree((matrix, num_bits) in arbitrary_matrix(100, 100)) {
        assert_eq!(
            row_echelon(&matrix, num_bits, ExecutionPolicy::Parallel),
            row_echelon(&matrix, num_bits, SEQUENTIAL)
        );
        assert_eq!(
            transpose(&matrix, Some(num_bits), ExecutionPolicy::Parallel),
            transpose(&matrix, Some(num_bits), SEQUENTIAL)
        );
    }

    #[test]
    fn unpack_inverts_from_bit_rows(rows in prop::collection::vec(prop::collection::vec(any::<bool>(), 13), 0..20)) {
        let records = PackedRecords::from_bit_rows(&rows, 13).unwrap();
        let bits = unpack_bits(&records, 13).unwrap();
        assert_eq!(bits.shape(), (rows.len(), 13));
        for (index, row) in rows.iter().enumerate() {
            let expected: Vec<u8> = row.iter().map(|&bit| u8::from(bit)).collect();
            assert_eq!(bits.row(index), expected.as_slice());
        }
    }
}

#[test]
fn singular_matrix_is_detected() {
    // rows 0b011, 0b110, 0b101 sum to zero
    let matrix = PackedRecords::new(vec![0b011, 0b110, 0b101], 1, [3]).unwrap();
    assert_eq!(
        gauss_jordan_inverse(&matrix, 3, SEQUENTIAL),
        Err(Z2rError::SingularMatrix { column: 2 })
    );
    let zero_column = PackedRecords::new(vec![0b10, 0b10], 1, [2]).unwrap();
    assert_eq!(
        gauss_jordan_inverse(&zero_column, 2, SEQUENTIAL),
        Err(Z2rError::SingularMatrix { column: 0 })
    );
    let zero_row = PackedRecords::new(vec![0b01, 0b00], 1, [2]).unwrap();
    assert_eq!(
        gauss_jordan_inverse(&zero_row, 2, SEQUENTIAL),
        Err(Z2rError::SingularMatrix { column: 1 })
    );
}

#[test]
fn inverse_validates_shape() {
    let matrix = PackedRecords::zeros([3], 1);
    assert_eq!(
        gauss_jordan_inverse(&matrix, 4, SEQUENTIAL),
        Err(Z2rError::NotSquare { rows: 3, num_bits: 4 })
    );
    let wide = PackedRecords::zeros([9], 1);
    assert_eq!(
        gauss_jordan_inverse(&wide, 9, SEQUENTIAL),
        Err(Z2rError::BitWidthExceeded { num_bits: 9, capacity: 8 })
    );
    let table = PackedRecords::zeros([2, 2], 1);
    assert_eq!(
        gauss_jordan_inverse(&table, 2, SEQUENTIAL),
        Err(Z2rError::UnsupportedShape {
            operation: "gauss_jordan_inverse",
            rank: 2
        })
    );
}

#[test]
fn known_inverse() {
    // [[1 1 0] [0 1 1] [0 0 1]] with column j at bit j
    let matrix = PackedRecords::new(vec![0b011, 0b110, 0b100], 1, [3]).unwrap();
    let inverse = gauss_jordan_inverse(&matrix, 3, SEQUENTIAL).unwrap();
    assert_eq!(inverse.as_bytes(), &[0b111, 0b110, 0b100]);
}

#[test]
fn transpose_defaults_to_full_width() {
    let records = PackedRecords::new(vec![0x01, 0x80], 1, [2]).unwrap();
    let transposed = transpose(&records, None, SEQUENTIAL).unwrap();
    assert_eq!(transposed.element_count(), 8);
    assert_eq!(transposed.itemsize(), 1);
    assert_eq!(transposed.record(0), &[0b01]);
    assert_eq!(transposed.record(7), &[0b10]);
    assert_eq!(
        transpose(&records, Some(9), SEQUENTIAL),
        Err(Z2rError::BitWidthExceeded { num_bits: 9, capacity: 8 })
    );
}

#[test]
fn matmul_checks_inner_dimension() {
    let a = PackedRecords::zeros([2], 1);
    let b = PackedRecords::zeros([3], 1);
    assert_eq!(
        matmul(&a, &b, 4, 8, SEQUENTIAL),
        Err(Z2rError::InnerDimensionMismatch { columns: 4, rows: 3 })
    );
}

#[test]
fn concatenate_rank_one() {
    let left = PackedRecords::new(vec![1, 2, 3, 4], 2, [2]).unwrap();
    let right = PackedRecords::new(vec![5, 6], 2, [1]).unwrap();
    let joined = concatenate(&left, &right, 0).unwrap();
    assert_eq!(joined.shape().to_vec(), vec![3]);
    assert_eq!(joined.as_bytes(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(
        concatenate(&left, &right, 1),
        Err(Z2rError::AxisOutOfRange { axis: 1, rank: 1 })
    );
}

#[test]
fn concatenate_rank_two() {
    let left = PackedRecords::new(vec![1, 2, 3, 4], 1, [2, 2]).unwrap();
    let below = PackedRecords::new(vec![5, 6], 1, [1, 2]).unwrap();
    let joined = concatenate(&left, &below, -2).unwrap();
    assert_eq!(joined.shape().to_vec(), vec![3, 2]);
    assert_eq!(joined.as_bytes(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(
        concatenate(&left, &below, 1),
        Err(Z2rError::ShapeMismatch {
            left: vec![2, 2],
            right: vec![1, 2],
            axis: 0
        })
    );
}

#[test]
fn concatenate_validation() {
    let vector = PackedRecords::zeros([2], 1);
    let table = PackedRecords::zeros([2, 1], 1);
    let wide = PackedRecords::zeros([2], 2);
    let scalar = PackedRecords::scalar(vec![0]);
    assert_eq!(
        concatenate(&vector, &table, 0),
        Err(Z2rError::RankMismatch { left: 1, right: 2 })
    );
    assert_eq!(
        concatenate(&vector, &wide, 0),
        Err(Z2rError::ItemsizeMismatch { left: 1, right: 2 })
    );
    assert_eq!(
        concatenate(&scalar, &scalar, 0),
        Err(Z2rError::UnsupportedShape {
            operation: "concatenate",
            rank: 0
        })
    );
}

#[test]
fn unpack_validation() {
    let table = PackedRecords::zeros([2, 3], 1);
    assert_eq!(
        unpack_bits(&table, 10),
        Err(Z2rError::UnevenBitSplit { num_bits: 10, columns: 3 })
    );
    assert_eq!(
        unpack_bits(&table, 27),
        Err(Z2rError::BitWidthExceeded { num_bits: 9, capacity: 8 })
    );
    assert!(unpack_bits(&PackedRecords::scalar(vec![1]), 1).is_err());
}

#[test]
fn rank_two_matrices_are_rejected() {
    let table = PackedRecords::zeros([2, 2], 1);
    assert_eq!(
        row_echelon(&table, 2, SEQUENTIAL),
        Err(Z2rError::UnsupportedShape {
            operation: "row_echelon",
            rank: 2
        })
    );
}

fn identity(size: usize) -> PackedRecords {
    let mut records = PackedRecords::zeros([size], bytes_for_bits(size));
    for index in 0..size {
        records.set_bit(index, index, true);
    }
    records
}

fn matrix_of(rows: usize, num_bits: usize) -> impl Strategy<Value = PackedRecords> {
    let itemsize = bytes_for_bits(num_bits);
    prop::collection::vec(prop::collection::vec(any::<bool>(), num_bits), rows).prop_map(move |bits| {
        let records = PackedRecords::from_bit_rows(&bits, num_bits).unwrap();
        assert_eq!(records.itemsize(), itemsize);
        records
    })
}

/// A rank-1 bit matrix together with its meaningful width, padding bits clear.
fn arbitrary_matrix(max_rows: usize, max_bits: usize) -> impl Strategy<Value = (PackedRecords, usize)> {
    (0..max_rows, 0..max_bits).prop_flat_map(|(rows, num_bits)| (matrix_of(rows, num_bits), Just(num_bits)))
}

/// Identity scrambled by random row additions and swaps.
fn invertible_matrix(max_size: usize) -> impl Strategy<Value = PackedRecords> {
    (1..max_size).prop_flat_map(|size| {
        prop::collection::vec((0..size, 0..size, any::<bool>()), 0..3 * size).prop_map(move |operations| {
            let mut matrix = identity(size);
            for (target, source, swap) in operations {
                if target == source {
                    continue;
                }
                let source_record = matrix.record(source).to_vec();
                if swap {
                    let target_record = matrix.record(target).to_vec();
                    matrix.record_mut(target).copy_from_slice(&source_record);
                    matrix.record_mut(source).copy_from_slice(&target_record);
                } else {
                    for (byte, added) in matrix.record_mut(target).iter_mut().zip(&source_record) {
                        *byte ^= added;
                    }
                }
            }
            matrix
        })
    })
}
