use proptest::prelude::*;
use z2r::kernel::{bitwise_and, bitwise_count, bitwise_dot, bitwise_not, bitwise_not_padded, bitwise_or, bitwise_xor};
use z2r::{BitCounts, ExecutionPolicy, PackedRecords, Z2rError};

const SEQUENTIAL: ExecutionPolicy = ExecutionPolicy::Sequential;

proptest! {
    #[test]
    fn padded_not_keeps_padding((records, num_bits) in records_with_width(40, 24)) {
        let flipped = bitwise_not_padded(&records, num_bits, SEQUENTIAL).unwrap();
        assert_eq!(flipped.shape(), records.shape());
        for index in 0..records.element_count() {
            for bit in 0..records.bit_capacity() {
                assert_eq!(flipped.bit(index, bit), records.bit(index, bit) ^ (bit < num_bits));
            }
        }
        assert_eq!(bitwise_not_padded(&flipped, num_bits, SEQUENTIAL).unwrap(), records);
        assert_eq!(
            bitwise_not_padded(&records, num_bits, ExecutionPolicy::Parallel).unwrap(),
            flipped
        );
    }

    #[test]
    fn xor_is_an_involution((left, right) in equal_shape_records(40, 24)) {
        let once = bitwise_xor(&left, &right, SEQUENTIAL).unwrap();
        let twice = bitwise_xor(&once, &right, SEQUENTIAL).unwrap();
        assert_eq!(twice, left);
    }

    #[test]
    fn not_is_an_involution(records in arbitrary_records(40, 24)) {
        let twice = bitwise_not(&bitwise_not(&records, SEQUENTIAL), SEQUENTIAL);
        assert_eq!(twice, records);
    }

    #[test]
    fn identity_laws(records in arbitrary_records(40, 24)) {
        let zeros = PackedRecords::zeros(records.shape().clone(), records.itemsize());
        let ones = bitwise_not(&zeros, SEQUENTIAL);
        assert_eq!(bitwise_and(&records, &ones, SEQUENTIAL).unwrap(), records);
        assert_eq!(bitwise_or(&records, &zeros, SEQUENTIAL).unwrap(), records);
        assert_eq!(bitwise_xor(&records, &zeros, SEQUENTIAL).unwrap(), records);
        assert_eq!(bitwise_xor(&records, &records, SEQUENTIAL).unwrap(), zeros);
    }

    #[test]
    fn dot_counts_and((left, right) in equal_shape_records(40, 24)) {
        let and = bitwise_and(&left, &right, SEQUENTIAL).unwrap();
        assert_eq!(
            bitwise_dot(&left, &right, SEQUENTIAL).unwrap(),
            bitwise_count(&and, SEQUENTIAL)
        );
    }

    #[test]
    fn count_matches_bit_by_bit(records in arbitrary_records(40, 24)) {
        let counts = bitwise_count(&records, SEQUENTIAL);
        assert_eq!(counts.len(), records.element_count());
        for (index, &count) in counts.values().iter().enumerate() {
            let expected = (0..records.bit_capacity()).filter(|&bit| records.bit(index, bit)).count();
            assert_eq!(count, expected);
        }
    }

    #[test]
    fn ops_match_bytes((left, right) in equal_shape_records(40, 24)) {
        let and = bitwise_and(&left, &right, SEQUENTIAL).unwrap();
        let or = bitwise_or(&left, &right, SEQUENTIAL).unwrap();
        for (position, (&l, &r)) in left.as_bytes().iter().zip(right.as_bytes()).enumerate() {
            assert_eq!(and.as_bytes()[position], l & r);
            assert_eq!(or.as_bytes()[position], l | r);
        }
    }

    #[test]
    fn policies_agree((left, right) in equal_shape_records(40, 24)) {
        for policy in [ExecutionPolicy::Parallel, ExecutionPolicy::adaptive(1)] {
            assert_eq!(bitwise_xor(&left, &right, policy), bitwise_xor(&left, &right, SEQUENTIAL));
            assert_eq!(bitwise_not(&left, policy), bitwise_not(&left, SEQUENTIAL));
            assert_eq!(bitwise_count(&left, policy), bitwise_count(&left, SEQUENTIAL));
            assert_eq!(bitwise_dot(&left, &right, policy), bitwise_dot(&left, &right, SEQUENTIAL));
        }
    }
}

#[test]
fn scalars_stay_scalars() {
    let left = PackedRecords::scalar(vec![0b1010_1010, 0xff]);
    let right = PackedRecords::scalar(vec![0b0110_0110, 0x0f]);
    let xored = bitwise_xor(&left, &right, SEQUENTIAL).unwrap();
    assert!(xored.is_scalar());
    assert_eq!(xored.as_bytes(), &[0b1100_1100, 0xf0]);
    assert_eq!(bitwise_count(&left, SEQUENTIAL), BitCounts::Scalar(12));
    assert_eq!(bitwise_dot(&left, &right, SEQUENTIAL).unwrap(), BitCounts::Scalar(6));
}

#[test]
fn single_record_array_counts_as_scalar() {
    let records = PackedRecords::new(vec![0b111], 1, [1]).unwrap();
    assert_eq!(bitwise_not(&records, SEQUENTIAL).shape().to_vec(), vec![1]);
    assert_eq!(bitwise_count(&records, SEQUENTIAL), BitCounts::Scalar(3));
}

#[test]
fn array_counts_keep_shape() {
    let records = PackedRecords::new(vec![1, 3, 7, 15, 31, 63], 1, [2, 3]).unwrap();
    match bitwise_count(&records, SEQUENTIAL) {
        BitCounts::Array { shape, counts } => {
            assert_eq!(shape.to_vec(), vec![2, 3]);
            assert_eq!(counts, vec![1, 2, 3, 4, 5, 6]);
        }
        BitCounts::Scalar(_) => panic!("expected an array of counts"),
    }
}

#[test]
fn word_and_tail_boundaries() {
    // 3 records of 5 bytes: the buffer has one full word and a 7 byte tail
    let left = PackedRecords::new((0..15).map(|value| value * 17).collect(), 5, [3]).unwrap();
    let right = PackedRecords::new((0..15).map(|value| 255 - value * 3).collect(), 5, [3]).unwrap();
    let xored = bitwise_xor(&left, &right, SEQUENTIAL).unwrap();
    for position in 0..15 {
        assert_eq!(xored.as_bytes()[position], left.as_bytes()[position] ^ right.as_bytes()[position]);
    }
}

#[test]
fn zero_width_records() {
    let empty = PackedRecords::zeros([3], 0);
    assert_eq!(bitwise_xor(&empty, &empty, SEQUENTIAL).unwrap().as_bytes().len(), 0);
    assert_eq!(bitwise_count(&empty, SEQUENTIAL).values(), &[0, 0, 0]);
}

#[test]
fn mismatches_report_both_values() {
    let left = PackedRecords::zeros([4], 2);
    let wider = PackedRecords::zeros([4], 3);
    let shorter = PackedRecords::zeros([3], 2);
    assert_eq!(
        bitwise_and(&left, &wider, SEQUENTIAL),
        Err(Z2rError::ItemsizeMismatch { left: 2, right: 3 })
    );
    assert_eq!(
        bitwise_dot(&left, &shorter, SEQUENTIAL),
        Err(Z2rError::LengthMismatch { left: 4, right: 3 })
    );
}

#[test]
fn padded_not_rejects_wide_bit_counts() {
    let records = PackedRecords::zeros([3], 2);
    assert_eq!(
        bitwise_not_padded(&records, 17, SEQUENTIAL),
        Err(Z2rError::BitWidthExceeded { num_bits: 17, capacity: 16 })
    );
    let padded = PackedRecords::new(vec![0x00, 0xf0, 0xff, 0xff], 2, [2]).unwrap();
    let flipped = bitwise_not_padded(&padded, 12, SEQUENTIAL).unwrap();
    assert_eq!(flipped.as_bytes(), &[0xff, 0xff, 0x00, 0xf0]);
}

#[test]
fn large_buffers_agree_across_policies() {
    let records = 70_000;
    let left = PackedRecords::new((0..records * 3).map(|value| (value * 31 % 251) as u8).collect(), 3, [records]).unwrap();
    let right = PackedRecords::new((0..records * 3).map(|value| (value * 7 % 253) as u8).collect(), 3, [records]).unwrap();
    assert_eq!(
        bitwise_xor(&left, &right, ExecutionPolicy::Parallel).unwrap(),
        bitwise_xor(&left, &right, SEQUENTIAL).unwrap()
    );
    assert_eq!(
        bitwise_dot(&left, &right, ExecutionPolicy::Parallel).unwrap(),
        bitwise_dot(&left, &right, SEQUENTIAL).unwrap()
    );
}

fn arbitrary_shape(max_records: usize) -> impl Strategy<Value = Vec<usize>> {
    prop_oneof![
        Just(vec![]),
        (0..max_records).prop_map(|length| vec![length]),
        (0..8usize, 0..6usize).prop_map(|(rows, columns)| vec![rows, columns]),
    ]
}

fn records_of(shape: Vec<usize>, itemsize: usize) -> impl Strategy<Value = PackedRecords> {
    let length = shape.iter().product::<usize>() * itemsize;
    prop::collection::vec(any::<u8>(), length)
        .prop_map(move |data| PackedRecords::new(data, itemsize, shape.clone()).unwrap())
}

fn records_with_width(max_records: usize, max_itemsize: usize) -> impl Strategy<Value = (PackedRecords, usize)> {
    arbitrary_records(max_records, max_itemsize).prop_flat_map(|records| {
        let capacity = records.bit_capacity();
        (Just(records), 0..=capacity)
    })
}

fn arbitrary_records(max_records: usize, max_itemsize: usize) -> impl Strategy<Value = PackedRecords> {
    (arbitrary_shape(max_records), 0..max_itemsize).prop_flat_map(|(shape, itemsize)| records_of(shape, itemsize))
}

fn equal_shape_records(
    max_records: usize,
    max_itemsize: usize,
) -> impl Strategy<Value = (PackedRecords, PackedRecords)> {
    (arbitrary_shape(max_records), 0..max_itemsize)
        .prop_flat_map(|(shape, itemsize)| (records_of(shape.clone(), itemsize), records_of(shape, itemsize)))
}
