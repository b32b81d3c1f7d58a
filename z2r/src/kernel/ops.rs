use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Machine word the kernels load records into: `u64` for the body, `u8` for the tail.
pub trait Lane: Copy + BitAnd<Output = Self> + BitOr<Output = Self> + BitXor<Output = Self> + Not<Output = Self> {
    const BYTES: usize;

    fn load(bytes: &[u8]) -> Self;
    fn store(self, bytes: &mut [u8]);
    fn count_ones(self) -> usize;
}

macro_rules! lane_impl {
    ($word_type:ty) => {
        impl Lane for $word_type {
            const BYTES: usize = std::mem::size_of::<$word_type>();

            #[inline]
            fn load(bytes: &[u8]) -> Self {
                let mut word = [0u8; std::mem::size_of::<$word_type>()];
                word.copy_from_slice(bytes);
                <$word_type>::from_ne_bytes(word)
            }

            #[inline]
            fn store(self, bytes: &mut [u8]) {
                bytes.copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn count_ones(self) -> usize {
                <$word_type>::count_ones(self) as usize
            }
        }
    };
}

lane_impl!(u8);
lane_impl!(u64);

/// Binary operator applied lane by lane.
pub trait BinaryOp: Send + Sync {
    const NAME: &'static str;

    fn apply<L: Lane>(left: L, right: L) -> L;
}

pub struct And;
pub struct Xor;
pub struct Or;

impl BinaryOp for And {
    const NAME: &'static str = "and";

    #[inline]
    fn apply<L: Lane>(left: L, right: L) -> L {
        left & right
    }
}

impl BinaryOp for Xor {
    const NAME: &'static str = "xor";

    #[inline]
    fn apply<L: Lane>(left: L, right: L) -> L {
        left ^ right
    }
}

impl BinaryOp for Or {
    const NAME: &'static str = "or";

    #[inline]
    fn apply<L: Lane>(left: L, right: L) -> L {
        left | right
    }
}

const WORD: usize = <u64 as Lane>::BYTES;

/// `output[k] = Op(left[k], right[k])` over equally long buffers, 8 bytes at a time then byte by byte.
pub fn apply_binary<Op: BinaryOp>(output: &mut [u8], left: &[u8], right: &[u8]) {
    let body = output.len() / WORD * WORD;
    let (output_words, output_tail) = output.split_at_mut(body);
    let (left_words, left_tail) = left.split_at(body);
    let (right_words, right_tail) = right.split_at(body);

    for ((out, left), right) in output_words
        .chunks_exact_mut(WORD)
        .zip(left_words.chunks_exact(WORD))
        .zip(right_words.chunks_exact(WORD))
    {
        Op::apply(u64::load(left), u64::load(right)).store(out);
    }
    for ((out, &left), &right) in output_tail.iter_mut().zip(left_tail).zip(right_tail) {
        *out = Op::apply(left, right);
    }
}

/// `target[k] = Op(target[k], source[k])`.
pub fn apply_binary_assign<Op: BinaryOp>(target: &mut [u8], source: &[u8]) {
    let body = target.len() / WORD * WORD;
    let (target_words, target_tail) = target.split_at_mut(body);
    let (source_words, source_tail) = source.split_at(body);

    for (target, source) in target_words.chunks_exact_mut(WORD).zip(source_words.chunks_exact(WORD)) {
        Op::apply(u64::load(target), u64::load(source)).store(target);
    }
    for (target, &source) in target_tail.iter_mut().zip(source_tail) {
        *target = Op::apply(*target, source);
    }
}

pub fn apply_not(output: &mut [u8], input: &[u8]) {
    let body = output.len() / WORD * WORD;
    let (output_words, output_tail) = output.split_at_mut(body);
    let (input_words, input_tail) = input.split_at(body);

    for (out, word) in output_words.chunks_exact_mut(WORD).zip(input_words.chunks_exact(WORD)) {
        (!u64::load(word)).store(out);
    }
    for (out, &byte) in output_tail.iter_mut().zip(input_tail) {
        *out = !byte;
    }
}

/// Complements the first `num_bits` bits of `record` in place, leaving higher bits as they are.
pub fn complement_low_bits(record: &mut [u8], num_bits: usize) {
    let full_bytes = num_bits / 8;
    let body = full_bytes / WORD * WORD;
    let (words, rest) = record.split_at_mut(body);
    for word in words.chunks_exact_mut(WORD) {
        (!u64::load(word)).store(word);
    }
    for byte in &mut rest[..full_bytes - body] {
        *byte = !*byte;
    }
    let remainder = num_bits % 8;
    if remainder > 0 {
        record[full_bytes] ^= (1u8 << remainder) - 1;
    }
}

#[must_use]
pub fn popcount(record: &[u8]) -> usize {
    let body = record.len() / WORD * WORD;
    let (words, tail) = record.split_at(body);
    let word_count: usize = words.chunks_exact(WORD).map(|word| Lane::count_ones(u64::load(word))).sum();
    word_count + tail.iter().map(|&byte| Lane::count_ones(byte)).sum::<usize>()
}

/// `popcount(Op(left, right))` without materializing the combined record.
#[must_use]
pub fn popcount_binary<Op: BinaryOp>(left: &[u8], right: &[u8]) -> usize {
    let body = left.len() / WORD * WORD;
    let (left_words, left_tail) = left.split_at(body);
    let (right_words, right_tail) = right.split_at(body);
    let word_count: usize = left_words
        .chunks_exact(WORD)
        .zip(right_words.chunks_exact(WORD))
        .map(|(left, right)| Lane::count_ones(Op::apply(u64::load(left), u64::load(right))))
        .sum();
    let tail_count: usize = left_tail
        .iter()
        .zip(right_tail)
        .map(|(&left, &right)| Lane::count_ones(Op::apply(left, right)))
        .sum();
    word_count + tail_count
}
