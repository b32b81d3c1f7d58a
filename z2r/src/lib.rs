pub mod error;
pub use error::{Result, Z2rError};

pub mod policy;
pub use policy::{DEFAULT_PARALLEL_THRESHOLD, ExecutionPolicy};

pub mod records;
pub use records::{PackedRecords, Shape, bytes_for_bits};

pub mod kernel;
pub use kernel::{
    BitCounts, bitwise_and, bitwise_count, bitwise_dot, bitwise_not, bitwise_not_padded, bitwise_or, bitwise_xor,
};

pub mod unique;
pub use unique::{Unique, UniqueOptions, UnorderedUnique, unique, unordered_unique};

pub mod linalg;
