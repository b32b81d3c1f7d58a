pub mod core;
pub use core::{All, PRODUCT_TABLE, PauliMatrix};

pub mod error;
pub use error::{PauliError, Result};

pub mod phase;
pub use phase::{PHASE_TABLE, Phase};

pub mod symplectic;
pub use symplectic::Composition;

pub mod matrix;
pub use matrix::{DenseMatrix, SparsePauliMatrix, sparse_matrix};

pub mod pauli_array;
pub use pauli_array::PauliArray;
