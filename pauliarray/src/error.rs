use z2r::Z2rError;

pub type Result<T> = std::result::Result<T, PauliError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PauliError {
    /// Invalid symplectic records, see [`Z2rError`]
    #[error(transparent)]
    Records(#[from] Z2rError),

    #[error("operator arrays act on {left} and {right} qubits")]
    QubitCountMismatch { left: usize, right: usize },

    #[error("operator arrays hold {left} and {right} operators")]
    OperatorCountMismatch { left: usize, right: usize },

    #[error("invalid Pauli label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("matrices of dimension {left} and {right} cannot be multiplied")]
    DimensionMismatch { left: usize, right: usize },

    /// Matrix representations are limited in size
    #[error("{num_qubits} qubits exceed the limit of {limit} for this representation")]
    TooManyQubits { num_qubits: usize, limit: usize },
}
