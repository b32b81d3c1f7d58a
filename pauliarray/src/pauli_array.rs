use crate::core::PauliMatrix;
use crate::error::{PauliError, Result};
use crate::matrix::{DenseMatrix, sparse_matrix};
use crate::phase::Phase;
use crate::symplectic::{self, Composition, check_halves, clear_padding};
use num_complex::Complex64;
use rand::Rng;
use std::fmt;
use z2r::kernel::{And, Or, bitwise_count, popcount_binary};
use z2r::{ExecutionPolicy, PackedRecords, Shape, Z2rError, bytes_for_bits};

/// Array of Pauli strings on `num_qubits` qubits in symplectic form.
///
/// Operator `i` acts on qubit `q` with the [`PauliMatrix`] encoded by bit `q` of
/// record `i` of `z` and `x`. Bits at positions `num_qubits` and above are kept clear.
///
/// Operations run with [`ExecutionPolicy::default`]; the free functions in
/// [`symplectic`] take an explicit policy.
///
/// # Examples
///
/// ```
/// use pauliarray::{PauliArray, Phase};
///
/// let left = PauliArray::from_labels(&["ZX"]).unwrap();
/// let right = PauliArray::from_labels(&["XZ"]).unwrap();
/// let (product, phases) = left.compose(&right).unwrap();
/// assert_eq!(product.label(0), "YY");
/// assert_eq!(phases, vec![Phase::ONE]);
/// assert_eq!(left.commutes_with(&right).unwrap(), vec![true]);
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauliArray {
    z: PackedRecords,
    x: PackedRecords,
    num_qubits: usize,
}

impl PauliArray {
    /// Wraps symplectic halves, clearing bits beyond `num_qubits`.
    ///
    /// # Errors
    ///
    /// Halves of different shape or itemsize, or `num_qubits` beyond the record capacity.
    pub fn new(mut z: PackedRecords, mut x: PackedRecords, num_qubits: usize) -> Result<Self> {
        check_halves(&z, &x)?;
        if num_qubits > z.bit_capacity() {
            return Err(Z2rError::BitWidthExceeded {
                num_bits: num_qubits,
                capacity: z.bit_capacity(),
            }
            .into());
        }
        clear_padding(&mut z, num_qubits);
        clear_padding(&mut x, num_qubits);
        Ok(Self { z, x, num_qubits })
    }

    pub fn identities(shape: impl Into<Shape>, num_qubits: usize) -> Self {
        let shape = shape.into();
        let itemsize = bytes_for_bits(num_qubits);
        Self {
            z: PackedRecords::zeros(shape.clone(), itemsize),
            x: PackedRecords::zeros(shape, itemsize),
            num_qubits,
        }
    }

    pub fn random(shape: impl Into<Shape>, num_qubits: usize) -> Self {
        Self::random_with_rng(shape, num_qubits, &mut rand::thread_rng())
    }

    pub fn random_with_rng<R: Rng + ?Sized>(shape: impl Into<Shape>, num_qubits: usize, rng: &mut R) -> Self {
        let (z, x) = symplectic::random(shape, num_qubits, rng);
        Self { z, x, num_qubits }
    }

    /// Parses labels such as `"XIZY"`, qubit 0 first. All labels must have the same length.
    ///
    /// # Errors
    ///
    /// [`PauliError::InvalidLabel`] for characters outside `I`, `X`, `Y`, `Z`, and
    /// [`PauliError::QubitCountMismatch`] for labels of different lengths.
    pub fn from_labels<Label: AsRef<str>>(labels: &[Label]) -> Result<Self> {
        let num_qubits = labels.first().map_or(0, |label| label.as_ref().chars().count());
        let mut result = Self::identities([labels.len()], num_qubits);
        for (index, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let length = label.chars().count();
            if length != num_qubits {
                return Err(PauliError::QubitCountMismatch {
                    left: num_qubits,
                    right: length,
                });
            }
            for (qubit, character) in label.chars().enumerate() {
                let pauli = PauliMatrix::from_char(character).ok_or_else(|| PauliError::InvalidLabel {
                    label: label.to_owned(),
                    reason: format!("unexpected character {character:?} at qubit {qubit}"),
                })?;
                result.z.set_bit(index, qubit, pauli.z_bit());
                result.x.set_bit(index, qubit, pauli.x_bit());
            }
        }
        Ok(result)
    }

    #[must_use]
    pub fn z(&self) -> &PackedRecords {
        &self.z
    }

    #[must_use]
    pub fn x(&self) -> &PackedRecords {
        &self.x
    }

    #[must_use]
    pub fn into_parts(self) -> (PackedRecords, PackedRecords, usize) {
        (self.z, self.x, self.num_qubits)
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        self.z.shape()
    }

    /// Number of operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.z.element_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn pauli(&self, index: usize, qubit: usize) -> PauliMatrix {
        PauliMatrix::from_bits(self.z.bit(index, qubit), self.x.bit(index, qubit))
    }

    /// Label of operator `index`, qubit 0 first.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        (0..self.num_qubits).map(|qubit| self.pauli(index, qubit).to_char()).collect()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).map(|index| self.label(index)).collect()
    }

    #[must_use]
    pub fn is_identity(&self) -> Vec<bool> {
        self.z
            .records()
            .zip(self.x.records())
            .map(|(z, x)| popcount_binary::<Or>(z, x) == 0)
            .collect()
    }

    /// Whether every factor is `I` or `Z`.
    #[must_use]
    pub fn is_diagonal(&self) -> Vec<bool> {
        bitwise_count(&self.x, ExecutionPolicy::default())
            .values()
            .iter()
            .map(|&count| count == 0)
            .collect()
    }

    /// `(-i)^{popcount(z & x)}` for every operator: the factor between the
    /// Hermitian string and the plain product `Z^z X^x`.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.z
            .records()
            .zip(self.x.records())
            .map(|(z, x)| Phase::from_count(popcount_binary::<And>(z, x)))
            .collect()
    }

    fn check_qubits(&self, other: &PauliArray) -> Result<()> {
        if self.num_qubits != other.num_qubits {
            return Err(PauliError::QubitCountMismatch {
                left: self.num_qubits,
                right: other.num_qubits,
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Different qubit or operator counts.
    pub fn commutes_with(&self, other: &PauliArray) -> Result<Vec<bool>> {
        self.check_qubits(other)?;
        symplectic::commutes(&self.z, &self.x, &other.z, &other.x, ExecutionPolicy::default())
    }

    /// Products `self[i] · other[i]` and their phases.
    ///
    /// # Errors
    ///
    /// Different qubit or operator counts.
    pub fn compose(&self, other: &PauliArray) -> Result<(PauliArray, Vec<Phase>)> {
        self.check_qubits(other)?;
        let Composition { z, x, phases } =
            symplectic::compose(&self.z, &self.x, &other.z, &other.x, ExecutionPolicy::default())?;
        Ok((
            PauliArray {
                z,
                x,
                num_qubits: self.num_qubits,
            },
            phases,
        ))
    }

    /// Operators acting as `self[i]` on the low qubits and `other[i]` on the following ones.
    ///
    /// # Errors
    ///
    /// Different operator counts.
    pub fn tensor(&self, other: &PauliArray) -> Result<PauliArray> {
        let (z, x) = symplectic::tensor(
            &self.z,
            &self.x,
            self.num_qubits,
            &other.z,
            &other.x,
            other.num_qubits,
            ExecutionPolicy::default(),
        )?;
        Ok(PauliArray {
            z,
            x,
            num_qubits: self.num_qubits + other.num_qubits,
        })
    }

    /// Dense matrix of the sum of all operators.
    ///
    /// # Errors
    ///
    /// [`PauliError::TooManyQubits`] beyond [`MAX_MATRIX_QUBITS`](crate::matrix::MAX_MATRIX_QUBITS).
    pub fn to_matrix(&self) -> Result<DenseMatrix> {
        let mut matrix = DenseMatrix::zeros(self.num_qubits)?;
        for (index, phase) in self.phases().into_iter().enumerate() {
            let sparse = sparse_matrix(self.z.record(index), self.x.record(index), self.num_qubits)?;
            matrix.add_sparse(&sparse, phase);
        }
        Ok(matrix)
    }

    /// Dense matrix of operator `index` alone.
    ///
    /// # Errors
    ///
    /// See [`to_matrix`](Self::to_matrix).
    pub fn operator_matrix(&self, index: usize) -> Result<DenseMatrix> {
        let mut matrix = DenseMatrix::zeros(self.num_qubits)?;
        let phase = Phase::from_count(popcount_binary::<And>(self.z.record(index), self.x.record(index)));
        let sparse = sparse_matrix(self.z.record(index), self.x.record(index), self.num_qubits)?;
        matrix.add_sparse(&sparse, phase);
        Ok(matrix)
    }

    /// Complex phases of [`phases`](Self::phases).
    #[must_use]
    pub fn complex_phases(&self) -> Vec<Complex64> {
        self.phases().into_iter().map(Complex64::from).collect()
    }
}

impl fmt::Display for PauliArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for index in 0..self.len() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.label(index))?;
        }
        write!(f, "]")
    }
}
