use crate::phase::Phase;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::fmt;

/// All elements of a given type. Usually used for simple enums.
pub trait All<const NUM_ELEMENTS: usize>: Sized {
    fn all() -> [Self; NUM_ELEMENTS];
}

/// Pauli matrices on one qubit, discriminant `(z << 1) | x` of the symplectic encoding.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, FromPrimitive, ToPrimitive)]
pub enum PauliMatrix {
    /// One qubit identity matrix
    /// ```text
    /// |1 0|
    /// |0 1|
    /// ```
    I = 0b00,

    /// Pauli X
    /// ```text
    /// |0 1|
    /// |1 0|
    /// ```
    X = 0b01,

    /// Pauli Z
    /// ```text
    /// |1  0|
    /// |0 -1|
    /// ```
    Z = 0b10,

    /// Pauli Y
    /// ```text
    /// |0 -i|
    /// |i  0|
    /// ```
    Y = 0b11,
}

use PauliMatrix::{I, X, Y, Z};

/// `PRODUCT_TABLE[left][right] = (product, power)` with `left · right = (-i)^power · product`.
/// Rows and columns are indexed by the [`PauliMatrix`] discriminant.
pub const PRODUCT_TABLE: [[(PauliMatrix, u8); 4]; 4] = [
    // I
    [(I, 0), (X, 0), (Z, 0), (Y, 0)],
    // X
    [(X, 0), (I, 0), (Y, 1), (Z, 3)],
    // Z
    [(Z, 0), (Y, 3), (I, 0), (X, 1)],
    // Y
    [(Y, 0), (Z, 1), (X, 3), (I, 0)],
];

impl PauliMatrix {
    #[must_use]
    pub fn from_bits(z: bool, x: bool) -> Self {
        match (z, x) {
            (false, false) => I,
            (false, true) => X,
            (true, false) => Z,
            (true, true) => Y,
        }
    }

    #[must_use]
    pub fn z_bit(self) -> bool {
        (self as u8) & 0b10 != 0
    }

    #[must_use]
    pub fn x_bit(self) -> bool {
        (self as u8) & 0b01 != 0
    }

    /// Matrix product `self · other` as a Pauli matrix and a phase.
    ///
    /// ```
    /// use pauliarray::{PauliMatrix, Phase};
    ///
    /// assert_eq!(PauliMatrix::X.multiply(PauliMatrix::Z), (PauliMatrix::Y, Phase::MINUS_I));
    /// ```
    #[must_use]
    pub fn multiply(self, other: PauliMatrix) -> (PauliMatrix, Phase) {
        let (product, power) = PRODUCT_TABLE[self as usize][other as usize];
        (product, Phase::new(power))
    }

    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            I => 'I',
            X => 'X',
            Y => 'Y',
            Z => 'Z',
        }
    }

    #[must_use]
    pub fn from_char(character: char) -> Option<Self> {
        match character {
            'I' => Some(I),
            'X' => Some(X),
            'Y' => Some(Y),
            'Z' => Some(Z),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        FromPrimitive::from_u8(index)
    }
}

impl All<4> for PauliMatrix {
    fn all() -> [PauliMatrix; 4] {
        [I, X, Z, Y]
    }
}

impl fmt::Display for PauliMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
