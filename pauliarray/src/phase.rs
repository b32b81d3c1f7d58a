use num_complex::Complex64;
use std::fmt;
use std::ops::{Mul, MulAssign};

/// Values of `(-i)^p` for `p = 0, 1, 2, 3`.
pub const PHASE_TABLE: [Complex64; 4] = [
    Complex64::new(1.0, 0.0),
    Complex64::new(0.0, -1.0),
    Complex64::new(-1.0, 0.0),
    Complex64::new(0.0, 1.0),
];

/// Fourth root of unity `(-i)^power`, with `power` kept in `0..4`.
///
/// ```
/// use pauliarray::Phase;
/// use num_complex::Complex64;
///
/// let phase = Phase::new(3) * Phase::new(2);
/// assert_eq!(phase.power(), 1);
/// assert_eq!(phase.to_complex(), Complex64::new(0.0, -1.0));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Phase(u8);

impl Phase {
    pub const ONE: Phase = Phase(0);
    pub const MINUS_I: Phase = Phase(1);
    pub const MINUS_ONE: Phase = Phase(2);
    pub const I: Phase = Phase(3);

    #[must_use]
    pub const fn new(power: u8) -> Self {
        Phase(power % 4)
    }

    /// `(-i)^count`, reduced modulo 4.
    #[must_use]
    pub fn from_count(count: usize) -> Self {
        Phase((count % 4) as u8)
    }

    #[must_use]
    pub fn power(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn to_complex(self) -> Complex64 {
        PHASE_TABLE[usize::from(self.0)]
    }
}

impl Mul for Phase {
    type Output = Phase;

    fn mul(self, other: Phase) -> Phase {
        Phase((self.0 + other.0) % 4)
    }
}

impl MulAssign for Phase {
    fn mul_assign(&mut self, other: Phase) {
        *self = *self * other;
    }
}

impl From<Phase> for Complex64 {
    fn from(phase: Phase) -> Self {
        phase.to_complex()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self.0 {
            0 => "+1",
            1 => "-i",
            2 => "-1",
            _ => "+i",
        };
        f.write_str(text)
    }
}
