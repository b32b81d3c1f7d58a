use crate::records::Shape;

/// Per-record bit counts.
///
/// An input holding exactly one record yields [`BitCounts::Scalar`]; any other
/// input yields [`BitCounts::Array`] carrying the input's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitCounts {
    Scalar(usize),
    Array { shape: Shape, counts: Vec<usize> },
}

impl BitCounts {
    pub(crate) fn from_counts(shape: &Shape, counts: Vec<usize>) -> Self {
        match counts.as_slice() {
            [count] => BitCounts::Scalar(*count),
            _ => BitCounts::Array {
                shape: shape.clone(),
                counts,
            },
        }
    }

    /// Counts in flat record order.
    #[must_use]
    pub fn values(&self) -> &[usize] {
        match self {
            BitCounts::Scalar(count) => std::slice::from_ref(count),
            BitCounts::Array { counts, .. } => counts,
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        match self {
            BitCounts::Scalar(count) => vec![count],
            BitCounts::Array { counts, .. } => counts,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, BitCounts::Scalar(_))
    }
}
