use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::BinError;

/// An ordered, validated sequence of bin thresholds.
///
/// Invariants: at least two edges, every edge finite, and
/// `edges[i] < edges[i+1]` for all `i`. A sequence that breaks any of these
/// is rejected at construction, before a single value is classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    pub fn new(edges: Vec<f64>) -> Result<Self, BinError> {
        if edges.len() < 2 { return Err(BinError::TooFewEdges(edges.len())) }

        if let Some((index, &value)) = edges.iter().enumerate().find(|(_, e)| !e.is_finite()) {
            return Err(BinError::NonFiniteEdge { index, value });
        }

        if let Some(index) = edges.windows(2).position(|w| w[0] >= w[1]) {
            return Err(BinError::NotIncreasing { index, prev: edges[index], next: edges[index + 1] });
        }

        Ok(Self(edges))
    }

    /// Number of intervals between consecutive edges.
    #[inline] pub fn num_bins(&self) -> usize { self.0.len() - 1 }

    #[inline] pub fn first(&self) -> f64 { self.0[0] }

    #[inline] pub fn last(&self) -> f64 { self.0[self.0.len() - 1] }

    /// Closed bounds `(edges[i], edges[i+1])` of bin `i`.
    #[inline]
    pub fn interval(&self, index: usize) -> Option<(f64, f64)> {
        (index < self.num_bins()).then(|| (self.0[index], self.0[index + 1]))
    }

    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}

impl Deref for BinEdges {
    type Target = [f64];

    fn deref(&self) -> &[f64] { &self.0 }
}

impl TryFrom<Vec<f64>> for BinEdges {
    type Error = BinError;

    fn try_from(edges: Vec<f64>) -> Result<Self, Self::Error> { Self::new(edges) }
}

impl From<BinEdges> for Vec<f64> {
    fn from(edges: BinEdges) -> Self { edges.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_increasing_edges() {
        let edges = BinEdges::new(vec![-0.86, -0.17, 0.05, 0.68]).unwrap();
        assert_eq!(edges.num_bins(), 3);
        assert_eq!(edges.interval(1), Some((-0.17, 0.05)));
        assert_eq!(edges.interval(3), None);
    }

    #[test]
    fn rejects_short_sequences() {
        assert_eq!(BinEdges::new(vec![]), Err(BinError::TooFewEdges(0)));
        assert_eq!(BinEdges::new(vec![1.0]), Err(BinError::TooFewEdges(1)));
    }

    #[test]
    fn rejects_repeated_edge() {
        let err = BinEdges::new(vec![0.0, 0.5, 0.5, 1.0]).unwrap_err();
        assert_eq!(err, BinError::NotIncreasing { index: 1, prev: 0.5, next: 0.5 });
    }

    #[test]
    fn rejects_descending_edge() {
        assert!(matches!(
            BinEdges::new(vec![0.0, 2.0, 1.0]),
            Err(BinError::NotIncreasing { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(matches!(BinEdges::new(vec![0.0, f64::NAN]), Err(BinError::NonFiniteEdge { index: 1, .. })));
        assert!(matches!(BinEdges::new(vec![f64::NEG_INFINITY, 0.0]), Err(BinError::NonFiniteEdge { index: 0, .. })));
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<BinEdges>("[0.0, 1.0, 2.0]").is_ok());
        assert!(serde_json::from_str::<BinEdges>("[0.0, 1.0, 0.5]").is_err());
    }
}
