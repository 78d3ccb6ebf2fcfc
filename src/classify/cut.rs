//! Right-closed binning for block-group underlays.
//!
//! Underlays follow the conventions of a dataframe `cut`: each interval is
//! `(edges[i], edges[i+1]]`, and the very first edge is admitted only when
//! `include_lowest` is set. Quantile underlays derive their edges from the
//! data and always include the lowest value.

use serde::{Deserialize, Serialize};

use super::{BinEdges, BinError};

/// Right-closed intervals over validated edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RightClosedBins {
    edges: BinEdges,
    #[serde(default)]
    include_lowest: bool,
}

impl RightClosedBins {
    pub fn new(edges: Vec<f64>, include_lowest: bool) -> Result<Self, BinError> {
        Ok(Self { edges: BinEdges::new(edges)?, include_lowest })
    }

    /// Bins at the `n`-quantiles of the non-missing values, with repeated
    /// quantiles collapsed. Returns `None` when fewer than two distinct edges
    /// remain (empty or constant data).
    pub fn quantiles<I>(values: I, n: usize) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let edges = quantile_edges(values, n);
        BinEdges::new(edges).ok().map(|edges| Self { edges, include_lowest: true })
    }

    #[inline] pub fn edges(&self) -> &BinEdges { &self.edges }

    #[inline] pub fn num_bins(&self) -> usize { self.edges.num_bins() }

    #[inline] pub fn include_lowest(&self) -> bool { self.include_lowest }

    pub fn classify_index(&self, value: Option<f64>) -> Option<usize> {
        let value = value.filter(|v| !v.is_nan())?;
        if self.include_lowest && value == self.edges.first() {
            return Some(0);
        }
        self.edges.intervals().position(|(lo, hi)| lo < value && value <= hi)
    }
}

/// Linear-interpolated quantiles at `j / n` for `j in 0..=n`, ignoring
/// missing and NaN values, with duplicate edges dropped.
pub fn quantile_edges<I>(values: I, n: usize) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sorted = values.into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();
    if sorted.is_empty() || n == 0 { return Vec::new() }
    sorted.sort_by(f64::total_cmp);

    let last = (sorted.len() - 1) as f64;
    let mut edges = (0..=n)
        .map(|j| {
            let position = last * j as f64 / n as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let frac = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        })
        .collect::<Vec<_>>();
    edges.dedup();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_are_right_closed() {
        let bins = RightClosedBins::new(vec![0.0, 508.0, 832.0, 1199.0], true).unwrap();
        assert_eq!(bins.classify_index(Some(508.0)), Some(0));
        assert_eq!(bins.classify_index(Some(508.5)), Some(1));
        assert_eq!(bins.classify_index(Some(1199.0)), Some(2));
        assert_eq!(bins.classify_index(Some(1200.0)), None);
    }

    #[test]
    fn lowest_edge_needs_include_lowest() {
        let edges = vec![0.0, 0.1253, 0.3157];
        assert_eq!(RightClosedBins::new(edges.clone(), true).unwrap().classify_index(Some(0.0)), Some(0));
        assert_eq!(RightClosedBins::new(edges, false).unwrap().classify_index(Some(0.0)), None);
    }

    #[test]
    fn quantile_edges_interpolate() {
        let values = (1..=5).map(|v| Some(v as f64));
        assert_eq!(quantile_edges(values, 4), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let values = [Some(0.0), Some(10.0)];
        let edges = quantile_edges(values, 5);
        let expected = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
        assert_eq!(edges.len(), expected.len());
        assert!(edges.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-9));
    }

    #[test]
    fn quantile_edges_skip_missing_and_drop_duplicates() {
        let values = [Some(0.0), None, Some(0.0), Some(0.0), Some(f64::NAN), Some(1.0)];
        let edges = quantile_edges(values, 4);
        assert_eq!(edges.first(), Some(&0.0));
        assert_eq!(edges.last(), Some(&1.0));
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn quantile_bins_cover_every_value() {
        let values = (0..100).map(|v| Some(v as f64)).collect::<Vec<_>>();
        let bins = RightClosedBins::quantiles(values.iter().copied(), 5).unwrap();
        assert_eq!(bins.num_bins(), 5);
        assert!(values.iter().all(|v| bins.classify_index(*v).is_some()));
        assert_eq!(bins.classify_index(Some(0.0)), Some(0));
        assert_eq!(bins.classify_index(Some(99.0)), Some(4));
    }

    #[test]
    fn constant_data_has_no_quantile_bins() {
        assert!(RightClosedBins::quantiles([Some(3.0), Some(3.0)], 5).is_none());
        assert!(RightClosedBins::quantiles(std::iter::empty(), 5).is_none());
    }
}
