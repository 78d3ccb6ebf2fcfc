use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use super::{range_label, BinError, RightClosedBins};

/// Where an underlay's bin edges come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderlayBins {
    /// Fixed right-closed breaks.
    Breaks(RightClosedBins),
    /// Equal-count bins computed from the data at hand.
    Quantiles(usize),
}

/// Grayscale (or single-hue) fill for block groups drawn beneath the
/// school points. The ramp is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnderlay", into = "RawUnderlay")]
pub struct UnderlayScheme {
    bins: UnderlayBins,
    ramp: Vec<Rgb>,
    labels: Option<Vec<String>>,
}

impl UnderlayScheme {
    pub fn new(bins: UnderlayBins, ramp: &[&str], labels: Option<&[&str]>) -> Result<Self, BinError> {
        let ramp = ramp.iter().map(|c| Rgb::parse(c)).collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(bins, ramp, labels.map(|l| l.iter().map(|s| s.to_string()).collect()))
    }

    fn from_parts(bins: UnderlayBins, ramp: Vec<Rgb>, labels: Option<Vec<String>>) -> Result<Self, BinError> {
        if ramp.is_empty() { return Err(BinError::EmptyRamp) }
        Ok(Self { bins, ramp, labels })
    }

    #[inline] pub fn bins(&self) -> &UnderlayBins { &self.bins }

    #[inline] pub fn ramp(&self) -> &[Rgb] { &self.ramp }

    /// Legend text per bin; generated from the edges when absent.
    #[inline] pub fn labels(&self) -> Option<&[String]> { self.labels.as_deref() }

    /// Fix the bins for one dataset. Quantile underlays over empty or
    /// constant data resolve to `None` and draw nothing.
    pub fn resolve<I>(&self, values: I) -> Option<ResolvedUnderlay<'_>>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let bins = match &self.bins {
            UnderlayBins::Breaks(bins) => bins.clone(),
            UnderlayBins::Quantiles(n) => RightClosedBins::quantiles(values, *n)?,
        };
        Some(ResolvedUnderlay { scheme: self, bins })
    }
}

/// Serialized form of an underlay; validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawUnderlay {
    bins: UnderlayBins,
    ramp: Vec<Rgb>,
    #[serde(default)]
    labels: Option<Vec<String>>,
}

impl TryFrom<RawUnderlay> for UnderlayScheme {
    type Error = BinError;

    fn try_from(raw: RawUnderlay) -> Result<Self, Self::Error> {
        Self::from_parts(raw.bins, raw.ramp, raw.labels)
    }
}

impl From<UnderlayScheme> for RawUnderlay {
    fn from(scheme: UnderlayScheme) -> Self {
        Self { bins: scheme.bins, ramp: scheme.ramp, labels: scheme.labels }
    }
}

/// An underlay with concrete edges.
#[derive(Debug, Clone)]
pub struct ResolvedUnderlay<'a> {
    scheme: &'a UnderlayScheme,
    bins: RightClosedBins,
}

impl ResolvedUnderlay<'_> {
    #[inline] pub fn bins(&self) -> &RightClosedBins { &self.bins }

    #[inline] pub fn num_bins(&self) -> usize { self.bins.num_bins() }

    #[inline]
    pub fn classify_index(&self, value: Option<f64>) -> Option<usize> {
        self.bins.classify_index(value)
    }

    /// Ramp color for bin `index`. When there are fewer bins than ramp
    /// entries (quantiles with repeated edges) the bins are spread across the
    /// whole ramp, lightest to darkest.
    pub fn color(&self, index: usize) -> Rgb {
        let ramp = &self.scheme.ramp;
        let bins = self.num_bins();
        let slot = if bins <= 1 || bins == ramp.len() {
            index
        } else {
            ((index as f64) * (ramp.len() - 1) as f64 / (bins - 1) as f64).round() as usize
        };
        ramp[slot.min(ramp.len() - 1)]
    }

    pub fn label(&self, index: usize) -> String {
        match &self.scheme.labels {
            Some(labels) if labels.len() == self.num_bins() => labels[index].clone(),
            _ => self.bins.edges().interval(index)
                .map(|(lo, hi)| range_label(lo, hi))
                .unwrap_or_default(),
        }
    }
}
