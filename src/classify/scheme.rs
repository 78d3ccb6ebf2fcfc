use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use super::{BinEdges, BinError, ClassTally};

/// One ordered class: its display color and legend text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {
    pub color: Rgb,
    pub label: String,
}

impl ClassSpec {
    pub fn new(color: Rgb, label: impl Into<String>) -> Self {
        Self { color, label: label.into() }
    }
}

/// How values beyond the outermost edges are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extent {
    /// Values below `edges[0]` or above `edges[k]` are unclassified.
    #[default]
    Closed,
    /// The first and last classes extend to negative and positive infinity.
    Open,
}

/// Result of classifying a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification<'a> {
    /// Missing value, NaN, or outside every interval. Never drawn or counted
    /// in a legend.
    Unclassified,
    Class { index: usize, spec: &'a ClassSpec },
}

impl<'a> Classification<'a> {
    #[inline]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Class { index, .. } => Some(*index),
            Self::Unclassified => None,
        }
    }

    #[inline]
    pub fn color(&self) -> Option<Rgb> {
        match self {
            Self::Class { spec, .. } => Some(spec.color),
            Self::Unclassified => None,
        }
    }

    #[inline]
    pub fn label(&self) -> Option<&'a str> {
        match self {
            Self::Class { spec, .. } => Some(spec.label.as_str()),
            Self::Unclassified => None,
        }
    }

    #[inline]
    pub fn is_classified(&self) -> bool { matches!(self, Self::Class { .. }) }
}

/// Fixed bin edges plus the class each interval maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScheme", into = "RawScheme")]
pub struct BinScheme {
    edges: BinEdges,
    classes: Vec<ClassSpec>,
    extent: Extent,
}

impl BinScheme {
    pub fn new(edges: BinEdges, classes: Vec<ClassSpec>) -> Result<Self, BinError> {
        if classes.len() != edges.num_bins() {
            return Err(BinError::ClassCountMismatch { edges: edges.len(), classes: classes.len() });
        }
        Ok(Self { edges, classes, extent: Extent::Closed })
    }

    /// Build a scheme from raw edges and color strings, labelling each class
    /// with its numeric range.
    pub fn from_colors(edges: Vec<f64>, colors: &[&str]) -> Result<Self, BinError> {
        let edges = BinEdges::new(edges)?;
        let classes = colors.iter()
            .zip(edges.intervals())
            .map(|(color, (lo, hi))| Ok(ClassSpec::new(Rgb::parse(color)?, range_label(lo, hi))))
            .collect::<Result<Vec<_>, BinError>>()?;

        if classes.len() != colors.len() || classes.len() != edges.num_bins() {
            return Err(BinError::ClassCountMismatch { edges: edges.len(), classes: colors.len() });
        }
        Self::new(edges, classes)
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    #[inline] pub fn edges(&self) -> &BinEdges { &self.edges }

    #[inline] pub fn classes(&self) -> &[ClassSpec] { &self.classes }

    #[inline] pub fn extent(&self) -> Extent { self.extent }

    #[inline] pub fn num_classes(&self) -> usize { self.classes.len() }

    /// Index of the class containing `value`.
    ///
    /// Intervals are closed on both ends and scanned in order, so a value
    /// sitting exactly on an edge shared by bins `i` and `i+1` lands in `i`.
    pub fn classify_index(&self, value: Option<f64>) -> Option<usize> {
        let value = value.filter(|v| !v.is_nan())?;

        if let Some(index) = self.edges.intervals().position(|(lo, hi)| lo <= value && value <= hi) {
            return Some(index);
        }

        match self.extent {
            Extent::Open if value < self.edges.first() => Some(0),
            Extent::Open if value > self.edges.last() => Some(self.num_classes() - 1),
            _ => None,
        }
    }

    pub fn classify(&self, value: Option<f64>) -> Classification<'_> {
        match self.classify_index(value) {
            Some(index) => Classification::Class { index, spec: &self.classes[index] },
            None => Classification::Unclassified,
        }
    }

    /// Classify a batch of values and count the members of each class.
    pub fn tally<I>(&self, values: I) -> ClassTally
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut tally = ClassTally::new(self.num_classes());
        for value in values {
            tally.record(self.classify_index(value));
        }
        tally
    }
}

/// Default legend text for a bin: both bounds at six decimals.
pub fn range_label(lo: f64, hi: f64) -> String {
    format!("{lo:.6} – {hi:.6}")
}

/// Serialized form of a scheme; validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawScheme {
    edges: Vec<f64>,
    classes: Vec<ClassSpec>,
    #[serde(default)]
    extent: Extent,
}

impl TryFrom<RawScheme> for BinScheme {
    type Error = BinError;

    fn try_from(raw: RawScheme) -> Result<Self, Self::Error> {
        Ok(Self::new(BinEdges::new(raw.edges)?, raw.classes)?.with_extent(raw.extent))
    }
}

impl From<BinScheme> for RawScheme {
    fn from(scheme: BinScheme) -> Self {
        Self { edges: scheme.edges.into(), classes: scheme.classes, extent: scheme.extent }
    }
}
