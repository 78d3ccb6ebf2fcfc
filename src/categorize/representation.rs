use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Half-width of the parity band around zero.
pub const PARITY_THRESHOLD: f64 = 0.05;

/// Direction of a representation index relative to parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    Over,
    Parity,
    Under,
}

impl Representation {
    /// Values strictly beyond the threshold are over or under represented;
    /// the threshold itself counts as parity. Missing values have no
    /// representation.
    pub fn of(index: Option<f64>) -> Option<Self> {
        Self::with_threshold(index, PARITY_THRESHOLD)
    }

    pub fn with_threshold(index: Option<f64>, threshold: f64) -> Option<Self> {
        let value = index.filter(|v| !v.is_nan())?;
        Some(if value > threshold { Self::Over }
             else if value < -threshold { Self::Under }
             else { Self::Parity })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Over => "Overrepresented",
            Self::Parity => "Parity",
            Self::Under => "Underrepresented",
        }
    }

    /// Count glyph used next to summary rows.
    pub fn symbol(&self) -> char {
        match self {
            Self::Over => '↑',
            Self::Parity => '=',
            Self::Under => '↓',
        }
    }

    /// Fill for split distributions; parity is not drawn.
    pub fn color(&self) -> Option<Rgb> {
        match self {
            Self::Over => Some(Rgb::new(0xa6, 0xce, 0xe3)),
            Self::Under => Some(Rgb::new(0xfd, 0xbf, 0x6f)),
            Self::Parity => None,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Over/parity/under counts for one group of schools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepresentationCounts {
    pub over: usize,
    pub parity: usize,
    pub under: usize,
}

impl RepresentationCounts {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut counts = Self::default();
        for value in values {
            if let Some(representation) = Representation::of(value) {
                counts.record(representation);
            }
        }
        counts
    }

    pub fn record(&mut self, representation: Representation) {
        match representation {
            Representation::Over => self.over += 1,
            Representation::Parity => self.parity += 1,
            Representation::Under => self.under += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.over += other.over;
        self.parity += other.parity;
        self.under += other.under;
    }

    #[inline] pub fn total(&self) -> usize { self.over + self.parity + self.under }
}

impl fmt::Display for RepresentationCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "↓{} ={} ↑{}", self.under, self.parity, self.over)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_parity() {
        assert_eq!(Representation::of(Some(0.05)), Some(Representation::Parity));
        assert_eq!(Representation::of(Some(-0.05)), Some(Representation::Parity));
        assert_eq!(Representation::of(Some(0.0500001)), Some(Representation::Over));
        assert_eq!(Representation::of(Some(-0.2)), Some(Representation::Under));
    }

    #[test]
    fn missing_values_have_no_representation() {
        assert_eq!(Representation::of(None), None);
        assert_eq!(Representation::of(Some(f64::NAN)), None);
    }

    #[test]
    fn counts_skip_missing_values() {
        let counts = RepresentationCounts::from_values([Some(0.3), Some(0.0), None, Some(-0.3), Some(-0.1)]);
        assert_eq!(counts, RepresentationCounts { over: 1, parity: 1, under: 2 });
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.to_string(), "↓2 =1 ↑1");
    }

    #[test]
    fn parity_has_no_fill() {
        assert!(Representation::Parity.color().is_none());
        assert_eq!(Representation::Over.color().map(|c| c.to_string()).as_deref(), Some("#a6cee3"));
    }
}
