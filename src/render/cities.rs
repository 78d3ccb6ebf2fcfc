use anyhow::Result;
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::geom::WebMercator;

/// A city marked on the map, with its label displaced by `offset` meters
/// (projected) and joined to the city by a leader line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityLabel {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub offset: (f64, f64),
}

impl CityLabel {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, offset: (f64, f64)) -> Self {
        Self { name: name.into(), lat, lon, offset }
    }

    /// Labels left of their city are right-aligned.
    #[inline]
    pub fn right_aligned(&self) -> bool { self.offset.0 < 0.0 }

    /// Projected city location and label anchor.
    pub fn place(&self, mercator: &WebMercator) -> Result<(Coord<f64>, Coord<f64>)> {
        let at = mercator.coord(Coord { x: self.lon, y: self.lat })?;
        let label = Coord { x: at.x + self.offset.0, y: at.y + self.offset.1 };
        Ok((at, label))
    }
}
