//! In-memory map layers: polygons with ids and polylines.

use anyhow::Result;
use geo::{MultiLineString, MultiPolygon, Rect};

use crate::geom::{bounds_of, BoxFilter, ClipBox, WebMercator};

/// Polygons keyed by an id (a GEOID for block groups).
#[derive(Debug, Clone, Default)]
pub struct PolygonLayer {
    pub ids: Vec<String>,
    pub shapes: Vec<MultiPolygon<f64>>,
}

/// Polylines such as interstate highways.
#[derive(Debug, Clone, Default)]
pub struct LineLayer {
    pub shapes: Vec<MultiLineString<f64>>,
}

impl PolygonLayer {
    pub fn new(ids: Vec<String>, shapes: Vec<MultiPolygon<f64>>) -> Self {
        assert_eq!(ids.len(), shapes.len(), "[layer] {} ids for {} shapes", ids.len(), shapes.len());
        Self { ids, shapes }
    }

    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { bounds_of(&self.shapes) }

    /// Keep only the polygons reaching into the clip box.
    pub fn clip(self, clip: &ClipBox) -> Self {
        let keep = BoxFilter::new(&self.shapes).select(clip);
        let (ids, shapes) = self.ids.into_iter()
            .zip(self.shapes)
            .enumerate()
            .filter_map(|(i, feature)| keep.binary_search(&i).is_ok().then_some(feature))
            .unzip();
        Self { ids, shapes }
    }

    pub fn project(&self, mercator: &WebMercator) -> Result<Self> {
        Ok(Self {
            ids: self.ids.clone(),
            shapes: self.shapes.iter().map(|shape| mercator.geometry(shape)).collect::<Result<_>>()?,
        })
    }
}

impl LineLayer {
    pub fn new(shapes: Vec<MultiLineString<f64>>) -> Self { Self { shapes } }

    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    pub fn clip(self, clip: &ClipBox) -> Self {
        let keep = BoxFilter::new(&self.shapes).select(clip);
        let shapes = self.shapes.into_iter()
            .enumerate()
            .filter_map(|(i, shape)| keep.binary_search(&i).is_ok().then_some(shape))
            .collect();
        Self { shapes }
    }

    pub fn project(&self, mercator: &WebMercator) -> Result<Self> {
        Ok(Self {
            shapes: self.shapes.iter().map(|shape| mercator.geometry(shape)).collect::<Result<_>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use geo::{line_string, polygon};

    use super::*;

    fn triangle(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![(x: x, y: y), (x: x + 0.1, y: y), (x: x, y: y + 0.1)]])
    }

    #[test]
    fn clipping_keeps_ids_aligned() {
        let layer = PolygonLayer::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![triangle(-84.4, 33.7), triangle(-81.1, 32.0), triangle(-83.6, 32.8)],
        );
        let clipped = layer.clip(&ClipBox::from_array([-85.5, 32.8, -82.8, 34.5]));
        assert_eq!(clipped.ids, ["a", "c"]);
        assert_eq!(clipped.len(), 2);
    }

    #[test]
    fn clips_lines() {
        let roads = LineLayer::new(vec![
            MultiLineString(vec![line_string![(x: -84.5, y: 33.0), (x: -84.0, y: 34.0)]]),
            MultiLineString(vec![line_string![(x: -81.5, y: 31.0), (x: -81.0, y: 31.5)]]),
        ]);
        assert_eq!(roads.clip(&ClipBox::from_array([-85.5, 32.8, -82.8, 34.5])).len(), 1);
    }
}
