use geo::{BoundingRect, Coord, Rect};
use serde::{Deserialize, Serialize};

/// Expand a rectangle by `fraction` of its width and height on every side.
pub fn padded_bounds(rect: Rect<f64>, fraction: f64) -> Rect<f64> {
    let dx = rect.width() * fraction;
    let dy = rect.height() * fraction;
    Rect::new(
        Coord { x: rect.min().x - dx, y: rect.min().y - dy },
        Coord { x: rect.max().x + dx, y: rect.max().y + dy },
    )
}

/// Smallest rectangle containing both.
pub fn merge_bounds(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

/// Combined bounds of a set of geometries, if any has extent.
pub fn bounds_of<'a, G>(geometries: impl IntoIterator<Item = &'a G>) -> Option<Rect<f64>>
where
    G: BoundingRect<f64> + 'a,
    G::Output: Into<Option<Rect<f64>>>,
{
    geometries.into_iter()
        .filter_map(|geometry| geometry.bounding_rect().into())
        .reduce(merge_bounds)
}

/// Lon/lat window used to zoom a map onto a region. Serialized as
/// `[min_lon, min_lat, max_lon, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct ClipBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl ClipBox {
    pub fn from_array([min_lon, min_lat, max_lon, max_lat]: [f64; 4]) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    pub fn rect(&self) -> Rect<f64> {
        Rect::new(Coord { x: self.min_lon, y: self.min_lat }, Coord { x: self.max_lon, y: self.max_lat })
    }

    #[inline]
    pub fn contains(&self, coord: &Coord<f64>) -> bool {
        (self.min_lon..=self.max_lon).contains(&coord.x) && (self.min_lat..=self.max_lat).contains(&coord.y)
    }
}

impl From<[f64; 4]> for ClipBox {
    fn from(corners: [f64; 4]) -> Self { Self::from_array(corners) }
}

impl From<ClipBox> for [f64; 4] {
    fn from(clip: ClipBox) -> Self { [clip.min_lon, clip.min_lat, clip.max_lon, clip.max_lat] }
}

#[cfg(test)]
mod tests {
    use geo::{line_string, polygon, LineString, Polygon};

    use super::*;

    #[test]
    fn pads_five_percent_each_side() {
        let rect = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 100.0, y: 20.0 });
        let padded = padded_bounds(rect, 0.05);
        assert_eq!(padded.min(), Coord { x: -5.0, y: -1.0 });
        assert_eq!(padded.max(), Coord { x: 105.0, y: 21.0 });
    }

    #[test]
    fn bounds_cover_all_shapes() {
        let shapes: Vec<Polygon<f64>> = vec![
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
            polygon![(x: 5.0, y: -2.0), (x: 6.0, y: -2.0), (x: 6.0, y: 3.0)],
        ];
        let bounds = bounds_of(&shapes).unwrap();
        assert_eq!(bounds.min(), Coord { x: 0.0, y: -2.0 });
        assert_eq!(bounds.max(), Coord { x: 6.0, y: 3.0 });

        let lines: Vec<LineString<f64>> = vec![line_string![(x: 1.0, y: 1.0), (x: 2.0, y: 4.0)]];
        assert_eq!(bounds_of(&lines).unwrap().max(), Coord { x: 2.0, y: 4.0 });
        let empty: Vec<Polygon<f64>> = Vec::new();
        assert!(bounds_of(&empty).is_none());
    }

    #[test]
    fn clip_box_is_inclusive() {
        let clip = ClipBox::from_array([-85.5, 32.8, -82.8, 34.5]);
        assert!(clip.contains(&Coord { x: -84.388, y: 33.749 }));
        assert!(clip.contains(&Coord { x: -85.5, y: 32.8 }));
        assert!(!clip.contains(&Coord { x: -81.09, y: 32.08 }));
    }

    #[test]
    fn clip_box_reads_as_array() {
        let clip: ClipBox = serde_json::from_str("[-85.5, 32.8, -82.8, 34.5]").unwrap();
        assert_eq!(clip.min_lon, -85.5);
        assert_eq!(clip.max_lat, 34.5);
    }
}
