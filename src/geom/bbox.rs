use geo::{BoundingRect, Rect};
use rstar::{RTree, RTreeObject, AABB};

use super::ClipBox;

/// A feature's bounding box in an R-tree, tagged with the feature index.
#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Envelope index for selecting the features that reach into a clip box.
#[derive(Debug, Clone)]
pub struct BoxFilter {
    rtree: RTree<BoundingBox>,
}

impl BoxFilter {
    /// Index the envelopes of `shapes`. Shapes without extent are never
    /// selected.
    pub fn new<G>(shapes: &[G]) -> Self
    where
        G: BoundingRect<f64>,
        G::Output: Into<Option<Rect<f64>>>,
    {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(idx, shape)| shape.bounding_rect().into().map(|bbox| BoundingBox { idx, bbox }))
                    .collect()
            ),
        }
    }

    /// Indices, ascending, of shapes whose envelope intersects the window.
    pub fn select(&self, clip: &ClipBox) -> Vec<usize> {
        let rect = clip.rect();
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        let mut hits = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|bbox| bbox.idx)
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    #[test]
    fn selects_shapes_reaching_into_window() {
        let shapes = vec![
            MultiPolygon(vec![polygon![(x: -84.5, y: 33.5), (x: -84.0, y: 33.5), (x: -84.0, y: 34.0)]]),
            MultiPolygon(vec![polygon![(x: -81.5, y: 31.5), (x: -81.0, y: 31.5), (x: -81.0, y: 32.0)]]),
            MultiPolygon(vec![polygon![(x: -83.0, y: 34.4), (x: -82.0, y: 34.4), (x: -82.0, y: 35.0)]]),
        ];
        let filter = BoxFilter::new(&shapes);
        let clip = ClipBox::from_array([-85.5, 32.8, -82.8, 34.5]);
        assert_eq!(filter.select(&clip), vec![0, 2]);
    }
}
