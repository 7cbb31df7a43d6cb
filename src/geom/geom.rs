use geo::{BooleanOps, BoundingRect, Coord, Intersects, MultiPolygon, Polygon, Rect};
use rstar::RTree;

use crate::geom::{query_envelope, RecordEntry};

/// Geometries represents the per-record MultiPolygons of one layer, with an R-tree over their
/// bounding boxes. A record with no geometry is stored as an empty MultiPolygon and is absent
/// from the R-tree.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<RecordEntry>,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    pub(crate) fn new(shapes: Vec<MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| RecordEntry::for_shape(i, shape))
                    .collect()
            ),
            shapes,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub(crate) fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the MultiPolygon of record `idx`.
    #[inline] pub(crate) fn shape(&self, idx: usize) -> &MultiPolygon<f64> { &self.shapes[idx] }

    /// Indices of all records whose geometry intersects `polygon` (boundary contact included),
    /// in ascending record order.
    pub(crate) fn intersecting(&self, polygon: &Polygon<f64>) -> Vec<usize> {
        let Some(envelope) = query_envelope(polygon) else { return Vec::new() };

        let mut hits = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.record())
            .filter(|&idx| self.shapes[idx].intersects(polygon))
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }

    /// Compute the union of the MultiPolygons of the given records.
    /// A single record is returned as-is without running the boolean ops.
    pub(crate) fn union_of(&self, indices: &[usize]) -> MultiPolygon<f64> {
        match indices {
            [] => MultiPolygon(Vec::new()),
            [idx] => self.shapes[*idx].clone(),
            _ => indices.iter()
                .map(|&idx| self.shapes[idx].clone())
                .reduce(|a, b| a.union(&b))
                .unwrap_or_else(|| MultiPolygon(Vec::new())),
        }
    }

    /// Compute the total bounding rectangle of the given records, skipping empty geometries.
    pub(crate) fn bounds_of(&self, indices: &[usize]) -> Option<Rect<f64>> {
        indices.iter()
            .filter_map(|&idx| self.shapes[idx].bounding_rect())
            .reduce(merge_rects)
    }
}

/// Smallest rectangle containing both `a` and `b`.
pub(crate) fn merge_rects(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]])
    }

    fn make_test_geoms() -> Geometries {
        Geometries::new(vec![
            square(0.0, 0.0, 10.0),           // 0
            square(10.0, 0.0, 10.0),          // 1, shares an edge with 0
            square(100.0, 100.0, 10.0),       // 2, far away
            MultiPolygon(Vec::new()),         // 3, no geometry
        ])
    }

    #[test]
    fn empty_shapes_are_not_indexed() {
        let geoms = make_test_geoms();
        assert_eq!(geoms.len(), 4);
        assert_eq!(geoms.rtree.size(), 3);
    }

    #[test]
    fn intersecting_counts_shared_boundary() {
        let geoms = make_test_geoms();
        let probe = polygon![(x: 20.0, y: 0.0), (x: 30.0, y: 0.0), (x: 30.0, y: 10.0), (x: 20.0, y: 10.0), (x: 20.0, y: 0.0)];
        assert_eq!(geoms.intersecting(&probe), vec![1]);
    }

    #[test]
    fn intersecting_is_sorted_and_excludes_disjoint() {
        let geoms = make_test_geoms();
        let probe = polygon![(x: 5.0, y: 5.0), (x: 15.0, y: 5.0), (x: 15.0, y: 8.0), (x: 5.0, y: 8.0), (x: 5.0, y: 5.0)];
        assert_eq!(geoms.intersecting(&probe), vec![0, 1]);
    }

    #[test]
    fn bounds_of_skips_empty_geometry() {
        let geoms = make_test_geoms();
        let rect = geoms.bounds_of(&[0, 3, 2]).unwrap();
        assert_eq!(rect.min(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(rect.max(), Coord { x: 110.0, y: 110.0 });
        assert!(geoms.bounds_of(&[3]).is_none());
    }

    #[test]
    fn union_of_single_record_is_identity() {
        let geoms = make_test_geoms();
        assert_eq!(geoms.union_of(&[2]), square(100.0, 100.0, 10.0));
        assert!(geoms.union_of(&[]).0.is_empty());
    }
}
