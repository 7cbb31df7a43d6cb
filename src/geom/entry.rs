use geo::{BoundingRect, MultiPolygon, Polygon, Rect};
use rstar::{RTreeObject, AABB};

/// Axis-aligned envelope of a rectangle, in the form the R-tree stores.
#[inline]
pub(super) fn envelope_of(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(rect.min().into(), rect.max().into())
}

/// Envelope of a query polygon, or `None` when it has no coordinates.
#[inline]
pub(super) fn query_envelope(polygon: &Polygon<f64>) -> Option<AABB<[f64; 2]>> {
    polygon.bounding_rect().map(envelope_of)
}

/// R-tree entry for one layer record. Records without geometry get no entry.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RecordEntry {
    record: usize,
    envelope: AABB<[f64; 2]>,
}

impl RecordEntry {
    /// Entry for record `record` with geometry `shape`, or `None` if the shape is empty.
    pub(super) fn for_shape(record: usize, shape: &MultiPolygon<f64>) -> Option<Self> {
        shape.bounding_rect().map(|rect| Self { record, envelope: envelope_of(rect) })
    }

    #[inline] pub(super) fn record(&self) -> usize { self.record }
}

impl RTreeObject for RecordEntry {
    type Envelope = AABB<[f64; 2]>;

    #[inline]
    fn envelope(&self) -> Self::Envelope { self.envelope }
}
