use geo::{Centroid, Coord, HasDimensions, Point, Rect};
use serde::Serialize;

use crate::{geom::merge_rects, layer::Layer};

/// One single-polygon part of a record's geometry, the unit the rendering layer draws.
/// Parts of a multi-part record share `parent_id` and each carry a copy of its attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingRecord {
    pub parent_id: String,
    pub exterior: Vec<(f64, f64)>,
    pub attributes: Vec<Option<f64>>, // Parallel to the owning table's `fields`
}

/// Text placement for one ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRecord {
    pub parent_id: String,
    pub centroid: (f64, f64),
}

/// Ring-level rendering table produced by `decompose`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RingTable {
    fields: Vec<String>,
    rings: Vec<RingRecord>,
}

impl RingTable {
    /// An empty table carrying the given attribute fields.
    pub fn empty(fields: &[String]) -> Self {
        Self { fields: fields.to_vec(), rings: Vec::new() }
    }

    /// A table holding a single ring with no attributes.
    pub(crate) fn single(parent_id: String, exterior: Vec<(f64, f64)>) -> Self {
        Self { fields: Vec::new(), rings: vec![RingRecord { parent_id, exterior, attributes: Vec::new() }] }
    }

    #[inline] pub fn fields(&self) -> &[String] { &self.fields }

    #[inline] pub fn rings(&self) -> &[RingRecord] { &self.rings }

    #[inline] pub fn len(&self) -> usize { self.rings.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rings.is_empty() }

    /// Value of attribute `field` on ring `idx`; `None` for null or unknown fields.
    pub fn value(&self, idx: usize, field: &str) -> Option<f64> {
        let col = self.fields.iter().position(|f| f == field)?;
        self.rings.get(idx).and_then(|ring| ring.attributes[col])
    }

    /// Hover text for `field`: one decimal place per ring, empty for null.
    pub fn formatted(&self, field: &str) -> Vec<String> {
        (0..self.rings.len())
            .map(|idx| self.value(idx, field).map(|v| format!("{v:.1}")).unwrap_or_default())
            .collect()
    }

    /// Bounding rectangle of all ring vertices.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.rings.iter()
            .filter_map(|ring| ring_bounds(&ring.exterior))
            .reduce(merge_rects)
    }
}

/// Text-placement table produced alongside a `RingTable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelTable {
    labels: Vec<LabelRecord>,
}

impl LabelTable {
    #[inline] pub fn labels(&self) -> &[LabelRecord] { &self.labels }

    #[inline] pub fn len(&self) -> usize { self.labels.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.labels.is_empty() }
}

fn ring_bounds(coords: &[(f64, f64)]) -> Option<Rect<f64>> {
    let (first, rest) = coords.split_first()?;
    let (mut min, mut max) = (*first, *first);
    for &(x, y) in rest {
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }
    Some(Rect::new(Coord { x: min.0, y: min.1 }, Coord { x: max.0, y: max.1 }))
}

/// Flatten the given records of `layer` into one ring (and one label) per polygon part.
///
/// Records with an empty geometry are skipped. Output follows record order, then part order.
/// Only each part's exterior ring is kept; its label sits at that part's own centroid.
/// Fields in `attribute_fields` that the layer lacks are carried as nulls.
pub fn decompose(layer: &Layer, records: &[usize], attribute_fields: &[String]) -> (RingTable, LabelTable) {
    let mut rings = RingTable::empty(attribute_fields);
    let mut labels = LabelTable::default();

    for &idx in records {
        let shape = layer.shape(idx);
        if shape.is_empty() { continue }

        let parent_id = layer.id(idx).to_string();
        let attributes = attribute_fields.iter()
            .map(|field| layer.attributes().get(field, idx))
            .collect::<Vec<_>>();

        for polygon in shape.iter().filter(|polygon| !polygon.is_empty()) {
            let centroid = polygon.centroid()
                .unwrap_or(Point::new(f64::NAN, f64::NAN));

            rings.rings.push(RingRecord {
                parent_id: parent_id.clone(),
                exterior: polygon.exterior().coords().map(|c| (c.x, c.y)).collect(),
                attributes: attributes.clone(),
            });
            labels.labels.push(LabelRecord {
                parent_id: parent_id.clone(),
                centroid: (centroid.x(), centroid.y()),
            });
        }
    }

    (rings, labels)
}
