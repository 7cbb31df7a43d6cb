use std::f64::consts::TAU;

use geo::{Centroid, Coord, LineString, MultiPolygon, Point, Polygon};

use crate::{error::QueryError, layer::Layer};

/// The resolved query anchor: every record matching the id, their union, and its centroid.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub id: i64,
    pub records: Vec<usize>,
    pub union: MultiPolygon<f64>,
    pub centroid: Point<f64>,
}

/// Resolve `id` against the layer's id field. Duplicate matches are unioned before the
/// centroid is taken. Fails with `NotFound` when nothing matches or the matches have no area
/// to take a centroid of.
pub fn resolve_anchor(layer: &Layer, id: i64) -> Result<Anchor, QueryError> {
    let records = layer.find(id).to_vec();
    if records.is_empty() { return Err(QueryError::NotFound) }

    let union = layer.geoms().union_of(&records);
    let centroid = union.centroid().ok_or(QueryError::NotFound)?;

    Ok(Anchor { id, records, union, centroid })
}

/// A circle of `radius` around `center`, approximated by a regular polygon with `segments`
/// vertices lying on the circle. Planar units, no geodesic correction.
pub fn buffer(center: Point<f64>, radius: f64, segments: usize) -> Polygon<f64> {
    let segments = segments.max(3);
    let mut coords = (0..segments)
        .map(|i| {
            let theta = TAU * i as f64 / segments as f64;
            Coord { x: center.x() + radius * theta.cos(), y: center.y() + radius * theta.sin() }
        })
        .collect::<Vec<_>>();
    coords.push(coords[0]);

    Polygon::new(LineString(coords), vec![])
}

/// Indices of the records of `layer` intersecting `buffer`, in record order.
#[inline]
pub fn filter_intersecting(layer: &Layer, buffer: &Polygon<f64>) -> Vec<usize> {
    layer.geoms().intersecting(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerKind, ZoneRecord};
    use geo::polygon;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![(x: x, y: y), (x: x + size, y: y), (x: x + size, y: y + size), (x: x, y: y + size), (x: x, y: y)]
    }

    fn make_test_layer() -> Layer {
        Layer::from_records(LayerKind::OldZones, [
            ZoneRecord::new("42", square(0.0, 0.0, 100.0)),
            ZoneRecord::new("43", square(100.0, 0.0, 100.0)),
            ZoneRecord::new("44", square(5000.0, 5000.0, 100.0)),
            ZoneRecord::new("45", square(200.0, 0.0, 100.0)),
            ZoneRecord::new("45", square(300.0, 0.0, 100.0)),
        ]).unwrap()
    }

    #[test]
    fn resolve_uses_centroid_of_union() {
        let layer = make_test_layer();
        let anchor = resolve_anchor(&layer, 45).unwrap();

        assert_eq!(anchor.records, vec![3, 4]);
        assert!((anchor.centroid.x() - 300.0).abs() < 1e-9);
        assert!((anchor.centroid.y() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn resolve_unknown_id_is_not_found() {
        let layer = make_test_layer();
        assert_eq!(resolve_anchor(&layer, 500).unwrap_err(), QueryError::NotFound);
    }

    #[test]
    fn buffer_vertices_lie_on_circle() {
        let center = Point::new(50.0, 50.0);
        let circle = buffer(center, 1000.0, 64);

        assert_eq!(circle.exterior().0.len(), 65);
        assert_eq!(circle.exterior().0.first(), circle.exterior().0.last());
        for coord in circle.exterior().coords() {
            let distance = (coord.x - center.x()).hypot(coord.y - center.y());
            assert!((distance - 1000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn filter_keeps_nearby_records_only() {
        let layer = make_test_layer();
        let anchor = resolve_anchor(&layer, 42).unwrap();

        // Reaches 43 (starts at x=100) and 45 (starts at x=200), not the far record.
        let circle = buffer(anchor.centroid, 200.0, 64);
        assert_eq!(filter_intersecting(&layer, &circle), vec![0, 1, 3]);

        let wide = buffer(anchor.centroid, 10_000.0, 64);
        assert_eq!(filter_intersecting(&layer, &wide), vec![0, 1, 2, 3, 4]);
    }
}
