use geo::{BoundingRect, Coord, HasDimensions, LineString, MultiPolygon, Polygon};
use shapefile as shp;

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>.
/// Shapefiles store each outer ring followed by its holes, so holes attach to the last outer ring.
pub fn shp_to_geo(p: &shp::Polygon) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last { coords.push(first) }
        }
    }

    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in p.rings() {
        let mut coords = ring.points().iter()
            .map(|pt| Coord { x: pt.x, y: pt.y })
            .collect::<Vec<_>>();
        ensure_closed(&mut coords);

        match ring {
            shp::PolygonRing::Outer(_) => {
                // flush previous polygon
                if let Some(exterior) = current_exterior.take() {
                    polys.push(Polygon::new(exterior, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(LineString(coords));
            }
            shp::PolygonRing::Inner(_) => current_holes.push(LineString(coords)),
        }
    }
    if let Some(exterior) = current_exterior {
        polys.push(Polygon::new(exterior, current_holes));
    }

    MultiPolygon(polys)
}

/// True for geometries the loader drops: empty ones, and those whose bounding box collapses to
/// the origin (a common placeholder for missing shapes).
pub fn is_zero_geometry(shape: &MultiPolygon<f64>) -> bool {
    if shape.is_empty() { return true }
    match shape.bounding_rect() {
        None => true,
        Some(rect) => rect.min() == Coord { x: 0.0, y: 0.0 } && rect.max() == Coord { x: 0.0, y: 0.0 },
    }
}
