//! Shapefile loading: ring conversion, column canonicalization, and layer assembly.

mod polygon;
mod read;

pub use polygon::{is_zero_geometry, shp_to_geo};
pub use read::{describe, layer_from_items, read_layer, read_records, ShapefileSummary};
