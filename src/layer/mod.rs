mod attributes;
mod layer;

pub use attributes::AttributeTable;
pub use layer::{Layer, LayerKind, ZoneRecord};
