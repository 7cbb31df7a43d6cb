use std::{collections::{BTreeMap, HashMap}, path::Path};

use anyhow::{bail, Context, Result};
use geo::MultiPolygon;
use log::{debug, info};
use shapefile::{dbase::FieldValue, Reader, Shape};

use crate::{
    io::polygon::{is_zero_geometry, shp_to_geo},
    layer::{AttributeTable, Layer, LayerKind},
};

/// Column renames applied per dataset, as (source name, canonical name).
/// A rename is skipped when the record already carries the canonical name.
fn renames(kind: LayerKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        LayerKind::OldZones => &[("TAZ_ID", "taz_id")],
        LayerKind::NewZones => &[
            ("taz_new1", "taz_id"),
            ("hh19", "HH19"), ("persns19", "PERSNS19"), ("workrs19", "WORKRS19"), ("emp19", "EMP19"),
            ("hh49", "HH49"), ("persns49", "PERSNS49"), ("workrs49", "WORKRS49"), ("emp49", "EMP49"),
        ],
        LayerKind::Blocks => &[("GEOID20", "BLOCK_ID")],
    }
}

/// Rename a record's columns in place to their canonical names.
fn canonicalize(kind: LayerKind, fields: &mut HashMap<String, FieldValue>) {
    for &(from, to) in renames(kind) {
        if fields.contains_key(to) { continue }
        if let Some(value) = fields.remove(from) {
            fields.insert(to.to_string(), value);
        }
    }
}

/// Numeric value of a dbase field; text, dates, logicals and nulls are `None`.
pub(crate) fn field_to_f64(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(n) => *n,
        FieldValue::Float(f) => f.map(|f| f as f64),
        FieldValue::Integer(i) => Some(*i as f64),
        FieldValue::Double(d) => Some(*d),
        FieldValue::Currency(c) => Some(*c),
        _ => None,
    }
}

/// Identifier text of a dbase field. Whole numbers print without a fractional part.
pub(crate) fn field_to_id(value: &FieldValue) -> Option<String> {
    fn number_to_id(n: f64) -> String {
        if n.fract() == 0.0 && n.abs() < 9.0e15 { format!("{}", n as i64) } else { n.to_string() }
    }

    match value {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Integer(i) => Some(i.to_string()),
        other => field_to_f64(other).map(number_to_id),
    }
}

/// Short type name of a dbase field, for `describe`.
fn field_type_name(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Character(_) => "character",
        FieldValue::Numeric(_) => "numeric",
        FieldValue::Logical(_) => "logical",
        FieldValue::Date(_) => "date",
        FieldValue::Float(_) => "float",
        FieldValue::Integer(_) => "integer",
        FieldValue::Currency(_) => "currency",
        FieldValue::Double(_) => "double",
        _ => "other",
    }
}

/// Coerce a generic shape into an owned multipolygon, raising error if different shape
fn shape_to_multipolygon(shape: Shape) -> Result<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(polygon) => Ok(shp_to_geo(&polygon)),
        Shape::NullShape => Ok(MultiPolygon(Vec::new())),
        other => bail!("found non-Polygon shape in layer: {:?}", other.shapetype()),
    }
}

/// Build a layer from shapefile items, after renaming columns to their canonical names and
/// dropping records without usable geometry.
pub fn layer_from_items(
    kind: LayerKind,
    items: Vec<(Shape, HashMap<String, FieldValue>)>,
    attribute_fields: &[String],
) -> Result<Layer> {
    let id_field = kind.id_field();
    let total = items.len();

    let mut ids = Vec::with_capacity(total);
    let mut shapes = Vec::with_capacity(total);
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(total); attribute_fields.len()];
    let mut present = vec![false; attribute_fields.len()];

    for (i, (shape, mut fields)) in items.into_iter().enumerate() {
        let shape = shape_to_multipolygon(shape)
            .with_context(|| format!("[{}] record {i}", kind.to_str()))?;
        if is_zero_geometry(&shape) { continue }

        canonicalize(kind, &mut fields);
        let Some(id) = fields.get(id_field).and_then(field_to_id) else {
            bail!("[{}] record {i} has no usable {id_field:?} value", kind.to_str());
        };

        for (col, field) in attribute_fields.iter().enumerate() {
            let value = fields.get(field.as_str());
            present[col] |= value.is_some();
            columns[col].push(value.and_then(field_to_f64));
        }
        ids.push(id);
        shapes.push(shape);
    }

    debug!("[{}] kept {} of {} records", kind.to_str(), ids.len(), total);
    for (field, _) in attribute_fields.iter().zip(&present).filter(|(_, present)| !**present) {
        debug!("[{}] column {field:?} missing, filled with nulls", kind.to_str());
    }

    let attributes = AttributeTable::from_columns(ids.len(), attribute_fields.iter().cloned().zip(columns))?;
    Layer::new(kind, id_field, ids, shapes, attributes)
}

/// Read every shape of a `.shp` file together with its `.dbf` row, flattened into a column map.
pub fn read_records(path: &Path) -> Result<Vec<(Shape, HashMap<String, FieldValue>)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let expected = reader.shape_count()?;
    let items = reader.iter_shapes_and_records()
        .enumerate()
        .map(|(i, item)| {
            let (shape, record) = item
                .with_context(|| format!("Failed to read record {i} of {}", path.display()))?;
            Ok::<_, anyhow::Error>((shape, HashMap::from(record)))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("[read] {}: {} of {expected} shapes read", path.display(), items.len());
    Ok(items)
}

/// Load one dataset from a `.shp` file (with its `.dbf` alongside).
pub fn read_layer(kind: LayerKind, path: &Path, attribute_fields: &[String]) -> Result<Layer> {
    let items = read_records(path)?;
    let layer = layer_from_items(kind, items, attribute_fields)
        .with_context(|| format!("Failed to build {} layer from {}", kind.to_str(), path.display()))?;
    info!("[{}] loaded {} records from {}", kind.to_str(), layer.len(), path.display());
    Ok(layer)
}

/// Record count, geometry mix, and attribute columns of a shapefile.
#[derive(Debug, Default)]
pub struct ShapefileSummary {
    pub records: usize,
    pub geometry_mix: BTreeMap<&'static str, usize>,
    pub columns: Vec<(String, &'static str)>,
}

/// Summarize shapefile items (no schema available, so columns come from the first record).
pub fn describe(items: &[(Shape, HashMap<String, FieldValue>)]) -> ShapefileSummary {
    let mut summary = ShapefileSummary { records: items.len(), ..Default::default() };

    for (shape, _) in items {
        let k = match shape {
            Shape::Point(_) | Shape::PointM(_) | Shape::PointZ(_) => "Point",
            Shape::Polygon(_) | Shape::PolygonM(_) | Shape::PolygonZ(_) => "Polygon",
            Shape::NullShape => "Null",
            _ => "Other",
        };
        *summary.geometry_mix.entry(k).or_default() += 1;
    }

    if let Some((_, record)) = items.first() {
        let mut columns = record.iter()
            .map(|(name, value)| (name.clone(), field_type_name(value)))
            .collect::<Vec<_>>();
        columns.sort();
        summary.columns = columns;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64) -> Shape {
        let ring = [(x, 0.0), (x, 1.0), (x + 1.0, 1.0), (x + 1.0, 0.0), (x, 0.0)].iter()
            .map(|&(x, y)| shapefile::Point::new(x, y))
            .collect();
        Shape::Polygon(shapefile::Polygon::with_rings(vec![shapefile::PolygonRing::Outer(ring)]))
    }

    fn record(fields: &[(&str, FieldValue)]) -> HashMap<String, FieldValue> {
        fields.iter().map(|(name, value)| (name.to_string(), value.clone())).collect()
    }

    fn fields() -> Vec<String> {
        vec!["HH19".to_string(), "EMP19".to_string()]
    }

    #[test]
    fn numeric_conversions() {
        assert_eq!(field_to_f64(&FieldValue::Numeric(Some(2.5))), Some(2.5));
        assert_eq!(field_to_f64(&FieldValue::Numeric(None)), None);
        assert_eq!(field_to_f64(&FieldValue::Integer(7)), Some(7.0));
        assert_eq!(field_to_f64(&FieldValue::Character(Some("12".to_string()))), None);
    }

    #[test]
    fn id_conversions() {
        assert_eq!(field_to_id(&FieldValue::Numeric(Some(42.0))), Some("42".to_string()));
        assert_eq!(field_to_id(&FieldValue::Numeric(Some(4.5))), Some("4.5".to_string()));
        assert_eq!(field_to_id(&FieldValue::Character(Some(" 060370001001 ".to_string()))), Some("060370001001".to_string()));
        assert_eq!(field_to_id(&FieldValue::Character(None)), None);
    }

    #[test]
    fn new_zone_columns_are_renamed() {
        let items = vec![
            (square(0.0), record(&[
                ("taz_new1", FieldValue::Numeric(Some(5.0))),
                ("hh19", FieldValue::Numeric(Some(10.0))),
            ])),
        ];
        let layer = layer_from_items(LayerKind::NewZones, items, &fields()).unwrap();

        assert_eq!(layer.id(0), "5");
        assert_eq!(layer.find(5), &[0]);
        assert_eq!(layer.attributes().get("HH19", 0), Some(10.0));
        assert_eq!(layer.attributes().column("EMP19"), Some(&[None][..]));
    }

    #[test]
    fn existing_canonical_column_wins_over_rename() {
        let items = vec![
            (square(0.0), record(&[
                ("taz_id", FieldValue::Numeric(Some(1.0))),
                ("TAZ_ID", FieldValue::Numeric(Some(2.0))),
            ])),
        ];
        let layer = layer_from_items(LayerKind::OldZones, items, &[]).unwrap();
        assert_eq!(layer.id(0), "1");
    }

    #[test]
    fn null_shapes_are_dropped() {
        let items = vec![
            (Shape::NullShape, record(&[("GEOID20", FieldValue::Character(Some("1".to_string())))])),
            (square(3.0), record(&[("GEOID20", FieldValue::Character(Some("2".to_string())))])),
        ];
        let layer = layer_from_items(LayerKind::Blocks, items, &fields()).unwrap();

        assert_eq!(layer.len(), 1);
        assert_eq!(layer.id(0), "2");
        assert_eq!(layer.id_field(), "BLOCK_ID");
    }

    #[test]
    fn missing_id_is_an_error() {
        let items = vec![(square(0.0), record(&[("NAME", FieldValue::Character(Some("x".to_string())))]))];
        assert!(layer_from_items(LayerKind::OldZones, items, &[]).is_err());
    }

    #[test]
    fn describe_counts_geometry_mix() {
        let items = vec![
            (square(0.0), record(&[("taz_id", FieldValue::Numeric(Some(1.0)))])),
            (Shape::NullShape, record(&[("taz_id", FieldValue::Numeric(Some(2.0)))])),
        ];
        let summary = describe(&items);

        assert_eq!(summary.records, 2);
        assert_eq!(summary.geometry_mix.get("Polygon"), Some(&1));
        assert_eq!(summary.geometry_mix.get("Null"), Some(&1));
        assert_eq!(summary.columns, vec![("taz_id".to_string(), "numeric")]);
    }
}
