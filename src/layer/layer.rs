use ahash::AHashMap;
use anyhow::{ensure, Result};
use geo::MultiPolygon;
use serde::Serialize;
use smallvec::SmallVec;

use crate::{geom::Geometries, layer::AttributeTable};

/// The three datasets a session compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    OldZones,   // Zone system the analyst searches in
    NewZones,   // Replacement zone system
    Blocks,     // Finest-grained units
}

impl LayerKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            LayerKind::OldZones => "old_zones",
            LayerKind::NewZones => "new_zones",
            LayerKind::Blocks => "blocks",
        }
    }

    /// Name of the identifier column after the loader's renames.
    pub fn id_field(&self) -> &'static str {
        match self {
            LayerKind::OldZones | LayerKind::NewZones => "taz_id",
            LayerKind::Blocks => "BLOCK_ID",
        }
    }
}

/// One input record: an identifier, its (possibly multi-part, possibly empty) geometry,
/// and its numeric attributes.
#[derive(Debug, Clone)]
pub struct ZoneRecord {
    pub id: String,
    pub geometry: MultiPolygon<f64>,
    pub attributes: Vec<(String, Option<f64>)>,
}

impl ZoneRecord {
    pub fn new(id: impl Into<String>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self { id: id.into(), geometry: geometry.into(), attributes: Vec::new() }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: &str, value: Option<f64>) -> Self {
        self.attributes.push((name.to_string(), value));
        self
    }
}

/// An immutable dataset of zones or blocks, indexed by integer identifier.
#[derive(Debug)]
pub struct Layer {
    kind: LayerKind,
    id_field: String,
    ids: Vec<String>,
    geoms: Geometries,
    attributes: AttributeTable,
    index: AHashMap<i64, SmallVec<[usize; 1]>>, // Integer id -> record indices (ids are expected unique)
}

impl Layer {
    /// Construct a layer from parallel per-record vectors.
    pub fn new(kind: LayerKind, id_field: &str, ids: Vec<String>, shapes: Vec<MultiPolygon<f64>>, attributes: AttributeTable) -> Result<Self> {
        ensure!(ids.len() == shapes.len(),
            "[Layer::new] {} ids but {} geometries in {}", ids.len(), shapes.len(), kind.to_str());
        ensure!(ids.len() == attributes.len(),
            "[Layer::new] {} ids but {} attribute rows in {}", ids.len(), attributes.len(), kind.to_str());

        let mut index: AHashMap<i64, SmallVec<[usize; 1]>> = AHashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if let Ok(value) = id.trim().parse::<i64>() {
                index.entry(value).or_default().push(i);
            }
        }

        Ok(Self {
            kind,
            id_field: id_field.to_string(),
            ids,
            geoms: Geometries::new(shapes),
            attributes,
            index,
        })
    }

    /// Construct a layer from a list of records, using the kind's default id field.
    /// Attribute columns appear in first-seen order; a record missing a column gets a null.
    pub fn from_records(kind: LayerKind, records: impl IntoIterator<Item = ZoneRecord>) -> Result<Self> {
        let records = records.into_iter().collect::<Vec<_>>();

        let mut names: Vec<String> = Vec::new();
        for record in &records {
            for (name, _) in &record.attributes {
                if !names.contains(name) { names.push(name.clone()) }
            }
        }

        let columns = names.into_iter()
            .map(|name| {
                let values = records.iter()
                    .map(|record| record.attributes.iter()
                        .find(|(field, _)| *field == name)
                        .and_then(|(_, value)| *value))
                    .collect();
                (name, values)
            })
            .collect::<Vec<_>>();
        let attributes = AttributeTable::from_columns(records.len(), columns)?;

        let (ids, shapes) = records.into_iter()
            .map(|record| (record.id, record.geometry))
            .unzip();

        Self::new(kind, kind.id_field(), ids, shapes, attributes)
    }

    #[inline] pub fn kind(&self) -> LayerKind { self.kind }

    #[inline] pub fn id_field(&self) -> &str { &self.id_field }

    /// Number of records.
    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    /// Check if there are no records.
    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Identifier text of record `idx`.
    #[inline] pub fn id(&self, idx: usize) -> &str { &self.ids[idx] }

    /// Geometry of record `idx` (empty when the record has none).
    #[inline] pub fn shape(&self, idx: usize) -> &MultiPolygon<f64> { self.geoms.shape(idx) }

    #[inline] pub fn attributes(&self) -> &AttributeTable { &self.attributes }

    #[inline] pub(crate) fn geoms(&self) -> &Geometries { &self.geoms }

    /// Indices of the records whose identifier equals `id`.
    pub fn find(&self, id: i64) -> &[usize] {
        self.index.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Indices of the records whose identifier is any of `ids`, in record order.
    pub fn find_all(&self, ids: &[i64]) -> Vec<usize> {
        let mut found = ids.iter()
            .flat_map(|&id| self.find(id).iter().copied())
            .collect::<Vec<_>>();
        found.sort_unstable();
        found.dedup();
        found
    }
}
