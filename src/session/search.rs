use geo::{Point, Polygon};
use log::debug;
use serde::Serialize;

use crate::{
    aggregate::{aggregate, SelectionTable},
    config::SessionConfig,
    decompose::{decompose, LabelTable, RingTable},
    error::QueryError,
    filter::{buffer, filter_intersecting, resolve_anchor},
    geom::merge_rects,
    session::{parse, Session},
    viewport::{Panel, Viewport},
};

/// Steps of one search run. A run only ever moves forward, or to `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Resolving,
    Filtering,
    Decomposing,
    Aggregating,
    Fitting,
    Rejected,
}

/// The inputs of the last committed search.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub anchor_id: Option<i64>,
    pub radius: f64,
    pub buffer: Option<Polygon<f64>>,
}

/// Ring and label tables produced by a search, one per rendered layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTables {
    pub buffer: RingTable,
    pub anchor: RingTable,
    pub anchor_labels: LabelTable,
    pub neighbors: RingTable,
    pub new_zones: RingTable,
    pub new_zone_labels: LabelTable,
    pub blocks: RingTable,
    pub block_outlines: RingTable, // Blocks without attributes, overlaid on the other panels
}

impl SearchTables {
    /// The tables drawn on `panel`. The extra overlay is drawn on the old and combined panels.
    fn panel_layers<'a>(&'a self, panel: Panel, overlay: &'a RingTable) -> Vec<&'a RingTable> {
        match panel {
            Panel::Old => vec![&self.buffer, &self.anchor, &self.neighbors, &self.block_outlines, overlay],
            Panel::New => vec![&self.new_zones, &self.block_outlines],
            Panel::Combined => vec![&self.new_zones, &self.anchor, &self.block_outlines, overlay],
            Panel::Blocks => vec![&self.blocks],
        }
    }

    /// Home extent of `panel`: the padded bounds of everything drawn on it, or `None` if it
    /// draws nothing.
    pub(crate) fn panel_home(&self, panel: Panel, overlay: &RingTable, config: &SessionConfig) -> Option<Viewport> {
        self.panel_layers(panel, overlay).into_iter()
            .filter_map(|table| table.bounds())
            .reduce(merge_rects)
            .map(|bounds| Viewport::fit_with_margin(bounds, config.padding_fraction, config.degenerate_margin))
    }
}

/// Everything one successful run produces, committed to the session in a single step.
#[derive(Debug)]
pub(crate) struct SearchResult {
    pub(crate) query: QueryState,
    pub(crate) anchor_centroid: Point<f64>,
    pub(crate) tables: SearchTables,
    pub(crate) new_zone_table: SelectionTable,
    pub(crate) block_table: SelectionTable,
    pub(crate) fitted: Viewport,
}

/// One pass through the search pipeline. Reads the session, never writes it.
pub(crate) struct SearchRun<'a> {
    session: &'a Session,
    phase: Phase,
}

impl<'a> SearchRun<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session, phase: Phase::Idle }
    }

    #[inline] pub(crate) fn phase(&self) -> Phase { self.phase }

    fn advance(&mut self, next: Phase) {
        debug!("[search] {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn reject(&mut self, err: QueryError) -> QueryError {
        self.advance(Phase::Rejected);
        err
    }

    pub(crate) fn run(&mut self, raw_id: &str, raw_radius: &str) -> Result<SearchResult, QueryError> {
        let session = self.session;
        let config = session.config();
        let (old_zones, new_zones, blocks) = (session.old_zones(), session.new_zones(), session.blocks());

        self.advance(Phase::Validating);
        let id = parse::parse_id(raw_id).map_err(|err| self.reject(err))?;
        let radius = parse::parse_radius(raw_radius, config.default_radius);

        self.advance(Phase::Resolving);
        let anchor = resolve_anchor(old_zones, id).map_err(|err| self.reject(err))?;

        self.advance(Phase::Filtering);
        let circle = buffer(anchor.centroid, radius, config.buffer_segments);
        let neighbor_ids = filter_intersecting(old_zones, &circle);
        let new_zone_ids = filter_intersecting(new_zones, &circle);
        let block_ids = filter_intersecting(blocks, &circle);
        debug!("[search] id={id} radius={radius}: {} neighbors, {} new zones, {} blocks",
            neighbor_ids.len(), new_zone_ids.len(), block_ids.len());

        self.advance(Phase::Decomposing);
        let fields = &config.attribute_fields;
        let (anchor_rings, anchor_labels) = decompose(old_zones, &anchor.records, &[]);
        let (neighbors, _) = decompose(old_zones, &neighbor_ids, &[]);
        let (new_zone_rings, new_zone_labels) = decompose(new_zones, &new_zone_ids, fields);
        let (block_rings, _) = decompose(blocks, &block_ids, fields);
        let (block_outlines, _) = decompose(blocks, &block_ids, &[]);
        let buffer_ring = RingTable::single(
            id.to_string(),
            circle.exterior().coords().map(|c| (c.x, c.y)).collect(),
        );

        let tables = SearchTables {
            buffer: buffer_ring,
            anchor: anchor_rings,
            anchor_labels,
            neighbors,
            new_zones: new_zone_rings,
            new_zone_labels,
            blocks: block_rings,
            block_outlines,
        };

        // Selections are cleared by the commit, so both tables hold only the Sum row.
        self.advance(Phase::Aggregating);
        let new_zone_table = aggregate(&tables.new_zones, &[], fields);
        let block_table = aggregate(&tables.blocks, &[], fields);

        self.advance(Phase::Fitting);
        let fitted = old_zones.geoms().bounds_of(&anchor.records)
            .map(|bounds| Viewport::fit_with_margin(bounds, config.padding_fraction, config.degenerate_margin))
            .ok_or_else(|| self.reject(QueryError::NotFound))?;

        self.advance(Phase::Idle);
        Ok(SearchResult {
            query: QueryState { anchor_id: Some(id), radius, buffer: Some(circle) },
            anchor_centroid: anchor.centroid,
            tables,
            new_zone_table,
            block_table,
            fitted,
        })
    }
}
