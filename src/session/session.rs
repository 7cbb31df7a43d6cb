use std::{f64::consts::PI, sync::Arc};

use geo::Point;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    aggregate::{aggregate, SelectionTable},
    config::SessionConfig,
    decompose::{decompose, LabelTable, RingTable},
    error::QueryError,
    layer::Layer,
    session::{
        parse,
        search::{QueryState, SearchResult, SearchRun, SearchTables},
        Background, SearchStatus,
    },
    viewport::{Panel, Viewport, ViewportSync},
};

/// Web Mercator sphere radius (EPSG:3857), in metres.
const MERCATOR_RADIUS: f64 = 6378137.0;

/// The two ring tables whose rows can be selected into an attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selectable {
    NewZones,
    Blocks,
}

/// Extra old zones drawn on top of the search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    pub rings: RingTable,
    pub labels: LabelTable,
}

/// One analyst's view over the three datasets. Owns every derived table; the datasets
/// themselves are shared and never modified.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    old_zones: Arc<Layer>,
    new_zones: Arc<Layer>,
    blocks: Arc<Layer>,

    status: SearchStatus,
    query: QueryState,
    anchor_centroid: Option<Point<f64>>,
    tables: SearchTables,
    overlay: Overlay,

    new_zone_selection: Vec<usize>,
    block_selection: Vec<usize>,
    new_zone_table: SelectionTable,
    block_table: SelectionTable,

    viewports: ViewportSync,
    background: Background,
}

impl Session {
    pub fn new(old_zones: Arc<Layer>, new_zones: Arc<Layer>, blocks: Arc<Layer>, config: SessionConfig) -> Self {
        let fields = config.attribute_fields.clone();
        Self {
            query: QueryState { radius: config.default_radius, ..Default::default() },
            status: SearchStatus::None,
            anchor_centroid: None,
            tables: SearchTables {
                new_zones: RingTable::empty(&fields),
                blocks: RingTable::empty(&fields),
                ..Default::default()
            },
            overlay: Overlay::default(),
            new_zone_selection: Vec::new(),
            block_selection: Vec::new(),
            new_zone_table: SelectionTable::empty(&fields),
            block_table: SelectionTable::empty(&fields),
            viewports: ViewportSync::default(),
            background: Background::default(),
            config,
            old_zones,
            new_zones,
            blocks,
        }
    }

    #[inline] pub fn config(&self) -> &SessionConfig { &self.config }

    #[inline] pub fn old_zones(&self) -> &Layer { &self.old_zones }

    #[inline] pub fn new_zones(&self) -> &Layer { &self.new_zones }

    #[inline] pub fn blocks(&self) -> &Layer { &self.blocks }

    #[inline] pub fn status(&self) -> SearchStatus { self.status }

    #[inline] pub fn query(&self) -> &QueryState { &self.query }

    #[inline] pub fn tables(&self) -> &SearchTables { &self.tables }

    #[inline] pub fn overlay(&self) -> &Overlay { &self.overlay }

    #[inline] pub fn viewports(&self) -> &ViewportSync { &self.viewports }

    #[inline] pub fn viewport(&self, panel: Panel) -> Option<Viewport> { self.viewports.get(panel) }

    #[inline] pub fn background(&self) -> Background { self.background }

    /// Centroid of the last resolved anchor.
    #[inline] pub fn anchor_centroid(&self) -> Option<Point<f64>> { self.anchor_centroid }

    /// Currently selected ring indices of `target`.
    pub fn selection(&self, target: Selectable) -> &[usize] {
        match target {
            Selectable::NewZones => &self.new_zone_selection,
            Selectable::Blocks => &self.block_selection,
        }
    }

    /// Attribute table (selected rows plus `Sum`) of `target`.
    pub fn selection_table(&self, target: Selectable) -> &SelectionTable {
        match target {
            Selectable::NewZones => &self.new_zone_table,
            Selectable::Blocks => &self.block_table,
        }
    }

    /// Run a full search around old zone `raw_id` with buffer `raw_radius`.
    ///
    /// On success every derived table, both selections and all four viewports are replaced at
    /// once. On failure only the status changes.
    pub fn submit_query(&mut self, raw_id: &str, raw_radius: &str) -> Result<(), QueryError> {
        let mut run = SearchRun::new(self);
        let outcome = run.run(raw_id, raw_radius);
        debug!("[search] finished in phase {:?}", run.phase());

        match outcome {
            Ok(result) => {
                self.commit(result);
                Ok(())
            }
            Err(err) => {
                warn!("[search] rejected {raw_id:?}: {err}");
                self.status = err.into();
                Err(err)
            }
        }
    }

    fn commit(&mut self, result: SearchResult) {
        let SearchResult { query, anchor_centroid, tables, new_zone_table, block_table, fitted } = result;

        info!("[search] anchor {:?}: {} anchor rings, {} neighbor rings, {} new zone rings, {} block rings",
            query.anchor_id, tables.anchor.len(), tables.neighbors.len(), tables.new_zones.len(), tables.blocks.len());

        self.status = query.anchor_id.map_or(SearchStatus::None, SearchStatus::Searching);
        self.query = query;
        self.anchor_centroid = Some(anchor_centroid);
        self.tables = tables;

        self.new_zone_selection.clear();
        self.block_selection.clear();
        self.new_zone_table = new_zone_table;
        self.block_table = block_table;

        self.refresh_homes();
        self.viewports.set(Panel::Old, fitted);
        self.viewports.copy(Panel::Old, &Panel::Old.others());
    }

    /// Draw the old zones listed in `raw_ids` as an overlay. Touches neither selections nor
    /// current viewports; the reset extents of the panels showing the overlay follow it.
    /// Empty, malformed, or unmatched input clears the overlay.
    /// Returns the number of matched records.
    pub fn submit_extra(&mut self, raw_ids: &str) -> usize {
        let ids = match parse::parse_id_list(raw_ids) {
            Ok(ids) => ids,
            Err(err) => {
                debug!("[extra] clearing overlay for {raw_ids:?}: {err}");
                self.overlay = Overlay::default();
                self.refresh_homes();
                return 0;
            }
        };

        let records = self.old_zones.find_all(&ids);
        let (rings, labels) = decompose(&self.old_zones, &records, &[]);
        debug!("[extra] {} of {} ids matched, {} rings", records.len(), ids.len(), rings.len());

        self.overlay = Overlay { rings, labels };
        self.refresh_homes();
        records.len()
    }

    /// Recompute every panel's reset extent from what it currently draws.
    fn refresh_homes(&mut self) {
        for panel in Panel::ALL {
            let home = self.tables.panel_home(panel, &self.overlay.rings, &self.config);
            self.viewports.set_home(panel, home);
        }
    }

    /// Replace the selection of `target` and rebuild its attribute table.
    /// Indices past the end of the target's ring table are dropped from both.
    pub fn set_selection(&mut self, target: Selectable, mut indices: Vec<usize>) {
        let fields = &self.config.attribute_fields;
        let rings = match target {
            Selectable::NewZones => &self.tables.new_zones,
            Selectable::Blocks => &self.tables.blocks,
        };

        let requested = indices.len();
        indices.retain(|&idx| idx < rings.len());
        if indices.len() < requested {
            warn!("[selection] dropped {} of {requested} indices, table has {} rings",
                requested - indices.len(), rings.len());
        }

        let table = aggregate(rings, &indices, fields);
        match target {
            Selectable::NewZones => (self.new_zone_table, self.new_zone_selection) = (table, indices),
            Selectable::Blocks => (self.block_table, self.block_selection) = (table, indices),
        }
    }

    /// Align every other panel to `source`'s current viewport, once.
    pub fn copy_viewport(&mut self, source: Panel) {
        self.viewports.copy(source, &source.others());
    }

    /// Return every panel to its own home extent.
    pub fn reset_viewports(&mut self) {
        self.viewports.reset(&Panel::ALL);
    }

    /// Record direct pan/zoom on one panel.
    pub fn pan_zoom(&mut self, panel: Panel, viewport: Viewport) {
        self.viewports.set(panel, viewport);
    }

    /// Switch the map background. Unknown names keep the current background.
    pub fn set_background(&mut self, name: &str) {
        match name.parse::<Background>() {
            Ok(background) => self.background = background,
            Err(err) => warn!("[background] {err}"),
        }
    }

    /// Google Maps link to the anchor centroid, converted from Web Mercator to lat/lon.
    pub fn external_map_url(&self) -> Option<String> {
        let centroid = self.anchor_centroid?;
        let lon = (centroid.x() / MERCATOR_RADIUS).to_degrees();
        let lat = (PI / 2.0 - 2.0 * (-centroid.y() / MERCATOR_RADIUS).exp().atan()).to_degrees();
        Some(format!("https://www.google.com/maps?q={lat},{lon}"))
    }
}
