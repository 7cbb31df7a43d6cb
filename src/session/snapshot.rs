use serde::Serialize;

use crate::{
    aggregate::SelectionTable,
    session::{search::SearchTables, Background, Overlay, Selectable, Session},
    viewport::{Panel, Viewport},
};

#[derive(Debug, Serialize)]
pub struct QueryView {
    pub anchor_id: Option<i64>,
    pub radius: f64,
}

#[derive(Debug, Serialize)]
pub struct PanelView {
    pub panel: Panel,
    pub current: Option<Viewport>,
    pub home: Option<Viewport>,
}

#[derive(Debug, Serialize)]
pub struct SelectionView<'a> {
    pub indices: &'a [usize],
    pub table: &'a SelectionTable,
}

/// Everything the rendering layer needs after an event, borrowed from the session.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub status: String,
    pub background: Background,
    pub query: QueryView,
    pub anchor_centroid: Option<(f64, f64)>,
    pub external_map_url: Option<String>,
    pub tables: &'a SearchTables,
    pub overlay: &'a Overlay,
    pub new_zones: SelectionView<'a>,
    pub blocks: SelectionView<'a>,
    pub viewports: Vec<PanelView>,
}

impl Session {
    pub fn snapshot(&self) -> Snapshot<'_> {
        let selection = move |target: Selectable| SelectionView {
            indices: self.selection(target),
            table: self.selection_table(target),
        };

        Snapshot {
            status: self.status().to_string(),
            background: self.background(),
            query: QueryView { anchor_id: self.query().anchor_id, radius: self.query().radius },
            anchor_centroid: self.anchor_centroid().map(|p| (p.x(), p.y())),
            external_map_url: self.external_map_url(),
            tables: self.tables(),
            overlay: self.overlay(),
            new_zones: selection(Selectable::NewZones),
            blocks: selection(Selectable::Blocks),
            viewports: Panel::ALL.into_iter()
                .map(|panel| PanelView {
                    panel,
                    current: self.viewports().get(panel),
                    home: self.viewports().home(panel),
                })
                .collect(),
        }
    }

    /// Serialize the current snapshot as pretty-printed JSON.
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}
