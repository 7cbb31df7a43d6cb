#![doc = "VizTAZ public API"]
mod aggregate;
mod config;
mod decompose;
mod error;
mod filter;
mod geom;
mod layer;
mod session;
mod viewport;

pub mod io;

#[doc(inline)]
pub use aggregate::{aggregate, SelectionRow, SelectionTable, SUM_ROW_ID};

#[doc(inline)]
pub use config::{SessionConfig, ATTRIBUTE_FIELDS, DEFAULT_RADIUS};

#[doc(inline)]
pub use decompose::{decompose, LabelRecord, LabelTable, RingRecord, RingTable};

#[doc(inline)]
pub use error::QueryError;

#[doc(inline)]
pub use filter::{buffer, filter_intersecting, resolve_anchor, Anchor};

#[doc(inline)]
pub use layer::{AttributeTable, Layer, LayerKind, ZoneRecord};

#[doc(inline)]
pub use session::{
    parse_id, parse_id_list, parse_radius, Background, Event, Overlay, PanelView, Phase, QueryState,
    QueryView, SearchStatus, SearchTables, Selectable, SelectionView, Session, Snapshot,
};

#[doc(inline)]
pub use viewport::{Panel, Viewport, ViewportSync, DEFAULT_DEGENERATE_MARGIN, DEFAULT_PADDING_FRACTION};
