mod event;
mod parse;
mod search;
mod session;
mod snapshot;
mod status;

pub use event::Event;
pub use parse::{parse_id, parse_id_list, parse_radius};
pub use search::{Phase, QueryState, SearchTables};
pub use session::{Overlay, Selectable, Session};
pub use snapshot::{PanelView, QueryView, SelectionView, Snapshot};
pub use status::{Background, SearchStatus};
