mod entry;
mod geom;

use entry::{query_envelope, RecordEntry};
pub(crate) use geom::{merge_rects, Geometries};
