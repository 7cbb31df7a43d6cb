use crate::{
    error::QueryError,
    session::{Selectable, Session},
    viewport::{Panel, Viewport},
};

/// A discrete user action forwarded by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SubmitQuery { id: String, radius: String },
    SubmitExtra(String),
    SetSelection { target: Selectable, indices: Vec<usize> },
    CopyViewport(Panel),
    PanZoom { panel: Panel, viewport: Viewport },
    Reset,
    SetBackground(String),
}

impl Session {
    /// Apply one event to completion. Only a rejected query reports an error.
    pub fn dispatch(&mut self, event: Event) -> Result<(), QueryError> {
        match event {
            Event::SubmitQuery { id, radius } => self.submit_query(&id, &radius)?,
            Event::SubmitExtra(ids) => { self.submit_extra(&ids); }
            Event::SetSelection { target, indices } => self.set_selection(target, indices),
            Event::CopyViewport(source) => self.copy_viewport(source),
            Event::PanZoom { panel, viewport } => self.pan_zoom(panel, viewport),
            Event::Reset => self.reset_viewports(),
            Event::SetBackground(name) => self.set_background(&name),
        }
        Ok(())
    }
}
