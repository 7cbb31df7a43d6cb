use std::str::FromStr;

use anyhow::{bail, Error};
use geo::Rect;
use log::debug;
use serde::{Deserialize, Serialize};

/// Fraction of each axis' span added on both sides by `Viewport::fit`.
pub const DEFAULT_PADDING_FRACTION: f64 = 0.05;

/// Absolute margin used by `Viewport::fit` when the box has zero width or height.
pub const DEFAULT_DEGENERATE_MARGIN: f64 = 1000.0;

/// The four linked map panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Old,        // Anchor, buffer, neighbours, extra overlay
    New,        // New zones (selectable)
    Combined,   // Old and new zones over blocks
    Blocks,     // Blocks (selectable)
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Old, Panel::New, Panel::Combined, Panel::Blocks];

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Panel::Old => 0,
            Panel::New => 1,
            Panel::Combined => 2,
            Panel::Blocks => 3,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Panel::Old => "old",
            Panel::New => "new",
            Panel::Combined => "combined",
            Panel::Blocks => "blocks",
        }
    }

    /// Every panel except `self`.
    pub fn others(&self) -> Vec<Panel> {
        Panel::ALL.into_iter().filter(|panel| panel != self).collect()
    }
}

impl FromStr for Panel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Ok(Panel::Old),
            "new" => Ok(Panel::New),
            "combined" => Ok(Panel::Combined),
            "blocks" => Ok(Panel::Blocks),
            other => bail!("unknown panel {other:?}, expected one of old, new, combined, blocks"),
        }
    }
}

/// Visible coordinate extent of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Pad `bounds` by `padding_fraction` of each axis' span. A box with zero width or height
    /// is padded by `DEFAULT_DEGENERATE_MARGIN` on both axes instead.
    #[inline]
    pub fn fit(bounds: Rect<f64>, padding_fraction: f64) -> Self {
        Self::fit_with_margin(bounds, padding_fraction, DEFAULT_DEGENERATE_MARGIN)
    }

    /// Same as `fit`, with an explicit margin for degenerate boxes.
    pub fn fit_with_margin(bounds: Rect<f64>, padding_fraction: f64, margin: f64) -> Self {
        let (min, max) = (bounds.min(), bounds.max());
        let (dx, dy) = (max.x - min.x, max.y - min.y);

        let (pad_x, pad_y) = if dx == 0.0 || dy == 0.0 {
            (margin, margin)
        } else {
            (padding_fraction * dx, padding_fraction * dy)
        };

        Self {
            x_min: min.x - pad_x,
            x_max: max.x + pad_x,
            y_min: min.y - pad_y,
            y_max: max.y + pad_y,
        }
    }

    #[inline] pub fn width(&self) -> f64 { self.x_max - self.x_min }

    #[inline] pub fn height(&self) -> f64 { self.y_max - self.y_min }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        ((self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0)
    }
}

/// Per-panel viewports. `current` is what each panel shows; `home` is the extent `reset`
/// returns it to. Panels are never linked: `copy` is a one-shot assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportSync {
    current: [Option<Viewport>; 4],
    home: [Option<Viewport>; 4],
}

impl ViewportSync {
    /// Current viewport of `panel`, or `None` if it was never set.
    #[inline] pub fn get(&self, panel: Panel) -> Option<Viewport> { self.current[panel.index()] }

    /// Extent `panel` returns to on reset.
    #[inline] pub fn home(&self, panel: Panel) -> Option<Viewport> { self.home[panel.index()] }

    /// Record direct navigation (pan/zoom) on one panel.
    #[inline]
    pub fn set(&mut self, panel: Panel, viewport: Viewport) {
        self.current[panel.index()] = Some(viewport);
    }

    /// Replace the extent `panel` resets to.
    #[inline]
    pub fn set_home(&mut self, panel: Panel, viewport: Option<Viewport>) {
        self.home[panel.index()] = viewport;
    }

    /// Assign the source panel's current viewport to every target. No-op if the source is unset.
    pub fn copy(&mut self, source: Panel, targets: &[Panel]) {
        let Some(viewport) = self.get(source) else {
            debug!("[viewport] copy from unset panel {:?} ignored", source.to_str());
            return
        };
        for &target in targets {
            self.current[target.index()] = Some(viewport);
        }
    }

    /// Return each panel to its own home extent.
    pub fn reset(&mut self, panels: &[Panel]) {
        for &panel in panels {
            self.current[panel.index()] = self.home[panel.index()];
        }
    }
}
