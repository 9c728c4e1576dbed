//! Drawing-surface abstraction the simulation renders into.
//!
//! The trait covers exactly the three primitives the backdrop needs (clear a
//! rectangle, fill a disc, stroke a line) plus sizing. Hosts implement it over
//! whatever they draw with: a browser 2d context, a CPU pixel buffer, or the
//! recording [`DisplayList`] defined here.

use crate::color::{Rgba, Srgb};
use crate::viewport::Viewport;

/// A pixel-sized drawing target.
pub trait Surface {
    /// Current pixel size as `(width, height)`.
    fn size(&self) -> (f64, f64);

    /// Changes the pixel size. Contents after a resize are unspecified.
    fn resize(&mut self, width: f64, height: f64);

    /// Whether the surface can be drawn to. Checked once at construction.
    fn is_available(&self) -> bool {
        true
    }

    /// Resets the rectangle to the surface's background.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fills a disc of `radius` centered on `(cx, cy)`.
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Srgb);

    /// Strokes a straight segment from `(x0, y0)` to `(x1, y1)`.
    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba, width: f64);

    /// The surface size as a [`Viewport`].
    fn viewport(&self) -> Viewport {
        let (w, h) = self.size();
        Viewport::new(w, h)
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Srgb,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        color: Rgba,
        width: f64,
    },
}

/// A [`Surface`] that records every call instead of rasterizing.
///
/// `clear_rect` is recorded like any other command; nothing is discarded.
/// Use [`DisplayList::take`] to drain the commands between frames.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Srgb) {
        self.commands.push(DrawCommand::Circle {
            cx,
            cy,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba, width: f64) {
        self.commands.push(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            color,
            width,
        });
    }
}
