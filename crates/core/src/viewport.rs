//! Drawable area reported by the host.

use serde::{Deserialize, Serialize};

/// Width and height of the drawable area, in pixels.
///
/// Negative or non-finite sizes are normalized to 0, so a degenerate
/// viewport is always an empty one rather than an error. Deserialization
/// goes through [`Viewport::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawViewport")]
pub struct Viewport {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawViewport {
    width: f64,
    height: f64,
}

impl From<RawViewport> for Viewport {
    fn from(raw: RawViewport) -> Self {
        Viewport::new(raw.width, raw.height)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when nothing can be drawn (zero width or height).
    pub fn is_empty(&self) -> bool {
        self.area() == 0.0
    }

    /// Inclusive bounds check: the edges themselves are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
