//! Proximity graph: lines between particles that are close enough.
//!
//! The graph is derived from scratch each frame with a plain all-pairs scan.
//! Population size is bounded by the density divisor, so the O(n²) cost stays
//! small enough that no spatial index is needed.

use constellation_core::surface::Surface;
use constellation_core::viewport::Viewport;

use crate::config::LinkConfig;
use crate::particle::Particle;

/// One edge of the connection graph, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance_sq: f64,
    /// Stroke opacity, always in [0, 1].
    pub opacity: f64,
}

/// Draws the connection graph. Holds only drawing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProximityRenderer {
    config: LinkConfig,
}

impl ProximityRenderer {
    pub fn new(config: LinkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Squared-distance cutoff: `(width / d) * (height / d)`.
    ///
    /// Scales with the screen, so larger viewports connect farther apart
    /// particles.
    pub fn threshold(&self, viewport: Viewport) -> f64 {
        let d = self.config.threshold_divisor;
        (viewport.width() / d) * (viewport.height() / d)
    }

    /// `1 - d² / falloff`, clamped to [0, 1].
    ///
    /// The cutoff can exceed the falloff on large screens; the clamp keeps
    /// those far pairs at 0 instead of a negative alpha.
    pub fn opacity(&self, distance_sq: f64) -> f64 {
        (1.0 - distance_sq / self.config.opacity_falloff).clamp(0.0, 1.0)
    }

    /// Every unordered pair closer than the threshold, each exactly once.
    pub fn connections(&self, particles: &[Particle], viewport: Viewport) -> Vec<Connection> {
        let mut out = Vec::new();
        self.for_each_connection(particles, viewport, |c| out.push(c));
        out
    }

    /// Strokes every visible connection and returns how many were drawn.
    ///
    /// Connections whose clamped opacity is exactly 0 are skipped. Such a
    /// stroke would have alpha 0 and leave the surface unchanged, so the
    /// result is pixel-identical to stroking every pair in the graph. Any
    /// positive opacity, however faint, is stroked.
    pub fn render<S: Surface + ?Sized>(
        &self,
        particles: &[Particle],
        viewport: Viewport,
        surface: &mut S,
    ) -> usize {
        let mut drawn = 0;
        self.for_each_connection(particles, viewport, |c| {
            if c.opacity <= 0.0 {
                return;
            }
            let (pa, pb) = (particles[c.a].position(), particles[c.b].position());
            surface.stroke_line(
                pa.x,
                pa.y,
                pb.x,
                pb.y,
                self.config.color.with_alpha(c.opacity),
                self.config.width,
            );
            drawn += 1;
        });
        drawn
    }

    fn for_each_connection(
        &self,
        particles: &[Particle],
        viewport: Viewport,
        mut visit: impl FnMut(Connection),
    ) {
        let threshold = self.threshold(viewport);
        for (a, pa) in particles.iter().enumerate() {
            for (offset, pb) in particles[a + 1..].iter().enumerate() {
                let distance_sq = pa.distance_sq(pb);
                if distance_sq < threshold {
                    visit(Connection {
                        a,
                        b: a + 1 + offset,
                        distance_sq,
                        opacity: self.opacity(distance_sq),
                    });
                }
            }
        }
    }
}
