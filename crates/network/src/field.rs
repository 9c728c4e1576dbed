//! The particle population and its sizing policy.

use constellation_core::error::SimError;
use constellation_core::prng::Xorshift64;
use constellation_core::surface::Surface;
use constellation_core::viewport::Viewport;
use tracing::{debug, warn};

use crate::config::FieldConfig;
use crate::particle::Particle;

/// Upper bound on the population. The connection scan is quadratic, so a
/// field larger than this could not keep up with the frame rate anyway.
pub const MAX_PARTICLES: usize = 5_000;

/// Number of particles for a viewport: `floor(area / density_divisor)`.
///
/// Empty viewports give 0.
pub fn particle_count(viewport: Viewport, density_divisor: f64) -> usize {
    if viewport.is_empty() {
        return 0;
    }
    (viewport.area() / density_divisor).floor() as usize
}

/// Owned, ordered particle population sized by viewport area.
///
/// Order carries no meaning beyond stable iteration.
#[derive(Debug, Clone)]
pub struct Field {
    particles: Vec<Particle>,
    viewport: Viewport,
    config: FieldConfig,
    rng: Xorshift64,
}

impl Field {
    /// Creates and populates a field.
    ///
    /// Returns `SimError::InvalidParam` if `config` is invalid or would put
    /// more than [`MAX_PARTICLES`] on `viewport`. A zero-area viewport is
    /// valid and yields an empty field.
    pub fn new(viewport: Viewport, config: FieldConfig, rng: Xorshift64) -> Result<Self, SimError> {
        config.validate()?;
        let count = particle_count(viewport, config.density_divisor);
        if count > MAX_PARTICLES {
            return Err(SimError::param(
                "density_divisor",
                format!(
                    "yields {count} particles for {}x{}, more than {MAX_PARTICLES}",
                    viewport.width(),
                    viewport.height()
                ),
            ));
        }
        let mut field = Self {
            particles: Vec::new(),
            viewport,
            config,
            rng,
        };
        field.initialize(viewport);
        Ok(field)
    }

    /// Discards every particle and spawns `floor(area / density_divisor)`
    /// fresh ones over `viewport`, capped at [`MAX_PARTICLES`].
    pub fn initialize(&mut self, viewport: Viewport) {
        let wanted = particle_count(viewport, self.config.density_divisor);
        let count = wanted.min(MAX_PARTICLES);
        if count < wanted {
            warn!(wanted, cap = MAX_PARTICLES, "particle count capped");
        }
        self.viewport = viewport;
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let p = Particle::spawn(viewport, &self.config, &mut self.rng);
            self.particles.push(p);
        }
        debug!(
            width = viewport.width(),
            height = viewport.height(),
            count,
            "reseeded particle field"
        );
    }

    /// Full reseed for the new dimensions; existing trajectories are dropped.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.initialize(viewport);
    }

    /// Advances every particle and draws it.
    pub fn update<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let viewport = self.viewport;
        for p in &mut self.particles {
            p.update(viewport, surface);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}
