//! Frame loop driving the field and the proximity graph.
//!
//! The loop is an explicit two-state machine. `start` requests a frame from
//! the host scheduler, and each fired frame requests the next one before
//! doing its own work. `stop` cancels whatever is pending. A fired handle that
//! is not the pending one is ignored, so a frame the host fires after `stop`
//! never touches the surface.

use constellation_core::error::SimError;
use constellation_core::prng::Xorshift64;
use constellation_core::scheduler::{FrameHandle, FrameScheduler};
use constellation_core::surface::Surface;
use tracing::{debug, error, info, trace};

use crate::config::NetworkConfig;
use crate::field::Field;
use crate::proximity::ProximityRenderer;

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Nothing scheduled.
    Idle,
    /// Exactly one frame is pending with the scheduler.
    Running { pending: FrameHandle },
}

/// What the last frame drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub frame: u64,
    pub particles: usize,
    pub connections: usize,
}

/// The backdrop: surface, particle field and connection renderer.
pub struct Simulation<S: Surface> {
    surface: S,
    field: Field,
    links: ProximityRenderer,
    state: LoopState,
    stats: FrameStats,
}

impl<S: Surface> Simulation<S> {
    /// Builds a simulation over `surface`, resizing it to `width` x
    /// `height` and seeding the field for that viewport.
    ///
    /// Fails fast with `SimError::SurfaceUnavailable` if the surface reports
    /// itself unusable, or `SimError::InvalidParam` for a bad config.
    pub fn new(
        mut surface: S,
        width: f64,
        height: f64,
        config: &NetworkConfig,
        rng: Xorshift64,
    ) -> Result<Self, SimError> {
        if !surface.is_available() {
            return Err(SimError::SurfaceUnavailable(
                "surface reported itself unavailable".into(),
            ));
        }
        config.validate()?;
        surface.resize(width, height);
        let viewport = surface.viewport();
        let field = Field::new(viewport, config.field, rng)?;
        debug!(
            width = viewport.width(),
            height = viewport.height(),
            particles = field.len(),
            "simulation created"
        );
        Ok(Self {
            surface,
            field,
            links: ProximityRenderer::new(config.links),
            state: LoopState::Idle,
            stats: FrameStats::default(),
        })
    }

    /// Idle → Running. Does nothing if already running.
    ///
    /// If the scheduler refuses the first frame the loop stays Idle and the
    /// error is returned.
    pub fn start<F: FrameScheduler + ?Sized>(
        &mut self,
        scheduler: &mut F,
    ) -> Result<(), SimError> {
        if let LoopState::Running { .. } = self.state {
            return Ok(());
        }
        let pending = scheduler.request_frame()?;
        self.state = LoopState::Running { pending };
        info!(particles = self.field.len(), "particle network started");
        Ok(())
    }

    /// Running → Idle, cancelling the pending frame. Does nothing if idle.
    pub fn stop<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if let LoopState::Running { pending } = self.state {
            scheduler.cancel_frame(pending);
            self.state = LoopState::Idle;
            info!(frames = self.stats.frame, "particle network stopped");
        }
    }

    /// Runs a fired frame.
    ///
    /// Returns `false` without touching anything when `handle` is not the
    /// pending frame (the loop was stopped, or the handle is stale). If the
    /// next frame cannot be scheduled, this frame is still drawn and the loop
    /// falls back to Idle.
    pub fn on_frame<F: FrameScheduler + ?Sized>(
        &mut self,
        handle: FrameHandle,
        scheduler: &mut F,
    ) -> bool {
        match self.state {
            LoopState::Running { pending } if pending == handle => {}
            _ => {
                trace!(?handle, "ignoring frame that is not pending");
                return false;
            }
        }
        self.clear();
        // Reschedule before drawing so cadence does not depend on frame cost.
        self.state = match scheduler.request_frame() {
            Ok(next) => LoopState::Running { pending: next },
            Err(e) => {
                error!(
                    error = %e,
                    frame = self.stats.frame,
                    "could not schedule next frame; stopping"
                );
                LoopState::Idle
            }
        };
        self.draw_frame();
        true
    }

    /// Runs one frame body without any scheduling.
    pub fn step(&mut self) -> FrameStats {
        self.clear();
        self.draw_frame();
        self.stats
    }

    /// Resizes the surface and reseeds the field to match.
    ///
    /// Loop state is unchanged.
    pub fn notify_resize(&mut self, width: f64, height: f64) {
        self.surface.resize(width, height);
        let viewport = self.surface.viewport();
        self.field.on_resize(viewport);
        debug!(
            width = viewport.width(),
            height = viewport.height(),
            particles = self.field.len(),
            "viewport resized"
        );
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn renderer(&self) -> &ProximityRenderer {
        &self.links
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Stats of the most recent frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn clear(&mut self) {
        let (w, h) = self.surface.size();
        self.surface.clear_rect(0.0, 0.0, w, h);
    }

    fn draw_frame(&mut self) {
        self.field.update(&mut self.surface);
        let connections =
            self.links
                .render(self.field.particles(), self.field.viewport(), &mut self.surface);
        self.stats = FrameStats {
            frame: self.stats.frame + 1,
            particles: self.field.len(),
            connections,
        };
        trace!(
            frame = self.stats.frame,
            particles = self.stats.particles,
            connections,
            "frame drawn"
        );
    }
}
