//! A single drifting point of the backdrop.

use constellation_core::color::Srgb;
use constellation_core::prng::Xorshift64;
use constellation_core::surface::Surface;
use constellation_core::viewport::Viewport;
use glam::DVec2;

use crate::config::FieldConfig;

/// A moving point with fixed radius and color.
///
/// Motion is Euler integration at one time unit per frame; the only force is
/// reflection off the viewport edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    color: Srgb,
}

impl Particle {
    /// Creates a particle with explicit state.
    pub fn new(position: DVec2, velocity: DVec2, radius: f64, color: Srgb) -> Self {
        Self {
            position,
            velocity,
            radius,
            color,
        }
    }

    /// Spawns a particle uniformly over the viewport.
    ///
    /// Position is drawn from [0, width) x [0, height), each velocity
    /// component from [-max_speed, max_speed), radius from
    /// [min_radius, max_radius).
    pub fn spawn(viewport: Viewport, config: &FieldConfig, rng: &mut Xorshift64) -> Self {
        let position = DVec2::new(
            rng.next_range(0.0, viewport.width()),
            rng.next_range(0.0, viewport.height()),
        );
        let velocity = DVec2::new(
            rng.next_signed(config.max_speed),
            rng.next_signed(config.max_speed),
        );
        let radius = rng.next_range(config.min_radius, config.max_radius);
        Self::new(position, velocity, radius, config.accent)
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Srgb {
        self.color
    }

    /// Reflects off any edge the particle is on or past while heading
    /// outward, then integrates one step.
    ///
    /// The flip only happens for outward motion, so a particle resting
    /// exactly on an edge bounces, and one already heading back in is left
    /// alone. A single step may overshoot an edge by up to one velocity.
    pub fn advance(&mut self, viewport: Viewport) {
        let (x, y) = (self.position.x, self.position.y);
        if (x >= viewport.width() && self.velocity.x > 0.0) || (x <= 0.0 && self.velocity.x < 0.0)
        {
            self.velocity.x = -self.velocity.x;
        }
        if (y >= viewport.height() && self.velocity.y > 0.0)
            || (y <= 0.0 && self.velocity.y < 0.0)
        {
            self.velocity.y = -self.velocity.y;
        }
        self.position += self.velocity;
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.position.x, self.position.y, self.radius, self.color);
    }

    /// One frame: move, then draw at the new position.
    pub fn update<S: Surface + ?Sized>(&mut self, viewport: Viewport, surface: &mut S) {
        self.advance(viewport);
        self.draw(surface);
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(&self, other: &Particle) -> f64 {
        self.position.distance_squared(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellation_core::color::ACCENT;
    use constellation_core::surface::{DisplayList, DrawCommand};

    fn particle(x: f64, y: f64, dx: f64, dy: f64) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::new(dx, dy), 2.0, ACCENT)
    }

    #[test]
    fn advance_moves_by_velocity() {
        let mut p = particle(10.0, 10.0, 0.3, -0.2);
        p.advance(Viewport::new(100.0, 100.0));
        assert!((p.position().x - 10.3).abs() < 1e-12);
        assert!((p.position().y - 9.8).abs() < 1e-12);
    }

    #[test]
    fn particle_on_right_edge_moving_out_reflects() {
        let mut p = particle(100.0, 50.0, 0.4, 0.0);
        p.advance(Viewport::new(100.0, 100.0));
        assert_eq!(p.velocity().x, -0.4);
        assert!(p.position().x < 100.0);
    }

    #[test]
    fn particle_past_bottom_edge_reflects() {
        let mut p = particle(50.0, 100.2, 0.0, 0.3);
        p.advance(Viewport::new(100.0, 100.0));
        assert_eq!(p.velocity().y, -0.3);
    }

    #[test]
    fn particle_past_left_and_top_edges_reflects_both_axes() {
        let mut p = particle(-0.1, -0.2, -0.25, -0.5);
        p.advance(Viewport::new(100.0, 100.0));
        assert_eq!(p.velocity(), DVec2::new(0.25, 0.5));
    }

    #[test]
    fn particle_heading_inward_is_not_flipped() {
        let mut p = particle(100.3, 50.0, -0.4, 0.0);
        p.advance(Viewport::new(100.0, 100.0));
        assert_eq!(p.velocity().x, -0.4);
    }

    #[test]
    fn update_draws_at_new_position() {
        let mut list = DisplayList::new(100.0, 100.0);
        let mut p = particle(5.0, 5.0, 0.5, 0.5);
        p.update(Viewport::new(100.0, 100.0), &mut list);
        assert_eq!(
            list.commands(),
            &[DrawCommand::Circle {
                cx: 5.5,
                cy: 5.5,
                radius: 2.0,
                color: ACCENT
            }]
        );
    }

    #[test]
    fn spawn_respects_configured_ranges() {
        let config = FieldConfig::default();
        let vp = Viewport::new(640.0, 480.0);
        let mut rng = Xorshift64::new(11);
        for _ in 0..1000 {
            let p = Particle::spawn(vp, &config, &mut rng);
            assert!((0.0..640.0).contains(&p.position().x));
            assert!((0.0..480.0).contains(&p.position().y));
            assert!((-0.5..0.5).contains(&p.velocity().x));
            assert!((-0.5..0.5).contains(&p.velocity().y));
            assert!((1.0..3.0).contains(&p.radius()));
            assert_eq!(p.color(), ACCENT);
        }
    }

    #[test]
    fn distance_sq_matches_hand_computation() {
        let a = particle(0.0, 0.0, 0.0, 0.0);
        let b = particle(100.0, 100.0, 0.0, 0.0);
        assert_eq!(a.distance_sq(&b), 20_000.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn position_stays_within_one_step_of_bounds(
                seed: u64,
                width in 1.0_f64..2000.0,
                height in 1.0_f64..2000.0,
                steps in 1_usize..2000,
            ) {
                let config = FieldConfig::default();
                let vp = Viewport::new(width, height);
                let mut rng = Xorshift64::new(seed);
                let mut p = Particle::spawn(vp, &config, &mut rng);
                let slack = config.max_speed + 1e-9;
                for _ in 0..steps {
                    p.advance(vp);
                    let pos = p.position();
                    prop_assert!(pos.x >= -slack && pos.x <= width + slack, "x = {}", pos.x);
                    prop_assert!(pos.y >= -slack && pos.y <= height + slack, "y = {}", pos.y);
                }
            }
        }
    }
}
