//! End-to-end behavior of the frame loop driven by a hand-fired scheduler.

use constellation_core::{DisplayList, FrameScheduler, ManualScheduler, Surface, Xorshift64};
use constellation_network::{NetworkConfig, Simulation};
use serde_json::json;

fn desktop() -> Simulation<DisplayList> {
    Simulation::new(
        DisplayList::new(1400.0, 800.0),
        1400.0,
        800.0,
        &NetworkConfig::default(),
        Xorshift64::new(1234),
    )
    .unwrap()
}

/// Fires due frames until `frames` have run or nothing is pending.
fn pump(sim: &mut Simulation<DisplayList>, sched: &mut ManualScheduler, frames: usize) -> usize {
    let mut ran = 0;
    while ran < frames {
        let Some(handle) = sched.next_due() else { break };
        if sim.on_frame(handle, sched) {
            ran += 1;
        }
    }
    ran
}

#[test]
fn unsized_surface_is_sized_before_seeding() {
    let sim = Simulation::new(
        DisplayList::new(300.0, 150.0),
        1400.0,
        800.0,
        &NetworkConfig::default(),
        Xorshift64::new(77),
    )
    .unwrap();
    assert_eq!(sim.surface().size(), (1400.0, 800.0));
    assert_eq!(sim.field().len(), 74);
}

#[test]
fn loop_keeps_itself_scheduled_indefinitely() {
    let mut sim = desktop();
    let mut sched = ManualScheduler::new();
    sim.start(&mut sched).unwrap();
    assert_eq!(pump(&mut sim, &mut sched, 300), 300);
    assert_eq!(sched.pending(), 1);
    assert_eq!(sim.stats().frame, 300);
}

#[test]
fn particles_stay_in_bounds_over_many_frames() {
    let mut sim = desktop();
    let mut sched = ManualScheduler::new();
    sim.start(&mut sched).unwrap();
    for _ in 0..50 {
        pump(&mut sim, &mut sched, 100);
        sim.surface_mut().take();
        for p in sim.field().particles() {
            let pos = p.position();
            assert!((-0.5..=1400.5).contains(&pos.x), "x out of bounds: {}", pos.x);
            assert!((-0.5..=800.5).contains(&pos.y), "y out of bounds: {}", pos.y);
        }
    }
}

#[test]
fn stop_with_frame_pending_freezes_the_surface() {
    let mut sim = desktop();
    let mut sched = ManualScheduler::new();
    sim.start(&mut sched).unwrap();
    pump(&mut sim, &mut sched, 3);
    let pending = sched.pending();
    assert_eq!(pending, 1);

    sim.stop(&mut sched);
    let recorded = sim.surface().commands().len();

    // Nothing left to fire, and even a host that misbehaves cannot draw.
    assert_eq!(pump(&mut sim, &mut sched, 10), 0);
    let stray = sched.request_frame().unwrap();
    assert!(!sim.on_frame(stray, &mut sched));
    assert_eq!(sim.surface().commands().len(), recorded);
}

#[test]
fn restart_after_stop_resumes_drawing() {
    let mut sim = desktop();
    let mut sched = ManualScheduler::new();
    sim.start(&mut sched).unwrap();
    pump(&mut sim, &mut sched, 2);
    sim.stop(&mut sched);
    sim.start(&mut sched).unwrap();
    assert_eq!(pump(&mut sim, &mut sched, 2), 2);
    assert_eq!(sim.stats().frame, 4);
}

#[test]
fn resize_mid_run_reseeds_and_keeps_running() {
    let mut sim = desktop();
    let mut sched = ManualScheduler::new();
    sim.start(&mut sched).unwrap();
    pump(&mut sim, &mut sched, 5);

    sim.notify_resize(700.0, 400.0);
    assert!(sim.is_running());
    assert_eq!(sim.field().len(), 18);

    sim.notify_resize(700.0, 400.0);
    assert_eq!(sim.field().len(), 18);

    sim.surface_mut().take();
    assert_eq!(pump(&mut sim, &mut sched, 1), 1);
    assert_eq!(sim.surface().circle_count(), 18);
    assert_eq!(sim.surface().size(), (700.0, 400.0));
}

#[test]
fn every_stroke_uses_a_valid_alpha() {
    // A dense, large field pushes the cutoff well past the opacity falloff.
    let config = NetworkConfig::from_json(&json!({"density_divisor": 4000})).unwrap();
    let mut sim = Simulation::new(
        DisplayList::new(2800.0, 1600.0),
        2800.0,
        1600.0,
        &config,
        Xorshift64::new(9),
    )
    .unwrap();
    for _ in 0..5 {
        sim.step();
    }
    for cmd in sim.surface().commands() {
        if let constellation_core::DrawCommand::Line { color, .. } = cmd {
            assert!(color.alpha > 0.0 && color.alpha <= 1.0, "alpha {}", color.alpha);
        }
    }
}

#[test]
fn custom_accent_reaches_every_particle() {
    let config = NetworkConfig::from_json(&json!({"accent": "#ef4444"})).unwrap();
    let sim = Simulation::new(
        DisplayList::new(1400.0, 800.0),
        1400.0,
        800.0,
        &config,
        Xorshift64::new(2),
    )
    .unwrap();
    assert!(sim
        .field()
        .particles()
        .iter()
        .all(|p| p.color().to_hex() == "#ef4444"));
}
