#![deny(unsafe_code)]
//! Particle-network backdrop.
//!
//! A density-scaled field of drifting points bounces inside the viewport,
//! and every frame each pair closer than a size-relative cutoff is joined by
//! a line that fades with distance.
//!
//! [`Simulation`] ties it together over any [`Surface`](constellation_core::Surface)
//! and is driven by a host [`FrameScheduler`](constellation_core::FrameScheduler).

pub mod config;
pub mod field;
pub mod particle;
pub mod proximity;
pub mod simulation;

pub use config::{FieldConfig, LinkConfig, NetworkConfig};
pub use field::Field;
pub use particle::Particle;
pub use proximity::{Connection, ProximityRenderer};
pub use simulation::{FrameStats, LoopState, Simulation};
