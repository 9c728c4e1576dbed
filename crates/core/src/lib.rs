#![deny(unsafe_code)]
//! Core types for the constellation particle-network backdrop.
//!
//! Provides the host-facing seams (`Surface`, `FrameScheduler`, `Viewport`),
//! color types (`Srgb`, `Rgba`), the `Xorshift64` PRNG, parameter helpers,
//! the headless `Scene` description, and `SimError`.

pub mod color;
pub mod error;
pub mod params;
pub mod prng;
pub mod scene;
pub mod scheduler;
pub mod surface;
pub mod viewport;

pub use color::{Rgba, Srgb, ACCENT};
pub use error::SimError;
pub use prng::Xorshift64;
pub use scene::Scene;
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use surface::{DisplayList, DrawCommand, Surface};
pub use viewport::Viewport;
