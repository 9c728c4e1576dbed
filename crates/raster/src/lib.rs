#![deny(unsafe_code)]
//! CPU rasterization for headless rendering.
//!
//! [`RasterSurface`] implements the core `Surface` trait over an RGBA8 buffer,
//! so the same `Simulation` that drives a browser canvas can render
//! offscreen. PNG output lives behind the `png` feature (default on).

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::RasterSurface;
