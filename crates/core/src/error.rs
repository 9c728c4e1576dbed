//! Error types for the constellation core.

use thiserror::Error;

/// Errors produced while building or configuring a simulation.
///
/// Per-frame work never fails once a simulation is constructed, so every
/// variant here surfaces at construction or configuration time.
#[derive(Debug, Error)]
pub enum SimError {
    /// Width or height was zero (or the pixel count overflowed) when
    /// allocating a pixel buffer.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The drawing surface cannot be used.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The host could not schedule a frame.
    #[error("frame scheduler unavailable: {0}")]
    SchedulerUnavailable(String),

    /// A configuration value would break a simulation invariant.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl SimError {
    /// Shorthand for [`SimError::InvalidParam`].
    pub fn param(name: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
