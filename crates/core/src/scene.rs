//! Headless scene description.
//!
//! A [`Scene`] bundles what a headless driver needs to render the backdrop
//! offscreen: surface size, optional PRNG seed, number of frames to run, and
//! the parameter overrides handed to the network configuration.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Headless render description, loadable from JSON.
///
/// ```json
/// { "width": 1400, "height": 800, "seed": 7, "frames": 120,
///   "params": { "density_divisor": 9000 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    /// `None` seeds from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

fn default_frames() -> usize {
    120
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Scene {
    /// Creates a scene with empty params and the default frame count.
    pub fn new(width: usize, height: usize, seed: Option<u64>) -> Self {
        Self {
            width,
            height,
            seed,
            frames: default_frames(),
            params: empty_params(),
        }
    }

    /// Reads a scene from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))?;
        let scene: Scene = serde_json::from_str(&text)
            .map_err(|e| SimError::param("scene", format!("{}: {e}", path.display())))?;
        scene.validate()?;
        Ok(scene)
    }

    /// A headless scene needs a real pixel buffer: both dimensions must be
    /// non-zero and `width * height` must not overflow.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .and_then(|px| px.checked_mul(4))
            .ok_or(SimError::InvalidDimensions)?;
        if !self.params.is_object() {
            return Err(SimError::param("params", "must be a JSON object"));
        }
        Ok(())
    }
}
