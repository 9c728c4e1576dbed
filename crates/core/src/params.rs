//! Helpers for reading typed values out of a `serde_json::Value` params object.
//!
//! Numeric lookups fall back to the default when the key is
//! missing or holds the wrong JSON type. Colors are stricter: a present but
//! unparsable color is reported instead of silently replaced.

use crate::color::Srgb;
use crate::error::SimError;
use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Integers are accepted and widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a hex color from `params[name]`.
///
/// Missing or non-string values yield `default`; a string that is not a
/// valid `#rrggbb` color yields `SimError::InvalidColor`.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Result<Srgb, SimError> {
    match params.get(name).and_then(Value::as_str) {
        Some(hex) => Srgb::from_hex(hex)
            .map_err(|e| SimError::InvalidColor(format!("parameter '{name}': {e}"))),
        None => Ok(default),
    }
}
