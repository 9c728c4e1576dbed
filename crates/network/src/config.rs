//! Tunable parameters for the particle network.
//!
//! One [`NetworkConfig`] parameterizes the whole backdrop, so different pages
//! differ only in the JSON they pass, not in code.

use constellation_core::color::{Srgb, ACCENT};
use constellation_core::error::SimError;
use constellation_core::params::{param_color, param_f64};
use serde_json::{json, Value};

/// Viewport area (px²) per particle.
pub const DEFAULT_DENSITY_DIVISOR: f64 = 15_000.0;
/// Per-axis speed bound, px/frame.
pub const DEFAULT_MAX_SPEED: f64 = 0.5;
/// Smallest particle radius (inclusive).
pub const DEFAULT_MIN_RADIUS: f64 = 1.0;
/// Largest particle radius (exclusive).
pub const DEFAULT_MAX_RADIUS: f64 = 3.0;
/// Connection stroke width, px.
pub const DEFAULT_LINK_WIDTH: f64 = 1.0;
/// Squared distance at which a connection fades to zero opacity.
pub const DEFAULT_OPACITY_FALLOFF: f64 = 20_000.0;
/// Connection cutoff is `(width / d) * (height / d)` for this `d`.
pub const DEFAULT_THRESHOLD_DIVISOR: f64 = 7.0;

// Bounds shared by `validate` and `param_schema`.
const MIN_DENSITY_DIVISOR: f64 = 1.0;
const MAX_SPEED_LIMIT: f64 = 10.0;
const MIN_RADIUS_FLOOR: f64 = 0.1;
const MAX_LINK_WIDTH: f64 = 8.0;
const MIN_OPACITY_FALLOFF: f64 = 1.0;
const MIN_THRESHOLD_DIVISOR: f64 = 1.0;

/// Population and motion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub density_divisor: f64,
    pub max_speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub accent: Srgb,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_divisor: DEFAULT_DENSITY_DIVISOR,
            max_speed: DEFAULT_MAX_SPEED,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            accent: ACCENT,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.density_divisor.is_finite() && self.density_divisor >= MIN_DENSITY_DIVISOR) {
            return Err(SimError::param(
                "density_divisor",
                format!("must be at least {MIN_DENSITY_DIVISOR}"),
            ));
        }
        if !(0.0..=MAX_SPEED_LIMIT).contains(&self.max_speed) {
            return Err(SimError::param(
                "max_speed",
                format!("must be between 0 and {MAX_SPEED_LIMIT}"),
            ));
        }
        if !(self.min_radius.is_finite() && self.min_radius >= MIN_RADIUS_FLOOR) {
            return Err(SimError::param(
                "min_radius",
                format!("must be at least {MIN_RADIUS_FLOOR}"),
            ));
        }
        if !(self.max_radius.is_finite() && self.max_radius >= self.min_radius) {
            return Err(SimError::param("max_radius", "must not be below min_radius"));
        }
        Ok(())
    }
}

/// Connection (proximity graph) drawing settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkConfig {
    pub color: Srgb,
    pub width: f64,
    pub opacity_falloff: f64,
    pub threshold_divisor: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            color: ACCENT,
            width: DEFAULT_LINK_WIDTH,
            opacity_falloff: DEFAULT_OPACITY_FALLOFF,
            threshold_divisor: DEFAULT_THRESHOLD_DIVISOR,
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=MAX_LINK_WIDTH).contains(&self.width) {
            return Err(SimError::param(
                "link_width",
                format!("must be between 0 and {MAX_LINK_WIDTH}"),
            ));
        }
        if !(self.opacity_falloff.is_finite() && self.opacity_falloff >= MIN_OPACITY_FALLOFF) {
            return Err(SimError::param(
                "opacity_falloff",
                format!("must be at least {MIN_OPACITY_FALLOFF}"),
            ));
        }
        if !(self.threshold_divisor.is_finite() && self.threshold_divisor >= MIN_THRESHOLD_DIVISOR)
        {
            return Err(SimError::param(
                "threshold_divisor",
                format!("must be at least {MIN_THRESHOLD_DIVISOR}"),
            ));
        }
        Ok(())
    }
}

/// Full backdrop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkConfig {
    pub field: FieldConfig,
    pub links: LinkConfig,
}

impl NetworkConfig {
    /// Builds a config from a JSON params object, falling back to defaults
    /// for missing keys, then validates it.
    pub fn from_json(params: &Value) -> Result<Self, SimError> {
        let config = Self {
            field: FieldConfig {
                density_divisor: param_f64(params, "density_divisor", DEFAULT_DENSITY_DIVISOR),
                max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
                min_radius: param_f64(params, "min_radius", DEFAULT_MIN_RADIUS),
                max_radius: param_f64(params, "max_radius", DEFAULT_MAX_RADIUS),
                accent: param_color(params, "accent", ACCENT)?,
            },
            links: LinkConfig {
                color: param_color(params, "link_color", ACCENT)?,
                width: param_f64(params, "link_width", DEFAULT_LINK_WIDTH),
                opacity_falloff: param_f64(params, "opacity_falloff", DEFAULT_OPACITY_FALLOFF),
                threshold_divisor: param_f64(
                    params,
                    "threshold_divisor",
                    DEFAULT_THRESHOLD_DIVISOR,
                ),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.field.validate()?;
        self.links.validate()
    }

    /// Current values as a JSON object using the same keys `from_json` reads.
    pub fn params(&self) -> Value {
        json!({
            "density_divisor": self.field.density_divisor,
            "max_speed": self.field.max_speed,
            "min_radius": self.field.min_radius,
            "max_radius": self.field.max_radius,
            "accent": self.field.accent.to_hex(),
            "link_color": self.links.color.to_hex(),
            "link_width": self.links.width,
            "opacity_falloff": self.links.opacity_falloff,
            "threshold_divisor": self.links.threshold_divisor,
        })
    }

    /// Type, default, range and description for every parameter.
    pub fn param_schema() -> Value {
        json!({
            "density_divisor": {
                "type": "number",
                "default": DEFAULT_DENSITY_DIVISOR,
                "min": MIN_DENSITY_DIVISOR,
                "description": "Viewport area (px^2) per particle; lower is denser"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "min": 0.0,
                "max": MAX_SPEED_LIMIT,
                "description": "Per-axis speed bound in px per frame"
            },
            "min_radius": {
                "type": "number",
                "default": DEFAULT_MIN_RADIUS,
                "min": MIN_RADIUS_FLOOR,
                "description": "Smallest particle radius in px"
            },
            "max_radius": {
                "type": "number",
                "default": DEFAULT_MAX_RADIUS,
                "min": MIN_RADIUS_FLOOR,
                "description": "Largest particle radius in px (exclusive)"
            },
            "accent": {
                "type": "color",
                "default": ACCENT.to_hex(),
                "description": "Particle fill color"
            },
            "link_color": {
                "type": "color",
                "default": ACCENT.to_hex(),
                "description": "Connection stroke color"
            },
            "link_width": {
                "type": "number",
                "default": DEFAULT_LINK_WIDTH,
                "min": 0.0,
                "max": MAX_LINK_WIDTH,
                "description": "Connection stroke width in px"
            },
            "opacity_falloff": {
                "type": "number",
                "default": DEFAULT_OPACITY_FALLOFF,
                "min": MIN_OPACITY_FALLOFF,
                "description": "Squared distance at which connections fade out"
            },
            "threshold_divisor": {
                "type": "number",
                "default": DEFAULT_THRESHOLD_DIVISOR,
                "min": MIN_THRESHOLD_DIVISOR,
                "description": "Connection cutoff is (width / d) * (height / d)"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = NetworkConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, NetworkConfig::default());
        assert_eq!(config.field.density_divisor, 15_000.0);
        assert_eq!(config.links.opacity_falloff, 20_000.0);
    }

    #[test]
    fn overrides_are_applied() {
        let config = NetworkConfig::from_json(&json!({
            "density_divisor": 9000,
            "accent": "#10b981",
            "link_width": 2.0
        }))
        .unwrap();
        assert_eq!(config.field.density_divisor, 9000.0);
        assert_eq!(config.field.accent.to_rgb8(), [16, 185, 129]);
        assert_eq!(config.links.width, 2.0);
        assert_eq!(config.links.color, ACCENT);
    }

    #[test]
    fn zero_density_divisor_is_rejected() {
        let err = NetworkConfig::from_json(&json!({"density_divisor": 0})).unwrap_err();
        assert!(err.to_string().contains("density_divisor"), "got: {err}");
    }

    #[test]
    fn inverted_radius_range_is_rejected() {
        let err =
            NetworkConfig::from_json(&json!({"min_radius": 4.0, "max_radius": 2.0})).unwrap_err();
        assert!(err.to_string().contains("max_radius"), "got: {err}");
    }

    #[test]
    fn negative_speed_and_bad_falloff_are_rejected() {
        assert!(NetworkConfig::from_json(&json!({"max_speed": -1.0})).is_err());
        assert!(NetworkConfig::from_json(&json!({"opacity_falloff": 0.0})).is_err());
        assert!(NetworkConfig::from_json(&json!({"threshold_divisor": -7.0})).is_err());
        assert!(NetworkConfig::from_json(&json!({"link_width": -1.0})).is_err());
    }

    #[test]
    fn tiny_density_divisor_is_rejected_before_allocation() {
        let err = NetworkConfig::from_json(&json!({"density_divisor": 1e-12})).unwrap_err();
        assert!(err.to_string().contains("density_divisor"), "got: {err}");
        assert!(NetworkConfig::from_json(&json!({"density_divisor": 0.5})).is_err());
        assert!(NetworkConfig::from_json(&json!({"density_divisor": 1.0})).is_ok());
    }

    #[test]
    fn schema_bounds_are_enforced() {
        assert!(NetworkConfig::from_json(&json!({"max_speed": 10.5})).is_err());
        assert!(NetworkConfig::from_json(&json!({"max_speed": 10.0})).is_ok());
        assert!(NetworkConfig::from_json(&json!({"min_radius": 0.05})).is_err());
        assert!(NetworkConfig::from_json(&json!({"link_width": 9.0})).is_err());
        assert!(NetworkConfig::from_json(&json!({"opacity_falloff": 0.5})).is_err());
        assert!(NetworkConfig::from_json(&json!({"threshold_divisor": 0.5})).is_err());
    }

    fn single(key: &str, value: f64) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(key.to_owned(), json!(value));
        Value::Object(map)
    }

    #[test]
    fn schema_bounds_accept_the_defaults_and_reject_outside_values() {
        let schema = NetworkConfig::param_schema();
        for (key, entry) in schema.as_object().unwrap() {
            if entry["type"] != "number" {
                continue;
            }
            let default = entry["default"].as_f64().unwrap();
            if let Some(min) = entry.get("min").and_then(Value::as_f64) {
                assert!(default >= min, "{key}: default below min");
                let below = single(key, min - 0.01);
                assert!(NetworkConfig::from_json(&below).is_err(), "{key} below min accepted");
            }
            if let Some(max) = entry.get("max").and_then(Value::as_f64) {
                assert!(default <= max, "{key}: default above max");
                let above = single(key, max + 0.01);
                assert!(NetworkConfig::from_json(&above).is_err(), "{key} above max accepted");
            }
        }
    }

    #[test]
    fn bad_color_is_rejected() {
        assert!(matches!(
            NetworkConfig::from_json(&json!({"link_color": "indigo"})),
            Err(SimError::InvalidColor(_))
        ));
    }

    #[test]
    fn params_round_trip_through_from_json() {
        let config = NetworkConfig::from_json(&json!({"max_speed": 1.25})).unwrap();
        let again = NetworkConfig::from_json(&config.params()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn schema_covers_every_param_key() {
        let schema = NetworkConfig::param_schema();
        let params = NetworkConfig::default().params();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing '{key}'");
            assert!(schema[key].get("default").is_some());
        }
    }
}
