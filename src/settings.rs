//! Portal policy and physics settings
//!
//! Loaded from an optional JSON file; anything missing or malformed falls
//! back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{CLAMPED_EXIT_FACTOR, FIXED_EXIT_FACTOR, REST_SPEED_SQ};

/// How the exit surface is checked for blocking tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObstructionPolicy {
    /// Blocked only when every sample along the exit surface is solid
    WholeSurface,
    /// Also blocked when the entity's edges land on solid thirds or off the surface
    #[default]
    Footprint,
}

impl ObstructionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstructionPolicy::WholeSurface => "WholeSurface",
            ObstructionPolicy::Footprint => "Footprint",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wholesurface" | "whole-surface" | "whole" => Some(ObstructionPolicy::WholeSurface),
            "footprint" | "edges" => Some(ObstructionPolicy::Footprint),
            _ => None,
        }
    }
}

/// Where an entity is placed in front of the exit surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule")]
pub enum ExitOffset {
    /// Always `factor * height` out from the surface
    Fixed { factor: f32 },
    /// Keep the entry depth, but never less than `factor * height`
    ClampedMin { factor: f32 },
}

impl Default for ExitOffset {
    fn default() -> Self {
        ExitOffset::Fixed {
            factor: FIXED_EXIT_FACTOR,
        }
    }
}

impl ExitOffset {
    pub fn clamped() -> Self {
        ExitOffset::ClampedMin {
            factor: CLAMPED_EXIT_FACTOR,
        }
    }

    /// Local Y for the exit, given the entry-local Y and the entity height
    pub fn exit_y(&self, local_y: f32, height: f32) -> f32 {
        match *self {
            ExitOffset::Fixed { factor } => height * factor,
            ExitOffset::ClampedMin { factor } => local_y.abs().max(height * factor),
        }
    }
}

/// Which point is carried into portal-local space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LocalOrigin {
    #[default]
    ImpactPoint,
    Position,
}

/// Portal transform configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub obstruction: ObstructionPolicy,
    pub exit_offset: ExitOffset,
    pub local_origin: LocalOrigin,
    /// Squared speed under which same-angle pairs are skipped
    pub rest_speed_sq: f32,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            obstruction: ObstructionPolicy::Footprint,
            exit_offset: ExitOffset::default(),
            local_origin: LocalOrigin::ImpactPoint,
            rest_speed_sq: REST_SPEED_SQ,
        }
    }
}

impl PortalSettings {
    /// Settings matching the whole-surface/clamped revision
    pub fn lenient() -> Self {
        Self {
            obstruction: ObstructionPolicy::WholeSurface,
            exit_offset: ExitOffset::clamped(),
            local_origin: LocalOrigin::Position,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, or defaults if it can't be read
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded portal settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad portal settings in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Can't read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Tuning for the ball physics step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsProperties {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Speed kept after bouncing off a solid tile
    pub restitution: f32,
    /// Speed kept per foliage tile passed through
    pub pass_through_drag: f32,
    /// Horizontal speed kept per tick while rolling on the ground
    pub ground_friction: f32,
    /// Squared speed under which a grounded ball comes to rest
    pub rest_speed_sq: f32,
}

impl Default for PhysicsProperties {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            restitution: 0.7,
            pass_through_drag: 0.93,
            ground_friction: 0.98,
            rest_speed_sq: 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_footprint_revision() {
        let settings = PortalSettings::default();
        assert_eq!(settings.obstruction, ObstructionPolicy::Footprint);
        assert_eq!(settings.exit_offset, ExitOffset::Fixed { factor: 0.51 });
        assert_eq!(settings.local_origin, LocalOrigin::ImpactPoint);
        assert!((settings.rest_speed_sq - 0.14).abs() < 1e-6);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(ObstructionPolicy::from_str("whole"), Some(ObstructionPolicy::WholeSurface));
        assert_eq!(ObstructionPolicy::from_str("FOOTPRINT"), Some(ObstructionPolicy::Footprint));
        assert_eq!(ObstructionPolicy::from_str("nope"), None);
        assert_eq!(
            ObstructionPolicy::from_str(ObstructionPolicy::WholeSurface.as_str()),
            Some(ObstructionPolicy::WholeSurface)
        );
    }

    #[test]
    fn test_exit_y_rules() {
        let fixed = ExitOffset::default();
        assert!((fixed.exit_y(-30.0, 16.0) - 8.16).abs() < 1e-4);

        let clamped = ExitOffset::clamped();
        // Shallow entry gets pushed out to the minimum
        assert!((clamped.exit_y(-2.0, 16.0) - 9.6).abs() < 1e-4);
        // Deep entry keeps its depth
        assert!((clamped.exit_y(-12.0, 16.0) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "obstruction": "WholeSurface", "exit_offset": { "rule": "ClampedMin", "factor": 0.75 } }"#;
        let settings = PortalSettings::from_json(json).unwrap();
        assert_eq!(settings.obstruction, ObstructionPolicy::WholeSurface);
        assert_eq!(settings.exit_offset, ExitOffset::ClampedMin { factor: 0.75 });
        assert_eq!(settings.local_origin, LocalOrigin::ImpactPoint);
    }

    #[test]
    fn test_json_roundtrip_lenient() {
        let settings = PortalSettings::lenient();
        let json = settings.to_json().unwrap();
        assert_eq!(PortalSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = PortalSettings::load("/definitely/not/here/portal.json");
        assert_eq!(settings, PortalSettings::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(PortalSettings::from_json("{ not json").is_err());
    }
}
