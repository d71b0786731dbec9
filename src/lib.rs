//! Portal Putt - portal pass-through for golf balls in a 2D tile world
//!
//! Core modules:
//! - `sim`: Per-tick simulation (geometry, tiles, portal transform, listeners)
//! - `settings`: Runtime policy selection and physics tuning

pub mod settings;
pub mod sim;

pub use settings::{ExitOffset, LocalOrigin, ObstructionPolicy, PhysicsProperties, PortalSettings};

use glam::Vec2;

/// World configuration constants
pub mod consts {
    /// Side length of one tile in world units
    pub const TILE_SIZE: f32 = 16.0;

    /// Half the length of a portal's physical surface segment
    pub const PORTAL_EDGE_HALF_LENGTH: f32 = 22.0;
    /// Number of tile-wide thirds a portal surface is split into
    pub const PORTAL_THIRDS: usize = 3;
    /// Half the width covered by the three surface thirds
    pub const PORTAL_SURFACE_HALF_WIDTH: f32 = TILE_SIZE * PORTAL_THIRDS as f32 / 2.0;
    /// How far outward from the surface obstruction samples are taken
    pub const SURFACE_CLEARANCE: f32 = TILE_SIZE;

    /// Below this squared speed a ball counts as stationary for same-angle pairs
    pub const REST_SPEED_SQ: f32 = 0.14;
    /// Exit offset (fraction of entity height) for the fixed rule
    pub const FIXED_EXIT_FACTOR: f32 = 0.51;
    /// Minimum exit offset (fraction of entity height) for the clamped rule
    pub const CLAMPED_EXIT_FACTOR: f32 = 0.6;

    /// Maximum movement substeps per tick (keeps fast balls from tunneling)
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default golf ball footprint
    pub const BALL_SIZE: f32 = 7.0;
    /// Keep-alive floor applied to player balls every tick
    pub const BALL_MIN_TIME_LEFT: u32 = 10;
}

/// Angles this close to ±π all snap to -π
const ANGLE_SEAM_EPSILON: f32 = 1.0e-6;

/// Normalized angle to [-π, π)
///
/// Orientations that differ only by whole turns come out identical, so
/// callers may compare normalized angles exactly.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = if (-PI..PI).contains(&angle) {
        angle
    } else {
        (angle + PI).rem_euclid(TAU) - PI
    };
    if wrapped.abs() >= PI - ANGLE_SEAM_EPSILON {
        -PI
    } else {
        wrapped
    }
}

/// Unit vector pointing along `angle`
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
