//! Exit surface obstruction checks
//!
//! Three points are sampled one tile out from the exit surface, one per
//! surface third. Sample `i` sits at exit-local x = 16 - 16i, which is
//! where entry third `i` lands once the local X axis is mirrored.

use glam::Vec2;

use super::geometry::rotate;
use super::tiles::TileQuery;
use crate::consts::{PORTAL_SURFACE_HALF_WIDTH, PORTAL_THIRDS, SURFACE_CLEARANCE, TILE_SIZE};
use crate::settings::ObstructionPolicy;

/// Solidity of the three exit samples, taken fresh every query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileSample {
    pub obstructed: [bool; PORTAL_THIRDS],
}

impl TileSample {
    pub fn all(&self) -> bool {
        self.obstructed.iter().all(|&b| b)
    }

    pub fn third(&self, index: usize) -> bool {
        self.obstructed.get(index).copied().unwrap_or(true)
    }
}

/// World positions of the exit samples for a portal
pub fn sample_points(center: Vec2, angle: f32) -> [Vec2; PORTAL_THIRDS] {
    let up = rotate(Vec2::new(0.0, SURFACE_CLEARANCE), angle);
    let left = rotate(Vec2::new(TILE_SIZE, 0.0), angle);
    [center + up + left, center + up, center + up - left]
}

/// Query the tiles in front of an exit surface
pub fn sample_exit_surface<T>(tiles: &T, center: Vec2, angle: f32) -> TileSample
where
    T: TileQuery + ?Sized,
{
    let mut sample = TileSample::default();
    for (slot, point) in sample.obstructed.iter_mut().zip(sample_points(center, angle)) {
        *slot = tiles.tile_at(point).blocks();
    }
    sample
}

/// An entity's horizontal extent in entry-local space, measured in surface thirds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub left: f32,
    pub right: f32,
}

impl Footprint {
    pub fn from_local(local_x: f32, width: f32) -> Self {
        let half = width / 2.0;
        Self {
            left: (local_x - half + PORTAL_SURFACE_HALF_WIDTH) / TILE_SIZE,
            right: (local_x + half + PORTAL_SURFACE_HALF_WIDTH) / TILE_SIZE,
        }
    }

    /// Either edge would hang off the surface
    pub fn off_surface(&self) -> bool {
        self.left <= 0.0 || self.right >= PORTAL_THIRDS as f32
    }
}

/// Why a pass through the exit was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blockage {
    /// Every sample is solid
    WholeSurface,
    /// The entity would clip past the surface ends
    OffSurface,
    /// One of the thirds under the entity's edges is solid
    Third(usize),
}

/// Apply an obstruction policy to a fresh sample
pub fn check(
    policy: ObstructionPolicy,
    sample: &TileSample,
    footprint: Footprint,
) -> Option<Blockage> {
    if sample.all() {
        return Some(Blockage::WholeSurface);
    }

    match policy {
        ObstructionPolicy::WholeSurface => None,
        ObstructionPolicy::Footprint => {
            if footprint.off_surface() {
                return Some(Blockage::OffSurface);
            }
            [footprint.left as usize, footprint.right as usize]
                .into_iter()
                .find(|&third| sample.third(third))
                .map(Blockage::Third)
        }
    }
}
