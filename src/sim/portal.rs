//! Portal pass-through
//!
//! Decides whether a collision landed on a linked portal and, if so, where
//! the ball comes out and how fast. Positions are carried into the entry
//! portal's local frame (+X along the surface, +Y out of it), mirrored on
//! X, pushed clear of the exit surface on Y, and carried back out through
//! the exit portal's frame.

use glam::Vec2;

use super::geometry::{aabb_intersects_segment, reflect, rotate, segment_from_portal};
use super::obstruction::{self, Footprint};
use super::registry::{PortalLookup, PortalPair, enumerate_pairs};
use super::state::{CollisionEvent, Portal};
use super::tiles::TileQuery;
use crate::settings::{LocalOrigin, PortalSettings};

/// Outcome of a portal attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformResult {
    /// The ball went through; the caller must adopt both values
    Passed { position: Vec2, velocity: Vec2 },
    /// No portal applies; fall back to the normal collision response
    NotApplicable,
}

impl TransformResult {
    pub fn passed(&self) -> bool {
        matches!(self, TransformResult::Passed { .. })
    }
}

/// Whether the impact's bounding box touches a portal's surface
pub fn touches_surface(portal: &Portal, collision: &CollisionEvent) -> bool {
    let (start, end) = segment_from_portal(portal.center, portal.angle);
    let top_left = collision.impact_point - collision.entity_size / 2.0;
    aabb_intersects_segment(top_left, collision.entity_size, start, end)
}

/// Runs portal attempts against a world's portals and tiles
pub struct PortalTransform<'w, W: ?Sized> {
    world: &'w W,
    settings: &'w PortalSettings,
}

impl<'w, W> PortalTransform<'w, W>
where
    W: PortalLookup + TileQuery + ?Sized,
{
    pub fn new(world: &'w W, settings: &'w PortalSettings) -> Self {
        Self { world, settings }
    }

    /// Try every portal pair in turn; the first one that accepts the ball wins
    ///
    /// `velocity` is expected to be already reflected off the struck surface.
    pub fn attempt_portal(
        &self,
        position: Vec2,
        velocity: Vec2,
        collision: &CollisionEvent,
    ) -> TransformResult {
        for pair in enumerate_pairs(self.world) {
            if !touches_surface(&pair.entry, collision) {
                continue;
            }
            if let Some(result) = self.try_pair(pair, position, velocity, collision) {
                return result;
            }
        }
        TransformResult::NotApplicable
    }

    fn try_pair(
        &self,
        pair: PortalPair,
        position: Vec2,
        velocity: Vec2,
        collision: &CollisionEvent,
    ) -> Option<TransformResult> {
        let PortalPair { entry, exit } = pair;

        // A near-still ball through a same-facing pair would come out unchanged
        if velocity.length_squared() < self.settings.rest_speed_sq && entry.angle == exit.angle {
            log::trace!("Portal {:?}->{:?}: ball at rest, skipping", entry.id, exit.id);
            return None;
        }

        let origin = match self.settings.local_origin {
            LocalOrigin::ImpactPoint => collision.impact_point,
            LocalOrigin::Position => position,
        };
        let mut local = rotate(origin - entry.center, -entry.angle);

        let sample = obstruction::sample_exit_surface(self.world, exit.center, exit.angle);
        let footprint = Footprint::from_local(local.x, collision.entity_size.x);
        if let Some(blockage) = obstruction::check(self.settings.obstruction, &sample, footprint) {
            log::debug!("Portal {:?}->{:?} blocked: {:?}", entry.id, exit.id, blockage);
            return None;
        }

        // Mirror X so the edge that touched first stays on the same physical side
        local.x = -local.x;
        local.y = self.settings.exit_offset.exit_y(local.y, collision.entity_size.y);
        let position = rotate(local, exit.angle) + exit.center;

        // Undo the bounce, turn through the angle between the portals, then flip
        let unbounced = reflect(velocity, collision.normal.normalize_or_zero());
        let velocity = -rotate(unbounced, exit.angle - entry.angle);

        log::debug!(
            "Portal {:?}->{:?}: pos {:?} vel {:?}",
            entry.id,
            exit.id,
            position,
            velocity
        );
        Some(TransformResult::Passed { position, velocity })
    }
}
