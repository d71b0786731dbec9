//! World state and simulation types
//!
//! Portals live in a slot array and refer to each other by id only, so
//! either side can disappear between ticks without dangling links.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::registry::{PortalLink, PortalLookup};
use super::tiles::{Tile, TileGrid, TileKind, TileQuery};
use crate::consts::{BALL_MIN_TIME_LEFT, BALL_SIZE};
use crate::normalize_angle;

/// Slot index of a portal in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortalId(pub u32);

/// A portal surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub id: PortalId,
    pub center: Vec2,
    /// Orientation: local +X runs along the surface, local +Y points out of it
    pub angle: f32,
    /// The linked portal, looked up again on every query
    pub companion: Option<PortalId>,
}

impl Portal {
    pub fn new(id: PortalId, center: Vec2, angle: f32) -> Self {
        Self {
            id,
            center,
            angle: normalize_angle(angle),
            companion: None,
        }
    }
}

/// Snapshot of a ball striking a solid surface this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub impact_point: Vec2,
    /// Unit normal of the struck surface, pointing back toward the ball
    pub normal: Vec2,
    pub entity_size: Vec2,
}

/// A ball moving through a non-solid tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassThroughEvent {
    pub tile: IVec2,
    pub kind: TileKind,
}

/// Ball lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    /// Sitting on a tee, waiting to be hit
    Teed,
    Moving,
    Resting,
}

/// A golf ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Center of the ball
    pub pos: Vec2,
    pub vel: Vec2,
    pub angular_vel: f32,
    pub size: Vec2,
    pub phase: BallPhase,
    /// Ticks until despawn
    pub time_left: u32,
    /// Balls hit by NPCs are allowed to expire
    pub npc_owned: bool,
    /// Damage dealt on contact while moving
    pub damage: u32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            size: Vec2::splat(BALL_SIZE),
            phase: BallPhase::Moving,
            time_left: BALL_MIN_TIME_LEFT,
            npc_owned: false,
            damage: 0,
        }
    }

    /// A ball resting on a tee whose top surface is at `tee_top`
    pub fn on_tee(id: u32, tee_top: Vec2) -> Self {
        let mut ball = Self::new(id, tee_top);
        ball.pos.y -= ball.size.y / 2.0;
        ball.phase = BallPhase::Teed;
        ball
    }

    /// Point just below the ball's bottom edge
    pub fn bottom(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, self.size.y / 2.0 + 0.5)
    }

    pub fn strike(&mut self, vel: Vec2, damage: u32) {
        self.vel = vel;
        self.damage = damage;
        self.phase = BallPhase::Moving;
    }
}

/// Everything the portal core reads: portals, links and tiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "WorldData")]
pub struct World {
    portals: Vec<Option<Portal>>,
    links: Vec<PortalLink>,
    pub tiles: TileGrid,
}

/// Serialized world as read from disk, before slot and angle checks
#[derive(Deserialize)]
struct WorldData {
    portals: Vec<Option<Portal>>,
    #[serde(default)]
    links: Vec<PortalLink>,
    #[serde(default)]
    tiles: TileGrid,
}

impl From<WorldData> for World {
    fn from(data: WorldData) -> Self {
        let portals = data
            .portals
            .into_iter()
            .enumerate()
            .map(|(slot, portal)| {
                let mut portal = portal?;
                if portal.id.0 as usize != slot {
                    log::warn!("Dropping portal {:?} stored in slot {}", portal.id, slot);
                    return None;
                }
                portal.angle = normalize_angle(portal.angle);
                Some(portal)
            })
            .collect();
        Self {
            portals,
            links: data.links,
            tiles: data.tiles,
        }
    }
}

impl World {
    pub fn new(tiles: TileGrid) -> Self {
        Self {
            portals: Vec::new(),
            links: Vec::new(),
            tiles,
        }
    }

    /// Add an unlinked portal
    pub fn spawn_portal(&mut self, center: Vec2, angle: f32) -> PortalId {
        let id = PortalId(self.portals.len() as u32);
        self.portals.push(Some(Portal::new(id, center, angle)));
        id
    }

    /// Add two portals and link them
    pub fn spawn_portal_pair(
        &mut self,
        center_a: Vec2,
        angle_a: f32,
        center_b: Vec2,
        angle_b: f32,
    ) -> (PortalId, PortalId) {
        let a = self.spawn_portal(center_a, angle_a);
        let b = self.spawn_portal(center_b, angle_b);
        self.link(a, b);
        (a, b)
    }

    /// Link two portals (both must exist)
    pub fn link(&mut self, a: PortalId, b: PortalId) -> bool {
        if a == b || self.portal(a).is_none() || self.portal(b).is_none() {
            return false;
        }
        let (stale, kept): (Vec<PortalLink>, Vec<PortalLink>) = std::mem::take(&mut self.links)
            .into_iter()
            .partition(|l| l.involves(a) || l.involves(b));
        self.links = kept;
        for link in stale {
            for id in [link.a, link.b] {
                if let Some(portal) = self.portal_mut(id) {
                    portal.companion = None;
                }
            }
        }
        for (id, companion) in [(a, b), (b, a)] {
            if let Some(portal) = self.portal_mut(id) {
                portal.companion = Some(companion);
            }
        }
        self.links.push(PortalLink { a, b });
        true
    }

    pub fn portal(&self, id: PortalId) -> Option<&Portal> {
        self.portals.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn portal_mut(&mut self, id: PortalId) -> Option<&mut Portal> {
        self.portals.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Remove a portal; its link stays registered but stops resolving
    pub fn remove_portal(&mut self, id: PortalId) -> Option<Portal> {
        self.portals.get_mut(id.0 as usize).and_then(Option::take)
    }

    pub fn move_portal(&mut self, id: PortalId, center: Vec2, angle: f32) -> bool {
        match self.portal_mut(id) {
            Some(portal) => {
                portal.center = center;
                portal.angle = normalize_angle(angle);
                true
            }
            None => false,
        }
    }

    /// Rebuild the link list from the portals' companion ids
    pub fn links_from_companions(&mut self) {
        let mut links: Vec<PortalLink> = self
            .portals
            .iter()
            .flatten()
            .filter_map(|p| p.companion.map(|c| (p.id, c)))
            .filter(|&(a, b)| a != b)
            .map(|(a, b)| PortalLink {
                a: a.min(b),
                b: a.max(b),
            })
            .collect();
        links.sort_by_key(|l| (l.a, l.b));
        links.dedup();
        self.links = links;
    }

    /// Place a tee tile; returns the world point a ball sits on
    pub fn place_tee(&mut self, coords: IVec2) -> Vec2 {
        self.tiles.set(coords, Tile::new(TileKind::Tee));
        (coords.as_vec2() + Vec2::new(0.5, 0.0)) * crate::consts::TILE_SIZE
    }
}

impl PortalLookup for World {
    fn resolve(&self, id: PortalId) -> Option<Portal> {
        self.portal(id).copied()
    }

    fn links(&self) -> &[PortalLink] {
        &self.links
    }
}

impl TileQuery for World {
    fn tile_at(&self, world_pos: Vec2) -> Tile {
        self.tiles.tile_at(world_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_spawn_pair_links_both_ways() {
        let mut world = World::new(TileGrid::new(4, 4));
        let (a, b) = world.spawn_portal_pair(Vec2::ZERO, 0.0, Vec2::new(100.0, 0.0), PI / 2.0);
        assert_eq!(world.portal(a).unwrap().companion, Some(b));
        assert_eq!(world.portal(b).unwrap().companion, Some(a));
        assert_eq!(world.links().len(), 1);
    }

    #[test]
    fn test_remove_keeps_stale_link() {
        let mut world = World::default();
        let (a, b) = world.spawn_portal_pair(Vec2::ZERO, 0.0, Vec2::X, 0.0);
        assert!(world.remove_portal(b).is_some());
        assert!(world.resolve(b).is_none());
        assert!(world.resolve(a).is_some());
        assert_eq!(world.links().len(), 1);
        // Removing again is a no-op
        assert!(world.remove_portal(b).is_none());
    }

    #[test]
    fn test_link_rejects_missing_or_self() {
        let mut world = World::default();
        let a = world.spawn_portal(Vec2::ZERO, 0.0);
        assert!(!world.link(a, a));
        assert!(!world.link(a, PortalId(99)));
        assert!(world.links().is_empty());
    }

    #[test]
    fn test_relink_replaces_old_links() {
        let mut world = World::default();
        let (a, b) = world.spawn_portal_pair(Vec2::ZERO, 0.0, Vec2::X, 0.0);
        let c = world.spawn_portal(Vec2::Y, 0.0);
        assert!(world.link(a, c));
        assert_eq!(world.links(), &[PortalLink { a, b: c }]);
        assert_eq!(world.portal(b).unwrap().companion, None);
    }

    #[test]
    fn test_links_from_companions() {
        let mut world = World::default();
        let (a, b) = world.spawn_portal_pair(Vec2::ZERO, 0.0, Vec2::X, 0.0);
        let (c, d) = world.spawn_portal_pair(Vec2::Y, 0.0, Vec2::ONE, 0.0);
        world.links_from_companions();
        assert_eq!(world.links(), &[PortalLink { a, b }, PortalLink { a: c, b: d }]);
    }

    #[test]
    fn test_links_from_one_sided_companion() {
        let mut world = World::default();
        let a = world.spawn_portal(Vec2::ZERO, 0.0);
        let b = world.spawn_portal(Vec2::X, 0.0);
        // Only the higher id knows about its partner
        world.portal_mut(b).unwrap().companion = Some(a);
        world.links_from_companions();
        assert_eq!(world.links(), &[PortalLink { a, b }]);
    }

    #[test]
    fn test_portal_angle_normalized() {
        let mut world = World::default();
        let a = world.spawn_portal(Vec2::ZERO, 3.0 * PI);
        assert!((world.portal(a).unwrap().angle + PI).abs() < 1e-4);
    }

    #[test]
    fn test_huge_portal_angle_wraps() {
        let mut world = World::default();
        let a = world.spawn_portal(Vec2::ZERO, 4.0e9);
        assert!((-PI..PI).contains(&world.portal(a).unwrap().angle));
        assert!(world.move_portal(a, Vec2::ZERO, -1.0e10));
        assert!((-PI..PI).contains(&world.portal(a).unwrap().angle));
    }

    #[test]
    fn test_loaded_world_checked() {
        let json = r#"{
            "portals": [
                { "id": 0, "center": [0.0, 0.0], "angle": 3.1415927, "companion": 1 },
                { "id": 7, "center": [1.0, 0.0], "angle": 0.0, "companion": 0 }
            ],
            "links": [{ "a": 0, "b": 1 }]
        }"#;
        let world: World = serde_json::from_str(json).unwrap();
        assert_eq!(world.portal(PortalId(0)).unwrap().angle, -PI);
        // Id disagrees with its slot
        assert!(world.portal(PortalId(1)).is_none());
        assert!(world.portal(PortalId(7)).is_none());
        assert_eq!(world.links().len(), 1);
    }

    #[test]
    fn test_ball_on_tee_sits_above_tile() {
        let mut world = World::new(TileGrid::new(8, 8));
        let top = world.place_tee(IVec2::new(2, 5));
        let ball = Ball::on_tee(1, top);
        assert_eq!(ball.phase, BallPhase::Teed);
        assert_eq!(world.tile_at(ball.bottom()).kind, TileKind::Tee);
    }
}
