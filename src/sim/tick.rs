//! Per-tick ball update
//!
//! Host-side wiring around the physics step: keeps player balls alive,
//! frees teed balls whose tee went away, runs the step through a
//! `PortalListener`, and tells observers when a ball needs resyncing.

use super::listener::{ContactListener, PortalListener};
use super::registry::PortalLookup;
use super::state::{Ball, BallPhase};
use super::step::{BallState, step_ball};
use super::tiles::{TileKind, TileQuery};
use crate::consts::BALL_MIN_TIME_LEFT;
use crate::settings::{PhysicsProperties, PortalSettings};

/// Receives balls whose state observers must be told about
pub trait SyncSink {
    fn ball_changed(&mut self, ball: &Ball);
}

impl<F: FnMut(&Ball)> SyncSink for F {
    fn ball_changed(&mut self, ball: &Ball) {
        self(ball)
    }
}

/// What happened to a ball this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Observers were notified
    pub synced: bool,
    /// The ball ran out of time and should be despawned
    pub expired: bool,
}

/// Advance one ball by a tick
pub fn tick_ball<W, L, S>(
    ball: &mut Ball,
    world: &W,
    props: &PhysicsProperties,
    settings: &PortalSettings,
    base: &mut L,
    sink: &mut S,
) -> TickReport
where
    W: PortalLookup + TileQuery + ?Sized,
    L: ContactListener + ?Sized,
    S: SyncSink + ?Sized,
{
    ball.time_left = ball.time_left.saturating_sub(1);
    if !ball.npc_owned {
        ball.time_left = ball.time_left.max(BALL_MIN_TIME_LEFT);
    }
    let expired = ball.time_left == 0;

    if ball.phase == BallPhase::Teed {
        let tee = world.tile_at(ball.bottom());
        if tee.active && tee.kind == TileKind::Tee {
            return TickReport { synced: false, expired };
        }
        log::debug!("Ball {} lost its tee", ball.id);
        ball.phase = BallPhase::Moving;
        sink.ball_changed(ball);
        return TickReport { synced: true, expired };
    }

    let mut listener = PortalListener::new(&mut *base, world, settings);
    match step_ball(props, ball, world, &mut listener) {
        BallState::Moving => ball.phase = BallPhase::Moving,
        BallState::Resting => {
            ball.phase = BallPhase::Resting;
            ball.damage = 0;
        }
    }

    let synced = listener.need_net_sync();
    if synced {
        log::debug!("Ball {} went through a portal", ball.id);
        sink.ball_changed(ball);
    }
    TickReport { synced, expired }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::listener::BounceListener;
    use crate::sim::state::World;
    use crate::sim::tiles::{Tile, TileGrid};
    use glam::{IVec2, Vec2};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn room() -> TileGrid {
        let mut grid = TileGrid::new(24, 16);
        grid.enclose();
        grid.fill(IVec2::new(0, 10), IVec2::new(23, 10), Tile::new(TileKind::Block));
        grid
    }

    /// 24x16 room, floor at row 10, portal on the floor and on the right wall
    fn course() -> World {
        let mut world = World::new(room());
        // Floor face at y = 160, wall face at x = 368
        world.spawn_portal_pair(Vec2::new(88.0, 160.0), PI, Vec2::new(368.0, 88.0), FRAC_PI_2);
        world
    }

    /// One tick with default tuning; returns the report and the synced ball ids
    fn run(ball: &mut Ball, world: &World) -> (TickReport, Vec<u32>) {
        let mut synced = Vec::new();
        let mut sink = |b: &Ball| synced.push(b.id);
        let report = tick_ball(
            ball,
            world,
            &PhysicsProperties::default(),
            &PortalSettings::default(),
            &mut BounceListener,
            &mut sink,
        );
        (report, synced)
    }

    #[test]
    fn test_player_ball_kept_alive() {
        let world = course();
        let mut ball = Ball::new(1, Vec2::new(200.0, 100.0));
        ball.time_left = 3;
        let (report, _) = run(&mut ball, &world);
        assert!(!report.expired);
        assert_eq!(ball.time_left, BALL_MIN_TIME_LEFT);
    }

    #[test]
    fn test_npc_ball_expires() {
        let world = course();
        let mut ball = Ball::new(1, Vec2::new(200.0, 100.0));
        ball.npc_owned = true;
        ball.time_left = 1;
        let (report, _) = run(&mut ball, &world);
        assert!(report.expired);
    }

    #[test]
    fn test_teed_ball_waits() {
        let mut world = course();
        let top = world.place_tee(IVec2::new(12, 9));
        let mut ball = Ball::on_tee(1, top);
        let start = ball.pos;

        let (report, synced) = run(&mut ball, &world);
        assert!(!report.synced);
        assert_eq!(ball.phase, BallPhase::Teed);
        assert_eq!(ball.pos, start);
        assert!(synced.is_empty());
    }

    #[test]
    fn test_displaced_tee_frees_ball() {
        let mut world = course();
        let coords = IVec2::new(12, 9);
        let top = world.place_tee(coords);
        let mut ball = Ball::on_tee(7, top);
        world.tiles.clear(coords);

        let (report, synced) = run(&mut ball, &world);
        assert!(report.synced);
        assert_eq!(ball.phase, BallPhase::Moving);
        assert_eq!(synced, vec![7]);
    }

    #[test]
    fn test_floor_portal_sends_ball_out_of_wall() {
        let world = course();
        // Dropping onto the floor portal
        let mut ball = Ball::new(3, Vec2::new(88.0, 150.0));
        ball.strike(Vec2::new(0.0, 8.0), 5);

        let (report, synced) = run(&mut ball, &world);
        assert!(report.synced);
        assert_eq!(synced, vec![3]);
        // Came out in front of the wall, heading away from it at full speed
        assert!(ball.pos.x < 368.0);
        assert!((ball.pos.y - 88.0).abs() < 1e-3);
        assert!(ball.vel.x < 0.0);
        assert!((ball.vel.length() - 8.1).abs() < 1e-3);
    }

    #[test]
    fn test_plain_bounce_not_synced() {
        let world = course();
        let mut ball = Ball::new(3, Vec2::new(200.0, 150.0));
        ball.strike(Vec2::new(0.0, 8.0), 5);

        let (report, synced) = run(&mut ball, &world);
        assert!(!report.synced);
        assert!(synced.is_empty());
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_resting_clears_damage() {
        let world = course();
        let mut ball = Ball::new(3, Vec2::new(200.0, 160.0 - 3.5));
        ball.strike(Vec2::ZERO, 9);

        run(&mut ball, &world);
        assert_eq!(ball.phase, BallPhase::Resting);
        assert_eq!(ball.damage, 0);
    }

    #[test]
    fn test_resting_on_same_angle_portal_stays_put() {
        // Two floor portals facing the same way: a settled ball must not hop between them
        let mut world = World::new(room());
        world.spawn_portal_pair(Vec2::new(88.0, 160.0), PI, Vec2::new(264.0, 160.0), PI);

        let mut ball = Ball::new(3, Vec2::new(88.0, 160.0 - 3.5));
        for _ in 0..5 {
            let (report, _) = run(&mut ball, &world);
            assert!(!report.synced);
        }
        assert!((ball.pos.x - 88.0).abs() < 1e-3);
    }
}
