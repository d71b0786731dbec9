//! Portal Putt demo driver
//!
//! Builds a small course with a floor portal and a wall portal, hits a few
//! balls with seeded random swings, and logs what happens.
//!
//! Usage: `portal-putt [settings.json]` (set `RUST_LOG=debug` for per-portal detail)

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use portal_putt::consts::TILE_SIZE;
use portal_putt::sim::{Ball, BallPhase, BounceListener, Tile, TileGrid, TileKind, World, tick_ball};
use portal_putt::{PhysicsProperties, PortalSettings};

const DEMO_SEED: u64 = 0x9017_f00d;
const DEMO_TICKS: u32 = 1200;
const DEMO_BALLS: u32 = 4;

fn build_course(seed: u64) -> World {
    let mut grid = TileGrid::new(48, 24);
    grid.enclose();
    grid.fill(IVec2::new(0, 20), IVec2::new(47, 20), Tile::new(TileKind::Block));
    // Rough patch, then a few random blocks
    grid.fill(IVec2::new(20, 19), IVec2::new(24, 19), Tile::new(TileKind::Foliage));
    grid.scatter(seed, 0.02);
    // Open sky where the balls start
    grid.fill(IVec2::new(1, 5), IVec2::new(46, 6), Tile::EMPTY);
    // Keep the portal mouths and the lane in front of them clear
    grid.fill(IVec2::new(8, 14), IVec2::new(14, 19), Tile::EMPTY);
    grid.fill(IVec2::new(40, 12), IVec2::new(46, 18), Tile::EMPTY);

    let mut world = World::new(grid);
    let floor_y = 20.0 * TILE_SIZE;
    let wall_x = 47.0 * TILE_SIZE;
    world.spawn_portal_pair(
        Vec2::new(11.5 * TILE_SIZE, floor_y),
        PI,
        Vec2::new(wall_x, 15.5 * TILE_SIZE),
        FRAC_PI_2,
    );
    world
}

fn main() {
    env_logger::init();
    log::info!("Portal Putt demo starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => PortalSettings::load(path),
        None => PortalSettings::default(),
    };
    log::info!(
        "Obstruction policy: {}, exit offset: {:?}, origin: {:?}",
        settings.obstruction.as_str(),
        settings.exit_offset,
        settings.local_origin
    );

    let props = PhysicsProperties::default();
    let mut world = build_course(DEMO_SEED);
    let mut rng = Pcg32::seed_from_u64(DEMO_SEED);

    let tee_coords = IVec2::new(4, 19);
    let tee_top = world.place_tee(tee_coords);
    let mut balls: Vec<Ball> = (0..DEMO_BALLS)
        .map(|id| {
            let start = Vec2::new((5.0 + id as f32 * 8.0) * TILE_SIZE, 6.0 * TILE_SIZE);
            let mut ball = Ball::new(id, start);
            let swing = Vec2::new(rng.random_range(-4.0..4.0), rng.random_range(-3.0..1.0));
            ball.strike(swing, 10);
            ball
        })
        .collect();
    balls.push(Ball::on_tee(DEMO_BALLS, tee_top));

    let mut base = BounceListener;
    let mut teleports = 0u32;
    let mut sink = |ball: &Ball| {
        teleports += 1;
        log::info!("Sync ball {} at {:?} moving {:?}", ball.id, ball.pos, ball.vel);
    };

    for tick in 0..DEMO_TICKS {
        // Knock the tee out from under the last ball halfway through
        if tick == DEMO_TICKS / 2 {
            log::info!("Removing tee at {:?}", tee_coords);
            world.tiles.clear(tee_coords);
        }
        balls.retain_mut(|ball| {
            let report = tick_ball(ball, &world, &props, &settings, &mut base, &mut sink);
            if report.expired {
                log::info!("Ball {} expired", ball.id);
            }
            !report.expired
        });
    }

    for ball in &balls {
        let phase = match ball.phase {
            BallPhase::Teed => "teed",
            BallPhase::Moving => "moving",
            BallPhase::Resting => "resting",
        };
        log::info!("Ball {} {} at {:?}", ball.id, phase, ball.pos);
    }
    log::info!("{} syncs over {} ticks", teleports, DEMO_TICKS);
}
