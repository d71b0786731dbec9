//! Ball movement against the tile grid
//!
//! Moves one axis at a time in small substeps. Each solid contact is
//! reflected and then handed to the listener, which may damp the ball or
//! send it somewhere else entirely.

use glam::Vec2;

use super::geometry::reflect;
use super::listener::ContactListener;
use super::state::{Ball, CollisionEvent, PassThroughEvent};
use super::tiles::{TileKind, TileQuery, tile_coords};
use crate::consts::{MAX_SUBSTEPS, TILE_SIZE};
use crate::settings::PhysicsProperties;

/// What the step left the ball doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    Moving,
    Resting,
}

/// Whether solid ground is directly under the ball
pub fn grounded<T: TileQuery + ?Sized>(ball: &Ball, tiles: &T) -> bool {
    tiles.tile_at(ball.bottom()).blocks()
}

/// Advance a ball by one tick
pub fn step_ball<T, L>(
    props: &PhysicsProperties,
    ball: &mut Ball,
    tiles: &T,
    listener: &mut L,
) -> BallState
where
    T: TileQuery + ?Sized,
    L: ContactListener + ?Sized,
{
    ball.vel.y += props.gravity;

    let fastest = ball.vel.abs().max_element();
    let substeps = ((fastest / (TILE_SIZE * 0.5)).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let half = ball.size / 2.0;

    'substeps: for _ in 0..substeps {
        let delta = ball.vel / substeps as f32;

        for axis in [Vec2::X, Vec2::Y] {
            let along = delta.dot(axis);
            if along == 0.0 {
                continue;
            }
            let sign = along.signum();
            let next = ball.pos + axis * along;
            let leading = next + axis * sign * half.dot(axis);

            if !tiles.tile_at(leading).blocks() {
                ball.pos = next;
                continue;
            }

            // Snap flush against the struck tile face
            let cell = tile_coords(leading).as_vec2().dot(axis);
            let face = if sign > 0.0 { cell * TILE_SIZE } else { (cell + 1.0) * TILE_SIZE };
            let mut impact = ball.pos;
            if axis == Vec2::X {
                impact.x = face;
                ball.pos.x = face - sign * half.x;
            } else {
                impact.y = face;
                ball.pos.y = face - sign * half.y;
            }

            let normal = -axis * sign;
            ball.vel = reflect(ball.vel, normal);
            let collision = CollisionEvent {
                impact_point: impact,
                normal,
                entity_size: ball.size,
            };
            listener.on_collision(props, &mut ball.pos, &mut ball.vel, &collision);
            // The listener may have moved the ball; finish the tick from there
            break 'substeps;
        }
    }

    let tile = tiles.tile_at(ball.pos);
    if tile.active && tile.kind == TileKind::Foliage {
        let pass = PassThroughEvent {
            tile: tile_coords(ball.pos),
            kind: tile.kind,
        };
        listener.on_pass_through(props, &mut ball.pos, &mut ball.vel, &mut ball.angular_vel, &pass);
    }

    if grounded(ball, tiles) {
        ball.vel.x *= props.ground_friction;
        ball.angular_vel = ball.vel.x / half.x.max(f32::EPSILON);
        if ball.vel.length_squared() < props.rest_speed_sq {
            ball.vel = Vec2::ZERO;
            ball.angular_vel = 0.0;
            return BallState::Resting;
        }
    }

    BallState::Moving
}
