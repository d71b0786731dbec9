//! Ball contact listeners
//!
//! The physics step reports contacts to a `ContactListener`. `PortalListener`
//! wraps another listener: collisions go through a portal when one applies
//! and reach the wrapped listener otherwise.

use glam::Vec2;

use super::portal::{PortalTransform, TransformResult};
use super::registry::PortalLookup;
use super::state::{CollisionEvent, PassThroughEvent};
use super::tiles::TileQuery;
use crate::settings::{PhysicsProperties, PortalSettings};

/// Responds to ball contacts by adjusting motion in place
pub trait ContactListener {
    /// The ball struck a solid surface; `velocity` is already reflected
    fn on_collision(
        &mut self,
        props: &PhysicsProperties,
        position: &mut Vec2,
        velocity: &mut Vec2,
        collision: &CollisionEvent,
    );

    /// The ball moved through a non-solid tile
    fn on_pass_through(
        &mut self,
        props: &PhysicsProperties,
        position: &mut Vec2,
        velocity: &mut Vec2,
        angular_velocity: &mut f32,
        pass: &PassThroughEvent,
    );
}

impl<L: ContactListener + ?Sized> ContactListener for &mut L {
    fn on_collision(
        &mut self,
        props: &PhysicsProperties,
        position: &mut Vec2,
        velocity: &mut Vec2,
        collision: &CollisionEvent,
    ) {
        (**self).on_collision(props, position, velocity, collision);
    }

    fn on_pass_through(
        &mut self,
        props: &PhysicsProperties,
        position: &mut Vec2,
        velocity: &mut Vec2,
        angular_velocity: &mut f32,
        pass: &PassThroughEvent,
    ) {
        (**self).on_pass_through(props, position, velocity, angular_velocity, pass);
    }
}

/// Plain bounce: loses speed on impact, drags through foliage
#[derive(Debug, Clone, Copy, Default)]
pub struct BounceListener;

impl ContactListener for BounceListener {
    fn on_collision(
        &mut self,
        props: &PhysicsProperties,
        _position: &mut Vec2,
        velocity: &mut Vec2,
        _collision: &CollisionEvent,
    ) {
        *velocity *= props.restitution;
    }

    fn on_pass_through(
        &mut self,
        props: &PhysicsProperties,
        _position: &mut Vec2,
        velocity: &mut Vec2,
        angular_velocity: &mut f32,
        _pass: &PassThroughEvent,
    ) {
        *velocity *= props.pass_through_drag;
        *angular_velocity *= props.pass_through_drag;
    }
}

/// Tries a portal pass before falling back to the wrapped listener
pub struct PortalListener<'w, L, W: ?Sized> {
    wrapped: L,
    portals: PortalTransform<'w, W>,
    need_net_sync: bool,
}

impl<'w, L, W> PortalListener<'w, L, W>
where
    L: ContactListener,
    W: PortalLookup + TileQuery + ?Sized,
{
    pub fn new(wrapped: L, world: &'w W, settings: &'w PortalSettings) -> Self {
        Self {
            wrapped,
            portals: PortalTransform::new(world, settings),
            need_net_sync: false,
        }
    }

    /// A portal moved the ball since the last reset
    pub fn need_net_sync(&self) -> bool {
        self.need_net_sync
    }

    pub fn reset_sync(&mut self) {
        self.need_net_sync = false;
    }

    pub fn into_inner(self) -> L {
        self.wrapped
    }
}

impl<L, W> ContactListener for PortalListener<'_, L, W>
where
    L: ContactListener,
    W: PortalLookup + TileQuery + ?Sized,
{
    fn on_collision(
        &mut self,
        props: &PhysicsProperties,
        position: &mut Vec2,
        velocity: &mut Vec2,
        collision: &CollisionEvent,
    ) {
        match self.portals.attempt_portal(*position, *velocity, collision) {
            TransformResult::Passed {
                position: new_position,
                velocity: new_velocity,
            } => {
                *position = new_position;
                *velocity = new_velocity;
                self.need_net_sync = true;
            }
            TransformResult::NotApplicable => {
                self.wrapped.on_collision(props, position, velocity, collision);
            }
        }
    }

    // Portals never intercept pass-throughs
    fn on_pass_through(
        &mut self,
        props: &PhysicsProperties,
        position: &mut Vec2,
        velocity: &mut Vec2,
        angular_velocity: &mut f32,
        pass: &PassThroughEvent,
    ) {
        self.wrapped
            .on_pass_through(props, position, velocity, angular_velocity, pass);
    }
}
