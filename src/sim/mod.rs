//! Simulation module
//!
//! Everything here runs synchronously inside one host tick:
//! - Reads of the world (portals, tiles) never mutate it
//! - Only the ball being stepped is written to
//! - Pair lists and tile samples are rebuilt on every query

pub mod geometry;
pub mod listener;
pub mod obstruction;
pub mod portal;
pub mod registry;
pub mod state;
pub mod step;
pub mod tick;
pub mod tiles;

pub use geometry::{aabb_intersects_segment, reflect, rotate, segment_from_portal};
pub use listener::{BounceListener, ContactListener, PortalListener};
pub use obstruction::{Blockage, Footprint, TileSample};
pub use portal::{PortalTransform, TransformResult};
pub use registry::{PortalLink, PortalLookup, PortalPair, enumerate_pairs};
pub use state::{Ball, BallPhase, CollisionEvent, PassThroughEvent, Portal, PortalId, World};
pub use step::{BallState, step_ball};
pub use tick::{SyncSink, TickReport, tick_ball};
pub use tiles::{Tile, TileGrid, TileKind, TileQuery};
