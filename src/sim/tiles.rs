//! Tile grid and the tile query used by the portal checks

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// What a tile is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid terrain
    #[default]
    Block,
    /// Golf tee a ball can sit on
    Tee,
    /// Grass and other non-solid clutter a ball rolls through
    Foliage,
}

impl TileKind {
    pub fn is_solid(&self) -> bool {
        matches!(self, TileKind::Block)
    }
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub active: bool,
    pub kind: TileKind,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        active: false,
        kind: TileKind::Block,
    };

    pub fn new(kind: TileKind) -> Self {
        Self { active: true, kind }
    }

    /// Active and solid
    #[inline]
    pub fn blocks(&self) -> bool {
        self.active && self.kind.is_solid()
    }
}

/// Read-only tile lookup by world position
///
/// Out-of-range positions must yield an inactive tile, never panic.
pub trait TileQuery {
    fn tile_at(&self, world_pos: Vec2) -> Tile;
}

/// Convert a world position to the coordinates of the tile containing it
#[inline]
pub fn tile_coords(world_pos: Vec2) -> IVec2 {
    (world_pos / TILE_SIZE).floor().as_ivec2()
}

/// Row-major grid of tiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            tiles: vec![Tile::EMPTY; (width * height) as usize],
        }
    }

    fn index(&self, coords: IVec2) -> Option<usize> {
        if coords.x < 0 || coords.y < 0 || coords.x >= self.width || coords.y >= self.height {
            return None;
        }
        Some((coords.y * self.width + coords.x) as usize)
    }

    /// Tile at grid coordinates, inactive when out of range
    pub fn get_safely(&self, coords: IVec2) -> Tile {
        self.index(coords)
            .and_then(|i| self.tiles.get(i).copied())
            .unwrap_or(Tile::EMPTY)
    }

    /// Overwrite a tile; out-of-range writes are ignored
    pub fn set(&mut self, coords: IVec2, tile: Tile) {
        if let Some(slot) = self.index(coords).and_then(|i| self.tiles.get_mut(i)) {
            *slot = tile;
        }
    }

    pub fn clear(&mut self, coords: IVec2) {
        self.set(coords, Tile::EMPTY);
    }

    /// Fill an inclusive rectangle of grid cells
    pub fn fill(&mut self, from: IVec2, to: IVec2, tile: Tile) {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.set(IVec2::new(x, y), tile);
            }
        }
    }

    /// Solid walls around the grid's border
    pub fn enclose(&mut self) {
        let block = Tile::new(TileKind::Block);
        let max = IVec2::new(self.width - 1, self.height - 1);
        self.fill(IVec2::ZERO, IVec2::new(max.x, 0), block);
        self.fill(IVec2::new(0, max.y), max, block);
        self.fill(IVec2::ZERO, IVec2::new(0, max.y), block);
        self.fill(IVec2::new(max.x, 0), max, block);
    }

    /// Sprinkle solid blocks over empty interior cells (deterministic per seed)
    pub fn scatter(&mut self, seed: u64, density: f32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let coords = IVec2::new(x, y);
                if !self.get_safely(coords).active && rng.random::<f32>() < density {
                    self.set(coords, Tile::new(TileKind::Block));
                }
            }
        }
    }
}

impl TileQuery for TileGrid {
    fn tile_at(&self, world_pos: Vec2) -> Tile {
        self.get_safely(tile_coords(world_pos))
    }
}
