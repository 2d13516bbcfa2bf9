//! Static level terrain: wall storage, overlap queries and brick destruction.

use battle_city_core::{Aabb, TileCoord, WallId, WallKind, WallSnapshot, TILE_LENGTH};

/// Single tile-aligned wall standing in the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    id: WallId,
    kind: WallKind,
    tile: TileCoord,
}

impl Wall {
    /// Creates a wall of the provided kind occupying `tile`.
    #[must_use]
    pub const fn new(id: WallId, kind: WallKind, tile: TileCoord) -> Self {
        Self { id, kind, tile }
    }

    /// Identifier assigned when the terrain was built.
    #[must_use]
    pub const fn id(&self) -> WallId {
        self.id
    }

    /// Material of the wall.
    #[must_use]
    pub const fn kind(&self) -> WallKind {
        self.kind
    }

    /// Tile occupied by the wall.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Bounding box covering the wall's tile.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.tile.origin(), TILE_LENGTH)
    }

    /// Immutable representation of the wall for frames.
    #[must_use]
    pub const fn snapshot(&self) -> WallSnapshot {
        WallSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
        }
    }
}

/// Collection of standing walls.
#[derive(Clone, Debug, Default)]
pub struct Terrain {
    walls: Vec<Wall>,
}

impl Terrain {
    /// Builds terrain from `(tile, kind)` pairs, numbering walls in order.
    #[must_use]
    pub fn from_tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = (TileCoord, WallKind)>,
    {
        let walls = tiles
            .into_iter()
            .enumerate()
            .map(|(index, (tile, kind))| Wall::new(WallId::new(index as u32), kind, tile))
            .collect();
        Self { walls }
    }

    /// Standing walls in construction order.
    #[must_use]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Number of standing walls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Reports whether every wall has been destroyed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Returns the first wall of any kind overlapping `rect`.
    #[must_use]
    pub fn wall_at(&self, rect: &Aabb) -> Option<&Wall> {
        self.blocking_wall(rect, |_| true)
    }

    /// Returns the first wall overlapping `rect` whose kind satisfies `blocks`.
    #[must_use]
    pub fn blocking_wall<F>(&self, rect: &Aabb, blocks: F) -> Option<&Wall>
    where
        F: Fn(WallKind) -> bool,
    {
        self.walls
            .iter()
            .find(|wall| blocks(wall.kind) && wall.bounds().overlaps(rect))
    }

    /// Removes the wall with the provided identifier, returning it.
    pub fn destroy(&mut self, id: WallId) -> Option<Wall> {
        let index = self.walls.iter().position(|wall| wall.id == id)?;
        Some(self.walls.remove(index))
    }
}
