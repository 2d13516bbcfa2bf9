//! Level descriptions: spawn points and terrain layout.

use battle_city_core::{Position, TileCoord, WallKind, ARENA_TILES};

use crate::terrain::Terrain;

/// Interior walls of the classic level as `(column, row, kind)` triples.
pub const CLASSIC_LAYOUT: &[(u32, u32, WallKind)] = &[
    // brick ring in the centre
    (10, 5, WallKind::Brick),
    (11, 5, WallKind::Brick),
    (12, 5, WallKind::Brick),
    (13, 5, WallKind::Brick),
    (14, 5, WallKind::Brick),
    (10, 6, WallKind::Brick),
    (14, 6, WallKind::Brick),
    (10, 7, WallKind::Brick),
    (14, 7, WallKind::Brick),
    (10, 8, WallKind::Brick),
    (11, 8, WallKind::Brick),
    (12, 8, WallKind::Brick),
    (13, 8, WallKind::Brick),
    (14, 8, WallKind::Brick),
    // steel boxes
    (5, 10, WallKind::Steel),
    (6, 10, WallKind::Steel),
    (7, 10, WallKind::Steel),
    (5, 11, WallKind::Steel),
    (7, 11, WallKind::Steel),
    (5, 12, WallKind::Steel),
    (6, 12, WallKind::Steel),
    (7, 12, WallKind::Steel),
    (18, 10, WallKind::Steel),
    (19, 10, WallKind::Steel),
    (20, 10, WallKind::Steel),
    (18, 11, WallKind::Steel),
    (20, 11, WallKind::Steel),
    (18, 12, WallKind::Steel),
    (19, 12, WallKind::Steel),
    (20, 12, WallKind::Steel),
    // forest
    (8, 15, WallKind::Forest),
    (9, 15, WallKind::Forest),
    (10, 15, WallKind::Forest),
    (11, 15, WallKind::Forest),
    (8, 16, WallKind::Forest),
    (9, 16, WallKind::Forest),
    (10, 16, WallKind::Forest),
    (11, 16, WallKind::Forest),
    (8, 17, WallKind::Forest),
    (9, 17, WallKind::Forest),
    (10, 17, WallKind::Forest),
    (11, 17, WallKind::Forest),
    // water
    (14, 15, WallKind::Water),
    (15, 15, WallKind::Water),
    (16, 15, WallKind::Water),
    (17, 15, WallKind::Water),
    (14, 16, WallKind::Water),
    (15, 16, WallKind::Water),
    (16, 16, WallKind::Water),
    (17, 16, WallKind::Water),
    (14, 17, WallKind::Water),
    (15, 17, WallKind::Water),
    (16, 17, WallKind::Water),
    (17, 17, WallKind::Water),
];

/// Tile the player tank spawns on in the classic level.
pub const CLASSIC_PLAYER_SPAWN: TileCoord = TileCoord::new(12, 22);

/// Tiles the enemy tanks spawn on in the classic level.
pub const CLASSIC_ENEMY_SPAWNS: [TileCoord; 4] = [
    TileCoord::new(3, 3),
    TileCoord::new(22, 3),
    TileCoord::new(3, 22),
    TileCoord::new(22, 22),
];

/// Immutable description a world is built and rebuilt from.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    player_spawn: Position,
    enemy_spawns: Vec<Position>,
    walls: Vec<(TileCoord, WallKind)>,
}

impl Level {
    /// The fixed level played by the game.
    #[must_use]
    pub fn classic() -> Self {
        let mut level = Self::bordered();
        level.enemy_spawns = CLASSIC_ENEMY_SPAWNS
            .iter()
            .map(TileCoord::origin)
            .collect();
        level.walls.extend(
            CLASSIC_LAYOUT
                .iter()
                .map(|&(column, row, kind)| (TileCoord::new(column, row), kind)),
        );
        level
    }

    /// A level containing only the steel perimeter and the player spawn.
    #[must_use]
    pub fn bordered() -> Self {
        let mut level = Self::open();
        level
            .walls
            .extend(perimeter_tiles().map(|tile| (tile, WallKind::Steel)));
        level
    }

    /// An empty arena with the player spawn and no walls at all.
    ///
    /// Nothing stops bullets at the arena edge, so they fly out of bounds.
    #[must_use]
    pub fn open() -> Self {
        Self {
            player_spawn: CLASSIC_PLAYER_SPAWN.origin(),
            enemy_spawns: Vec::new(),
            walls: Vec::new(),
        }
    }

    /// Replaces the player's spawn position.
    #[must_use]
    pub fn with_player_spawn(mut self, position: Position) -> Self {
        self.player_spawn = position;
        self
    }

    /// Adds an enemy spawning at `position`.
    #[must_use]
    pub fn with_enemy(mut self, position: Position) -> Self {
        self.enemy_spawns.push(position);
        self
    }

    /// Adds a wall of `kind` on `tile`.
    #[must_use]
    pub fn with_wall(mut self, tile: TileCoord, kind: WallKind) -> Self {
        self.walls.push((tile, kind));
        self
    }

    /// Position the player tank spawns at.
    #[must_use]
    pub const fn player_spawn(&self) -> Position {
        self.player_spawn
    }

    /// Positions enemy tanks spawn at, in roster order.
    #[must_use]
    pub fn enemy_spawns(&self) -> &[Position] {
        &self.enemy_spawns
    }

    /// Walls placed when the level is built.
    #[must_use]
    pub fn walls(&self) -> &[(TileCoord, WallKind)] {
        &self.walls
    }

    pub(crate) fn build_terrain(&self) -> Terrain {
        Terrain::from_tiles(self.walls.iter().copied())
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::classic()
    }
}

fn perimeter_tiles() -> impl Iterator<Item = TileCoord> {
    let last = ARENA_TILES - 1;
    let horizontal = (0..ARENA_TILES)
        .flat_map(move |column| [TileCoord::new(column, 0), TileCoord::new(column, last)]);
    let vertical =
        (1..last).flat_map(move |row| [TileCoord::new(0, row), TileCoord::new(last, row)]);
    horizontal.chain(vertical)
}
