#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Battle City engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The simulation submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point and broadcasts [`Event`] values, and systems react
//! to those events by emitting new command batches. Once per tick the
//! simulation publishes a [`Frame`] snapshot that adapters render.

use serde::{Deserialize, Serialize};

/// Title used by adapters when presenting the game.
pub const WINDOW_TITLE: &str = "Battle City";

/// Side length of a single terrain tile in world units.
pub const TILE_LENGTH: f32 = 16.0;

/// Number of tiles along each edge of the square arena.
pub const ARENA_TILES: u32 = 26;

/// Width of the arena in world units.
pub const ARENA_WIDTH: f32 = ARENA_TILES as f32 * TILE_LENGTH;

/// Height of the arena in world units.
pub const ARENA_HEIGHT: f32 = ARENA_TILES as f32 * TILE_LENGTH;

/// Edge length of a tank's square bounding box (one and a half tiles).
pub const TANK_SIZE: f32 = TILE_LENGTH * 1.5;

/// Edge length of a bullet's square bounding box.
pub const BULLET_SIZE: f32 = 6.0;

/// Distance the player tank covers per tick.
pub const PLAYER_SPEED: f32 = 2.0;

/// Distance an enemy tank covers per tick.
pub const ENEMY_SPEED: f32 = 1.0;

/// Distance a bullet covers per tick.
pub const BULLET_SPEED: f32 = 5.0;

/// Score awarded for each destroyed enemy tank.
pub const ENEMY_REWARD: u32 = 100;

/// Lives granted to the player when a game starts.
pub const STARTING_LIVES: u32 = 3;

/// Reference tick rate adapters schedule the simulation at.
pub const TICKS_PER_SECOND: u32 = 60;

/// Cardinal headings available to tanks and bullets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing `y`.
    Up,
    /// Movement toward increasing `x`.
    Right,
    /// Movement toward increasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
}

impl Direction {
    /// Every direction in clockwise order starting from [`Direction::Up`].
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector pointing along the direction, expressed as `(dx, dy)`.
    #[must_use]
    pub const fn unit_vector(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Right => (1.0, 0.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
        }
    }

}

/// Terrain materials that compose the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Blocks tanks and bullets; destroyed by any bullet impact.
    Brick,
    /// Blocks tanks and bullets; never destroyed.
    Steel,
    /// Decoration only; tanks and bullets pass through.
    Forest,
    /// Blocks tanks; bullets fly over it.
    Water,
}

impl WallKind {
    /// Reports whether tanks may not enter the wall.
    #[must_use]
    pub const fn blocks_tanks(self) -> bool {
        match self {
            Self::Brick | Self::Steel | Self::Water => true,
            Self::Forest => false,
        }
    }

    /// Reports whether bullets stop when striking the wall.
    #[must_use]
    pub const fn blocks_bullets(self) -> bool {
        match self {
            Self::Brick | Self::Steel => true,
            Self::Forest | Self::Water => false,
        }
    }

    /// Reports whether a bullet impact removes the wall.
    #[must_use]
    pub const fn is_destructible(self) -> bool {
        matches!(self, Self::Brick)
    }
}

/// Side an actor fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The human-controlled tank and its bullets.
    Player,
    /// AI-controlled tanks and their bullets.
    Enemy,
}

/// Aggregate state of a game in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// The simulation advances every tick.
    Playing,
    /// The player ran out of lives.
    GameOver,
    /// Every enemy tank was destroyed.
    Won,
}

impl PlayState {
    /// Reports whether the state only exits through a restart.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Unique identifier assigned to a tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TankId(u32);

impl TankId {
    /// Identifier reserved for the player tank.
    pub const PLAYER: TankId = TankId(0);

    /// Creates a new tank identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the identifier names the player tank.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a wall when the level is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single terrain tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space position of the tile's top-left corner.
    #[must_use]
    pub fn origin(&self) -> Position {
        Position::new(
            self.column as f32 * TILE_LENGTH,
            self.row as f32 * TILE_LENGTH,
        )
    }
}

/// Continuous world-space coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal component, growing to the right.
    pub x: f32,
    /// Vertical component, growing downward.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the position displaced by `distance` along `direction`.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.unit_vector();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }
}

/// Axis-aligned bounding box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    origin: Position,
    width: f32,
    height: f32,
}

impl Aabb {
    /// Creates a box at `origin` with the provided dimensions.
    #[must_use]
    pub const fn new(origin: Position, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Creates a square box at `origin`.
    #[must_use]
    pub const fn square(origin: Position, size: f32) -> Self {
        Self::new(origin, size, size)
    }

    /// Top-left corner of the box.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Horizontal extent of the box.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the box.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.width
    }

    /// Coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.height
    }

    /// Reports whether the boxes share a region of positive area.
    ///
    /// Boxes that merely touch along an edge or a corner do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }
}

/// Player intent captured for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement key currently held, if any.
    pub movement: Option<Direction>,
    /// Whether the fire control transitioned from released to pressed.
    pub fire: bool,
    /// Whether the restart control transitioned from released to pressed.
    pub restart: bool,
}

impl TickInput {
    /// Input that holds a movement key and nothing else.
    #[must_use]
    pub const fn drive(direction: Direction) -> Self {
        Self {
            movement: Some(direction),
            fire: false,
            restart: false,
        }
    }

    /// Input that presses the fire control and nothing else.
    #[must_use]
    pub const fn fire() -> Self {
        Self {
            movement: None,
            fire: true,
            restart: false,
        }
    }

    /// Input that presses the restart control and nothing else.
    #[must_use]
    pub const fn restart() -> Self {
        Self {
            movement: None,
            fire: false,
            restart: true,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Rebuilds the world from the fixed initial layout.
    Restart,
    /// Marks the start of a new simulation tick.
    Tick,
    /// Points a tank in a new direction without moving it.
    TurnTank {
        /// Tank being turned.
        tank: TankId,
        /// Heading the tank adopts.
        direction: Direction,
    },
    /// Attempts to move a tank one step along its current heading.
    DriveTank {
        /// Tank attempting to move.
        tank: TankId,
    },
    /// Spawns a bullet at the tank's muzzle.
    Fire {
        /// Tank firing the bullet.
        tank: TankId,
    },
    /// Moves every bullet one step along its heading.
    AdvanceBullets,
    /// Detects and resolves bullet impacts against tanks and terrain.
    ResolveCollisions,
}

/// Reason a speculative tank move was rolled back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Obstruction {
    /// The tank would have entered a wall that blocks tanks.
    Wall(WallId),
    /// The tank would have overlapped another tank.
    Tank(TankId),
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that the world was rebuilt from the initial layout.
    WorldReset,
    /// Indicates that the simulation clock advanced.
    TickStarted {
        /// Number of ticks simulated since the last reset, including this one.
        tick: u64,
    },
    /// Confirms that a tank adopted a heading.
    TankTurned {
        /// Tank that turned.
        tank: TankId,
        /// Heading after the turn.
        direction: Direction,
    },
    /// Confirms that a tank's move was accepted.
    TankAdvanced {
        /// Tank that moved.
        tank: TankId,
        /// Position before the move.
        from: Position,
        /// Position after the move, clamped to the arena.
        to: Position,
    },
    /// Reports that a tank's move was rejected and rolled back.
    TankBlocked {
        /// Tank whose move was reverted.
        tank: TankId,
        /// First obstruction found at the attempted position.
        obstruction: Obstruction,
    },
    /// Confirms that a bullet entered play.
    BulletFired {
        /// Identifier allocated to the bullet.
        bullet: BulletId,
        /// Tank that fired the bullet.
        shooter: TankId,
        /// Faction owning the bullet.
        owner: Faction,
    },
    /// Reports that a bullet left the arena.
    BulletLeftArena {
        /// Bullet that left the arena.
        bullet: BulletId,
    },
    /// Reports that a bullet stopped against a wall.
    BulletStopped {
        /// Bullet that stopped.
        bullet: BulletId,
        /// Wall that stopped the bullet.
        wall: WallId,
    },
    /// Reports that a brick wall was destroyed.
    WallDestroyed {
        /// Wall removed from the level.
        wall: WallId,
        /// Tile the wall occupied.
        tile: TileCoord,
    },
    /// Reports that an enemy tank was destroyed by a player bullet.
    EnemyDestroyed {
        /// Tank removed from the roster.
        tank: TankId,
        /// Bullet that struck the tank.
        bullet: BulletId,
    },
    /// Reports that an enemy bullet struck the player.
    PlayerHit {
        /// Bullet that struck the player.
        bullet: BulletId,
        /// Lives left after the hit.
        lives_remaining: u32,
    },
    /// Reports a new score total.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// Reports a transition of the aggregate play state.
    PlayStateChanged {
        /// State entered by the world.
        state: PlayState,
    },
}

/// Immutable representation of a tank used for queries and rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    /// Identifier assigned to the tank.
    pub id: TankId,
    /// Side the tank fights for.
    pub faction: Faction,
    /// Heading of the tank.
    pub direction: Direction,
    /// Bounding box of the tank.
    pub bounds: Aabb,
}

/// Immutable representation of an active bullet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletSnapshot {
    /// Identifier assigned to the bullet.
    pub id: BulletId,
    /// Faction that fired the bullet.
    pub owner: Faction,
    /// Heading of the bullet.
    pub direction: Direction,
    /// Bounding box of the bullet.
    pub bounds: Aabb,
}

/// Immutable representation of a standing wall.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSnapshot {
    /// Identifier assigned to the wall.
    pub id: WallId,
    /// Material of the wall.
    pub kind: WallKind,
    /// Tile occupied by the wall.
    pub tile: TileCoord,
}

impl WallSnapshot {
    /// Bounding box covering the wall's tile.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.tile.origin(), TILE_LENGTH)
    }
}

/// Snapshot published after every simulation step.
///
/// A frame carries everything required for rendering; adapters never reach
/// into the world directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Number of ticks simulated since the last reset.
    pub tick: u64,
    /// Aggregate play state after the step.
    pub play_state: PlayState,
    /// Current score.
    pub score: u32,
    /// Lives the player has left.
    pub lives: u32,
    /// Player tank, absent once the game is lost.
    pub player: Option<TankSnapshot>,
    /// Live enemy tanks in roster order.
    pub enemies: Vec<TankSnapshot>,
    /// Active bullets of both factions.
    pub bullets: Vec<BulletSnapshot>,
    /// Standing walls.
    pub walls: Vec<WallSnapshot>,
    /// Events emitted while producing the frame.
    pub events: Vec<Event>,
}

impl Frame {
    /// Iterator over every live tank, player first.
    pub fn tanks(&self) -> impl Iterator<Item = &TankSnapshot> {
        self.player.iter().chain(self.enemies.iter())
    }
}
