#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Battle City adapters.
//!
//! Backends never inspect the world. They receive a [`Scene`] built from the
//! simulation's [`Frame`] and report player input back as [`FrameInput`].

use std::{str::FromStr, time::Duration};

use anyhow::Result as AnyResult;
use battle_city_core::{
    Aabb, Direction, Faction, Frame, PlayState, TickInput, WallKind, ARENA_HEIGHT, ARENA_WIDTH,
};
use glam::Vec2;
use thiserror::Error;

/// Height of the score bar drawn above the arena.
pub const HUD_HEIGHT: f32 = 50.0;

/// Height of the strip below the arena that holds the controls line.
pub const FOOTER_HEIGHT: f32 = 30.0;

/// Controls reminder shown below the arena.
pub const CONTROLS_TEXT: &str = "WASD/arrows - move, SPACE - fire, R - restart, Esc - quit";

/// Hint shown on the end-of-game overlay.
pub const RESTART_HINT: &str = "Press R to restart";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Colors used by primitive drawing when sprites are unavailable.
pub mod palette {
    use super::Color;
    use battle_city_core::{Faction, WallKind};

    /// Arena background.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0, 0, 0);
    /// Text drawn on the HUD and overlays.
    pub const TEXT: Color = Color::from_rgb_u8(255, 255, 255);
    /// Score bar fill.
    pub const HUD_BAR: Color = Color::from_rgb_u8(50, 50, 50);
    /// Tank barrel fill.
    pub const BARREL: Color = Color::from_rgb_u8(51, 51, 51);
    /// Player tank body.
    pub const PLAYER: Color = Color::from_rgb_u8(76, 175, 80);
    /// Enemy tank body.
    pub const ENEMY: Color = Color::from_rgb_u8(255, 82, 82);
    /// Bullets fired by the player.
    pub const PLAYER_BULLET: Color = Color::from_rgb_u8(255, 204, 0);
    /// Bullets fired by enemies.
    pub const ENEMY_BULLET: Color = ENEMY;
    /// Dimming layer drawn over the arena once a game ends.
    pub const OVERLAY: Color = BACKGROUND.with_alpha(180.0 / 255.0);

    /// Fill used for a wall of the provided kind.
    #[must_use]
    pub const fn wall(kind: WallKind) -> Color {
        match kind {
            WallKind::Brick => Color::from_rgb_u8(139, 69, 19),
            WallKind::Steel => Color::from_rgb_u8(85, 85, 85),
            WallKind::Forest => Color::from_rgb_u8(34, 139, 34),
            WallKind::Water => Color::from_rgb_u8(30, 144, 255),
        }
    }

    /// Body fill for a tank of the provided faction.
    #[must_use]
    pub const fn tank(faction: Faction) -> Color {
        match faction {
            Faction::Player => PLAYER,
            Faction::Enemy => ENEMY,
        }
    }

    /// Fill for a bullet owned by the provided faction.
    #[must_use]
    pub const fn bullet(faction: Faction) -> Color {
        match faction {
            Faction::Player => PLAYER_BULLET,
            Faction::Enemy => ENEMY_BULLET,
        }
    }
}

/// Axis-aligned rectangle expressed in arena units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its corner and extent.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Converts a simulation bounding box into a rectangle.
    #[must_use]
    pub fn from_aabb(bounds: &Aabb) -> Self {
        let origin = bounds.origin();
        Self::new(
            Vec2::new(origin.x, origin.y),
            Vec2::new(bounds.width(), bounds.height()),
        )
    }

    /// Returns the rectangle shifted by `offset`.
    #[must_use]
    pub fn translated(self, offset: Vec2) -> Self {
        Self::new(self.origin + offset, self.size)
    }
}

/// Barrel drawn on top of a tank body when no sprite is available.
#[must_use]
pub fn barrel_rect(body: &Rect, direction: Direction) -> Rect {
    const LENGTH: f32 = 12.0;
    const WIDTH: f32 = 4.0;
    const OVERHANG: f32 = 8.0;

    let Vec2 { x, y } = body.origin;
    let Vec2 { x: w, y: h } = body.size;
    match direction {
        Direction::Up => Rect::new(
            Vec2::new(x + w / 2.0 - WIDTH / 2.0, y - OVERHANG),
            Vec2::new(WIDTH, LENGTH),
        ),
        Direction::Right => Rect::new(
            Vec2::new(x + w, y + h / 2.0 - WIDTH / 2.0),
            Vec2::new(LENGTH, WIDTH),
        ),
        Direction::Down => Rect::new(
            Vec2::new(x + w / 2.0 - WIDTH / 2.0, y + h),
            Vec2::new(WIDTH, LENGTH),
        ),
        Direction::Left => Rect::new(
            Vec2::new(x - LENGTH, y + h / 2.0 - WIDTH / 2.0),
            Vec2::new(LENGTH, WIDTH),
        ),
    }
}

/// Number of frames laid out horizontally in the tank sprite sheet.
pub const TANK_SHEET_FRAMES: u32 = 4;

/// Index of the tank sprite sheet frame facing `direction`.
#[must_use]
pub const fn tank_sprite_frame(direction: Direction) -> u32 {
    match direction {
        Direction::Right => 0,
        Direction::Left => 1,
        Direction::Up => 2,
        Direction::Down => 3,
    }
}

/// Identifies textures loaded from the sprite manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Tank sprite sheet shared by both factions.
    Tank,
    /// Brick wall tile.
    Brick,
    /// Steel wall tile.
    Steel,
    /// Forest tile.
    Forest,
    /// Water tile.
    Water,
}

impl SpriteKey {
    /// Every sprite key in manifest order.
    pub const ALL: [SpriteKey; 5] = [
        SpriteKey::Tank,
        SpriteKey::Brick,
        SpriteKey::Steel,
        SpriteKey::Forest,
        SpriteKey::Water,
    ];

    /// Sprite used for walls of the provided kind.
    #[must_use]
    pub const fn for_wall(kind: WallKind) -> Self {
        match kind {
            WallKind::Brick => Self::Brick,
            WallKind::Steel => Self::Steel,
            WallKind::Forest => Self::Forest,
            WallKind::Water => Self::Water,
        }
    }

    /// Name used for the key in sprite manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tank => "Tank",
            Self::Brick => "Brick",
            Self::Steel => "Steel",
            Self::Forest => "Forest",
            Self::Water => "Water",
        }
    }
}

impl FromStr for SpriteKey {
    type Err = RenderingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .ok_or_else(|| RenderingError::UnknownSprite {
                name: name.to_owned(),
            })
    }
}

/// Wall tile placed in the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneWall {
    /// Material of the wall.
    pub kind: WallKind,
    /// Area covered by the wall.
    pub rect: Rect,
}

/// Tank drawn in the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTank {
    /// Side the tank fights for.
    pub faction: Faction,
    /// Heading of the tank.
    pub direction: Direction,
    /// Area covered by the tank body.
    pub body: Rect,
    /// Barrel drawn when falling back to primitives.
    pub barrel: Rect,
}

impl SceneTank {
    /// Body fill used by primitive drawing.
    #[must_use]
    pub const fn color(&self) -> Color {
        palette::tank(self.faction)
    }

    /// Sprite sheet frame matching the tank's heading.
    #[must_use]
    pub const fn sprite_frame(&self) -> u32 {
        tank_sprite_frame(self.direction)
    }
}

/// Bullet drawn in the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBullet {
    /// Faction that fired the bullet.
    pub owner: Faction,
    /// Area covered by the bullet.
    pub rect: Rect,
}

impl SceneBullet {
    /// Fill used for the bullet.
    #[must_use]
    pub const fn color(&self) -> Color {
        palette::bullet(self.owner)
    }
}

/// Message shown over the arena once a game has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// The player ran out of lives.
    GameOver,
    /// Every enemy was destroyed.
    Victory,
}

impl Banner {
    /// Banner matching a play state, if the state is terminal.
    #[must_use]
    pub const fn for_state(state: PlayState) -> Option<Self> {
        match state {
            PlayState::Playing => None,
            PlayState::GameOver => Some(Self::GameOver),
            PlayState::Won => Some(Self::Victory),
        }
    }

    /// Headline text of the banner.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::GameOver => "GAME OVER",
            Self::Victory => "VICTORY!",
        }
    }

    /// Color of the headline text.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::GameOver => palette::ENEMY,
            Self::Victory => palette::PLAYER,
        }
    }
}

/// Heads-up display content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Current score.
    pub score: u32,
    /// Lives the player has left.
    pub lives: u32,
    /// End-of-game banner, if any.
    pub banner: Option<Banner>,
}

impl Hud {
    /// Label shown on the left of the score bar.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// Label shown on the right of the score bar.
    #[must_use]
    pub fn lives_label(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}

/// Scene description of the arena and HUD, expressed in arena units.
///
/// Arena coordinates start at the top-left corner of the playfield; backends
/// offset them by [`HUD_HEIGHT`] when composing the window.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width and height of the arena.
    pub arena: Vec2,
    /// Standing walls, drawn first.
    pub walls: Vec<SceneWall>,
    /// Active bullets, drawn over walls.
    pub bullets: Vec<SceneBullet>,
    /// Live tanks, player first, drawn last.
    pub tanks: Vec<SceneTank>,
    /// Score bar and overlay content.
    pub hud: Hud,
}

impl Scene {
    /// Builds a scene describing the provided frame.
    #[must_use]
    pub fn from_frame(frame: &Frame) -> Self {
        let mut scene = Self {
            arena: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            walls: Vec::with_capacity(frame.walls.len()),
            bullets: Vec::with_capacity(frame.bullets.len()),
            tanks: Vec::with_capacity(frame.enemies.len() + 1),
            hud: Hud {
                score: 0,
                lives: 0,
                banner: None,
            },
        };
        scene.refresh(frame);
        scene
    }

    /// Rewrites the scene in place to describe `frame`, reusing allocations.
    pub fn refresh(&mut self, frame: &Frame) {
        self.walls.clear();
        self.walls.extend(frame.walls.iter().map(|wall| SceneWall {
            kind: wall.kind,
            rect: Rect::from_aabb(&wall.bounds()),
        }));

        self.bullets.clear();
        self.bullets
            .extend(frame.bullets.iter().map(|bullet| SceneBullet {
                owner: bullet.owner,
                rect: Rect::from_aabb(&bullet.bounds),
            }));

        self.tanks.clear();
        self.tanks.extend(frame.tanks().map(|tank| {
            let body = Rect::from_aabb(&tank.bounds);
            SceneTank {
                faction: tank.faction,
                direction: tank.direction,
                body,
                barrel: barrel_rect(&body, tank.direction),
            }
        }));

        self.hud = Hud {
            score: frame.score,
            lives: frame.lives,
            banner: Banner::for_state(frame.play_state),
        };
    }

    /// Width of the window content.
    #[must_use]
    pub fn total_width(&self) -> f32 {
        self.arena.x
    }

    /// Height of the window content including the HUD and footer.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        HUD_HEIGHT + self.arena.y + FOOTER_HEIGHT
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Movement key that should drive the player, if any.
    pub movement: Option<Direction>,
    /// Whether the fire control was pressed on this frame.
    pub fire: bool,
    /// Whether the restart control was pressed on this frame.
    pub restart: bool,
}

impl FrameInput {
    /// Converts the frame's input into the simulation's per-tick contract.
    #[must_use]
    pub const fn tick_input(&self) -> TickInput {
        TickInput {
            movement: self.movement,
            fire: self.fire,
            restart: self.restart,
        }
    }
}

/// Converts a sampled button level into press edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEdge {
    held: bool,
}

impl ButtonEdge {
    /// Records the current level and reports whether the button was just pressed.
    pub fn observe(&mut self, down: bool) -> bool {
        let pressed = down && !self.held;
        self.held = down;
        pressed
    }
}

/// Tracks held movement keys so that the most recently pressed one wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldDirections {
    stack: Vec<Direction>,
}

impl HeldDirections {
    /// Records the level of the key mapped to `direction`.
    pub fn observe(&mut self, direction: Direction, down: bool) {
        let held = self.stack.contains(&direction);
        if down && !held {
            self.stack.push(direction);
        } else if !down && held {
            self.stack.retain(|candidate| *candidate != direction);
        }
    }

    /// Direction of the most recently pressed key still held.
    #[must_use]
    pub fn current(&self) -> Option<Direction> {
        self.stack.last().copied()
    }
}

/// Rendering backend capable of presenting Battle City scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// A sprite manifest named a key that does not exist.
    #[error("unknown sprite key `{name}`")]
    UnknownSprite {
        /// Name found in the manifest.
        name: String,
    },
    /// A sprite manifest declared a format version this build cannot read.
    #[error("unsupported sprite manifest version {found}; expected {expected}")]
    UnsupportedManifestVersion {
        /// Version declared by the manifest.
        found: u32,
        /// Version understood by this build.
        expected: u32,
    },
}
