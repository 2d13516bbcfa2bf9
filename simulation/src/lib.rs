#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step game loop tying the world and the enemy controller together.
//!
//! [`Simulation::step`] advances the game by exactly one tick and publishes a
//! [`Frame`]. Adapters own scheduling; the simulation has no notion of wall
//! clock time.

use battle_city_core::{Command, Event, Frame, PlayState, TankId, TickInput};
use battle_city_system_enemy_ai::{DecisionSource, EnemyAi, RngSource};
use battle_city_world::{self as world, level::Level, query, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Single-player game session driven one tick at a time.
#[derive(Debug)]
pub struct Simulation<S = RngSource<ChaCha8Rng>> {
    world: World,
    enemy_ai: EnemyAi,
    source: S,
    commands: Vec<Command>,
    frame: Frame,
}

impl Simulation {
    /// Creates a session on the classic level with a ChaCha8 source seeded by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_level(Level::classic(), RngSource::seeded(seed))
    }
}

impl<S: DecisionSource> Simulation<S> {
    /// Creates a session on `level` that draws enemy decisions from `source`.
    #[must_use]
    pub fn with_level(level: Level, source: S) -> Self {
        let world = World::from_level(level);
        let frame = query::frame(&world, Vec::new());
        Self {
            world,
            enemy_ai: EnemyAi::default(),
            source,
            commands: Vec::new(),
            frame,
        }
    }

    /// Most recently published frame.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advances the game by one tick using the provided input.
    ///
    /// A restart edge rebuilds the world and publishes the fresh state without
    /// simulating. In a terminal play state nothing is simulated and the
    /// previous state is republished with an empty event list.
    pub fn step(&mut self, input: TickInput) -> Frame {
        let mut events = Vec::new();

        if input.restart {
            world::apply(&mut self.world, Command::Restart, &mut events);
            info!("game restarted");
            self.frame = query::frame(&self.world, events);
            return self.frame.clone();
        }

        if query::play_state(&self.world).is_terminal() {
            self.frame.events.clear();
            return self.frame.clone();
        }

        self.apply(Command::Tick, &mut events);

        if query::player(&self.world).is_some() {
            let tank = TankId::PLAYER;
            if let Some(direction) = input.movement {
                self.apply(Command::TurnTank { tank, direction }, &mut events);
                self.apply(Command::DriveTank { tank }, &mut events);
            }
            if input.fire {
                self.apply(Command::Fire { tank }, &mut events);
            }
        }

        for enemy in query::enemies(&self.world) {
            self.apply(Command::DriveTank { tank: enemy.id }, &mut events);
        }

        self.enemy_ai.handle(
            &events,
            &query::enemies(&self.world),
            &mut self.source,
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        self.apply(Command::AdvanceBullets, &mut events);
        self.apply(Command::ResolveCollisions, &mut events);

        self.report_outcome(&events);
        self.frame = query::frame(&self.world, events);
        self.frame.clone()
    }

    fn apply(&mut self, command: Command, events: &mut Vec<Event>) {
        world::apply(&mut self.world, command, events);
    }

    fn report_outcome(&self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayStateChanged {
                    state: PlayState::Won,
                } => info!(
                    tick = query::tick(&self.world),
                    score = query::score(&self.world),
                    "victory"
                ),
                Event::PlayStateChanged {
                    state: PlayState::GameOver,
                } => info!(
                    tick = query::tick(&self.world),
                    score = query::score(&self.world),
                    "game over"
                ),
                Event::PlayerHit {
                    lives_remaining, ..
                } => debug!(lives = lives_remaining, "player lost a life"),
                _ => {}
            }
        }
    }
}
