#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reactive enemy controller that turns movement outcomes into turn and fire commands.
//!
//! The controller is memoryless: every tick it inspects the movement events the
//! world emitted for each enemy and draws fresh decisions from an injected
//! [`DecisionSource`]. Draw order per enemy is fixed so that seeded games replay
//! exactly.

use std::collections::VecDeque;

use battle_city_core::{Command, Direction, Event, TankId, TankSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Probability that an unobstructed enemy picks a new heading on a given tick.
pub const WANDER_CHANCE: f64 = 0.01;

/// Probability that an enemy fires on a given tick.
pub const FIRE_CHANCE: f64 = 0.01;

/// Supplies the random draws the enemy controller consumes.
pub trait DecisionSource {
    /// Uniform sample from `[0, 1)`.
    fn chance(&mut self) -> f64;

    /// Uniformly chosen cardinal direction.
    fn direction(&mut self) -> Direction;
}

/// Decision source backed by a random number generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ChaCha8Rng> {
    /// Creates a ChaCha8-backed source seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> DecisionSource for RngSource<R> {
    fn chance(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn direction(&mut self) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }
}

/// Decision source replaying predetermined draws.
///
/// Once a queue runs dry the source answers `1.0` for chances and
/// [`Direction::Up`] for directions, so nothing further triggers.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    chances: VecDeque<f64>,
    directions: VecDeque<Direction>,
}

impl ScriptedSource {
    /// Creates a source that replays the provided draws in order.
    #[must_use]
    pub fn new<C, D>(chances: C, directions: D) -> Self
    where
        C: IntoIterator<Item = f64>,
        D: IntoIterator<Item = Direction>,
    {
        Self {
            chances: chances.into_iter().collect(),
            directions: directions.into_iter().collect(),
        }
    }

    /// Number of chance draws not consumed yet.
    #[must_use]
    pub fn remaining_chances(&self) -> usize {
        self.chances.len()
    }

    /// Number of direction draws not consumed yet.
    #[must_use]
    pub fn remaining_directions(&self) -> usize {
        self.directions.len()
    }
}

impl DecisionSource for ScriptedSource {
    fn chance(&mut self) -> f64 {
        self.chances.pop_front().unwrap_or(1.0)
    }

    fn direction(&mut self) -> Direction {
        self.directions.pop_front().unwrap_or(Direction::Up)
    }
}

/// Configuration parameters required to construct the enemy controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    wander_chance: f64,
    fire_chance: f64,
}

impl Config {
    /// Creates a new configuration using the provided per-tick probabilities.
    #[must_use]
    pub const fn new(wander_chance: f64, fire_chance: f64) -> Self {
        Self {
            wander_chance,
            fire_chance,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(WANDER_CHANCE, FIRE_CHANCE)
    }
}

/// Pure system that steers and fires enemy tanks.
#[derive(Debug, Default)]
pub struct EnemyAi {
    config: Config,
}

impl EnemyAi {
    /// Creates a new controller using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes the tick's movement events and emits enemy commands.
    ///
    /// `enemies` lists the live enemy roster in order. For each enemy a blocked
    /// move forces a new heading, otherwise the heading changes with the wander
    /// probability; a fire decision is drawn afterwards in both cases.
    pub fn handle<S>(
        &mut self,
        events: &[Event],
        enemies: &[TankSnapshot],
        source: &mut S,
        out: &mut Vec<Command>,
    ) where
        S: DecisionSource + ?Sized,
    {
        for enemy in enemies {
            let tank = enemy.id;
            if was_blocked(events, tank) || source.chance() < self.config.wander_chance {
                out.push(Command::TurnTank {
                    tank,
                    direction: source.direction(),
                });
            }

            if source.chance() < self.config.fire_chance {
                out.push(Command::Fire { tank });
            }
        }
    }
}

fn was_blocked(events: &[Event], tank: TankId) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::TankBlocked { tank: blocked, .. } if *blocked == tank))
}
