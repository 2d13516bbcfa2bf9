#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Battle City.

mod actors;
mod collision;
pub mod level;
pub mod terrain;

use battle_city_core::{
    BulletId, Command, Event, Faction, PlayState, TankId, STARTING_LIVES,
};
use tracing::{debug, trace};

use crate::{
    actors::{Bullet, Tank},
    level::Level,
    terrain::Terrain,
};

/// Represents the authoritative Battle City world state.
#[derive(Debug)]
pub struct World {
    level: Level,
    terrain: Terrain,
    player: Option<Tank>,
    enemies: Vec<Tank>,
    player_bullets: Vec<Bullet>,
    enemy_bullets: Vec<Bullet>,
    score: u32,
    lives: u32,
    play_state: PlayState,
    tick: u64,
    next_bullet_id: u32,
}

impl World {
    /// Creates a world populated with the classic level.
    #[must_use]
    pub fn new() -> Self {
        Self::from_level(Level::classic())
    }

    /// Creates a world populated with the provided level.
    ///
    /// The level is retained so that [`Command::Restart`] can rebuild from it.
    #[must_use]
    pub fn from_level(level: Level) -> Self {
        let terrain = level.build_terrain();
        let player = Some(Tank::player(level.player_spawn()));
        let enemies = level
            .enemy_spawns()
            .iter()
            .zip(1..)
            .map(|(&position, id)| Tank::enemy(TankId::new(id), position))
            .collect();
        Self {
            level,
            terrain,
            player,
            enemies,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            score: 0,
            lives: STARTING_LIVES,
            play_state: PlayState::Playing,
            tick: 0,
            next_bullet_id: 0,
        }
    }

    fn tank(&self, tank: TankId) -> Option<&Tank> {
        if tank.is_player() {
            self.player.as_ref()
        } else {
            self.enemies.iter().find(|enemy| enemy.id == tank)
        }
    }

    fn tank_mut(&mut self, tank: TankId) -> Option<&mut Tank> {
        if tank.is_player() {
            self.player.as_mut()
        } else {
            self.enemies.iter_mut().find(|enemy| enemy.id == tank)
        }
    }

    fn allocate_bullet_id(&mut self) -> BulletId {
        let id = BulletId::new(self.next_bullet_id);
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        id
    }

    fn drive(&mut self, tank_id: TankId, out_events: &mut Vec<Event>) {
        let Some(mut tank) = self.tank(tank_id).copied() else {
            return;
        };

        let from = tank.advance();
        if let Some(obstruction) = collision::tank_obstruction(self, &tank) {
            tank.revert(from);
            out_events.push(Event::TankBlocked {
                tank: tank_id,
                obstruction,
            });
            return;
        }

        if let Some(slot) = self.tank_mut(tank_id) {
            *slot = tank;
        }
        out_events.push(Event::TankAdvanced {
            tank: tank_id,
            from,
            to: tank.position,
        });
    }

    fn fire(&mut self, tank_id: TankId, out_events: &mut Vec<Event>) {
        let Some(tank) = self.tank(tank_id).copied() else {
            return;
        };

        let id = self.allocate_bullet_id();
        let bullet = Bullet::new(id, tank.faction, tank.muzzle(), tank.direction);
        match tank.faction {
            Faction::Player => self.player_bullets.push(bullet),
            Faction::Enemy => self.enemy_bullets.push(bullet),
        }
        out_events.push(Event::BulletFired {
            bullet: id,
            shooter: tank_id,
            owner: tank.faction,
        });
    }

    fn advance_bullets(&mut self, out_events: &mut Vec<Event>) {
        for bullet in self
            .player_bullets
            .iter_mut()
            .chain(self.enemy_bullets.iter_mut())
        {
            if bullet.update() {
                out_events.push(Event::BulletLeftArena { bullet: bullet.id });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Every command other than [`Command::Restart`] is ignored once the world has
/// entered a terminal play state.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if let Command::Restart = command {
        *world = World::from_level(world.level.clone());
        debug!("world rebuilt from level");
        out_events.push(Event::WorldReset);
        return;
    }

    if world.play_state.is_terminal() {
        return;
    }

    match command {
        Command::Restart => {}
        Command::Tick => {
            world.tick = world.tick.saturating_add(1);
            trace!(
                tick = world.tick,
                enemies = world.enemies.len(),
                bullets = world.player_bullets.len() + world.enemy_bullets.len(),
                "tick started"
            );
            out_events.push(Event::TickStarted { tick: world.tick });
        }
        Command::TurnTank { tank, direction } => {
            if let Some(slot) = world.tank_mut(tank) {
                slot.direction = direction;
                out_events.push(Event::TankTurned { tank, direction });
            }
        }
        Command::DriveTank { tank } => world.drive(tank, out_events),
        Command::Fire { tank } => world.fire(tank, out_events),
        Command::AdvanceBullets => world.advance_bullets(out_events),
        Command::ResolveCollisions => collision::resolve(world, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use battle_city_core::{
        BulletSnapshot, Event, Frame, PlayState, TankSnapshot, WallSnapshot,
    };

    use super::World;
    use crate::{level::Level, terrain::Terrain};

    /// Aggregate play state of the world.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.play_state
    }

    /// Score accumulated since the last reset.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives the player has left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Number of ticks simulated since the last reset.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Snapshot of the player tank, absent after the game was lost.
    #[must_use]
    pub fn player(world: &World) -> Option<TankSnapshot> {
        world.player.as_ref().map(|tank| tank.snapshot())
    }

    /// Snapshots of the live enemy tanks in roster order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<TankSnapshot> {
        world.enemies.iter().map(|tank| tank.snapshot()).collect()
    }

    /// Snapshots of the active bullets, player bullets first.
    #[must_use]
    pub fn bullets(world: &World) -> Vec<BulletSnapshot> {
        world
            .player_bullets
            .iter()
            .chain(world.enemy_bullets.iter())
            .filter(|bullet| bullet.active)
            .map(|bullet| bullet.snapshot())
            .collect()
    }

    /// Snapshots of the standing walls.
    #[must_use]
    pub fn walls(world: &World) -> Vec<WallSnapshot> {
        world.terrain.walls().iter().map(|wall| wall.snapshot()).collect()
    }

    /// Provides read-only access to the standing terrain.
    #[must_use]
    pub fn terrain(world: &World) -> &Terrain {
        &world.terrain
    }

    /// Provides read-only access to the level the world was built from.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Captures the full world state together with the events that produced it.
    #[must_use]
    pub fn frame(world: &World, events: Vec<Event>) -> Frame {
        Frame {
            tick: world.tick,
            play_state: world.play_state,
            score: world.score,
            lives: world.lives,
            player: player(world),
            enemies: enemies(world),
            bullets: bullets(world),
            walls: walls(world),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_city_core::{
        Direction, Obstruction, Position, TileCoord, WallKind, BULLET_SIZE, ENEMY_REWARD,
        TANK_SIZE,
    };

    fn run(world: &mut World, commands: &[Command]) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, *command, &mut events);
        }
        events
    }

    fn player_position(world: &World) -> Position {
        query::player(world).expect("player alive").bounds.origin()
    }

    #[test]
    fn new_world_matches_classic_level() {
        let world = World::new();

        assert_eq!(query::play_state(&world), PlayState::Playing);
        assert_eq!(query::score(&world), 0);
        assert_eq!(query::lives(&world), STARTING_LIVES);
        assert_eq!(query::tick(&world), 0);
        assert_eq!(player_position(&world), Position::new(192.0, 352.0));

        let enemies = query::enemies(&world);
        let ids: Vec<u32> = enemies.iter().map(|tank| tank.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(enemies.iter().all(|tank| tank.direction == Direction::Up));
        assert_eq!(query::walls(&world).len(), query::level(&world).walls().len());
        assert!(query::bullets(&world).is_empty());
    }

    #[test]
    fn drive_into_steel_reverts_completely() {
        let level = Level::bordered().with_player_spawn(Position::new(16.0, 100.0));
        let mut world = World::from_level(level);

        let events = run(
            &mut world,
            &[
                Command::TurnTank {
                    tank: TankId::PLAYER,
                    direction: Direction::Left,
                },
                Command::DriveTank {
                    tank: TankId::PLAYER,
                },
            ],
        );

        assert_eq!(player_position(&world), Position::new(16.0, 100.0));
        assert!(matches!(
            events.last(),
            Some(Event::TankBlocked {
                obstruction: Obstruction::Wall(_),
                ..
            })
        ));
    }

    #[test]
    fn forest_does_not_block_tanks() {
        let level = Level::bordered()
            .with_player_spawn(Position::new(100.0, 95.0))
            .with_wall(TileCoord::new(6, 5), WallKind::Forest);
        let mut world = World::from_level(level);

        let events = run(
            &mut world,
            &[Command::DriveTank {
                tank: TankId::PLAYER,
            }],
        );

        assert_eq!(player_position(&world), Position::new(100.0, 93.0));
        assert!(matches!(events[0], Event::TankAdvanced { .. }));
    }

    #[test]
    fn tanks_block_each_other() {
        let level = Level::bordered()
            .with_player_spawn(Position::new(100.0, 125.0))
            .with_enemy(Position::new(100.0, 100.0));
        let mut world = World::from_level(level);

        let events = run(
            &mut world,
            &[Command::DriveTank {
                tank: TankId::PLAYER,
            }],
        );

        assert_eq!(player_position(&world), Position::new(100.0, 125.0));
        assert_eq!(
            events,
            vec![Event::TankBlocked {
                tank: TankId::PLAYER,
                obstruction: Obstruction::Tank(TankId::new(1)),
            }]
        );
    }

    #[test]
    fn fire_spawns_bullet_at_muzzle() {
        let mut world = World::from_level(Level::bordered());

        let events = run(
            &mut world,
            &[Command::Fire {
                tank: TankId::PLAYER,
            }],
        );

        let bullets = query::bullets(&world);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].owner, Faction::Player);
        assert_eq!(bullets[0].bounds.origin(), Position::new(201.0, 346.0));
        assert_eq!(
            events,
            vec![Event::BulletFired {
                bullet: BulletId::new(0),
                shooter: TankId::PLAYER,
                owner: Faction::Player,
            }]
        );
    }

    #[test]
    fn commands_for_missing_tanks_are_ignored() {
        let mut world = World::from_level(Level::bordered());

        let events = run(
            &mut world,
            &[
                Command::DriveTank {
                    tank: TankId::new(7),
                },
                Command::Fire {
                    tank: TankId::new(7),
                },
                Command::TurnTank {
                    tank: TankId::new(7),
                    direction: Direction::Down,
                },
            ],
        );

        assert!(events.is_empty());
        assert!(query::bullets(&world).is_empty());
    }

    #[test]
    fn player_bullet_destroys_last_enemy_and_wins() {
        let level = Level::bordered()
            .with_player_spawn(Position::new(100.0, 300.0))
            .with_enemy(Position::new(100.0, 250.0));
        let mut world = World::from_level(level);
        let mut events = run(
            &mut world,
            &[Command::Fire {
                tank: TankId::PLAYER,
            }],
        );

        for _ in 0..10 {
            apply(&mut world, Command::AdvanceBullets, &mut events);
            apply(&mut world, Command::ResolveCollisions, &mut events);
        }

        assert_eq!(query::play_state(&world), PlayState::Won);
        assert_eq!(query::score(&world), ENEMY_REWARD);
        assert!(query::enemies(&world).is_empty());
        assert!(query::bullets(&world).is_empty());
        assert!(events.contains(&Event::EnemyDestroyed {
            tank: TankId::new(1),
            bullet: BulletId::new(0),
        }));
        assert!(events.contains(&Event::PlayStateChanged {
            state: PlayState::Won,
        }));
    }

    #[test]
    fn enemy_bullets_cost_lives_until_game_over() {
        let level = Level::bordered()
            .with_player_spawn(Position::new(100.0, 200.0))
            .with_enemy(Position::new(100.0, 100.0));
        let mut world = World::from_level(level);
        let enemy = TankId::new(1);
        let mut events = run(
            &mut world,
            &[Command::TurnTank {
                tank: enemy,
                direction: Direction::Down,
            }],
        );

        for _ in 0..STARTING_LIVES {
            apply(&mut world, Command::Fire { tank: enemy }, &mut events);
            for _ in 0..20 {
                apply(&mut world, Command::AdvanceBullets, &mut events);
                apply(&mut world, Command::ResolveCollisions, &mut events);
            }
        }

        assert_eq!(query::lives(&world), 0);
        assert_eq!(query::play_state(&world), PlayState::GameOver);
        assert!(query::player(&world).is_none());
        let hits = events
            .iter()
            .filter(|event| matches!(event, Event::PlayerHit { .. }))
            .count();
        assert_eq!(hits, STARTING_LIVES as usize);
    }

    #[test]
    fn terminal_state_ignores_everything_but_restart() {
        let level = Level::bordered()
            .with_player_spawn(Position::new(100.0, 300.0))
            .with_enemy(Position::new(100.0, 250.0));
        let mut world = World::from_level(level);
        let _ = run(
            &mut world,
            &[
                Command::Fire {
                    tank: TankId::PLAYER,
                },
                Command::AdvanceBullets,
                Command::AdvanceBullets,
                Command::AdvanceBullets,
                Command::AdvanceBullets,
                Command::AdvanceBullets,
                Command::ResolveCollisions,
            ],
        );
        assert_eq!(query::play_state(&world), PlayState::Won);

        let events = run(
            &mut world,
            &[
                Command::Tick,
                Command::DriveTank {
                    tank: TankId::PLAYER,
                },
                Command::Fire {
                    tank: TankId::PLAYER,
                },
            ],
        );
        assert!(events.is_empty());
        assert_eq!(query::tick(&world), 0);

        let events = run(&mut world, &[Command::Restart]);
        assert_eq!(events, vec![Event::WorldReset]);
        assert_eq!(query::play_state(&world), PlayState::Playing);
        assert_eq!(query::score(&world), 0);
        assert_eq!(query::enemies(&world).len(), 1);
    }

    #[test]
    fn bullet_stops_at_first_blocking_wall_only() {
        let level = Level::bordered()
            .with_player_spawn(Position::new(100.0, 270.0))
            .with_wall(TileCoord::new(6, 15), WallKind::Brick)
            .with_wall(TileCoord::new(6, 14), WallKind::Brick);
        let mut world = World::from_level(level);
        let bricks_before = query::terrain(&world).len();
        let mut events = run(
            &mut world,
            &[Command::Fire {
                tank: TankId::PLAYER,
            }],
        );

        for _ in 0..5 {
            apply(&mut world, Command::AdvanceBullets, &mut events);
            apply(&mut world, Command::ResolveCollisions, &mut events);
        }

        let destroyed = events
            .iter()
            .filter(|event| matches!(event, Event::WallDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
        assert_eq!(query::terrain(&world).len(), bricks_before - 1);
        assert!(query::bullets(&world).is_empty());
        assert_eq!(query::score(&world), 0);
    }

    #[test]
    fn frame_reflects_world_state() {
        let mut world = World::new();
        let events = run(&mut world, &[Command::Tick]);

        let frame = query::frame(&world, events);

        assert_eq!(frame.tick, 1);
        assert_eq!(frame.events, vec![Event::TickStarted { tick: 1 }]);
        assert_eq!(frame.enemies.len(), 4);
        assert_eq!(
            frame.player.map(|tank| tank.bounds.width()),
            Some(TANK_SIZE)
        );
        assert!(frame
            .bullets
            .iter()
            .all(|bullet| bullet.bounds.width() == BULLET_SIZE));
    }

    #[test]
    fn bullet_leaving_open_arena_is_dropped() {
        let mut world = World::from_level(Level::open());
        let fired = run(
            &mut world,
            &[Command::Fire {
                tank: TankId::PLAYER,
            }],
        );
        let Some(Event::BulletFired { bullet, .. }) = fired.last().copied() else {
            panic!("player should have fired");
        };

        let mut steps = 0;
        let departed = loop {
            steps += 1;
            let events = run(
                &mut world,
                &[Command::AdvanceBullets, Command::ResolveCollisions],
            );
            if events.contains(&Event::BulletLeftArena { bullet }) {
                break true;
            }
            assert_eq!(query::bullets(&world).len(), 1, "step {steps}");
            if steps > 100 {
                break false;
            }
        };

        assert!(departed, "bullet never left the open arena");
        assert_eq!(steps, 71);
        assert!(query::bullets(&world).is_empty());

        let events = run(
            &mut world,
            &[Command::AdvanceBullets, Command::ResolveCollisions],
        );
        assert!(events.is_empty());
        assert!(query::bullets(&world).is_empty());
    }
}
