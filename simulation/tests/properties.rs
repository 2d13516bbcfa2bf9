use std::{
    collections::{hash_map::DefaultHasher, HashSet},
    hash::{Hash, Hasher},
};

use battle_city_core::{
    BulletId, Direction, Event, Frame, Position, TickInput, TileCoord, WallKind, ARENA_HEIGHT,
    ARENA_WIDTH, TANK_SIZE,
};
use battle_city_simulation::Simulation;
use battle_city_system_enemy_ai::{DecisionSource, RngSource};
use battle_city_world::level::Level;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_input(rng: &mut ChaCha8Rng) -> TickInput {
    let movement = if rng.gen_bool(0.7) {
        Some(Direction::ALL[rng.gen_range(0..4)])
    } else {
        None
    };
    TickInput {
        movement,
        fire: rng.gen_bool(0.1),
        restart: false,
    }
}

fn assert_frame_invariants(frame: &Frame) {
    let tanks: Vec<_> = frame.tanks().collect();

    for tank in &tanks {
        let origin = tank.bounds.origin();
        assert!(
            (0.0..=ARENA_WIDTH - TANK_SIZE).contains(&origin.x)
                && (0.0..=ARENA_HEIGHT - TANK_SIZE).contains(&origin.y),
            "tank {:?} left the arena at tick {}",
            tank.id,
            frame.tick
        );

        for wall in frame.walls.iter().filter(|wall| wall.kind.blocks_tanks()) {
            assert!(
                !wall.bounds().overlaps(&tank.bounds),
                "tank {:?} overlaps {:?} at tick {}",
                tank.id,
                wall.tile,
                frame.tick
            );
        }
    }

    for (index, first) in tanks.iter().enumerate() {
        for second in &tanks[index + 1..] {
            assert!(
                !first.bounds.overlaps(&second.bounds),
                "tanks {:?} and {:?} overlap at tick {}",
                first.id,
                second.id,
                frame.tick
            );
        }
    }

    let departed: HashSet<BulletId> = frame
        .events
        .iter()
        .filter_map(|event| match event {
            Event::BulletLeftArena { bullet } => Some(*bullet),
            _ => None,
        })
        .collect();
    assert!(frame
        .bullets
        .iter()
        .all(|bullet| !departed.contains(&bullet.id)));
}

fn run_sweep<S: DecisionSource>(
    mut simulation: Simulation<S>,
    seed: u64,
    ticks: usize,
) -> usize {
    let mut inputs = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    let mut previous = simulation.frame().clone();
    let mut departures = 0;

    for _ in 0..ticks {
        let frame = simulation.step(random_input(&mut inputs));
        assert_frame_invariants(&frame);
        departures += frame
            .events
            .iter()
            .filter(|event| matches!(event, Event::BulletLeftArena { .. }))
            .count();
        assert!(frame.score >= previous.score, "score decreased");
        assert!(frame.lives <= previous.lives, "lives increased");
        assert!(frame.walls.len() <= previous.walls.len(), "walls reappeared");
        if previous.play_state.is_terminal() {
            assert_eq!(frame.play_state, previous.play_state);
            assert_eq!(frame.tick, previous.tick);
        }
        previous = frame;
    }
    departures
}

#[test]
fn invariants_hold_across_seeded_games() {
    for seed in [1, 7, 42, 0xdead_beef, 0x1234_5678_9abc] {
        let _ = run_sweep(Simulation::new(seed), seed, 1_500);
    }
}

#[test]
fn invariants_hold_in_open_arena_where_bullets_escape() {
    let mut departures = 0;
    for seed in [3, 11, 0xfeed] {
        let level = Level::open()
            .with_enemy(Position::new(48.0, 48.0))
            .with_enemy(Position::new(344.0, 48.0))
            .with_wall(TileCoord::new(12, 12), WallKind::Brick)
            .with_wall(TileCoord::new(6, 18), WallKind::Water);
        let simulation = Simulation::with_level(level, RngSource::seeded(seed));
        departures += run_sweep(simulation, seed, 1_500);
    }

    assert!(departures > 0, "no bullet ever left the open arena");
}

fn fingerprint(frames: &[Frame]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for frame in frames {
        frame.tick.hash(&mut hasher);
        frame.score.hash(&mut hasher);
        frame.lives.hash(&mut hasher);
        frame.play_state.hash(&mut hasher);
        for tank in frame.tanks() {
            tank.id.hash(&mut hasher);
            tank.direction.hash(&mut hasher);
            tank.bounds.origin().x.to_bits().hash(&mut hasher);
            tank.bounds.origin().y.to_bits().hash(&mut hasher);
        }
        for bullet in &frame.bullets {
            bullet.id.hash(&mut hasher);
            bullet.bounds.origin().x.to_bits().hash(&mut hasher);
            bullet.bounds.origin().y.to_bits().hash(&mut hasher);
        }
        for wall in &frame.walls {
            wall.id.hash(&mut hasher);
        }
    }
    hasher.finish()
}

fn replay(seed: u64, ticks: usize) -> u64 {
    let mut simulation = Simulation::new(seed);
    let mut inputs = ChaCha8Rng::seed_from_u64(seed);
    let frames: Vec<Frame> = (0..ticks)
        .map(|_| simulation.step(random_input(&mut inputs)))
        .collect();
    fingerprint(&frames)
}

#[test]
fn seeded_replays_are_identical() {
    assert_eq!(replay(99, 900), replay(99, 900));
}

#[test]
fn different_seeds_diverge() {
    assert_ne!(replay(3, 900), replay(4, 900));
}
