//! Overlap rules between tanks, bullets and terrain.

use battle_city_core::{
    Event, Obstruction, PlayState, TankId, WallId, WallKind, ENEMY_REWARD,
};
use tracing::debug;

use crate::{actors::Tank, World};

/// Finds the first obstruction `tank` runs into at its current position.
///
/// Terrain is consulted before other tanks. The tank never obstructs itself.
pub(crate) fn tank_obstruction(world: &World, tank: &Tank) -> Option<Obstruction> {
    let bounds = tank.bounds();
    if let Some(wall) = world.terrain.blocking_wall(&bounds, WallKind::blocks_tanks) {
        return Some(Obstruction::Wall(wall.id()));
    }

    world
        .player
        .iter()
        .chain(world.enemies.iter())
        .filter(|other| other.id != tank.id)
        .find(|other| other.bounds().overlaps(&bounds))
        .map(|other| Obstruction::Tank(other.id))
}

/// Resolves bullet impacts for the current tick.
///
/// Lethal hits are scanned first (player bullets against enemies, then enemy
/// bullets against the player) followed by wall impacts. Removals are gathered
/// during the scans and applied together at the end, after which every
/// inactive bullet is purged.
pub(crate) fn resolve(world: &mut World, out_events: &mut Vec<Event>) {
    let mut destroyed_enemies: Vec<TankId> = Vec::new();
    for bullet in world.player_bullets.iter_mut().filter(|bullet| bullet.active) {
        if world.play_state.is_terminal() {
            break;
        }

        let bounds = bullet.bounds();
        let Some(enemy) = world
            .enemies
            .iter()
            .filter(|enemy| !destroyed_enemies.contains(&enemy.id))
            .find(|enemy| enemy.bounds().overlaps(&bounds))
        else {
            continue;
        };

        bullet.active = false;
        destroyed_enemies.push(enemy.id);
        world.score = world.score.saturating_add(ENEMY_REWARD);
        debug!(tank = enemy.id.get(), score = world.score, "enemy destroyed");
        out_events.push(Event::EnemyDestroyed {
            tank: enemy.id,
            bullet: bullet.id,
        });
        out_events.push(Event::ScoreChanged { score: world.score });

        if destroyed_enemies.len() == world.enemies.len() {
            world.play_state = PlayState::Won;
            debug!(score = world.score, "every enemy destroyed");
            out_events.push(Event::PlayStateChanged {
                state: PlayState::Won,
            });
        }
    }

    let mut player_destroyed = false;
    if let Some(target) = world.player.as_ref().map(Tank::bounds) {
        for bullet in world.enemy_bullets.iter_mut().filter(|bullet| bullet.active) {
            if world.play_state.is_terminal() {
                break;
            }
            if !bullet.bounds().overlaps(&target) {
                continue;
            }

            bullet.active = false;
            world.lives = world.lives.saturating_sub(1);
            debug!(lives = world.lives, "player hit");
            out_events.push(Event::PlayerHit {
                bullet: bullet.id,
                lives_remaining: world.lives,
            });

            if world.lives == 0 {
                world.play_state = PlayState::GameOver;
                player_destroyed = true;
                debug!(score = world.score, "player out of lives");
                out_events.push(Event::PlayStateChanged {
                    state: PlayState::GameOver,
                });
            }
        }
    }

    let mut destroyed_walls: Vec<WallId> = Vec::new();
    let bullets = world
        .player_bullets
        .iter_mut()
        .chain(world.enemy_bullets.iter_mut())
        .filter(|bullet| bullet.active);
    for bullet in bullets {
        let bounds = bullet.bounds();
        let Some(wall) = world
            .terrain
            .walls()
            .iter()
            .filter(|wall| wall.kind().blocks_bullets())
            .filter(|wall| !destroyed_walls.contains(&wall.id()))
            .find(|wall| wall.bounds().overlaps(&bounds))
        else {
            continue;
        };

        bullet.active = false;
        out_events.push(Event::BulletStopped {
            bullet: bullet.id,
            wall: wall.id(),
        });

        if wall.kind().is_destructible() {
            destroyed_walls.push(wall.id());
            debug!(
                column = wall.tile().column(),
                row = wall.tile().row(),
                "brick destroyed"
            );
            out_events.push(Event::WallDestroyed {
                wall: wall.id(),
                tile: wall.tile(),
            });
        }
    }

    world
        .enemies
        .retain(|enemy| !destroyed_enemies.contains(&enemy.id));
    if player_destroyed {
        world.player = None;
    }
    for wall in destroyed_walls {
        let _ = world.terrain.destroy(wall);
    }
    world.player_bullets.retain(|bullet| bullet.active);
    world.enemy_bullets.retain(|bullet| bullet.active);
}
