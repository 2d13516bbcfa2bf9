//! Tanks and bullets as the world stores them.

use battle_city_core::{
    Aabb, BulletId, BulletSnapshot, Direction, Faction, Position, TankId, TankSnapshot,
    ARENA_HEIGHT, ARENA_WIDTH, BULLET_SIZE, BULLET_SPEED, ENEMY_SPEED, PLAYER_SPEED, TANK_SIZE,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tank {
    pub(crate) id: TankId,
    pub(crate) faction: Faction,
    pub(crate) position: Position,
    pub(crate) direction: Direction,
}

impl Tank {
    pub(crate) const fn player(position: Position) -> Self {
        Self {
            id: TankId::PLAYER,
            faction: Faction::Player,
            position,
            direction: Direction::Up,
        }
    }

    pub(crate) const fn enemy(id: TankId, position: Position) -> Self {
        Self {
            id,
            faction: Faction::Enemy,
            position,
            direction: Direction::Up,
        }
    }

    pub(crate) const fn speed(&self) -> f32 {
        match self.faction {
            Faction::Player => PLAYER_SPEED,
            Faction::Enemy => ENEMY_SPEED,
        }
    }

    /// Steps along the current heading, clamped to the arena.
    ///
    /// Returns the position held before the step so callers can roll back.
    pub(crate) fn advance(&mut self) -> Position {
        let from = self.position;
        let moved = from.offset(self.direction, self.speed());
        self.position = Position::new(
            moved.x.clamp(0.0, ARENA_WIDTH - TANK_SIZE),
            moved.y.clamp(0.0, ARENA_HEIGHT - TANK_SIZE),
        );
        from
    }

    pub(crate) fn revert(&mut self, from: Position) {
        self.position = from;
    }

    pub(crate) fn bounds(&self) -> Aabb {
        Aabb::square(self.position, TANK_SIZE)
    }

    /// Spawn point of a bullet fired by the tank.
    pub(crate) fn muzzle(&self) -> Position {
        let Position { x, y } = self.position;
        let half = TANK_SIZE / 2.0 - BULLET_SIZE / 2.0;
        match self.direction {
            Direction::Up => Position::new(x + half, y - BULLET_SIZE),
            Direction::Right => Position::new(x + TANK_SIZE, y + half),
            Direction::Down => Position::new(x + half, y + TANK_SIZE),
            Direction::Left => Position::new(x - BULLET_SIZE, y + half),
        }
    }

    pub(crate) const fn snapshot(&self) -> TankSnapshot {
        TankSnapshot {
            id: self.id,
            faction: self.faction,
            direction: self.direction,
            bounds: Aabb::square(self.position, TANK_SIZE),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bullet {
    pub(crate) id: BulletId,
    pub(crate) owner: Faction,
    pub(crate) position: Position,
    pub(crate) direction: Direction,
    pub(crate) active: bool,
}

impl Bullet {
    pub(crate) const fn new(
        id: BulletId,
        owner: Faction,
        position: Position,
        direction: Direction,
    ) -> Self {
        Self {
            id,
            owner,
            position,
            direction,
            active: true,
        }
    }

    /// Moves the bullet one step, deactivating it once it is fully outside the arena.
    ///
    /// Returns `true` when this step took the bullet out of the arena.
    pub(crate) fn update(&mut self) -> bool {
        self.position = self.position.offset(self.direction, BULLET_SPEED);
        let Position { x, y } = self.position;
        let outside = x + BULLET_SIZE < 0.0
            || x > ARENA_WIDTH
            || y + BULLET_SIZE < 0.0
            || y > ARENA_HEIGHT;
        if outside && self.active {
            self.active = false;
            return true;
        }
        false
    }

    pub(crate) fn bounds(&self) -> Aabb {
        Aabb::square(self.position, BULLET_SIZE)
    }

    pub(crate) const fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            id: self.id,
            owner: self.owner,
            direction: self.direction,
            bounds: Aabb::square(self.position, BULLET_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_clamps_to_arena_and_reports_origin() {
        let mut tank = Tank::player(Position::new(1.0, 200.0));
        tank.direction = Direction::Left;

        let from = tank.advance();

        assert_eq!(from, Position::new(1.0, 200.0));
        assert_eq!(tank.position, Position::new(0.0, 200.0));

        tank.direction = Direction::Down;
        tank.position = Position::new(50.0, 391.0);
        let _ = tank.advance();
        assert_eq!(tank.position.y, ARENA_HEIGHT - TANK_SIZE);
    }

    #[test]
    fn revert_restores_previous_position() {
        let mut tank = Tank::enemy(TankId::new(1), Position::new(48.0, 48.0));
        tank.direction = Direction::Right;

        let from = tank.advance();
        assert_eq!(tank.position, Position::new(49.0, 48.0));
        tank.revert(from);

        assert_eq!(tank.position, Position::new(48.0, 48.0));
    }

    #[test]
    fn muzzle_sits_flush_against_the_facing_edge() {
        let mut tank = Tank::player(Position::new(100.0, 200.0));
        let expected = [
            (Direction::Up, Position::new(109.0, 194.0)),
            (Direction::Right, Position::new(124.0, 209.0)),
            (Direction::Down, Position::new(109.0, 224.0)),
            (Direction::Left, Position::new(94.0, 209.0)),
        ];

        for (direction, muzzle) in expected {
            tank.direction = direction;
            assert_eq!(tank.muzzle(), muzzle, "{direction:?}");
            let bullet = Aabb::square(tank.muzzle(), BULLET_SIZE);
            assert!(!bullet.overlaps(&tank.bounds()));
        }
    }

    #[test]
    fn bullet_deactivates_only_when_fully_outside() {
        let mut bullet = Bullet::new(
            BulletId::new(0),
            Faction::Player,
            Position::new(100.0, 3.0),
            Direction::Up,
        );

        assert!(!bullet.update());
        assert!(bullet.active, "still overlaps the arena at y = -2");
        assert!(bullet.update());
        assert!(!bullet.active);
        assert!(!bullet.update(), "exit is only reported once");
    }

    #[test]
    fn bullet_exits_past_the_far_edge() {
        let mut bullet = Bullet::new(
            BulletId::new(1),
            Faction::Enemy,
            Position::new(412.0, 100.0),
            Direction::Right,
        );

        assert!(bullet.update());
        assert_eq!(bullet.position.x, 417.0);
    }
}
