use battle_city_core::Direction;
use battle_city_rendering_macroquad::KeyboardState;
use macroquad::input::KeyCode;

fn replay(frames: &[&[KeyCode]]) -> Vec<(Option<Direction>, bool)> {
    let mut keyboard = KeyboardState::default();
    frames
        .iter()
        .map(|held| {
            let input = keyboard.sample(|key| held.contains(&key));
            (input.movement, input.fire)
        })
        .collect()
}

#[test]
fn held_fire_key_produces_a_single_shot() {
    let frames: [&[KeyCode]; 5] = [
        &[KeyCode::Space],
        &[KeyCode::Space],
        &[KeyCode::Space, KeyCode::Up],
        &[],
        &[KeyCode::Space],
    ];

    let fired: Vec<bool> = replay(&frames).into_iter().map(|(_, fire)| fire).collect();

    assert_eq!(fired, vec![true, false, false, false, true]);
}

#[test]
fn releasing_newest_key_falls_back_to_older_one() {
    let frames: [&[KeyCode]; 4] = [
        &[KeyCode::W],
        &[KeyCode::W, KeyCode::Right],
        &[KeyCode::W],
        &[],
    ];

    let movement: Vec<Option<Direction>> =
        replay(&frames).into_iter().map(|(movement, _)| movement).collect();

    assert_eq!(
        movement,
        vec![
            Some(Direction::Up),
            Some(Direction::Right),
            Some(Direction::Up),
            None,
        ]
    );
}

#[test]
fn replays_are_deterministic() {
    let frames: [&[KeyCode]; 4] = [
        &[KeyCode::Left, KeyCode::Space],
        &[KeyCode::Down],
        &[KeyCode::Down, KeyCode::Space],
        &[KeyCode::D],
    ];

    assert_eq!(replay(&frames), replay(&frames));
}
