use crate::constants::{size, RESTART_BUTTON_CENTER};
use crate::events::{GameCommand, InputEvent, Key};
use crate::systems::components::Aabb;

/// Translates raw input during play into a run-loop command.
pub fn play_command(input: InputEvent) -> Option<GameCommand> {
    match input {
        InputEvent::KeyDown(Key::Space | Key::Up) => Some(GameCommand::Jump),
        InputEvent::KeyDown(Key::Down) => Some(GameCommand::Duck),
        InputEvent::KeyUp(Key::Down) => Some(GameCommand::Stand),
        InputEvent::KeyDown(Key::Escape) => Some(GameCommand::Exit),
        InputEvent::PointerDown(point) => Some(GameCommand::Tap(point)),
        _ => None,
    }
}

/// The clickable area of the restart control.
pub fn restart_button() -> Aabb {
    Aabb::from_center(RESTART_BUTTON_CENTER, size::RESTART_BUTTON)
}

/// Whether raw input on the game-over screen asks for another run.
pub fn is_restart(input: InputEvent) -> bool {
    match input {
        InputEvent::KeyDown(Key::Space | Key::Up | Key::R) => true,
        InputEvent::PointerDown(point) => restart_button().contains(point),
        _ => false,
    }
}
