use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::scene::GameOverSummary;

/// Physical keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Up,
    Down,
    R,
    Escape,
}

/// Raw input delivered by the host, before any scene interprets it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// A pointer press at the given canvas coordinates.
    PointerDown(Vec2),
}

/// Commands understood by the run loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameCommand {
    Exit,
    Jump,
    Duck,
    Stand,
    /// Pointer press on the play surface; the upper half jumps, the lower half ducks briefly.
    Tap(Vec2),
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Command(GameCommand),
    /// The dinosaur's hitbox overlapped an obstacle. Carries (dino, obstacle).
    Collision(Entity, Entity),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Requests for the scene state machine, raised from inside the run loop.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum StageTransition {
    ShowGameOver(GameOverSummary),
}
