use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    system::{Commands, Query, Res},
};
use tracing::debug;

use crate::events::{GameCommand, GameEvent, StageTransition};
use crate::systems::{Delayed, DelayedAction, DeltaTime};

/// System that counts down [`Delayed`] entities and fires their action once the delay has elapsed.
///
/// Fired entities are despawned, so each action runs exactly once.
pub fn delayed_action_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    mut query: Query<(Entity, &mut Delayed)>,
    mut game_events: EventWriter<GameEvent>,
    mut transitions: EventWriter<StageTransition>,
) {
    for (entity, mut delayed) in query.iter_mut() {
        if delayed.remaining > dt.seconds {
            delayed.remaining -= dt.seconds;
            continue;
        }

        debug!(action = ?delayed.action, "Delayed action fired");
        match delayed.action {
            DelayedAction::Stand => {
                game_events.write(GameEvent::Command(GameCommand::Stand));
            }
            DelayedAction::ShowGameOver(summary) => {
                transitions.write(StageTransition::ShowGameOver(summary));
            }
        }
        commands.entity(entity).despawn();
    }
}
