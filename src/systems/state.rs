use std::sync::Arc;

use bevy_ecs::{
    event::{EventReader, EventWriter},
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use thousands::Separable;
use tracing::{info, warn};

use crate::{
    asset::{Asset, AssetCatalog},
    constants::delay,
    error::GameError,
    events::GameEvent,
    persist::{record_high_score, KeyValueStore},
    scene::GameOverSummary,
    systems::{Appearance, Delayed, DelayedAction, Dino, Pose, RunState, SessionEntity},
};

/// Handle to the store holding the local high score.
#[derive(Resource, Clone)]
pub struct HighScores(pub Arc<dyn KeyValueStore>);

/// Ends the session on the first collision.
///
/// Freezes the run, puts the dinosaur in its hurt pose, updates the persisted high score and schedules the
/// game-over screen. Collisions reported after the run has stopped are ignored.
#[allow(clippy::too_many_arguments)]
pub fn game_over_system(
    mut commands: Commands,
    mut events: EventReader<GameEvent>,
    mut run: ResMut<RunState>,
    high_scores: Res<HighScores>,
    catalog: Res<AssetCatalog>,
    mut dinos: Query<(&mut Dino, &mut Appearance)>,
    mut errors: EventWriter<GameError>,
) {
    let mut collision = None;
    for event in events.read() {
        if let GameEvent::Collision(dino, obstacle) = event {
            collision.get_or_insert((*dino, *obstacle));
        }
    }

    let Some((_, obstacle)) = collision else {
        return;
    };
    if !run.running {
        return;
    }

    run.running = false;
    for (mut dino, mut appearance) in dinos.iter_mut() {
        dino.pose = Pose::Hurt;
        *appearance = Appearance::texture_or_default(&catalog, Asset::DinoHurt);
    }

    let score = run.display_score();
    let previous = match record_high_score(high_scores.0.as_ref(), score) {
        Ok(previous) => previous,
        Err(error) => {
            errors.write(GameError::Store(error));
            0
        }
    };

    let summary = GameOverSummary {
        score,
        high_score: score.max(previous),
        mode: run.mode,
    };
    info!(
        score = score.separate_with_commas(),
        high_score = summary.high_score.separate_with_commas(),
        ?obstacle,
        "Game over"
    );

    commands.spawn((
        Delayed::new(delay::GAME_OVER, DelayedAction::ShowGameOver(summary)),
        SessionEntity,
    ));
}

/// Logs recoverable errors reported by other systems.
pub fn error_log_system(mut errors: EventReader<GameError>) {
    for error in errors.read() {
        warn!(%error, "Recovered from error");
    }
}
