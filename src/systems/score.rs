use bevy_ecs::system::{Res, ResMut};
use thousands::Separable;
use tracing::info;

use crate::constants::run;
use crate::scene::SessionConfig;
use crate::systems::components::{DeltaTime, RunState};

/// Number of speed milestones a score has crossed.
pub fn milestones_reached(score: f64) -> u32 {
    (score.floor() as u32) / run::SPEED_MILESTONE
}

/// Accumulates score and applies the difficulty ramp.
///
/// Each milestone crossed raises the speed by one step, once; several milestones crossed in a single
/// update are all applied.
pub fn score_system(mut run: ResMut<RunState>, dt: Res<DeltaTime>, session: Res<SessionConfig>) {
    let frames = dt.frames(session.score_timing) as f64;
    run.score += run::SCORE_PER_FRAME * frames;

    let reached = milestones_reached(run.score);
    while run.milestones < reached {
        run.milestones += 1;
        run.speed += run::SPEED_STEP;
        info!(
            score = run.display_score().separate_with_commas(),
            speed = run.speed,
            "Speed increased"
        );
    }
}
