use bevy_ecs::{
    change_detection::DetectChanges,
    resource::Resource,
    system::{Res, ResMut},
};

use crate::scene::GameMode;
use crate::systems::RunState;

/// Text shown over the play surface.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct Hud {
    /// The displayed score, zero-padded to five digits.
    pub score_text: String,
    pub mode_label: &'static str,
}

pub fn format_score(score: u32) -> String {
    format!("{score:05}")
}

pub fn mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Solo => "SOLO MODE",
        GameMode::Challenge => "CHALLENGE MODE",
    }
}

pub fn hud_system(run: Res<RunState>, mut hud: ResMut<Hud>) {
    if !run.is_changed() && !hud.score_text.is_empty() {
        return;
    }

    let score_text = format_score(run.display_score());
    if hud.score_text != score_text {
        hud.score_text = score_text;
    }
    hud.mode_label = mode_label(run.mode);
}
