//! The scene state machine: Bootstrap, then Play, then GameOver, and back to Play on restart.
//!
//! Each scene is a [`Stage`]. [`Scene`] holds the active one and forwards to it with a plain `match`,
//! so no trait objects are involved.

use bevy_ecs::{entity::Entity, event::Events, query::With, resource::Resource, world::World};
use serde::Deserialize;
use thousands::Separable;
use tracing::{debug, info, warn};

use crate::{
    asset::AssetCatalog,
    error::GameError,
    events::{GameEvent, InputEvent, Key, StageTransition},
    game::GameContext,
    systems::{
        dino_bundle, ground_bundle, is_restart, play_command, AnimationLibrary, GlobalState, Hud, RunState,
        SessionEntity,
    },
};

/// How a session is played. Challenge sessions report their final score to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Solo,
    Challenge,
}

/// How score and scrolling progress over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTiming {
    /// A fixed increment per update, regardless of how much time it covers.
    #[default]
    PerFrame,
    /// Increments scaled by elapsed time, as if updates arrived at exactly 60 Hz.
    Elapsed,
}

/// Settings threaded through every scene transition.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub animations_ready: bool,
    pub score_timing: ScoreTiming,
}

/// What the game-over screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    pub high_score: u32,
    pub mode: GameMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Bootstrap,
    Play,
    GameOver,
}

/// A request to leave the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    Play,
    GameOver(GameOverSummary),
}

/// Lifecycle hooks of one scene.
pub trait Stage {
    fn on_enter(&mut self, _ctx: &mut GameContext) {}

    fn on_update(&mut self, _ctx: &mut GameContext) -> Option<SceneRequest> {
        None
    }

    fn on_input(&mut self, _ctx: &mut GameContext, _input: InputEvent) -> Option<SceneRequest> {
        None
    }

    fn on_exit(&mut self, _ctx: &mut GameContext) {}
}

/// Loads assets and animation clips, then hands over to play.
#[derive(Debug, Default)]
pub struct BootstrapStage;

impl Stage for BootstrapStage {
    fn on_enter(&mut self, ctx: &mut GameContext) {
        let catalog = AssetCatalog::load(&ctx.asset_dir);
        let missing = catalog.missing_critical();
        if !missing.is_empty() {
            warn!(?missing, "Critical assets missing, continuing with default textures");
        }

        let library = match AnimationLibrary::build(&catalog) {
            Ok(library) => library,
            Err(error) => {
                warn!(%error, "Animations unavailable, using static textures");
                ctx.world.send_event(GameError::Asset(error));
                AnimationLibrary::default()
            }
        };

        ctx.world.resource_mut::<SessionConfig>().animations_ready = library.is_ready();
        ctx.world.insert_resource(catalog);
        ctx.world.insert_resource(library);
    }

    fn on_update(&mut self, _ctx: &mut GameContext) -> Option<SceneRequest> {
        Some(SceneRequest::Play)
    }
}

/// Runs one session of the run loop.
#[derive(Debug, Default)]
pub struct PlayStage;

impl PlayStage {
    /// Discards whatever the previous session left behind and sets up a fresh one.
    fn start_session(world: &mut World) {
        let stale: Vec<Entity> = world
            .query_filtered::<Entity, With<SessionEntity>>()
            .iter(world)
            .collect();
        for entity in stale {
            world.despawn(entity);
        }

        world.resource_mut::<Events<GameEvent>>().clear();
        world.resource_mut::<Events<StageTransition>>().clear();

        let session = *world.resource::<SessionConfig>();
        let run = RunState::new(session.mode);
        let dino = dino_bundle(
            &session,
            world.resource::<AnimationLibrary>(),
            world.resource::<AssetCatalog>(),
        );
        let ground = ground_bundle(world.resource::<AssetCatalog>());

        world.insert_resource(run);
        world.insert_resource(Hud::default());
        world.spawn(dino);
        world.spawn(ground);

        info!(mode = ?session.mode, animations = session.animations_ready, "Session started");
    }
}

impl Stage for PlayStage {
    fn on_enter(&mut self, ctx: &mut GameContext) {
        Self::start_session(&mut ctx.world);
    }

    fn on_update(&mut self, ctx: &mut GameContext) -> Option<SceneRequest> {
        ctx.schedule.run(&mut ctx.world);

        ctx.world
            .resource_mut::<Events<StageTransition>>()
            .drain()
            .last()
            .map(|StageTransition::ShowGameOver(summary)| SceneRequest::GameOver(summary))
    }

    fn on_input(&mut self, ctx: &mut GameContext, input: InputEvent) -> Option<SceneRequest> {
        if let Some(command) = play_command(input) {
            ctx.world.send_event(GameEvent::Command(command));
        }
        None
    }

    fn on_exit(&mut self, ctx: &mut GameContext) {
        if let Some(run) = ctx.world.get_resource::<RunState>() {
            debug!(score = run.display_score(), running = run.running, "Leaving session");
        }
    }
}

/// Shows the final result and waits for a restart.
#[derive(Debug)]
pub struct GameOverStage {
    pub summary: GameOverSummary,
    /// Outcome of reporting a challenge score to the ledger, if one was attempted.
    pub submitted: Option<bool>,
}

impl GameOverStage {
    pub fn new(summary: GameOverSummary) -> Self {
        Self {
            summary,
            submitted: None,
        }
    }
}

impl Stage for GameOverStage {
    fn on_enter(&mut self, ctx: &mut GameContext) {
        info!(
            score = self.summary.score.separate_with_commas(),
            high_score = self.summary.high_score.separate_with_commas(),
            mode = ?self.summary.mode,
            "Showing game over"
        );

        if self.summary.mode != GameMode::Challenge {
            return;
        }

        match &ctx.ledger {
            Some(ledger) => {
                let submitted = ledger.submit_score(self.summary.score);
                if submitted {
                    info!(score = self.summary.score, "Challenge score submitted");
                } else {
                    warn!(score = self.summary.score, "Challenge score was not submitted");
                }
                self.submitted = Some(submitted);
            }
            None => debug!("No ledger attached, challenge score not submitted"),
        }
    }

    fn on_input(&mut self, ctx: &mut GameContext, input: InputEvent) -> Option<SceneRequest> {
        if input == InputEvent::KeyDown(Key::Escape) {
            ctx.world.resource_mut::<GlobalState>().exit = true;
            return None;
        }

        is_restart(input).then_some(SceneRequest::Play)
    }
}

/// The active scene.
#[derive(Debug)]
pub enum Scene {
    Bootstrap(BootstrapStage),
    Play(PlayStage),
    GameOver(GameOverStage),
}

macro_rules! dispatch {
    ($scene:expr, $stage:ident => $call:expr) => {
        match $scene {
            Scene::Bootstrap($stage) => $call,
            Scene::Play($stage) => $call,
            Scene::GameOver($stage) => $call,
        }
    };
}

impl Scene {
    pub fn from_request(request: SceneRequest) -> Self {
        match request {
            SceneRequest::Play => Scene::Play(PlayStage),
            SceneRequest::GameOver(summary) => Scene::GameOver(GameOverStage::new(summary)),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Bootstrap(_) => SceneKind::Bootstrap,
            Scene::Play(_) => SceneKind::Play,
            Scene::GameOver(_) => SceneKind::GameOver,
        }
    }

    pub fn on_enter(&mut self, ctx: &mut GameContext) {
        dispatch!(self, stage => stage.on_enter(ctx))
    }

    pub fn on_update(&mut self, ctx: &mut GameContext) -> Option<SceneRequest> {
        dispatch!(self, stage => stage.on_update(ctx))
    }

    pub fn on_input(&mut self, ctx: &mut GameContext, input: InputEvent) -> Option<SceneRequest> {
        dispatch!(self, stage => stage.on_input(ctx, input))
    }

    pub fn on_exit(&mut self, ctx: &mut GameContext) {
        dispatch!(self, stage => stage.on_exit(ctx))
    }
}
