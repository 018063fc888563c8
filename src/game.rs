//! This module contains the main game logic and state.

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::event::{event_update_system, EventRegistry};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use tracing::{debug, info};

use crate::asset::AssetCatalog;
use crate::config::Config;
use crate::error::GameError;
use crate::events::{GameEvent, InputEvent, StageTransition};
use crate::ledger::Ledger;
use crate::persist::KeyValueStore;
use crate::scene::{GameMode, GameOverSummary, Scene, SceneKind, SceneRequest, SessionConfig};
use crate::systems::{
    animation_system, cleanup_system, cloud_spawn_system, collision_system, delayed_action_system,
    dino_physics_system, error_log_system, game_over_system, hud_system, obstacle_spawn_system,
    player_control_system, score_system, scroll_system, AnimationLibrary, DeltaTime, GameRng, GlobalState,
    HighScores, Hud, RunState,
};

/// System set for all gameplay systems to ensure they run in a fixed order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Timed callbacks that feed commands into this frame
    Timers,
    /// Gameplay systems that process inputs
    Input,
    /// Gameplay systems that update the game state
    Update,
    /// Gameplay systems that respond to events
    Respond,
}

/// System set for everything derived from gameplay state
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum PresentSet {
    Animation,
    Hud,
}

fn session_running(run: Option<Res<RunState>>) -> bool {
    run.is_some_and(|run| run.running)
}

/// Everything the scenes operate on.
pub struct GameContext {
    pub world: World,
    pub schedule: Schedule,
    pub asset_dir: PathBuf,
    pub ledger: Option<Arc<Ledger>>,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Owns the `World` holding the run loop's entities and resources, the `Schedule` that advances one session
/// frame by frame, and the scene state machine that decides when the schedule runs at all.
pub struct Game {
    ctx: GameContext,
    scene: Scene,
}

impl Game {
    /// Builds the world and schedule and enters the bootstrap scene, which loads assets from `config.asset_dir`.
    ///
    /// `ledger` receives final scores of challenge sessions; without one they are only logged.
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>, ledger: Option<Arc<Ledger>>) -> Game {
        info!("Starting game initialization");

        let mut world = World::default();
        let mut schedule = Schedule::default();

        debug!("Setting up ECS event registry and resources");
        Self::setup_ecs(&mut world, &mut schedule);

        let rng = match config.seed {
            Some(seed) => GameRng::seeded(seed),
            None => GameRng::from_entropy(),
        };
        world.insert_resource(rng);
        world.insert_resource(SessionConfig {
            mode: config.mode,
            animations_ready: false,
            score_timing: config.score_timing,
        });
        world.insert_resource(HighScores(store));

        let mut game = Game {
            ctx: GameContext {
                world,
                schedule,
                asset_dir: config.asset_dir.clone(),
                ledger,
            },
            scene: Scene::Bootstrap(Default::default()),
        };
        game.scene.on_enter(&mut game.ctx);

        info!("Game initialization completed");
        game
    }

    fn setup_ecs(world: &mut World, schedule: &mut Schedule) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<StageTransition>(world);

        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(DeltaTime::from_ticks(1));
        world.insert_resource(Hud::default());
        world.insert_resource(AssetCatalog::with_loaded([]));
        world.insert_resource(AnimationLibrary::default());

        schedule
            .add_systems((
                delayed_action_system.in_set(GameplaySet::Timers),
                player_control_system.in_set(GameplaySet::Input),
                (
                    dino_physics_system,
                    score_system,
                    obstacle_spawn_system,
                    cloud_spawn_system,
                    scroll_system,
                    cleanup_system,
                    collision_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                game_over_system.in_set(GameplaySet::Respond),
                animation_system.in_set(PresentSet::Animation),
                (hud_system, error_log_system).chain().in_set(PresentSet::Hud),
                event_update_system.after(PresentSet::Hud),
            ))
            .configure_sets(
                (
                    GameplaySet::Timers,
                    GameplaySet::Input,
                    GameplaySet::Update.run_if(session_running),
                    GameplaySet::Respond,
                    PresentSet::Animation.run_if(session_running),
                    PresentSet::Hud,
                )
                    .chain(),
            );
    }

    /// Executes one frame: the active scene updates and may hand over to the next one.
    ///
    /// During play this runs the whole system schedule once. `dt` is the frame time in seconds.
    ///
    /// Returns `true` if the game should terminate (exit command received), `false` to continue
    pub fn tick(&mut self, dt: f32) -> bool {
        self.ctx.world.insert_resource(DeltaTime { seconds: dt, ticks: 1 });

        if let Some(request) = self.scene.on_update(&mut self.ctx) {
            self.transition(request);
        }

        self.ctx.world.resource::<GlobalState>().exit
    }

    /// Delivers raw input to the active scene.
    pub fn handle_input(&mut self, input: InputEvent) {
        if let Some(request) = self.scene.on_input(&mut self.ctx, input) {
            self.transition(request);
        }
    }

    /// Changes the mode of upcoming sessions. A session in progress is restarted in the new mode.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.ctx.world.resource_mut::<SessionConfig>().mode = mode;
        if self.scene.kind() == SceneKind::Play {
            info!(?mode, "Mode changed, restarting session");
            self.transition(SceneRequest::Play);
        }
    }

    fn transition(&mut self, request: SceneRequest) {
        let from = self.scene.kind();
        self.scene.on_exit(&mut self.ctx);
        self.scene = Scene::from_request(request);
        self.scene.on_enter(&mut self.ctx);
        debug!(?from, to = ?self.scene.kind(), "Scene transition");
    }

    pub fn scene(&self) -> SceneKind {
        self.scene.kind()
    }

    /// The summary on display, while in the game-over scene.
    pub fn summary(&self) -> Option<GameOverSummary> {
        match &self.scene {
            Scene::GameOver(stage) => Some(stage.summary),
            _ => None,
        }
    }

    /// Whether the last challenge score reached the ledger, while in the game-over scene.
    pub fn submission(&self) -> Option<bool> {
        match &self.scene {
            Scene::GameOver(stage) => stage.submitted,
            _ => None,
        }
    }

    pub fn session(&self) -> SessionConfig {
        *self.ctx.world.resource::<SessionConfig>()
    }

    /// The current session's run state, once a session has started.
    pub fn run_state(&self) -> Option<&RunState> {
        self.ctx.world.get_resource::<RunState>()
    }

    pub fn world(&self) -> &World {
        &self.ctx.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.ctx.world
    }
}
