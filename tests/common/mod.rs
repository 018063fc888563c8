#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::{entity::Entity, event::Events, world::World};
use dino_run::{
    asset::{ensure_placeholders, AssetCatalog},
    config::Config,
    error::GameError,
    events::{GameEvent, StageTransition},
    persist::MemoryStore,
    scene::{GameMode, ScoreTiming, SessionConfig},
    systems::{
        build_obstacle, dino_bundle, AnimationLibrary, DeltaTime, GameRng, GlobalState, HighScores, Hud, ObstacleKind,
        Position, RunState,
    },
};

pub const TEST_SEED: u64 = 0x00d1_0000;

/// Creates a world holding every resource the run-loop systems read, with all assets and animations available.
pub fn create_test_world() -> World {
    let mut world = World::new();

    world.insert_resource(Events::<GameEvent>::default());
    world.insert_resource(Events::<GameError>::default());
    world.insert_resource(Events::<StageTransition>::default());
    world.insert_resource(GlobalState { exit: false });
    world.insert_resource(DeltaTime::from_ticks(1)); // 60 FPS
    world.insert_resource(SessionConfig {
        mode: GameMode::Solo,
        animations_ready: true,
        score_timing: ScoreTiming::PerFrame,
    });

    let catalog = AssetCatalog::complete();
    world.insert_resource(AnimationLibrary::build(&catalog).expect("Complete catalog builds every clip"));
    world.insert_resource(catalog);

    let rng = GameRng::seeded(TEST_SEED);
    world.insert_resource(RunState::new(GameMode::Solo));
    world.insert_resource(rng);
    world.insert_resource(HighScores(Arc::new(MemoryStore::new())));
    world.insert_resource(Hud::default());

    world
}

/// Spawns the dinosaur exactly as a session start does.
pub fn spawn_test_dino(world: &mut World) -> Entity {
    let bundle = dino_bundle(
        world.resource::<SessionConfig>(),
        world.resource::<AnimationLibrary>(),
        world.resource::<AssetCatalog>(),
    );
    world.spawn(bundle).id()
}

/// Spawns an obstacle of the given kind with its anchor moved to `x`.
pub fn spawn_test_obstacle(world: &mut World, kind: ObstacleKind, x: f32) -> Entity {
    let mut bundle = build_obstacle(kind, world.resource::<AnimationLibrary>(), world.resource::<AssetCatalog>())
        .expect("Complete catalog builds every obstacle");
    bundle.position = Position(bundle.position.0.with_x(x));
    world.spawn(bundle).id()
}

pub fn send_game_event(world: &mut World, event: GameEvent) {
    world.send_event(event);
}

/// Drains every pending event of type `T`.
pub fn drain_events<T: bevy_ecs::event::Event>(world: &mut World) -> Vec<T> {
    world.resource_mut::<Events<T>>().drain().collect()
}

/// A seeded configuration reading placeholder assets from `asset_dir`.
pub fn test_config(asset_dir: &Path) -> Config {
    ensure_placeholders(asset_dir).expect("Placeholders can be written to a temp dir");
    Config {
        seed: Some(TEST_SEED),
        asset_dir: asset_dir.to_path_buf(),
        autopilot: false,
        ..Config::default()
    }
}
