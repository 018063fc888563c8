//! Creation of session entities: the dinosaur, the ground strip, obstacles and clouds.
//!
//! Spawning never fails. An obstacle that cannot be built is replaced by a plain ground obstacle,
//! and a cloud that cannot be built is simply skipped.

use bevy_ecs::{
    bundle::Bundle,
    event::EventWriter,
    system::{Commands, Res, ResMut},
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::{
    asset::{Asset, AssetCatalog, CactusSize},
    constants::{run, size, CANVAS_SIZE, CLOUD_Y_RANGE, DINO_X, FLIGHT_HEIGHTS, GROUND_Y},
    error::{GameError, SpawnError},
    scene::SessionConfig,
    systems::{
        animation::{AnimationLibrary, BIRD_FLY},
        components::{
            roll_spawn_threshold, Appearance, Cloud, DeltaTime, Dino, GameRng, Ground, Hitbox, Obstacle, ObstacleKind,
            Position, RunState, SessionEntity,
        },
        player::running_look,
    },
};

#[derive(Bundle)]
pub struct DinoBundle {
    pub dino: Dino,
    pub position: Position,
    pub hitbox: Hitbox,
    pub appearance: Appearance,
    pub session: SessionEntity,
}

#[derive(Bundle)]
pub struct GroundBundle {
    pub ground: Ground,
    pub appearance: Appearance,
    pub session: SessionEntity,
}

#[derive(Bundle)]
pub struct ObstacleBundle {
    pub obstacle: Obstacle,
    pub position: Position,
    pub hitbox: Hitbox,
    pub appearance: Appearance,
    pub session: SessionEntity,
}

#[derive(Bundle)]
pub struct CloudBundle {
    pub cloud: Cloud,
    pub position: Position,
    pub hitbox: Hitbox,
    pub appearance: Appearance,
    pub session: SessionEntity,
}

/// The dinosaur standing on the ground line, already running when animations are available.
pub fn dino_bundle(session: &SessionConfig, library: &AnimationLibrary, catalog: &AssetCatalog) -> DinoBundle {
    let (pose, appearance) = running_look(session, library, catalog);
    DinoBundle {
        dino: Dino::new(size::DINO.y, pose),
        position: Position(Vec2::new(DINO_X, GROUND_Y)),
        hitbox: Hitbox::new(size::DINO, Hitbox::BOTTOM_CENTER),
        appearance,
        session: SessionEntity,
    }
}

pub fn ground_bundle(catalog: &AssetCatalog) -> GroundBundle {
    GroundBundle {
        ground: Ground::default(),
        appearance: Appearance::texture_or_default(catalog, Asset::Ground),
        session: SessionEntity,
    }
}

/// Picks the next obstacle kind.
///
/// Flying obstacles are only considered once animations are ready. Ground obstacles draw a number from 1 to 6:
/// 1-3 are small and 4-6 are big, each with variant `((n - 1) % 3) + 1`.
pub fn choose_obstacle(rng: &mut impl Rng, animations_ready: bool) -> ObstacleKind {
    if animations_ready && rng.random_bool(run::FLYING_CHANCE) {
        return ObstacleKind::Flying {
            lane: rng.random_range(0..FLIGHT_HEIGHTS.len()),
        };
    }

    let number: u8 = rng.random_range(1..=6);
    let size = if number <= 3 { CactusSize::Small } else { CactusSize::Big };
    ObstacleKind::Ground {
        size,
        variant: ((number - 1) % 3) + 1,
    }
}

/// Builds an obstacle entering at the right edge of the canvas.
pub fn build_obstacle(
    kind: ObstacleKind,
    library: &AnimationLibrary,
    catalog: &AssetCatalog,
) -> Result<ObstacleBundle, SpawnError> {
    let (position, hitbox_size, appearance) = match kind {
        ObstacleKind::Ground { size: class, variant } => {
            let asset = Asset::cactus(class, variant).ok_or(SpawnError::UnknownVariant(variant))?;
            let texture = catalog.texture(asset).map_err(|_| SpawnError::MissingTexture(asset))?;
            let hitbox_size = match class {
                CactusSize::Small => size::CACTUS_SMALL,
                CactusSize::Big => size::CACTUS_BIG,
            };
            (Vec2::new(CANVAS_SIZE.x, GROUND_Y), hitbox_size, Appearance::Texture(texture))
        }
        ObstacleKind::Flying { lane } => {
            let height = *FLIGHT_HEIGHTS.get(lane).ok_or(SpawnError::UnknownLane(lane))?;
            let appearance = library.play(BIRD_FLY)?;
            (Vec2::new(CANVAS_SIZE.x, height), size::BIRD, appearance)
        }
    };

    Ok(ObstacleBundle {
        obstacle: Obstacle { kind },
        position: Position(position),
        hitbox: Hitbox::new(hitbox_size, Hitbox::BOTTOM_LEFT),
        appearance,
        session: SessionEntity,
    })
}

/// The substitute used when an obstacle cannot be built: a small ground obstacle wearing the idle dinosaur texture.
pub fn fallback_obstacle(catalog: &AssetCatalog) -> ObstacleBundle {
    ObstacleBundle {
        obstacle: Obstacle {
            kind: ObstacleKind::Ground {
                size: CactusSize::Small,
                variant: 1,
            },
        },
        position: Position(Vec2::new(CANVAS_SIZE.x, GROUND_Y)),
        hitbox: Hitbox::new(size::CACTUS_SMALL, Hitbox::BOTTOM_LEFT),
        appearance: Appearance::texture_or_default(catalog, Asset::DinoIdle),
        session: SessionEntity,
    }
}

/// Advances the spawn timer and spawns one obstacle once it reaches a threshold drawn anew every frame.
///
/// Redrawing per frame skews intervals toward the short end of the spawn window.
#[allow(clippy::too_many_arguments)]
pub fn obstacle_spawn_system(
    mut commands: Commands,
    mut run: ResMut<RunState>,
    mut rng: ResMut<GameRng>,
    dt: Res<DeltaTime>,
    session: Res<SessionConfig>,
    library: Res<AnimationLibrary>,
    catalog: Res<AssetCatalog>,
    mut errors: EventWriter<GameError>,
) {
    run.spawn_timer += dt.seconds * 1000.0;
    let threshold = roll_spawn_threshold(&mut rng.0);
    if run.spawn_timer < threshold {
        return;
    }

    let interval_ms = run.spawn_timer;
    run.spawn_timer = 0.0;

    let kind = choose_obstacle(&mut rng.0, session.animations_ready);
    let bundle = match build_obstacle(kind, &library, &catalog) {
        Ok(bundle) => bundle,
        Err(error) => {
            errors.write(GameError::Spawn(error));
            fallback_obstacle(&catalog)
        }
    };

    debug!(kind = ?bundle.obstacle.kind, interval_ms, "Spawning obstacle");
    commands.spawn(bundle);
}

/// Occasionally spawns a decorative cloud somewhere in the upper half of the sky.
pub fn cloud_spawn_system(mut commands: Commands, mut rng: ResMut<GameRng>, catalog: Res<AssetCatalog>) {
    if !rng.0.random_bool(run::CLOUD_CHANCE) {
        return;
    }

    if !catalog.is_loaded(Asset::Cloud) {
        trace!("Skipping cloud, texture unavailable");
        return;
    }

    let y = rng.0.random_range(CLOUD_Y_RANGE);
    commands.spawn(CloudBundle {
        cloud: Cloud,
        position: Position(Vec2::new(CANVAS_SIZE.x, y)),
        hitbox: Hitbox::new(size::CLOUD, Hitbox::CENTER_LEFT),
        appearance: Appearance::Texture(Asset::Cloud),
        session: SessionEntity,
    });
}
