use bevy_ecs::{
    event::{EventReader, EventWriter},
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, warn};

use crate::{
    asset::{Asset, AssetCatalog},
    constants::{delay, physics, CANVAS_SIZE, GROUND_Y},
    error::GameError,
    events::{GameCommand, GameEvent},
    scene::SessionConfig,
    systems::{
        animation::{AnimationLibrary, DINO_RUN},
        Appearance, Delayed, DelayedAction, DeltaTime, Dino, GlobalState, Hitbox, Pose, Position, RunState,
        SessionEntity,
    },
};

/// The running pose and its appearance, degraded to a static texture when animations are unavailable.
pub fn running_look(session: &SessionConfig, library: &AnimationLibrary, catalog: &AssetCatalog) -> (Pose, Appearance) {
    if !session.animations_ready {
        return (Pose::Idle, Appearance::texture_or_default(catalog, Asset::DinoIdle));
    }

    match library.play(DINO_RUN) {
        Ok(appearance) => (Pose::Running, appearance),
        Err(error) => {
            warn!(%error, "Falling back to static texture for running pose");
            (Pose::Idle, Appearance::texture_or_default(catalog, Asset::DinoIdle))
        }
    }
}

/// Applies an upward impulse. Returns false (and changes nothing) unless the dinosaur is on the ground.
pub fn jump(dino: &mut Dino, hitbox: &mut Hitbox, appearance: &mut Appearance, catalog: &AssetCatalog) -> bool {
    if !dino.grounded {
        return false;
    }

    dino.vertical_velocity = -physics::JUMP_VELOCITY;
    dino.grounded = false;
    dino.pose = Pose::Idle;
    hitbox.size.y = dino.standing_height;
    *appearance = Appearance::texture_or_default(catalog, Asset::DinoIdle);
    true
}

/// Crouches, halving the hitbox height. Only possible on the ground.
pub fn duck(dino: &mut Dino, hitbox: &mut Hitbox, appearance: &mut Appearance, catalog: &AssetCatalog) -> bool {
    if !dino.grounded {
        return false;
    }

    dino.pose = Pose::Ducking;
    hitbox.size.y = dino.standing_height / 2.0;
    *appearance = Appearance::texture_or_default(catalog, Asset::DinoDuck);
    true
}

/// Returns to the running pose with the full standing hitbox. Only possible on the ground.
pub fn stand(dino: &mut Dino, hitbox: &mut Hitbox, appearance: &mut Appearance, look: (Pose, Appearance)) -> bool {
    if !dino.grounded {
        return false;
    }

    let (pose, running) = look;
    dino.pose = pose;
    hitbox.size.y = dino.standing_height;
    *appearance = running;
    true
}

/// Processes player commands.
///
/// Exit requests are honored at any time; movement commands only while the session is running.
/// A tap on the upper half of the play surface jumps, a tap on the lower half ducks and schedules a stand.
#[allow(clippy::too_many_arguments)]
pub fn player_control_system(
    mut commands: Commands,
    mut events: EventReader<GameEvent>,
    mut state: ResMut<GlobalState>,
    run: Option<Res<RunState>>,
    session: Res<SessionConfig>,
    library: Res<AnimationLibrary>,
    catalog: Res<AssetCatalog>,
    mut dinos: Query<(&mut Dino, &mut Hitbox, &mut Appearance)>,
    mut errors: EventWriter<GameError>,
) {
    let allow_input = run.is_some_and(|run| run.running);

    for event in events.read() {
        let GameEvent::Command(command) = event else {
            continue;
        };

        if *command == GameCommand::Exit {
            state.exit = true;
            continue;
        }

        if !allow_input {
            continue;
        }

        let (mut dino, mut hitbox, mut appearance) = match dinos.single_mut() {
            Ok(tuple) => tuple,
            Err(e) => {
                errors.write(GameError::InvalidState(format!(
                    "No/multiple entities queried for player system: {}",
                    e
                )));
                return;
            }
        };

        let applied = match *command {
            GameCommand::Jump => jump(&mut dino, &mut hitbox, &mut appearance, &catalog),
            GameCommand::Duck => duck(&mut dino, &mut hitbox, &mut appearance, &catalog),
            GameCommand::Stand => {
                let look = running_look(&session, &library, &catalog);
                stand(&mut dino, &mut hitbox, &mut appearance, look)
            }
            GameCommand::Tap(point) if point.y < CANVAS_SIZE.y / 2.0 => {
                jump(&mut dino, &mut hitbox, &mut appearance, &catalog)
            }
            GameCommand::Tap(_) => {
                let ducked = duck(&mut dino, &mut hitbox, &mut appearance, &catalog);
                if ducked {
                    commands.spawn((Delayed::new(delay::DUCK_RELEASE, DelayedAction::Stand), SessionEntity));
                }
                ducked
            }
            GameCommand::Exit => false,
        };

        if !applied {
            debug!(?command, "Ignored command while airborne");
        }
    }
}

/// Integrates gravity for an airborne dinosaur and lands it on the ground line.
pub fn dino_physics_system(
    dt: Res<DeltaTime>,
    session: Res<SessionConfig>,
    library: Res<AnimationLibrary>,
    catalog: Res<AssetCatalog>,
    mut query: Query<(&mut Dino, &mut Position, &mut Hitbox, &mut Appearance)>,
) {
    for (mut dino, mut position, mut hitbox, mut appearance) in query.iter_mut() {
        if dino.grounded {
            continue;
        }

        dino.vertical_velocity += physics::GRAVITY * dt.seconds;
        position.0.y += dino.vertical_velocity * dt.seconds;

        if position.0.y >= GROUND_Y {
            position.0.y = GROUND_Y;
            dino.vertical_velocity = 0.0;
            dino.grounded = true;

            let look = running_look(&session, &library, &catalog);
            stand(&mut dino, &mut hitbox, &mut appearance, look);
            debug!("Dino landed");
        }
    }
}
