use bevy_ecs::entity::Entity;
use bevy_ecs::query::{Or, With, Without};
use bevy_ecs::system::{Commands, Query, Res};
use tracing::trace;

use crate::scene::SessionConfig;
use crate::systems::components::{Cloud, DeltaTime, Ground, Hitbox, Obstacle, Position, RunState};

/// Whether an entity's trailing edge has passed the left boundary of the canvas.
pub fn is_off_screen(position: &Position, hitbox: &Hitbox) -> bool {
    hitbox.aabb(position.0).max.x < 0.0
}

/// Scrolls the ground texture, obstacles at full speed and clouds at half speed.
pub fn scroll_system(
    run: Res<RunState>,
    dt: Res<DeltaTime>,
    session: Res<SessionConfig>,
    mut grounds: Query<&mut Ground>,
    mut obstacles: Query<&mut Position, (With<Obstacle>, Without<Cloud>)>,
    mut clouds: Query<&mut Position, (With<Cloud>, Without<Obstacle>)>,
) {
    let distance = run.speed * dt.frames(session.score_timing);

    for mut ground in grounds.iter_mut() {
        ground.offset += distance;
    }

    for mut position in obstacles.iter_mut() {
        position.0.x -= distance;
    }

    for mut position in clouds.iter_mut() {
        position.0.x -= distance / 2.0;
    }
}

/// Despawns obstacles and clouds that have fully scrolled off the left edge.
pub fn cleanup_system(
    mut commands: Commands,
    query: Query<(Entity, &Position, &Hitbox), Or<(With<Obstacle>, With<Cloud>)>>,
) {
    for (entity, position, hitbox) in query.iter() {
        if is_off_screen(position, hitbox) {
            trace!(?entity, x = position.0.x, "Despawning off-screen entity");
            commands.entity(entity).despawn();
        }
    }
}
