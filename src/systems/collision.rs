use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::With;
use bevy_ecs::system::Query;

use crate::events::GameEvent;
use crate::systems::components::{Dino, Hitbox, Obstacle, Position};

/// Helper function to check collision between two entities with hitboxes.
pub fn check_collision(pos1: &Position, hitbox1: &Hitbox, pos2: &Position, hitbox2: &Hitbox) -> bool {
    hitbox1.aabb(pos1.0).intersects(&hitbox2.aabb(pos2.0))
}

/// Detects the dinosaur overlapping an obstacle and emits a `GameEvent::Collision` for each overlap.
///
/// Obstacles whose trailing edge is already past the left boundary are never tested, even if their
/// despawn has not been applied yet.
pub fn collision_system(
    dino_query: Query<(Entity, &Position, &Hitbox), With<Dino>>,
    obstacle_query: Query<(Entity, &Position, &Hitbox), With<Obstacle>>,
    mut events: EventWriter<GameEvent>,
) {
    for (dino_entity, dino_pos, dino_hitbox) in dino_query.iter() {
        for (obstacle_entity, obstacle_pos, obstacle_hitbox) in obstacle_query.iter() {
            if obstacle_hitbox.aabb(obstacle_pos.0).max.x < 0.0 {
                continue;
            }

            if check_collision(dino_pos, dino_hitbox, obstacle_pos, obstacle_hitbox) {
                events.write(GameEvent::Collision(dino_entity, obstacle_entity));
            }
        }
    }
}
