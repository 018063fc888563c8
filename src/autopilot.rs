//! A simple bot that plays the run loop, used by the headless driver.

use bevy_ecs::world::World;

use crate::events::{InputEvent, Key};
use crate::systems::{Aabb, Dino, Hitbox, Obstacle, ObstacleKind, Pose, Position, RunState};

/// Frames of warning the bot wants before an obstacle reaches the dinosaur.
const JUMP_LEAD_FRAMES: f32 = 10.0;
const DUCK_LEAD_FRAMES: f32 = 3.0;

/// Picks the input that avoids the nearest obstacle ahead, if any is needed this frame.
///
/// Ground obstacles and low birds are jumped over. High birds are ducked under, and the bot stands back up
/// once nothing overhead is close.
pub fn steer(world: &mut World) -> Option<InputEvent> {
    let speed = world.get_resource::<RunState>().filter(|run| run.running)?.speed;

    let (dino, dino_box) = {
        let mut query = world.query::<(&Dino, &Position, &Hitbox)>();
        let (dino, position, hitbox) = query.single(world).ok()?;
        (*dino, Hitbox::new(hitbox.size.with_y(dino.standing_height), hitbox.origin).aabb(position.0))
    };

    if !dino.grounded {
        return None;
    }

    let nearest = world
        .query::<(&Obstacle, &Position, &Hitbox)>()
        .iter(world)
        .map(|(obstacle, position, hitbox)| (obstacle.kind, hitbox.aabb(position.0)))
        .filter(|(_, aabb)| aabb.max.x >= dino_box.min.x)
        .min_by(|(_, a), (_, b)| a.min.x.total_cmp(&b.min.x));

    let ducking = dino.pose == Pose::Ducking;
    let Some((kind, aabb)) = nearest else {
        return ducking.then_some(InputEvent::KeyUp(Key::Down));
    };

    let gap = aabb.min.x - dino_box.max.x;
    if passes_overhead(kind, &aabb, &dino_box) {
        return match (ducking, gap <= speed * DUCK_LEAD_FRAMES) {
            (false, true) => Some(InputEvent::KeyDown(Key::Down)),
            _ => None,
        };
    }

    if ducking {
        return Some(InputEvent::KeyUp(Key::Down));
    }

    (gap <= speed * JUMP_LEAD_FRAMES).then_some(InputEvent::KeyDown(Key::Space))
}

/// A high bird clears a ducking dinosaur, so ducking is the safer answer to it.
fn passes_overhead(kind: ObstacleKind, obstacle: &Aabb, standing: &Aabb) -> bool {
    let ducking_top = standing.max.y - (standing.max.y - standing.min.y) / 2.0;
    matches!(kind, ObstacleKind::Flying { .. }) && obstacle.max.y <= ducking_top
}
