use bevy_ecs::system::RunSystemOnce;
use dino_run::{
    asset::CactusSize,
    constants::{size, GROUND_Y},
    events::GameEvent,
    systems::{
        check_collision, collision_system, Aabb, Dino, Hitbox, ObstacleKind, Pose, Position, SessionEntity,
    },
};
use glam::Vec2;
use speculoos::prelude::*;

mod common;

const SMALL_CACTUS: ObstacleKind = ObstacleKind::Ground {
    size: CactusSize::Small,
    variant: 1,
};

fn collisions(world: &mut bevy_ecs::world::World) -> Vec<GameEvent> {
    world.run_system_once(collision_system).expect("System should run successfully");
    common::drain_events::<GameEvent>(world)
}

#[test]
fn test_aabb_intersection_is_strict() {
    let a = Aabb {
        min: Vec2::ZERO,
        max: Vec2::splat(10.0),
    };
    let overlapping = Aabb {
        min: Vec2::splat(5.0),
        max: Vec2::splat(15.0),
    };
    let touching = Aabb {
        min: Vec2::new(10.0, 0.0),
        max: Vec2::new(20.0, 10.0),
    };

    assert_that(&a.intersects(&overlapping)).is_true();
    assert_that(&overlapping.intersects(&a)).is_true();
    assert_that(&a.intersects(&touching)).is_false();
}

#[test]
fn test_hitbox_anchor() {
    let hitbox = Hitbox::new(size::DINO, Hitbox::BOTTOM_CENTER);
    let aabb = hitbox.aabb(Vec2::new(100.0, GROUND_Y));

    assert_that(&aabb.min).is_equal_to(Vec2::new(78.0, GROUND_Y - 47.0));
    assert_that(&aabb.max).is_equal_to(Vec2::new(122.0, GROUND_Y));
}

#[test]
fn test_check_collision() {
    let dino = (Position(Vec2::new(100.0, GROUND_Y)), Hitbox::new(size::DINO, Hitbox::BOTTOM_CENTER));
    let near = (Position(Vec2::new(110.0, GROUND_Y)), Hitbox::new(size::CACTUS_SMALL, Hitbox::BOTTOM_LEFT));
    let far = (Position(Vec2::new(400.0, GROUND_Y)), Hitbox::new(size::CACTUS_SMALL, Hitbox::BOTTOM_LEFT));

    assert_that(&check_collision(&dino.0, &dino.1, &near.0, &near.1)).is_true();
    assert_that(&check_collision(&dino.0, &dino.1, &far.0, &far.1)).is_false();
}

#[test]
fn test_collision_system_reports_overlap() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    let obstacle = common::spawn_test_obstacle(&mut world, SMALL_CACTUS, 110.0);
    common::spawn_test_obstacle(&mut world, SMALL_CACTUS, 500.0);

    let events = collisions(&mut world);
    assert_that(&events).is_equal_to(vec![GameEvent::Collision(dino, obstacle)]);
}

#[test]
fn test_collision_system_touching_edges() {
    let mut world = common::create_test_world();
    common::spawn_test_dino(&mut world);
    // Dino's right edge is at x = 122
    common::spawn_test_obstacle(&mut world, SMALL_CACTUS, 122.0);

    assert_that(&collisions(&mut world)).is_empty();
}

#[test]
fn test_airborne_dino_clears_cactus() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    world.get_mut::<Position>(dino).expect("Dino has a position").0.y = GROUND_Y - 80.0;
    common::spawn_test_obstacle(&mut world, SMALL_CACTUS, 100.0);

    assert_that(&collisions(&mut world)).is_empty();
}

#[test]
fn test_ducking_passes_under_high_bird() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    common::spawn_test_obstacle(&mut world, ObstacleKind::Flying { lane: 0 }, 90.0);

    // Standing, the high bird hits
    assert_that(&collisions(&mut world)).has_length(1);

    let standing = world.get::<Dino>(dino).expect("Dino exists").standing_height;
    world.get_mut::<Hitbox>(dino).expect("Dino has a hitbox").size.y = standing / 2.0;
    world.get_mut::<Dino>(dino).expect("Dino exists").pose = Pose::Ducking;

    assert_that(&collisions(&mut world)).is_empty();
}

#[test]
fn test_low_bird_hits_ducking_dino() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    let standing = world.get::<Dino>(dino).expect("Dino exists").standing_height;
    world.get_mut::<Hitbox>(dino).expect("Dino has a hitbox").size.y = standing / 2.0;
    common::spawn_test_obstacle(&mut world, ObstacleKind::Flying { lane: 1 }, 90.0);

    assert_that(&collisions(&mut world)).has_length(1);
}

#[test]
fn test_off_screen_obstacles_never_collide() {
    let mut world = common::create_test_world();
    // A dino pushed past the left edge, overlapping an obstacle that has fully scrolled off
    world.spawn((
        Dino::new(size::DINO.y, Pose::Running),
        Position(Vec2::new(-30.0, GROUND_Y)),
        Hitbox::new(size::DINO, Hitbox::BOTTOM_CENTER),
        SessionEntity,
    ));
    common::spawn_test_obstacle(&mut world, SMALL_CACTUS, -20.0);

    assert_that(&collisions(&mut world)).is_empty();
}
