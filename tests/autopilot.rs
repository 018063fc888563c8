use bevy_ecs::{entity::Entity, world::World};
use dino_run::{
    asset::CactusSize,
    autopilot::steer,
    events::{InputEvent, Key},
    systems::{Dino, Hitbox, ObstacleKind, Pose, RunState},
};
use speculoos::prelude::*;

mod common;

const CACTUS: ObstacleKind = ObstacleKind::Ground {
    size: CactusSize::Big,
    variant: 2,
};

fn duck(world: &mut World, dino: Entity) {
    let standing = world.get::<Dino>(dino).unwrap().standing_height;
    world.get_mut::<Dino>(dino).unwrap().pose = Pose::Ducking;
    world.get_mut::<Hitbox>(dino).unwrap().size.y = standing / 2.0;
}

#[test]
fn test_nothing_to_do_on_an_empty_track() {
    let mut world = common::create_test_world();
    common::spawn_test_dino(&mut world);

    assert_that(&steer(&mut world)).is_none();
}

#[test]
fn test_jumps_close_cactus_only() {
    let mut world = common::create_test_world();
    common::spawn_test_dino(&mut world);
    let far = common::spawn_test_obstacle(&mut world, CACTUS, 400.0);

    assert_that(&steer(&mut world)).is_none();

    world.despawn(far);
    common::spawn_test_obstacle(&mut world, CACTUS, 200.0);
    assert_that(&steer(&mut world)).is_equal_to(Some(InputEvent::KeyDown(Key::Space)));
}

#[test]
fn test_ignores_obstacles_behind() {
    let mut world = common::create_test_world();
    common::spawn_test_dino(&mut world);
    common::spawn_test_obstacle(&mut world, CACTUS, 10.0);

    assert_that(&steer(&mut world)).is_none();
}

#[test]
fn test_ducks_under_high_bird() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    common::spawn_test_obstacle(&mut world, ObstacleKind::Flying { lane: 0 }, 140.0);

    assert_that(&steer(&mut world)).is_equal_to(Some(InputEvent::KeyDown(Key::Down)));

    duck(&mut world, dino);
    assert_that(&steer(&mut world)).is_none();
}

#[test]
fn test_jumps_low_bird() {
    let mut world = common::create_test_world();
    common::spawn_test_dino(&mut world);
    common::spawn_test_obstacle(&mut world, ObstacleKind::Flying { lane: 1 }, 180.0);

    assert_that(&steer(&mut world)).is_equal_to(Some(InputEvent::KeyDown(Key::Space)));
}

#[test]
fn test_stands_up_when_nothing_is_overhead() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    duck(&mut world, dino);

    assert_that(&steer(&mut world)).is_equal_to(Some(InputEvent::KeyUp(Key::Down)));

    common::spawn_test_obstacle(&mut world, CACTUS, 200.0);
    assert_that(&steer(&mut world)).is_equal_to(Some(InputEvent::KeyUp(Key::Down)));
}

#[test]
fn test_idle_while_airborne_or_stopped() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    common::spawn_test_obstacle(&mut world, CACTUS, 150.0);

    world.get_mut::<Dino>(dino).unwrap().grounded = false;
    assert_that(&steer(&mut world)).is_none();

    world.get_mut::<Dino>(dino).unwrap().grounded = true;
    world.resource_mut::<RunState>().running = false;
    assert_that(&steer(&mut world)).is_none();
}
