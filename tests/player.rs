use bevy_ecs::{entity::Entity, event::Events, system::RunSystemOnce, world::World};
use dino_run::{
    asset::Asset,
    constants::{delay, physics, size, CANVAS_SIZE, GROUND_Y},
    events::{GameCommand, GameEvent},
    systems::{
        delayed_action_system, dino_physics_system, player_control_system, Appearance, Delayed, DelayedAction,
        DeltaTime, Dino, GlobalState, Hitbox, Pose, Position, RunState,
    },
};
use glam::Vec2;
use speculoos::prelude::*;

mod common;

fn command(world: &mut World, command: GameCommand) {
    common::send_game_event(world, GameEvent::Command(command));
    world
        .run_system_once(player_control_system)
        .expect("System should run successfully");
    world.resource_mut::<Events<GameEvent>>().clear();
}

fn dino_state(world: &World, dino: Entity) -> (Dino, Hitbox, Position) {
    (
        *world.get::<Dino>(dino).expect("Dino exists"),
        *world.get::<Hitbox>(dino).expect("Dino has a hitbox"),
        *world.get::<Position>(dino).expect("Dino has a position"),
    )
}

#[test]
fn test_dino_starts_running_on_the_ground() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    let (state, hitbox, position) = dino_state(&world, dino);
    assert_that(&state.grounded).is_true();
    assert_that(&state.pose).is_equal_to(Pose::Running);
    assert_that(&hitbox.size).is_equal_to(size::DINO);
    assert_that(&position.0.y).is_equal_to(GROUND_Y);
    assert_that(&matches!(world.get::<Appearance>(dino), Some(Appearance::Animated(_)))).is_true();
}

#[test]
fn test_jump_applies_impulse() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Jump);

    let (state, hitbox, _) = dino_state(&world, dino);
    assert_that(&state.grounded).is_false();
    assert_that(&state.vertical_velocity).is_equal_to(-physics::JUMP_VELOCITY);
    assert_that(&hitbox.size.y).is_equal_to(size::DINO.y);
}

#[test]
fn test_jump_while_airborne_is_ignored() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Jump);
    world.get_mut::<Dino>(dino).expect("Dino exists").vertical_velocity = 120.0;
    command(&mut world, GameCommand::Jump);

    assert_that(&dino_state(&world, dino).0.vertical_velocity).is_equal_to(120.0);
}

#[test]
fn test_duck_halves_hitbox_and_stand_restores_it() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Duck);
    let (state, hitbox, _) = dino_state(&world, dino);
    assert_that(&state.pose).is_equal_to(Pose::Ducking);
    assert_that(&hitbox.size.y).is_equal_to(size::DINO.y / 2.0);
    assert_that(&world.get::<Appearance>(dino).cloned()).is_equal_to(Some(Appearance::Texture(Asset::DinoDuck)));

    command(&mut world, GameCommand::Stand);
    let (state, hitbox, _) = dino_state(&world, dino);
    assert_that(&state.pose).is_equal_to(Pose::Running);
    assert_that(&hitbox.size.y).is_equal_to(size::DINO.y);
}

#[test]
fn test_duck_while_airborne_is_ignored() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Jump);
    command(&mut world, GameCommand::Duck);

    let (state, hitbox, _) = dino_state(&world, dino);
    assert_that(&state.pose).is_not_equal_to(Pose::Ducking);
    assert_that(&hitbox.size.y).is_equal_to(size::DINO.y);
}

#[test]
fn test_jump_from_duck_restores_standing_hitbox() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Duck);
    command(&mut world, GameCommand::Jump);

    assert_that(&dino_state(&world, dino).1.size.y).is_equal_to(size::DINO.y);
}

#[test]
fn test_tap_upper_half_jumps() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Tap(Vec2::new(400.0, CANVAS_SIZE.y / 2.0 - 1.0)));

    assert_that(&dino_state(&world, dino).0.grounded).is_false();
}

#[test]
fn test_tap_lower_half_ducks_then_stands() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Tap(Vec2::new(400.0, CANVAS_SIZE.y / 2.0)));
    assert_that(&dino_state(&world, dino).0.pose).is_equal_to(Pose::Ducking);

    let pending: Vec<DelayedAction> = world.query::<&Delayed>().iter(&world).map(|delayed| delayed.action).collect();
    assert_that(&pending).is_equal_to(vec![DelayedAction::Stand]);

    // Not yet
    world.insert_resource(DeltaTime::from_seconds(delay::DUCK_RELEASE / 2.0));
    world.run_system_once(delayed_action_system).expect("System should run successfully");
    assert_that(&common::drain_events::<GameEvent>(&mut world)).is_empty();

    world.insert_resource(DeltaTime::from_seconds(delay::DUCK_RELEASE));
    world.run_system_once(delayed_action_system).expect("System should run successfully");
    world.run_system_once(player_control_system).expect("System should run successfully");

    assert_that(&dino_state(&world, dino).0.pose).is_equal_to(Pose::Running);
    assert_that(&world.query::<&Delayed>().iter(&world).count()).is_equal_to(0);
}

#[test]
fn test_commands_ignored_once_run_stops() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);
    world.resource_mut::<RunState>().running = false;

    command(&mut world, GameCommand::Jump);
    command(&mut world, GameCommand::Duck);

    let (state, _, _) = dino_state(&world, dino);
    assert_that(&state.grounded).is_true();
    assert_that(&state.pose).is_equal_to(Pose::Running);
}

#[test]
fn test_exit_command_always_honored() {
    let mut world = common::create_test_world();
    common::spawn_test_dino(&mut world);
    world.resource_mut::<RunState>().running = false;

    command(&mut world, GameCommand::Exit);

    assert_that(&world.resource::<GlobalState>().exit).is_true();
}

#[test]
fn test_jump_arc_lands_on_ground_line() {
    let mut world = common::create_test_world();
    let dino = common::spawn_test_dino(&mut world);

    command(&mut world, GameCommand::Jump);
    world.run_system_once(dino_physics_system).expect("System should run successfully");
    let (_, _, position) = dino_state(&world, dino);
    assert_that(&position.0.y).is_less_than(GROUND_Y);

    let mut frames = 1;
    while !dino_state(&world, dino).0.grounded && frames < 120 {
        world.run_system_once(dino_physics_system).expect("System should run successfully");
        frames += 1;
    }

    let (state, hitbox, position) = dino_state(&world, dino);
    assert_that(&state.grounded).is_true();
    assert_that(&state.vertical_velocity).is_equal_to(0.0);
    assert_that(&state.pose).is_equal_to(Pose::Running);
    assert_that(&position.0.y).is_equal_to(GROUND_Y);
    assert_that(&hitbox.size.y).is_equal_to(size::DINO.y);
    // About 32 frames at 60 Hz
    assert_that(&frames).is_greater_than(20);
    assert_that(&frames).is_less_than(45);
}
