use bevy_ecs::{schedule::Schedule, system::RunSystemOnce};
use dino_run::{
    scene::GameMode,
    systems::{hud_system, Hud, RunState},
};
use pretty_assertions::assert_eq;

mod common;

#[test]
fn test_hud_shows_padded_score_and_mode() {
    let mut world = common::create_test_world();
    world.resource_mut::<RunState>().score = 42.9;

    world.run_system_once(hud_system).expect("System should run successfully");

    assert_eq!(
        *world.resource::<Hud>(),
        Hud {
            score_text: "00042".to_string(),
            mode_label: "SOLO MODE",
        }
    );
}

#[test]
fn test_hud_follows_mode() {
    let mut world = common::create_test_world();
    world.resource_mut::<RunState>().mode = GameMode::Challenge;

    world.run_system_once(hud_system).expect("System should run successfully");

    assert_eq!(world.resource::<Hud>().mode_label, "CHALLENGE MODE");
    assert_eq!(world.resource::<Hud>().score_text, "00000");
}

#[test]
fn test_hud_tracks_score_across_frames() {
    let mut world = common::create_test_world();
    let mut schedule = Schedule::default();
    schedule.add_systems(hud_system);

    schedule.run(&mut world);
    assert_eq!(world.resource::<Hud>().score_text, "00000");

    world.resource_mut::<RunState>().score = 117.4;
    schedule.run(&mut world);
    assert_eq!(world.resource::<Hud>().score_text, "00117");

    // Unchanged run state leaves the text alone
    world.resource_mut::<Hud>().score_text = "stale".to_string();
    schedule.run(&mut world);
    assert_eq!(world.resource::<Hud>().score_text, "stale");
}
