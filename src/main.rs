//! Headless driver: plays sessions at a fixed 60 Hz, optionally steered by the autopilot.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use dino_run::{
    autopilot,
    config::load_config,
    constants::LOOP_TIME,
    events::{InputEvent, Key},
    game::Game,
    ledger::{
        notify::{notification_channel, spawn_dispatcher, LogNotifier},
        Ledger,
    },
    logging::setup_logging,
    persist::MemoryStore,
    scene::SceneKind,
};
use thousands::Separable;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Ten minutes of play at 60 Hz; a session still running after this is abandoned.
const MAX_SESSION_FRAMES: u64 = 60 * 60 * 10;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let config = load_config().context("Invalid configuration")?;
    debug!(?config, "Configuration loaded");

    let runtime = tokio::runtime::Runtime::new().context("Could not start async runtime")?;
    let guard = runtime.enter();

    let (sender, receiver) = notification_channel();
    let ledger = Arc::new(Ledger::new(sender, config.high_score_subscribers.clone()));
    if let Some(player) = &config.player {
        ledger.set_current_player(player.id.clone(), player.name.clone());
    }
    let dispatcher = spawn_dispatcher(Arc::new(LogNotifier), receiver);

    let mut game = Game::new(&config, Arc::new(MemoryStore::default()), Some(Arc::clone(&ledger)));

    info!(loop_time = ?LOOP_TIME, sessions = config.sessions, autopilot = config.autopilot, "Starting game loop");

    let mut finished = 0;
    let mut session_frames = 0u64;
    let mut last_scene = game.scene();
    loop {
        let start = Instant::now();

        if config.autopilot {
            if let Some(input) = autopilot::steer(game.world_mut()) {
                game.handle_input(input);
            }
        }

        if game.tick(LOOP_TIME.as_secs_f32()) {
            info!("Exit requested");
            break;
        }

        let scene = game.scene();
        if scene != last_scene && scene == SceneKind::GameOver {
            finished += 1;
            if let Some(summary) = game.summary() {
                info!(
                    session = finished,
                    score = summary.score.separate_with_commas(),
                    high_score = summary.high_score.separate_with_commas(),
                    "Session finished"
                );
            }

            if finished >= config.sessions {
                break;
            }
            game.handle_input(InputEvent::KeyDown(Key::Space));
        }
        last_scene = game.scene();

        session_frames = if last_scene == SceneKind::Play { session_frames + 1 } else { 0 };
        if session_frames >= MAX_SESSION_FRAMES {
            warn!(frames = session_frames, "Session ran too long, stopping");
            break;
        }

        if let Some(remaining) = LOOP_TIME.checked_sub(start.elapsed()) {
            spin_sleep::sleep(remaining);
        }
    }

    if let Some(ttl) = config.challenge_ttl {
        ledger.expire_stale_challenges(OffsetDateTime::now_utc(), ttl);
    }

    for (rank, entry) in ledger.leaderboard().iter().enumerate() {
        info!(
            rank = rank + 1,
            player = %entry.player_id,
            name = entry.player_name.as_deref().unwrap_or("-"),
            score = entry.score.separate_with_commas(),
            "Leaderboard"
        );
    }

    // Dropping the last sender lets the dispatcher drain the queue and finish.
    drop(game);
    drop(ledger);
    drop(guard);
    let delivered = runtime.block_on(dispatcher).context("Notification dispatcher panicked")?;
    info!(delivered, "Notifications delivered");

    Ok(())
}
