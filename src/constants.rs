//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::Vec2;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of the play surface, in pixels.
pub const CANVAS_SIZE: Vec2 = Vec2::new(800.0, 300.0);
/// Distance from the bottom of the canvas to the ground line.
pub const GROUND_HEIGHT: f32 = 60.0;
/// The y coordinate of the ground line that everything stands on.
pub const GROUND_Y: f32 = CANVAS_SIZE.y - GROUND_HEIGHT;

/// Horizontal position of the dinosaur; it never moves along x.
pub const DINO_X: f32 = 100.0;

/// Hitbox sizes, in pixels.
pub mod size {
    use glam::Vec2;

    pub const DINO: Vec2 = Vec2::new(44.0, 47.0);
    pub const CACTUS_SMALL: Vec2 = Vec2::new(17.0, 35.0);
    pub const CACTUS_BIG: Vec2 = Vec2::new(25.0, 50.0);
    pub const BIRD: Vec2 = Vec2::new(46.0, 40.0);
    pub const CLOUD: Vec2 = Vec2::new(46.0, 14.0);
    pub const RESTART_BUTTON: Vec2 = Vec2::new(72.0, 32.0);
}

/// Tuning values for the run loop.
pub mod run {
    use std::ops::Range;

    /// Scroll speed at the start of every session, in pixels per frame.
    pub const INITIAL_SPEED: f32 = 10.0;
    /// Speed added each time the score crosses a milestone.
    pub const SPEED_STEP: f32 = 0.5;
    /// Score interval between speed increases.
    pub const SPEED_MILESTONE: u32 = 100;
    /// Score gained per frame.
    pub const SCORE_PER_FRAME: f64 = 0.05;
    /// Window the obstacle spawn threshold is drawn from, in milliseconds.
    pub const SPAWN_INTERVAL_MS: Range<f32> = 1500.0..3000.0;
    /// Per-frame probability of spawning a decorative cloud.
    pub const CLOUD_CHANCE: f64 = 0.01;
    /// Probability that a spawned obstacle flies, once animations are available.
    pub const FLYING_CHANCE: f64 = 0.1;
}

/// Dinosaur physics.
pub mod physics {
    /// Downward acceleration applied while airborne, in px/s².
    pub const GRAVITY: f32 = 3000.0;
    /// Upward velocity applied by a jump, in px/s.
    pub const JUMP_VELOCITY: f32 = 800.0;
}

/// Delays for one-shot timed actions, in seconds.
pub mod delay {
    /// How long a tap-duck lasts before the dinosaur stands back up.
    pub const DUCK_RELEASE: f32 = 0.5;
    /// Time between the fatal collision and the game-over screen.
    pub const GAME_OVER: f32 = 1.0;
}

/// Bottom edges of the two lanes a flying obstacle can use.
pub const FLIGHT_HEIGHTS: [f32; 2] = [GROUND_Y - 30.0, GROUND_Y];

/// Vertical range clouds are placed in.
pub const CLOUD_Y_RANGE: std::ops::RangeInclusive<f32> = 30.0..=(CANVAS_SIZE.y / 2.0);

/// Center of the restart control on the game-over screen.
pub const RESTART_BUTTON_CENTER: Vec2 = Vec2::new(CANVAS_SIZE.x / 2.0, CANVAS_SIZE.y / 2.0 + 120.0);

/// Key under which the local high score is persisted.
pub const HIGH_SCORE_KEY: &str = "dinoHighScore";

/// Number of entries returned by leaderboard queries.
pub const LEADERBOARD_SIZE: usize = 10;
