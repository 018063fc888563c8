use bevy_ecs::{component::Component, resource::Resource};
use glam::Vec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::asset::{Asset, AssetCatalog, CactusSize};
use crate::constants::run;
use crate::scene::{GameMode, GameOverSummary, ScoreTiming};
use crate::systems::animation::{AnimationLibrary, AnimationPlayer};

/// Where an entity sits on the canvas. What point of the entity this is depends on its [`Hitbox`] origin.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// An axis-aligned bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Strict overlap; boxes that merely touch along an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && other.min.x < self.max.x && self.min.y < other.max.y && other.min.y < self.max.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            max: center + size / 2.0,
        }
    }
}

/// The collision rectangle of an entity.
///
/// `origin` is the normalized anchor the entity's [`Position`] refers to: `(0, 1)` is the bottom-left corner,
/// `(0.5, 1)` the bottom-center.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub size: Vec2,
    pub origin: Vec2,
}

impl Hitbox {
    pub const BOTTOM_LEFT: Vec2 = Vec2::new(0.0, 1.0);
    pub const BOTTOM_CENTER: Vec2 = Vec2::new(0.5, 1.0);
    pub const CENTER_LEFT: Vec2 = Vec2::new(0.0, 0.5);

    pub fn new(size: Vec2, origin: Vec2) -> Self {
        Self { size, origin }
    }

    pub fn aabb(&self, position: Vec2) -> Aabb {
        let min = position - self.size * self.origin;
        Aabb {
            min,
            max: min + self.size,
        }
    }
}

/// The dinosaur's visible stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    Idle,
    Running,
    Ducking,
    Hurt,
}

/// The player-controlled dinosaur.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Dino {
    /// Vertical velocity in px/s, positive downward.
    pub vertical_velocity: f32,
    pub pose: Pose,
    pub grounded: bool,
    /// Hitbox height while standing, restored exactly when a duck ends.
    pub standing_height: f32,
}

impl Dino {
    pub fn new(standing_height: f32, pose: Pose) -> Self {
        Self {
            vertical_velocity: 0.0,
            pose,
            grounded: true,
            standing_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    /// A cactus standing on the ground line.
    Ground { size: CactusSize, variant: u8 },
    /// A bird in one of the flight lanes (0 is the high lane).
    Flying { lane: usize },
}

/// Anything the dinosaur must avoid.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
}

/// Decorative background cloud. Scrolls at half speed and never collides.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cloud;

/// The scrolling ground strip.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Ground {
    /// Horizontal texture offset, in pixels.
    pub offset: f32,
}

/// Tag component for everything that belongs to one play session and is discarded on restart.
#[derive(Component, Debug, Clone, Copy)]
pub struct SessionEntity;

/// How an entity is drawn.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum Appearance {
    Texture(Asset),
    Animated(AnimationPlayer),
    /// The engine's placeholder texture, used when nothing better is available.
    Default,
}

impl Appearance {
    /// A static texture if it loaded, otherwise the engine default.
    pub fn texture_or_default(catalog: &AssetCatalog, asset: Asset) -> Self {
        match catalog.texture(asset) {
            Ok(asset) => Appearance::Texture(asset),
            Err(_) => Appearance::Default,
        }
    }

    /// The texture to draw this frame, or `None` for the engine default.
    pub fn current_texture(&self, library: &AnimationLibrary) -> Option<Asset> {
        match self {
            Appearance::Texture(asset) => Some(*asset),
            Appearance::Animated(player) => player.texture(library),
            Appearance::Default => None,
        }
    }
}

/// What a [`Delayed`] entity does when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayedAction {
    /// End a tap-duck.
    Stand,
    /// Hand the finished session over to the game-over screen.
    ShowGameOver(GameOverSummary),
}

/// Component for one-shot timed callbacks; the entity is despawned once it fires.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Delayed {
    pub remaining: f32,
    pub action: DelayedAction,
}

impl Delayed {
    pub fn new(seconds: f32, action: DelayedAction) -> Self {
        Self {
            remaining: seconds,
            action,
        }
    }
}

#[derive(Resource)]
pub struct GlobalState {
    pub exit: bool,
}

#[derive(Resource)]
pub struct DeltaTime {
    /// Floating-point delta time in seconds
    pub seconds: f32,
    /// Integer tick delta (usually 1, but can be different for testing)
    pub ticks: u32,
}

impl DeltaTime {
    /// Creates a new DeltaTime from a floating-point delta time in seconds
    ///
    /// While this method exists as a helper, it does not mean that seconds and ticks are interchangeable.
    pub fn from_seconds(seconds: f32) -> Self {
        Self {
            seconds,
            ticks: (seconds * 60.0).round() as u32,
        }
    }

    /// Creates a new DeltaTime from an integer tick delta
    ///
    /// While this method exists as a helper, it does not mean that seconds and ticks are interchangeable.
    pub fn from_ticks(ticks: u32) -> Self {
        Self {
            seconds: ticks as f32 / 60.0,
            ticks,
        }
    }

    /// Number of 60 Hz frames this delta stands for under the given timing model.
    pub fn frames(&self, timing: ScoreTiming) -> f32 {
        match timing {
            ScoreTiming::PerFrame => self.ticks as f32,
            ScoreTiming::Elapsed => self.seconds * 60.0,
        }
    }
}

/// Random source for all gameplay decisions.
#[derive(Resource, Debug)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(SmallRng::seed_from_u64(rand::random()))
    }
}

/// Per-session simulation state.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RunState {
    /// Scroll speed in px per frame. Never decreases within a session.
    pub speed: f32,
    pub score: f64,
    /// Milliseconds since the last obstacle spawn.
    pub spawn_timer: f32,
    pub running: bool,
    pub mode: GameMode,
    /// Number of speed milestones already applied.
    pub milestones: u32,
}

impl RunState {
    pub fn new(mode: GameMode) -> Self {
        Self {
            speed: run::INITIAL_SPEED,
            score: 0.0,
            spawn_timer: 0.0,
            running: true,
            mode,
            milestones: 0,
        }
    }

    /// The score as shown to the player.
    pub fn display_score(&self) -> u32 {
        self.score.floor() as u32
    }
}

/// Draws a spawn threshold from the spawn window. A fresh one is drawn every frame.
pub fn roll_spawn_threshold(rng: &mut impl Rng) -> f32 {
    rng.random_range(run::SPAWN_INTERVAL_MS)
}
