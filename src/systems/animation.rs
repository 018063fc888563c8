use std::collections::HashMap;

use bevy_ecs::{
    resource::Resource,
    system::{Query, Res},
};
use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::asset::{Asset, AssetCatalog};
use crate::error::{AssetError, SpawnError};
use crate::systems::{Appearance, DeltaTime};

pub const DINO_RUN: &str = "dino-run";
pub const BIRD_FLY: &str = "bird-fly";

/// A looping sequence of textures played at a fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub frames: SmallVec<[Asset; 4]>,
    pub fps: f32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.fps
    }
}

/// All animation clips the game can play, keyed by name.
///
/// An empty library means animations are unavailable and every pose falls back to a static texture.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationLibrary {
    clips: HashMap<&'static str, AnimationClip>,
}

impl AnimationLibrary {
    /// Builds every clip from the loaded textures.
    ///
    /// Fails if any clip's source texture is missing; callers treat that as "animations not ready".
    pub fn build(catalog: &AssetCatalog) -> Result<Self, AssetError> {
        let mut clips = HashMap::new();

        for (name, source, fps) in [(DINO_RUN, Asset::DinoIdle, 10.0), (BIRD_FLY, Asset::DinoDuck, 6.0)] {
            if !catalog.is_loaded(source) {
                return Err(AssetError::AnimationSource { clip: name, asset: source });
            }

            clips.insert(
                name,
                AnimationClip {
                    frames: smallvec![source, source],
                    fps,
                    looping: true,
                },
            );
            debug!(clip = name, fps, "Animation clip created");
        }

        Ok(Self { clips })
    }

    pub fn is_ready(&self) -> bool {
        !self.clips.is_empty()
    }

    pub fn clip(&self, name: &'static str) -> Result<&AnimationClip, SpawnError> {
        self.clips.get(name).ok_or(SpawnError::MissingClip(name))
    }

    /// Starts a clip from its first frame.
    pub fn play(&self, name: &'static str) -> Result<Appearance, SpawnError> {
        self.clip(name)?;
        Ok(Appearance::Animated(AnimationPlayer::new(name)))
    }
}

/// Playback state of one clip on one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlayer {
    pub clip: &'static str,
    pub frame: usize,
    pub elapsed: f32,
}

impl AnimationPlayer {
    pub fn new(clip: &'static str) -> Self {
        Self {
            clip,
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Advances playback by `seconds`, wrapping looping clips and holding the last frame otherwise.
    pub fn advance(&mut self, clip: &AnimationClip, seconds: f32) {
        if clip.frames.is_empty() || clip.fps <= 0.0 {
            return;
        }

        self.elapsed += seconds;
        let frame_duration = clip.frame_duration();
        while self.elapsed >= frame_duration {
            self.elapsed -= frame_duration;
            if clip.looping {
                self.frame = (self.frame + 1) % clip.frames.len();
            } else {
                self.frame = (self.frame + 1).min(clip.frames.len() - 1);
            }
        }
    }

    pub fn texture(&self, library: &AnimationLibrary) -> Option<Asset> {
        library.clip(self.clip).ok()?.frames.get(self.frame).copied()
    }
}

/// Advances every playing clip. Only scheduled while the session runs, which pauses all animation on game over.
pub fn animation_system(dt: Res<DeltaTime>, library: Res<AnimationLibrary>, mut query: Query<&mut Appearance>) {
    for mut appearance in query.iter_mut() {
        if let Appearance::Animated(player) = &mut *appearance {
            if let Ok(clip) = library.clip(player.clip) {
                player.advance(clip, dt.seconds);
            }
        }
    }
}
