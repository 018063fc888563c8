//! Centralized error types for the game.
//!
//! Almost every failure in the run loop is recoverable: it is logged and the
//! simulation carries on with a fallback. These types exist so the failures
//! can be described, reported through events and logged consistently.

use std::io;

use bevy_ecs::event::Event;

use crate::asset::Asset;

/// Main error type for the game.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Spawn error: {0}")]
    Spawn(#[from] SpawnError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Animation source texture missing: {clip} needs {asset}")]
    AnimationSource { clip: &'static str, asset: Asset },
}

/// Errors raised while creating an entity during a run.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    #[error("Texture not loaded: {0}")]
    MissingTexture(Asset),

    #[error("Animation clip not available: {0}")]
    MissingClip(&'static str),

    #[error("No cactus variant {0}")]
    UnknownVariant(u8),

    #[error("No flight lane {0}")]
    UnknownLane(usize),
}

/// Errors from the key-value persistence collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Operation against a key holding the wrong kind of value: {0}")]
    WrongType(String),

    #[error("Value at {0} is not an integer")]
    NotAnInteger(String),
}
