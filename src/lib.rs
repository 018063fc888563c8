//! Endless-runner dinosaur game library crate.

pub mod asset;
pub mod autopilot;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod ledger;
pub mod logging;
pub mod persist;
pub mod scene;
pub mod systems;
