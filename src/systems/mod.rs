//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod animation;
pub mod collision;
pub mod components;
pub mod hud;
pub mod input;
pub mod lifetime;
pub mod movement;
pub mod player;
pub mod score;
pub mod spawn;
pub mod state;

pub use self::animation::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::hud::*;
pub use self::input::*;
pub use self::lifetime::*;
pub use self::movement::*;
pub use self::player::*;
pub use self::score::*;
pub use self::spawn::*;
pub use self::state::*;
