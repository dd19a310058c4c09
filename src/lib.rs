//! Tank Battle: the game-state and entity-interaction core of a 2D arcade
//! shooter.  Rendering, input polling and frame pacing live in the binary.

pub mod collision;
pub mod combatant;
pub mod compute;
pub mod config;
pub mod entities;
pub mod level;
