//! Influence fields and hierarchical pathfinding over static grid based dungeons, with a plugin for the Bevy game engine
//!

pub mod bundle;
pub mod config;
pub mod error;
pub mod navigation;
pub mod plugin;

pub mod prelude;
