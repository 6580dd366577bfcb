//! This is a plugin for Bevy game engine to turn a depth sensor feed into a
//! terrain heightfield and keep an A* navigation grid, and the paths of every
//! agent walking it, consistent with the terrain as it is reshaped
//!

pub mod bundle;
pub mod error;
pub mod navigation;
pub mod plugin;
pub mod settings;
pub mod terrain;

pub mod prelude;
