//! `use bevy_heightfield_nav_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::terrain::{
	change_detector::*, depth_frame::*, heightfield::*, pipeline::*, smoother::*, storage::*,
};

#[doc(hidden)]
pub use crate::navigation::{
	agent::*, grid::*, invalidation::*, node::*, open_set::*, pathfinder::*, utilities::*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	error::*,
	plugin::{grid_layer::*, path_layer::*, terrain_layer::*, *},
	settings::*,
};
