//! Defines the Bevy [Plugin] for heightfield navigation
//!

use bevy::prelude::*;

pub mod grid_layer;
pub mod path_layer;
pub mod terrain_layer;

/// Each tick runs the sets in order so that a terrain write lands before the
/// grid is rebuilt, and the grid is rebuilt before paths are refreshed
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum NavSet {
	/// Depth frames into terrain heights
	Sense,
	/// Terrain heights and obstacles into the navigation grid
	Grid,
	/// Grid into agent paths
	Paths,
}

pub struct HeightfieldNavPlugin;

impl Plugin for HeightfieldNavPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.add_event::<terrain_layer::EventDepthFrame>()
			.add_event::<terrain_layer::EventTerrainChanged>()
			.add_event::<grid_layer::EventGridRegenerated>()
			.add_event::<path_layer::EventPathRequest>()
			.add_event::<path_layer::EventPathSweepComplete>()
			.configure_sets(Update, (NavSet::Sense, NavSet::Grid, NavSet::Paths).chain())
			.add_systems(
				Update,
				(
					terrain_layer::process_depth_frames.in_set(NavSet::Sense),
					(grid_layer::sync_obstacles, grid_layer::regenerate_grid)
						.chain()
						.in_set(NavSet::Grid),
					(
						path_layer::register_agents,
						path_layer::process_path_requests,
						path_layer::start_path_sweep,
						path_layer::process_path_sweep,
					)
						.chain()
						.in_set(NavSet::Paths),
				),
			);
	}
}
