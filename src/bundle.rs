//! Everything needed to turn depth frames into agent paths, spawned onto a
//! single entity
//!

use crate::prelude::*;
use bevy::prelude::*;

#[derive(Bundle)]
pub struct HeightfieldNavBundle {
	/// Terrain heights written by the pipeline
	storage: HeightStorage,
	/// Depth frame to height stages
	pipeline: TerrainPipeline,
	/// Walkability grid over the terrain
	grid: GridManager,
	/// Route search
	pathfinder: Pathfinder,
	/// Refreshes agent paths when the grid changes
	coordinator: PathInvalidationCoordinator,
}

impl HeightfieldNavBundle {
	/// Create a new instance of [HeightfieldNavBundle] over flat terrain
	pub fn new(settings: &NavSettings) -> NavResult<Self> {
		settings.validate()?;
		let storage = HeightStorage::from_settings(settings);
		HeightfieldNavBundle::with_storage(settings, storage)
	}
	/// Create a new instance of [HeightfieldNavBundle] where the terrain
	/// starts from a previously saved snapshot
	pub fn from_snapshot(settings: &NavSettings, snapshot: HeightfieldSnapshot) -> NavResult<Self> {
		settings.validate()?;
		let mut storage = HeightStorage::from_settings(settings);
		storage.restore(snapshot)?;
		HeightfieldNavBundle::with_storage(settings, storage)
	}
	/// Create a new instance of [HeightfieldNavBundle] where the terrain
	/// starts from a snapshot saved to disk as `ron`
	#[cfg(feature = "ron")]
	pub fn new_from_disk(settings: &NavSettings, path: String) -> NavResult<Self> {
		let snapshot = HeightfieldSnapshot::from_ron(path)?;
		HeightfieldNavBundle::from_snapshot(settings, snapshot)
	}
	/// Build the remaining components around `storage` with a grid already
	/// generated from it
	fn with_storage(settings: &NavSettings, storage: HeightStorage) -> NavResult<Self> {
		let mut grid = GridManager::from_settings(settings);
		grid.regenerate(&storage);
		Ok(HeightfieldNavBundle {
			storage,
			pipeline: TerrainPipeline::from_settings(settings),
			grid,
			pathfinder: Pathfinder::new(settings.height_weight),
			coordinator: PathInvalidationCoordinator::new(settings.sweep_batch_size),
		})
	}
	pub fn get_storage(&self) -> &HeightStorage {
		&self.storage
	}
	pub fn get_grid(&self) -> &GridManager {
		&self.grid
	}
}
