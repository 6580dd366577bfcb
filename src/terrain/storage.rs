//! Where terrain heights live once built.
//!
//! The [HeightStorage] maps its heightfield onto a world-space rectangle:
//!
//! ```text
//!  z
//!  ^  depth
//!  |  ______________________
//!  | |(0,h-1)        (w-1,h-1)|
//!  | |                        |
//!  | |(0,0)            (w-1,0)|
//!  | |________________________|
//!  o-------------------------------> x
//!               length
//! ```
//!
//! and height values in `[0, 1]` are scaled by `max_elevation` when sampled.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Rectangular read/write access to terrain heights plus world-space sampling
pub trait TerrainHeights {
	/// Copy a `width x height` block starting at `(x, y)`
	fn get_heights(
		&self,
		x: usize,
		y: usize,
		width: usize,
		height: usize,
	) -> Result<HeightField, HeightfieldWriteError>;
	/// Overwrite the block starting at `(x, y)` with `field`
	fn set_heights(
		&mut self,
		x: usize,
		y: usize,
		field: &HeightField,
	) -> Result<(), HeightfieldWriteError>;
	/// World-space elevation at `(world_x, world_z)`
	fn sample_height(&self, world_x: f32, world_z: f32) -> f32;
}

/// In-memory terrain heights stretched over a world-space rectangle
#[derive(Component, Debug, Clone)]
pub struct HeightStorage {
	/// Heights in `[0, 1]`
	field: HeightField,
	/// World extent along `x`
	length: f32,
	/// World elevation of a height of `1.0`
	max_elevation: f32,
	/// World extent along `z`
	depth: f32,
}

impl Default for HeightStorage {
	fn default() -> Self {
		HeightStorage::new(512, 424, 512.0, 50.0, 424.0)
	}
}

impl HeightStorage {
	/// Create a new instance of [HeightStorage] with a flat field of
	/// `width x height` heights
	pub fn new(width: usize, height: usize, length: f32, max_elevation: f32, depth: f32) -> Self {
		HeightStorage {
			field: HeightField::new(width, height),
			length,
			max_elevation,
			depth,
		}
	}
	/// Create storage sized to the depth resolution in `settings`
	pub fn from_settings(settings: &NavSettings) -> Self {
		HeightStorage::new(
			settings.depth_width,
			settings.depth_height,
			settings.terrain_length,
			settings.terrain_max_elevation,
			settings.terrain_depth,
		)
	}
	/// Get a reference to the stored heights
	pub fn get_field(&self) -> &HeightField {
		&self.field
	}
	/// Get the world-space `(length, max_elevation, depth)` of the terrain
	pub fn get_world_size(&self) -> Vec3 {
		Vec3::new(self.length, self.max_elevation, self.depth)
	}
	/// Capture the current heights so they can be persisted
	pub fn snapshot(&self) -> HeightfieldSnapshot {
		HeightfieldSnapshot::from(&self.field)
	}
	/// Replace the stored heights with a previously captured snapshot. A
	/// snapshot of another resolution is rejected, frames from the sensor
	/// could no longer be written over it
	pub fn restore(&mut self, snapshot: HeightfieldSnapshot) -> NavResult<()> {
		let field = HeightField::try_from(snapshot)?;
		if field.get_dimensions() != self.field.get_dimensions() {
			return Err(NavError::Snapshot(format!(
				"snapshot of {:?} does not match storage of {:?}",
				field.get_dimensions(),
				self.field.get_dimensions()
			)));
		}
		self.field = field;
		Ok(())
	}
	/// Reject blocks that are empty or fall outside the storage
	fn check_block(
		&self,
		x: usize,
		y: usize,
		width: usize,
		height: usize,
	) -> Result<(), HeightfieldWriteError> {
		if width == 0 || height == 0 {
			return Err(HeightfieldWriteError::Empty);
		}
		let (storage_width, storage_height) = self.field.get_dimensions();
		if x + width > storage_width || y + height > storage_height {
			return Err(HeightfieldWriteError::OutOfBounds {
				x,
				y,
				width,
				height,
				storage_width,
				storage_height,
			});
		}
		Ok(())
	}
}

impl TerrainHeights for HeightStorage {
	fn get_heights(
		&self,
		x: usize,
		y: usize,
		width: usize,
		height: usize,
	) -> Result<HeightField, HeightfieldWriteError> {
		self.check_block(x, y, width, height)?;
		let mut block = HeightField::new(width, height);
		for j in 0..height {
			for i in 0..width {
				block.set_value(i, j, self.field.get_value(x + i, y + j));
			}
		}
		Ok(block)
	}
	fn set_heights(
		&mut self,
		x: usize,
		y: usize,
		field: &HeightField,
	) -> Result<(), HeightfieldWriteError> {
		let (width, height) = field.get_dimensions();
		self.check_block(x, y, width, height)?;
		for j in 0..height {
			for i in 0..width {
				self.field.set_value(x + i, y + j, field.get_value(i, j));
			}
		}
		Ok(())
	}
	fn sample_height(&self, world_x: f32, world_z: f32) -> f32 {
		let (width, height) = self.field.get_dimensions();
		if width == 0 || height == 0 || self.length <= 0.0 || self.depth <= 0.0 {
			return 0.0;
		}
		let u = (world_x / self.length).clamp(0.0, 1.0) * (width - 1) as f32;
		let v = (world_z / self.depth).clamp(0.0, 1.0) * (height - 1) as f32;
		let x0 = u.floor() as usize;
		let y0 = v.floor() as usize;
		let x1 = (x0 + 1).min(width - 1);
		let y1 = (y0 + 1).min(height - 1);
		let tx = u - x0 as f32;
		let ty = v - y0 as f32;
		let bottom = self.field.get_value(x0, y0) * (1.0 - tx) + self.field.get_value(x1, y0) * tx;
		let top = self.field.get_value(x0, y1) * (1.0 - tx) + self.field.get_value(x1, y1) * tx;
		(bottom * (1.0 - ty) + top * ty) * self.max_elevation
	}
}
