//! Tunable values for the whole pipeline. Defaults reproduce a 512x424 depth
//! sensor looking down at a sandbox roughly 0.9-1.25m away
//!

use crate::prelude::*;

/// Every constant used by the terrain pipeline, grid, pathfinder and
/// invalidation sweep
#[cfg_attr(
	feature = "serde",
	derive(serde::Deserialize, serde::Serialize),
	serde(default)
)]
#[derive(Debug, Clone, PartialEq)]
pub struct NavSettings {
	/// Number of depth samples per sensor row
	pub depth_width: usize,
	/// Number of sensor rows
	pub depth_height: usize,
	/// Nearest depth reading treated as valid, maps to the highest terrain
	pub min_depth: u16,
	/// Furthest depth reading treated as valid, maps to the lowest terrain
	pub max_depth: u16,
	/// Scales a normalised depth into a fraction of the max terrain elevation
	pub depth_multiplier: f32,
	/// A sampled depth must move by more than this to count as a change
	pub change_tolerance: u16,
	/// Distance in samples between two probes of the change detector
	pub change_sample_stride: usize,
	/// Upper bound on the number of probes per frame
	pub change_max_samples: usize,
	/// Number of changed probes needed before a frame counts as changed
	pub change_min_samples: usize,
	/// How far a depth sample is pulled toward its neighbour mean, `0..=1`
	pub smoothing_strength: f32,
	/// Number of grid columns
	pub grid_width: usize,
	/// Number of grid rows
	pub grid_height: usize,
	/// World size of one grid cell
	pub cell_size: f32,
	/// Weight of the height difference term in the heuristic
	pub height_weight: i32,
	/// Scales the roughness derived movement cost of each cell
	pub roughness_weight: f32,
	/// Number of agents asked to recompute their path per tick of a sweep
	pub sweep_batch_size: usize,
	/// World length of the terrain along `x`
	pub terrain_length: f32,
	/// World height of a terrain sample at `1.0`
	pub terrain_max_elevation: f32,
	/// World depth of the terrain along `z`
	pub terrain_depth: f32,
}

impl Default for NavSettings {
	fn default() -> Self {
		NavSettings {
			depth_width: 512,
			depth_height: 424,
			min_depth: 900,
			max_depth: 1250,
			depth_multiplier: 0.1,
			change_tolerance: 20,
			change_sample_stride: 1000,
			change_max_samples: 30,
			change_min_samples: 3,
			smoothing_strength: 0.5,
			grid_width: 20,
			grid_height: 20,
			cell_size: 1.0,
			height_weight: 10,
			roughness_weight: 1.0,
			sweep_batch_size: 5,
			terrain_length: 512.0,
			terrain_max_elevation: 50.0,
			terrain_depth: 424.0,
		}
	}
}

impl NavSettings {
	/// Check the settings can drive the pipeline
	pub fn validate(&self) -> NavResult<()> {
		if self.depth_width == 0 || self.depth_height == 0 {
			return Err(NavError::InvalidSettings(format!(
				"depth resolution must be non-zero, found {}x{}",
				self.depth_width, self.depth_height
			)));
		}
		if self.min_depth >= self.max_depth {
			return Err(NavError::InvalidSettings(format!(
				"min_depth {} must be below max_depth {}",
				self.min_depth, self.max_depth
			)));
		}
		if !(0.0..=1.0).contains(&self.smoothing_strength) {
			return Err(NavError::InvalidSettings(format!(
				"smoothing_strength must lie within 0..=1, found {}",
				self.smoothing_strength
			)));
		}
		if self.change_sample_stride == 0 {
			return Err(NavError::InvalidSettings(
				"change_sample_stride must be non-zero".to_string(),
			));
		}
		if self.grid_width == 0 || self.grid_height == 0 {
			return Err(NavError::InvalidSettings(format!(
				"grid size must be non-zero, found {}x{}",
				self.grid_width, self.grid_height
			)));
		}
		if self.cell_size <= 0.0 {
			return Err(NavError::InvalidSettings(format!(
				"cell_size must be positive, found {}",
				self.cell_size
			)));
		}
		if self.height_weight < 0 {
			return Err(NavError::InvalidSettings(format!(
				"height_weight must not be negative, found {}",
				self.height_weight
			)));
		}
		if !self.roughness_weight.is_finite() || self.roughness_weight < 0.0 {
			return Err(NavError::InvalidSettings(format!(
				"roughness_weight must be finite and not negative, found {}",
				self.roughness_weight
			)));
		}
		if self.sweep_batch_size == 0 {
			return Err(NavError::InvalidSettings(
				"sweep_batch_size must be non-zero".to_string(),
			));
		}
		if self.terrain_length <= 0.0 || self.terrain_depth <= 0.0 {
			return Err(NavError::InvalidSettings(format!(
				"terrain extents must be positive, found {}x{}",
				self.terrain_length, self.terrain_depth
			)));
		}
		Ok(())
	}
	/// The depth range used to normalise samples
	pub fn depth_range(&self) -> DepthRange {
		DepthRange::new(self.min_depth, self.max_depth)
	}
	/// From a `ron` file generate the [NavSettings]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> NavResult<Self> {
		let file = std::fs::File::open(path)?;
		let settings: NavSettings = ron::de::from_reader(file)
			.map_err(|e| NavError::InvalidSettings(format!("failed deserializing: {}", e)))?;
		settings.validate()?;
		Ok(settings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn default_is_valid() {
		assert!(NavSettings::default().validate().is_ok());
	}
	#[test]
	fn inverted_depth_range_rejected() {
		let settings = NavSettings {
			min_depth: 1300,
			..Default::default()
		};
		assert!(matches!(
			settings.validate(),
			Err(NavError::InvalidSettings(_))
		));
	}
	#[test]
	fn zero_batch_rejected() {
		let settings = NavSettings {
			sweep_batch_size: 0,
			..Default::default()
		};
		assert!(settings.validate().is_err());
	}
	#[test]
	fn strength_out_of_range_rejected() {
		let settings = NavSettings {
			smoothing_strength: 1.5,
			..Default::default()
		};
		assert!(settings.validate().is_err());
	}
	#[test]
	fn negative_height_weight_rejected() {
		let settings = NavSettings {
			height_weight: -4,
			..Default::default()
		};
		assert!(matches!(
			settings.validate(),
			Err(NavError::InvalidSettings(_))
		));
	}
	#[test]
	fn unusable_roughness_weight_rejected() {
		for roughness_weight in [-1.0, f32::NAN, f32::INFINITY] {
			let settings = NavSettings {
				roughness_weight,
				..Default::default()
			};
			assert!(settings.validate().is_err());
		}
	}
	#[test]
	#[cfg(feature = "ron")]
	fn settings_from_ron() {
		let text = "(grid_width: 8, grid_height: 6, cell_size: 2.0)";
		let path = std::env::temp_dir().join("heightfield_nav_settings_test.ron");
		std::fs::write(&path, text).unwrap();
		let settings = NavSettings::from_ron(path.to_string_lossy().to_string()).unwrap();
		assert_eq!(8, settings.grid_width);
		assert_eq!(6, settings.grid_height);
		assert_eq!(2.0, settings.cell_size);
		assert_eq!(5, settings.sweep_batch_size);
	}
}
