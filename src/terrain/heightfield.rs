//! The normalised elevation grid derived from depth and the builder that
//! produces it.
//!
//! Depth is inverted on the way through: the sensor looks down on the sand so
//! a small depth reading means the sand is piled up close to it.
//!
//! ```text
//!   sensor
//!     |  \
//!     |   \  depth
//!     |    \
//!   __|_____\______      height = (1 - normalise(depth)) * multiplier
//!  /  hill   \_____\
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Row-major grid of heights, each a fraction of the terrain's max elevation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeightField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// `width * height` heights
	heights: Vec<f32>,
}

impl HeightField {
	/// Create a new instance of [HeightField] where every height is `0.0`
	pub fn new(width: usize, height: usize) -> Self {
		HeightField {
			width,
			height,
			heights: vec![0.0; width * height],
		}
	}
	/// Create a [HeightField] from row-major heights, the number of heights must equal `width * height`
	pub fn from_vec(width: usize, height: usize, heights: Vec<f32>) -> NavResult<Self> {
		if heights.len() != width * height {
			return Err(NavError::Snapshot(format!(
				"heightfield of {}x{} needs {} heights, found {}",
				width,
				height,
				width * height,
				heights.len()
			)));
		}
		Ok(HeightField {
			width,
			height,
			heights,
		})
	}
	/// Number of columns
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// Get the `(width, height)` of the field
	pub fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	/// Get a reference to the row-major heights
	pub fn get(&self) -> &[f32] {
		&self.heights
	}
	/// Retrieve the height at `(x, y)`
	pub fn get_value(&self, x: usize, y: usize) -> f32 {
		if x >= self.width || y >= self.height {
			panic!(
				"Cannot get a HeightField value, index out of bounds. Asked for ({}, {}), field is {}x{}",
				x, y, self.width, self.height
			)
		}
		self.heights[y * self.width + x]
	}
	/// Set the height at `(x, y)`
	pub fn set_value(&mut self, x: usize, y: usize, value: f32) {
		if x >= self.width || y >= self.height {
			panic!(
				"Cannot set a HeightField value, index out of bounds. Asked for ({}, {}), field is {}x{}",
				x, y, self.width, self.height
			)
		}
		self.heights[y * self.width + x] = value;
	}
	/// Resize the field, every height is reset to `0.0`. Does nothing if the
	/// dimensions already match
	pub(crate) fn resize(&mut self, width: usize, height: usize) {
		if self.width != width || self.height != height {
			self.width = width;
			self.height = height;
			self.heights = vec![0.0; width * height];
		}
	}
	/// Create a [HeightField] from a greyscale image where white pixels are
	/// the highest terrain and black the lowest
	#[cfg(feature = "heightmap")]
	pub fn from_heightmap(path: String) -> NavResult<Self> {
		use photon_rs::native::open_image;
		let img = open_image(&path).map_err(|e| NavError::Import(e.to_string()))?;
		let width = img.get_width() as usize;
		let height = img.get_height() as usize;
		let raw_pixels = img.get_raw_pixels();
		// raw pixels come in sets of either 3 or 4 (if alpha channel is included)
		let chunk_size = if width * height * 4 == raw_pixels.len() {
			4
		} else {
			3
		};
		let mut heights = Vec::with_capacity(width * height);
		for px in raw_pixels.chunks(chunk_size) {
			let colour_avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
			heights.push(colour_avg / 255.0);
		}
		HeightField::from_vec(width, height, heights)
	}
}

/// Persisted shape of a [HeightField], used to carry terrain from one session
/// to the next
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeightfieldSnapshot {
	/// Number of columns
	pub width: usize,
	/// Number of rows
	pub height: usize,
	/// Row-major heights
	pub heights: Vec<f32>,
}

impl From<&HeightField> for HeightfieldSnapshot {
	fn from(field: &HeightField) -> Self {
		HeightfieldSnapshot {
			width: field.width,
			height: field.height,
			heights: field.heights.clone(),
		}
	}
}

impl TryFrom<HeightfieldSnapshot> for HeightField {
	type Error = NavError;
	fn try_from(snapshot: HeightfieldSnapshot) -> Result<Self, Self::Error> {
		HeightField::from_vec(snapshot.width, snapshot.height, snapshot.heights)
	}
}

impl HeightfieldSnapshot {
	/// Serialise the snapshot into a `ron` string
	#[cfg(feature = "ron")]
	pub fn to_ron_string(&self) -> NavResult<String> {
		ron::ser::to_string(self).map_err(|e| NavError::Snapshot(e.to_string()))
	}
	/// Deserialise a snapshot from a `ron` string
	#[cfg(feature = "ron")]
	pub fn from_ron_str(text: &str) -> NavResult<Self> {
		ron::de::from_str(text).map_err(|e| NavError::Snapshot(e.to_string()))
	}
	/// From a `ron` file generate the [HeightfieldSnapshot]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> NavResult<Self> {
		let file = std::fs::File::open(path)?;
		ron::de::from_reader(file).map_err(|e| NavError::Snapshot(e.to_string()))
	}
}

/// Maps depth frames onto a [HeightField] and writes it to terrain storage
#[derive(Debug, Clone)]
pub struct HeightfieldBuilder {
	/// Depths mapped onto `[0, 1]` before inversion
	range: DepthRange,
	/// Scales the inverted, normalised depth
	depth_multiplier: f32,
	/// Output of the most recent build, resized only when frame dimensions change
	buffer: HeightField,
	/// Number of samples repaired during the most recent build
	repaired: usize,
}

impl Default for HeightfieldBuilder {
	fn default() -> Self {
		HeightfieldBuilder::new(DepthRange::default(), 0.1)
	}
}

impl HeightfieldBuilder {
	/// Create a new instance of [HeightfieldBuilder]
	pub fn new(range: DepthRange, depth_multiplier: f32) -> Self {
		HeightfieldBuilder {
			range,
			depth_multiplier,
			buffer: HeightField::default(),
			repaired: 0,
		}
	}
	/// Get the depth range
	pub fn get_range(&self) -> DepthRange {
		self.range
	}
	/// Number of samples without a reading that were repaired by the last build
	pub fn get_repaired_count(&self) -> usize {
		self.repaired
	}
	/// Get the output of the most recent build
	pub fn get_heightfield(&self) -> &HeightField {
		&self.buffer
	}
	/// Convert `frame` into heights within the internal buffer
	pub fn build(&mut self, frame: &DepthFrame) -> &HeightField {
		let (width, height) = frame.get_dimensions();
		self.buffer.resize(width, height);
		self.repaired = 0;
		for y in 0..height {
			for x in 0..width {
				let mut depth = frame.get_sample(x, y);
				if depth == 0 {
					depth = self.repair_missing(frame, x, y);
					self.repaired += 1;
				}
				let normalised = self.range.normalise(depth);
				self.buffer.heights[y * width + x] = (1.0 - normalised) * self.depth_multiplier;
			}
		}
		if self.repaired > 0 {
			trace!("Repaired {} depth samples without a reading", self.repaired);
		}
		&self.buffer
	}
	/// Find a stand-in for a sample without a reading: the left neighbour,
	/// then the up neighbour, otherwise the closest valid depth
	fn repair_missing(&self, frame: &DepthFrame, x: usize, y: usize) -> u16 {
		if x > 0 {
			let left = frame.get_sample(x - 1, y);
			if left != 0 {
				return left;
			}
		}
		if y > 0 {
			let up = frame.get_sample(x, y - 1);
			if up != 0 {
				return up;
			}
		}
		self.range.get_min()
	}
	/// Write the most recent build into `storage` in a single call
	pub fn write(&self, storage: &mut dyn TerrainHeights) -> Result<(), HeightfieldWriteError> {
		storage.set_heights(0, 0, &self.buffer)
	}
	/// Build heights from `frame` and write them into `storage`
	pub fn build_and_write(
		&mut self,
		frame: &DepthFrame,
		storage: &mut dyn TerrainHeights,
	) -> Result<(), HeightfieldWriteError> {
		self.build(frame);
		self.write(storage)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn closer_depth_is_higher() {
		let mut frame = DepthFrame::filled(2, 1, 1250);
		frame.set_sample(0, 0, 900);
		let mut builder = HeightfieldBuilder::new(DepthRange::new(900, 1250), 1.0);
		let field = builder.build(&frame);
		assert_eq!(1.0, field.get_value(0, 0));
		assert_eq!(0.0, field.get_value(1, 0));
	}
	#[test]
	fn multiplier_scales_height() {
		let frame = DepthFrame::filled(1, 1, 1075);
		let mut builder = HeightfieldBuilder::new(DepthRange::new(900, 1250), 0.1);
		let value = builder.build(&frame).get_value(0, 0);
		assert!((value - 0.05).abs() < 1e-6);
	}
	#[test]
	fn missing_sample_takes_left_neighbour() {
		//  ______________
		// |1000|   0|1250|
		let frame = DepthFrame::new(3, 1, vec![1000, 0, 1250]).unwrap();
		let mut builder = HeightfieldBuilder::new(DepthRange::new(900, 1250), 1.0);
		let field = builder.build(&frame).clone();
		assert_eq!(field.get_value(0, 0), field.get_value(1, 0));
		assert_eq!(1, builder.get_repaired_count());
	}
	#[test]
	fn missing_sample_takes_up_neighbour() {
		//  _________
		// |   0|1100|
		// |   0|1000|
		let frame = DepthFrame::new(2, 2, vec![0, 1100, 0, 1000]).unwrap();
		let mut builder = HeightfieldBuilder::new(DepthRange::new(900, 1250), 1.0);
		let field = builder.build(&frame);
		// (0, 0) has no left or up neighbour so falls back to the min depth
		assert_eq!(1.0, field.get_value(0, 0));
		// (0, 1) has no left neighbour and the up neighbour is also missing
		assert_eq!(1.0, field.get_value(0, 1));
		assert_eq!(2, builder.get_repaired_count());
	}
	#[test]
	fn up_neighbour_used_when_left_missing() {
		let frame = DepthFrame::new(2, 2, vec![1250, 1250, 0, 0]).unwrap();
		let mut builder = HeightfieldBuilder::new(DepthRange::new(900, 1250), 1.0);
		let field = builder.build(&frame);
		// (1, 1): left (0, 1) is missing in the raw frame so the up reading is used
		assert_eq!(0.0, field.get_value(1, 1));
		assert_eq!(0.0, field.get_value(0, 1));
	}
	#[test]
	fn rejected_write_surfaces() {
		let frame = DepthFrame::filled(4, 4, 1000);
		let mut builder = HeightfieldBuilder::default();
		let mut storage = HeightStorage::new(2, 2, 2.0, 1.0, 2.0);
		let result = builder.build_and_write(&frame, &mut storage);
		assert!(matches!(
			result,
			Err(HeightfieldWriteError::OutOfBounds { .. })
		));
	}
	#[test]
	fn write_lands_in_storage() {
		let frame = DepthFrame::filled(3, 3, 900);
		let mut builder = HeightfieldBuilder::new(DepthRange::new(900, 1250), 0.5);
		let mut storage = HeightStorage::new(3, 3, 3.0, 10.0, 3.0);
		builder.build_and_write(&frame, &mut storage).unwrap();
		assert_eq!(0.5, storage.get_field().get_value(2, 2));
	}
	#[test]
	fn snapshot_round_trip_keeps_shape() {
		let mut field = HeightField::new(3, 2);
		field.set_value(2, 1, 0.75);
		let snapshot = HeightfieldSnapshot::from(&field);
		assert_eq!(6, snapshot.heights.len());
		let restored = HeightField::try_from(snapshot).unwrap();
		assert_eq!(field, restored);
	}
	#[test]
	fn snapshot_with_wrong_length_rejected() {
		let snapshot = HeightfieldSnapshot {
			width: 3,
			height: 3,
			heights: vec![0.0; 4],
		};
		assert!(HeightField::try_from(snapshot).is_err());
	}
	#[test]
	#[cfg(feature = "ron")]
	fn snapshot_ron() {
		let snapshot = HeightfieldSnapshot {
			width: 2,
			height: 1,
			heights: vec![0.25, 0.5],
		};
		let text = snapshot.to_ron_string().unwrap();
		let parsed = HeightfieldSnapshot::from_ron_str(&text).unwrap();
		assert_eq!(snapshot, parsed);
	}
}
