//! A single sampling pass of the depth sensor
//!

use crate::prelude::*;

/// Row-major `u16` depth readings. A reading of `0` means no data was
/// captured for that sample
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepthFrame {
	/// Number of samples per row
	width: usize,
	/// Number of rows
	height: usize,
	/// `width * height` readings
	samples: Vec<u16>,
}

impl DepthFrame {
	/// Create a new instance of [DepthFrame], the number of `samples` must equal `width * height`
	pub fn new(width: usize, height: usize, samples: Vec<u16>) -> NavResult<Self> {
		let expected = width * height;
		if samples.len() != expected {
			return Err(NavError::FrameLength {
				width,
				height,
				expected,
				found: samples.len(),
			});
		}
		Ok(DepthFrame {
			width,
			height,
			samples,
		})
	}
	/// Create a frame where every sample holds `depth`
	pub fn filled(width: usize, height: usize, depth: u16) -> Self {
		DepthFrame {
			width,
			height,
			samples: vec![depth; width * height],
		}
	}
	/// Number of samples per row
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// Get the `(width, height)` of the frame
	pub fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	/// Get a reference to the raw samples
	pub fn get(&self) -> &[u16] {
		&self.samples
	}
	/// Get a mutable reference to the raw samples
	pub fn get_mut(&mut self) -> &mut [u16] {
		&mut self.samples
	}
	/// Total number of samples
	pub fn len(&self) -> usize {
		self.samples.len()
	}
	/// Whether the frame holds no samples
	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}
	/// Index of the sample at `(x, y)`
	pub fn index(&self, x: usize, y: usize) -> usize {
		y * self.width + x
	}
	/// Read the sample at `(x, y)`
	pub fn get_sample(&self, x: usize, y: usize) -> u16 {
		self.samples[self.index(x, y)]
	}
	/// Write the sample at `(x, y)`
	pub fn set_sample(&mut self, x: usize, y: usize, depth: u16) {
		let i = self.index(x, y);
		self.samples[i] = depth;
	}
	/// Resize the frame, every sample is reset to `0`. Does nothing if the
	/// dimensions already match
	pub(crate) fn resize(&mut self, width: usize, height: usize) {
		if self.width != width || self.height != height || self.samples.len() != width * height {
			self.width = width;
			self.height = height;
			self.samples = vec![0; width * height];
		}
	}
	/// Copy the dimensions and samples of `other` into `self`, reusing the allocation where possible
	pub(crate) fn copy_from(&mut self, other: &DepthFrame) {
		self.width = other.width;
		self.height = other.height;
		self.samples.clear();
		self.samples.extend_from_slice(&other.samples);
	}
	/// From a `csv` file of recorded readings generate a [DepthFrame], each
	/// record is one sensor row
	#[cfg(feature = "csv")]
	pub fn from_csv(path: String) -> NavResult<Self> {
		let data = std::fs::File::open(path)?;
		let mut rdr = csv::ReaderBuilder::new()
			.has_headers(false)
			.from_reader(data);
		let mut samples = Vec::new();
		let mut width = 0;
		let mut height = 0;
		for record in rdr.records() {
			let record = record.map_err(|e| NavError::Import(e.to_string()))?;
			if height == 0 {
				width = record.len();
			} else if record.len() != width {
				return Err(NavError::Import(format!(
					"row {} has {} samples, expected {}",
					height,
					record.len(),
					width
				)));
			}
			for value in record.iter() {
				let depth: u16 = value
					.trim()
					.parse()
					.map_err(|_| NavError::Import(format!("CSV expects u16 values, found {}", value)))?;
				samples.push(depth);
			}
			height += 1;
		}
		DepthFrame::new(width, height, samples)
	}
}

/// Inclusive range of sensor depths considered meaningful
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
	/// Closest valid depth
	min: u16,
	/// Furthest valid depth
	max: u16,
}

impl Default for DepthRange {
	fn default() -> Self {
		DepthRange {
			min: 900,
			max: 1250,
		}
	}
}

impl DepthRange {
	/// Create a new instance of [DepthRange]
	pub fn new(min: u16, max: u16) -> Self {
		DepthRange { min, max }
	}
	/// Closest valid depth
	pub fn get_min(&self) -> u16 {
		self.min
	}
	/// Furthest valid depth
	pub fn get_max(&self) -> u16 {
		self.max
	}
	/// Position of `depth` within the range as a fraction in `[0, 1]`,
	/// values outside the range are clamped
	pub fn normalise(&self, depth: u16) -> f32 {
		if self.max == self.min {
			return 0.0;
		}
		let t = (depth as f32 - self.min as f32) / (self.max as f32 - self.min as f32);
		t.clamp(0.0, 1.0)
	}
}

/// Anything able to hand over the latest frame captured by a depth sensor
pub trait DepthFrameSource {
	/// Take the newest frame, [None] if the sensor has nothing new
	fn next_frame(&mut self) -> Option<DepthFrame>;
}

/// Replays a recorded list of frames in order, handy for tests and for
/// running without a sensor attached
#[derive(Debug, Clone, Default)]
pub struct ReplayFrameSource {
	/// Frames yet to be handed out
	frames: Vec<DepthFrame>,
	/// Position of the next frame
	cursor: usize,
	/// Start again from the first frame once the last has been handed out
	looping: bool,
}

impl ReplayFrameSource {
	/// Create a new instance of [ReplayFrameSource]
	pub fn new(frames: Vec<DepthFrame>, looping: bool) -> Self {
		ReplayFrameSource {
			frames,
			cursor: 0,
			looping,
		}
	}
}

impl DepthFrameSource for ReplayFrameSource {
	fn next_frame(&mut self) -> Option<DepthFrame> {
		if self.cursor >= self.frames.len() {
			if !self.looping || self.frames.is_empty() {
				return None;
			}
			self.cursor = 0;
		}
		let frame = self.frames[self.cursor].clone();
		self.cursor += 1;
		Some(frame)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn frame_length_mismatch() {
		let result = DepthFrame::new(3, 3, vec![0; 8]);
		assert!(matches!(
			result,
			Err(NavError::FrameLength {
				expected: 9,
				found: 8,
				..
			})
		));
	}
	#[test]
	fn sample_access_is_row_major() {
		let frame = DepthFrame::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
		assert_eq!(6, frame.get_sample(2, 1));
		assert_eq!(4, frame.get_sample(0, 1));
	}
	#[test]
	fn normalise_clamps() {
		let range = DepthRange::new(900, 1250);
		assert_eq!(0.0, range.normalise(100));
		assert_eq!(1.0, range.normalise(2000));
		assert_eq!(0.5, range.normalise(1075));
	}
	#[test]
	fn replay_stops_without_looping() {
		let mut source = ReplayFrameSource::new(vec![DepthFrame::filled(2, 2, 1000)], false);
		assert!(source.next_frame().is_some());
		assert!(source.next_frame().is_none());
	}
	#[test]
	fn replay_loops() {
		let frames = vec![DepthFrame::filled(2, 2, 1000), DepthFrame::filled(2, 2, 1100)];
		let mut source = ReplayFrameSource::new(frames, true);
		let depths: Vec<u16> = (0..3)
			.map(|_| source.next_frame().unwrap().get_sample(0, 0))
			.collect();
		assert_eq!(vec![1000, 1100, 1000], depths);
	}
	#[test]
	#[cfg(feature = "csv")]
	fn frame_from_csv() {
		let path = std::env::temp_dir().join("heightfield_nav_depth_frame.csv");
		std::fs::write(&path, "900,1000,1100\n0,1200,1250\n").unwrap();
		let frame = DepthFrame::from_csv(path.to_string_lossy().to_string()).unwrap();
		assert_eq!((3, 2), frame.get_dimensions());
		assert_eq!(0, frame.get_sample(0, 1));
		assert_eq!(1250, frame.get_sample(2, 1));
	}
	#[test]
	#[cfg(feature = "csv")]
	fn csv_with_bad_reading_rejected() {
		let path = std::env::temp_dir().join("heightfield_nav_bad_depth_frame.csv");
		std::fs::write(&path, "900,1000\n0,far\n").unwrap();
		let result = DepthFrame::from_csv(path.to_string_lossy().to_string());
		assert!(matches!(result, Err(NavError::Import(_))));
	}
}
