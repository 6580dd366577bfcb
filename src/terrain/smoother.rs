//! Depth readings jitter by a few millimetres from frame to frame even when
//! nothing in the sandbox moves. The [DepthSmoother] pulls each interior
//! sample toward the mean of its orthogonal neighbours:
//!
//! ```text
//!          ___________
//!         |     |     |     |
//!         |     |  u  |     |
//!         |_____|_____|_____|
//!         |     |     |     |         mean = (u + l + r + d) / 4
//!         |  l  |  c  |  r  |         c'   = c + (mean - c) * strength
//!         |_____|_____|_____|
//!         |     |     |     |
//!         |     |  d  |     |
//!         |_____|_____|_____|
//! ```
//!
//! A neighbour without a reading (`0`) is replaced by `c` so holes don't drag
//! the average toward the sensor. Samples on the frame border, and samples
//! that are themselves `0`, are passed through untouched - holes get repaired
//! later by the [crate::prelude::HeightfieldBuilder].
//!

use crate::prelude::*;

/// Single pass neighbour averaging filter
#[derive(Debug, Clone)]
pub struct DepthSmoother {
	/// Blend factor toward the neighbour mean, `0` leaves samples unchanged and `1` replaces them with the mean
	strength: f32,
	/// Output of the most recent pass, resized only when frame dimensions change
	buffer: DepthFrame,
}

impl Default for DepthSmoother {
	fn default() -> Self {
		DepthSmoother::new(0.5)
	}
}

impl DepthSmoother {
	/// Create a new instance of [DepthSmoother]
	pub fn new(strength: f32) -> Self {
		DepthSmoother {
			strength: strength.clamp(0.0, 1.0),
			buffer: DepthFrame::default(),
		}
	}
	/// Get the blend strength
	pub fn get_strength(&self) -> f32 {
		self.strength
	}
	/// Smooth `frame` into the internal buffer and return a reference to it.
	/// `frame` itself is left untouched
	pub fn smooth(&mut self, frame: &DepthFrame) -> &DepthFrame {
		let (width, height) = frame.get_dimensions();
		self.buffer.resize(width, height);
		let raw = frame.get();
		let out = self.buffer.get_mut();
		out.copy_from_slice(raw);
		if width < 3 || height < 3 {
			return &self.buffer;
		}
		for y in 1..height - 1 {
			for x in 1..width - 1 {
				let index = y * width + x;
				let center = raw[index];
				if center == 0 {
					continue;
				}
				let valid_or_center = |v: u16| if v != 0 { v as f32 } else { center as f32 };
				let up = valid_or_center(raw[index - width]);
				let down = valid_or_center(raw[index + width]);
				let left = valid_or_center(raw[index - 1]);
				let right = valid_or_center(raw[index + 1]);
				let average = (up + down + left + right) / 4.0;
				let c = center as f32;
				// truncation matches how depth is stored by the sensor
				out[index] = (c + (average - c) * self.strength) as u16;
			}
		}
		&self.buffer
	}
	/// Get the output of the most recent pass
	pub fn get_smoothed(&self) -> &DepthFrame {
		&self.buffer
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn spike_pulled_toward_neighbours() {
		//  ___________________
		// |1000|1000|1000|1000|
		// |1000|1800|1000|1000|
		// |1000|1000|1000|1000|
		// |1000|1000|1000|1000|
		let mut frame = DepthFrame::filled(4, 4, 1000);
		frame.set_sample(1, 1, 1800);
		let mut smoother = DepthSmoother::new(0.5);
		let result = smoother.smooth(&frame).get_sample(1, 1);
		// halfway between the spike and the neighbour mean
		assert_eq!(1400, result);
		assert!(result > 1000 && result < 1800);
	}
	#[test]
	fn border_left_unsmoothed() {
		let mut frame = DepthFrame::filled(4, 4, 1000);
		frame.set_sample(0, 0, 1200);
		frame.set_sample(3, 2, 700);
		let mut smoother = DepthSmoother::default();
		let smoothed = smoother.smooth(&frame);
		assert_eq!(1200, smoothed.get_sample(0, 0));
		assert_eq!(700, smoothed.get_sample(3, 2));
	}
	#[test]
	fn missing_sample_stays_missing() {
		let mut frame = DepthFrame::filled(3, 3, 1000);
		frame.set_sample(1, 1, 0);
		let mut smoother = DepthSmoother::default();
		assert_eq!(0, smoother.smooth(&frame).get_sample(1, 1));
	}
	#[test]
	fn missing_neighbour_self_substitutes() {
		//  ______________
		// |1000|   0|1000|
		// |1000|1100|1000|
		// |1000|1000|1000|
		let mut frame = DepthFrame::filled(3, 3, 1000);
		frame.set_sample(1, 1, 1100);
		frame.set_sample(1, 0, 0);
		let mut smoother = DepthSmoother::new(1.0);
		// mean of (1100, 1000, 1000, 1000)
		assert_eq!(1025, smoother.smooth(&frame).get_sample(1, 1));
	}
	#[test]
	fn input_frame_untouched() {
		let mut frame = DepthFrame::filled(3, 3, 1000);
		frame.set_sample(1, 1, 2000);
		let copy = frame.clone();
		let mut smoother = DepthSmoother::default();
		let _ = smoother.smooth(&frame);
		assert_eq!(copy, frame);
	}
	#[test]
	fn buffer_follows_dimension_change() {
		let mut smoother = DepthSmoother::default();
		let _ = smoother.smooth(&DepthFrame::filled(3, 3, 1000));
		let smoothed = smoother.smooth(&DepthFrame::filled(5, 2, 1000));
		assert_eq!((5, 2), smoothed.get_dimensions());
		assert_eq!(10, smoothed.len());
	}
}
