//! Deciding whether a frame is worth turning into a new heightfield.
//!
//! Diffing every sample of every frame is wasted work when the sandbox is
//! untouched, so only a sparse set of probes spaced `stride` samples apart is
//! compared against the last accepted frame. A small, local change may fall
//! between probes and go unnoticed until something bigger happens - that is
//! an accepted approximation rather than a guarantee.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Sparse-sampling frame comparison
#[derive(Debug, Clone)]
pub struct ChangeDetector {
	/// A probe must differ by strictly more than this to count
	tolerance: u16,
	/// Distance in samples between probes
	stride: usize,
	/// Upper bound on probes per frame
	max_samples: usize,
	/// Probes that must differ for the frame to count as changed
	min_changed: usize,
	/// The last frame accepted as the terrain baseline, [None] until the first
	/// frame is accepted
	previous: Option<DepthFrame>,
}

impl Default for ChangeDetector {
	fn default() -> Self {
		ChangeDetector::new(20, 1000, 30, 3)
	}
}

impl ChangeDetector {
	/// Create a new instance of [ChangeDetector]
	pub fn new(tolerance: u16, stride: usize, max_samples: usize, min_changed: usize) -> Self {
		ChangeDetector {
			tolerance,
			stride: stride.max(1),
			max_samples,
			min_changed,
			previous: None,
		}
	}
	/// Whether `frame` differs enough from the last accepted frame. Always
	/// `true` when nothing has been accepted yet or the frame size changed
	pub fn has_changed(&self, frame: &DepthFrame) -> bool {
		let Some(previous) = &self.previous else {
			return true;
		};
		if previous.len() != frame.len() {
			return true;
		}
		let old = previous.get();
		let new = frame.get();
		let mut significant = 0;
		let mut probes = 0;
		let mut i = 0;
		while i < new.len() && significant < self.min_changed && probes < self.max_samples {
			if new[i].abs_diff(old[i]) > self.tolerance {
				significant += 1;
			}
			probes += 1;
			i += self.stride;
		}
		trace!(
			"Change detector found {} significant of {} probes",
			significant,
			probes
		);
		significant >= self.min_changed
	}
	/// Store `frame` as the baseline for future comparisons
	pub fn accept(&mut self, frame: &DepthFrame) {
		match &mut self.previous {
			Some(previous) => previous.copy_from(frame),
			None => self.previous = Some(frame.clone()),
		}
	}
	/// Forget the baseline so the next frame is reported as changed
	pub fn reset(&mut self) {
		self.previous = None;
	}
	/// Whether a baseline frame has been accepted
	pub fn has_baseline(&self) -> bool {
		self.previous.is_some()
	}
}
