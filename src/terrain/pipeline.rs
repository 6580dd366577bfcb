//! Runs one tick of the depth-to-height data flow
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Owns the stages that turn a [DepthFrame] into terrain heights
#[derive(Component, Debug, Clone, Default)]
pub struct TerrainPipeline {
	/// Takes the jitter out of raw frames
	smoother: DepthSmoother,
	/// Decides whether a smoothed frame is worth writing
	detector: ChangeDetector,
	/// Turns depth into heights and writes them
	builder: HeightfieldBuilder,
	/// Number of frames that produced a terrain write
	writes: u64,
}

impl TerrainPipeline {
	/// Create a new instance of [TerrainPipeline] from its stages
	pub fn new(
		smoother: DepthSmoother,
		detector: ChangeDetector,
		builder: HeightfieldBuilder,
	) -> Self {
		TerrainPipeline {
			smoother,
			detector,
			builder,
			writes: 0,
		}
	}
	/// Create a pipeline configured by `settings`
	pub fn from_settings(settings: &NavSettings) -> Self {
		TerrainPipeline::new(
			DepthSmoother::new(settings.smoothing_strength),
			ChangeDetector::new(
				settings.change_tolerance,
				settings.change_sample_stride,
				settings.change_max_samples,
				settings.change_min_samples,
			),
			HeightfieldBuilder::new(settings.depth_range(), settings.depth_multiplier),
		)
	}
	/// Get a reference to the smoothing stage
	pub fn get_smoother(&self) -> &DepthSmoother {
		&self.smoother
	}
	/// Get a reference to the change detection stage
	pub fn get_detector(&self) -> &ChangeDetector {
		&self.detector
	}
	/// Get a reference to the height building stage
	pub fn get_builder(&self) -> &HeightfieldBuilder {
		&self.builder
	}
	/// Number of frames that have been written to terrain storage
	pub fn get_write_count(&self) -> u64 {
		self.writes
	}
	/// Smooth `frame`, and if it differs enough from the last written frame,
	/// build heights from it and write them into `terrain`.
	///
	/// Returns `Ok(true)` when the terrain changed. A failed write leaves the
	/// change baseline untouched so the next frame tries again
	pub fn process(
		&mut self,
		frame: &DepthFrame,
		terrain: &mut dyn TerrainHeights,
	) -> NavResult<bool> {
		let smoothed = self.smoother.smooth(frame);
		if !self.detector.has_changed(smoothed) {
			return Ok(false);
		}
		self.builder.build_and_write(smoothed, terrain)?;
		self.detector.accept(smoothed);
		self.writes += 1;
		debug!(
			"Terrain updated from a {}x{} depth frame",
			smoothed.get_width(),
			smoothed.get_height()
		);
		Ok(true)
	}
	/// Pull the next frame from `source` and [TerrainPipeline::process] it,
	/// `Ok(false)` when the source had nothing new
	pub fn poll(
		&mut self,
		source: &mut dyn DepthFrameSource,
		terrain: &mut dyn TerrainHeights,
	) -> NavResult<bool> {
		match source.next_frame() {
			Some(frame) => self.process(&frame, terrain),
			None => Ok(false),
		}
	}
	/// Force the next frame to be treated as a change
	pub fn reset_baseline(&mut self) {
		self.detector.reset();
	}
}
