//! Logic relating to turning depth frames into terrain heights
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A frame captured by the depth sensor, sent by whatever drives the sensor
#[derive(Event)]
pub struct EventDepthFrame(DepthFrame);

impl EventDepthFrame {
	pub fn new(frame: DepthFrame) -> Self {
		EventDepthFrame(frame)
	}
	/// Get a reference to the frame
	pub fn get(&self) -> &DepthFrame {
		&self.0
	}
}

/// The terrain, or the obstacles standing on it, changed this tick and the
/// navigation grid is out of date
#[derive(Event)]
pub struct EventTerrainChanged;

/// Run the newest [EventDepthFrame] of the tick through every
/// [TerrainPipeline]. Older frames of the same tick are superseded and skipped
#[cfg(not(tarpaulin_include))]
pub fn process_depth_frames(
	mut events: EventReader<EventDepthFrame>,
	mut terrain_q: Query<(&mut TerrainPipeline, &mut HeightStorage)>,
	mut changed: EventWriter<EventTerrainChanged>,
) {
	let Some(event) = events.read().last() else {
		return;
	};
	let mut any_changed = false;
	for (mut pipeline, mut storage) in &mut terrain_q {
		match pipeline.process(event.get(), &mut *storage) {
			Ok(true) => any_changed = true,
			Ok(false) => {}
			Err(e) => error!("Depth frame skipped, {}", e),
		}
	}
	if any_changed {
		changed.write(EventTerrainChanged);
	}
}
