//! Logic relating to keeping the [GridManager] in step with the terrain
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The navigation grid was rebuilt and existing paths may be stale
#[derive(Event)]
pub struct EventGridRegenerated;

/// When any [NavObstacle] is added, changed or removed, gather every
/// footprint into the obstacle set of each [GridManager] and flag the grid as
/// out of date
#[cfg(not(tarpaulin_include))]
pub fn sync_obstacles(
	changed_q: Query<(), Changed<NavObstacle>>,
	mut removed: RemovedComponents<NavObstacle>,
	obstacle_q: Query<&NavObstacle>,
	mut grid_q: Query<&mut GridManager>,
	mut terrain_changed: EventWriter<EventTerrainChanged>,
) {
	let any_removed = removed.read().count() > 0;
	if changed_q.is_empty() && !any_removed {
		return;
	}
	let footprint: Vec<Vec2> = obstacle_q.iter().flat_map(|o| o.footprint()).collect();
	for mut grid in &mut grid_q {
		grid.refresh_obstacles_with(&footprint);
	}
	debug!("Obstacles changed, {} footprint points", footprint.len());
	terrain_changed.write(EventTerrainChanged);
}

/// Rebuild each [GridManager] from its [HeightStorage] once per tick in which
/// the terrain changed
#[cfg(not(tarpaulin_include))]
pub fn regenerate_grid(
	mut events: EventReader<EventTerrainChanged>,
	mut grid_q: Query<(&mut GridManager, &HeightStorage)>,
	mut regenerated: EventWriter<EventGridRegenerated>,
) {
	// several changes in a tick only need one rebuild
	if events.read().count() == 0 {
		return;
	}
	for (mut grid, storage) in &mut grid_q {
		grid.regenerate(storage);
	}
	regenerated.write(EventGridRegenerated);
}
