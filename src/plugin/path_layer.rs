//! Logic relating to finding and refreshing [NavAgent] paths
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Ask an agent to head for a new goal
#[derive(Event)]
pub struct EventPathRequest {
	/// The entity carrying the [NavAgent]
	entity: Entity,
	/// World position to find a path to
	goal: Vec3,
}

impl EventPathRequest {
	pub fn new(entity: Entity, goal: Vec3) -> Self {
		EventPathRequest { entity, goal }
	}
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
	pub fn get_goal(&self) -> Vec3 {
		self.goal
	}
}

/// Every registered agent has had its path refreshed after a terrain change
#[derive(Event)]
pub struct EventPathSweepComplete {
	/// Agents recalculated in the final step of the sweep
	processed: usize,
}

impl EventPathSweepComplete {
	pub fn new(processed: usize) -> Self {
		EventPathSweepComplete { processed }
	}
	/// Agents recalculated in the final step of the sweep
	pub fn get_processed(&self) -> usize {
		self.processed
	}
}

/// Register new agents with the [PathInvalidationCoordinator], pulling them
/// inside the grid and planning a first route if they already have a goal.
/// Agents which have been removed are deregistered
#[cfg(not(tarpaulin_include))]
pub fn register_agents(
	mut added_q: Query<(Entity, &mut NavAgent), Added<NavAgent>>,
	mut removed: RemovedComponents<NavAgent>,
	mut nav_q: Query<(
		&mut PathInvalidationCoordinator,
		&mut Pathfinder,
		&mut GridManager,
	)>,
) {
	let removed: Vec<Entity> = removed.read().collect();
	for (mut coordinator, mut pathfinder, mut grid) in &mut nav_q {
		for entity in removed.iter() {
			coordinator.deregister_agent(*entity);
		}
		for (entity, mut agent) in &mut added_q {
			let clamped = grid.clamp_to_grid(agent.get_position());
			agent.set_position(clamped);
			if coordinator.register_agent(entity) && agent.get_goal().is_some() {
				agent.recompute_path(&mut pathfinder, &mut grid);
			}
			trace!("Registered agent {}", entity);
		}
	}
}

/// Point agents at the goals in [EventPathRequest]s and plan a route straight away
#[cfg(not(tarpaulin_include))]
pub fn process_path_requests(
	mut events: EventReader<EventPathRequest>,
	mut agent_q: Query<&mut NavAgent>,
	mut nav_q: Query<(&mut Pathfinder, &mut GridManager)>,
) {
	for event in events.read() {
		let Ok(mut agent) = agent_q.get_mut(event.get_entity()) else {
			warn!(
				"Path requested for {} which has no NavAgent",
				event.get_entity()
			);
			continue;
		};
		agent.set_goal(event.get_goal());
		for (mut pathfinder, mut grid) in &mut nav_q {
			if !agent.recompute_path(&mut pathfinder, &mut grid) {
				debug!("Agent {} has no route to its goal", event.get_entity());
			}
		}
	}
}

/// Begin a sweep of every [PathInvalidationCoordinator] once the grid has
/// been rebuilt
#[cfg(not(tarpaulin_include))]
pub fn start_path_sweep(
	mut events: EventReader<EventGridRegenerated>,
	mut coordinator_q: Query<&mut PathInvalidationCoordinator>,
) {
	if events.read().count() == 0 {
		return;
	}
	for mut coordinator in &mut coordinator_q {
		coordinator.notify_terrain_changed();
	}
}

/// Advance any running sweep by one batch of agents
#[cfg(not(tarpaulin_include))]
pub fn process_path_sweep(
	mut nav_q: Query<(
		&mut PathInvalidationCoordinator,
		&mut Pathfinder,
		&mut GridManager,
	)>,
	mut agent_q: Query<&mut NavAgent>,
	mut complete: EventWriter<EventPathSweepComplete>,
) {
	for (mut coordinator, mut pathfinder, mut grid) in &mut nav_q {
		let progress = coordinator.step(|entity| match agent_q.get_mut(entity) {
			Ok(mut agent) => {
				agent.recompute_path(&mut pathfinder, &mut grid);
				true
			}
			Err(_) => false,
		});
		if let SweepProgress::Completed { processed } = progress {
			debug!("Path sweep complete");
			complete.write(EventPathSweepComplete::new(processed));
		}
	}
}
