//! Spreading the cost of re-planning over several ticks.
//!
//! When the terrain changes every registered agent needs a fresh route, but
//! running all of those searches in one tick would stall the simulation. The
//! [PathInvalidationCoordinator] instead takes a snapshot of the registry and
//! walks through it a batch at a time:
//!
//! ```text
//!            notify_terrain_changed()
//!  ┌──────┐ ─────────────────────────> ┌───────────────────────────┐
//!  │ Idle │                            │ Recalculating{queue, cur} │ ──┐
//!  └──────┘ <───────────────────────── └───────────────────────────┘   │ step()
//!              step() reaches the end              ^                   │ yields
//!                                                  └───────────────────┘
//! ```
//!
//! Only one sweep runs at a time. A change reported mid-sweep is dropped, the
//! running sweep already picks up the newest grid for every agent it has not
//! reached yet.
//!

use std::collections::BTreeSet;

use bevy::prelude::*;

/// Where the coordinator is in a sweep
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SweepState {
	/// Nothing to recalculate
	#[default]
	Idle,
	/// Working through a snapshot of the registry
	Recalculating {
		/// Agents registered when the sweep began
		queue: Vec<Entity>,
		/// Position of the next agent in `queue`
		cursor: usize,
	},
}

/// Outcome of a single [PathInvalidationCoordinator::step]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepProgress {
	/// No sweep is running
	Idle,
	/// A batch was processed and more agents are waiting
	Yielded {
		/// Agents recalculated by this step
		processed: usize,
		/// Queue entries not yet reached
		remaining: usize,
	},
	/// The final batch was processed, the coordinator is idle again
	Completed {
		/// Agents recalculated by this step
		processed: usize,
	},
}

/// Registry of path holders and the sweep that refreshes their routes
#[derive(Component, Debug, Clone)]
pub struct PathInvalidationCoordinator {
	/// Agents to refresh on a terrain change
	registry: BTreeSet<Entity>,
	/// Progress of the current sweep
	state: SweepState,
	/// Maximum agents recalculated per step
	batch_size: usize,
	/// Number of finished sweeps
	completed_sweeps: u64,
}

impl Default for PathInvalidationCoordinator {
	fn default() -> Self {
		PathInvalidationCoordinator::new(5)
	}
}

impl PathInvalidationCoordinator {
	/// Create a new instance of [PathInvalidationCoordinator], at least one
	/// agent is processed per step
	pub fn new(batch_size: usize) -> Self {
		PathInvalidationCoordinator {
			registry: BTreeSet::new(),
			state: SweepState::Idle,
			batch_size: batch_size.max(1),
			completed_sweeps: 0,
		}
	}
	/// Add an agent to the registry, returns `false` if it was already present
	pub fn register_agent(&mut self, agent: Entity) -> bool {
		self.registry.insert(agent)
	}
	/// Remove an agent from the registry. An agent removed mid-sweep is
	/// skipped when the sweep reaches it
	pub fn deregister_agent(&mut self, agent: Entity) -> bool {
		self.registry.remove(&agent)
	}
	pub fn agent_count(&self) -> usize {
		self.registry.len()
	}
	pub fn is_registered(&self, agent: Entity) -> bool {
		self.registry.contains(&agent)
	}
	pub fn get_state(&self) -> &SweepState {
		&self.state
	}
	pub fn get_batch_size(&self) -> usize {
		self.batch_size
	}
	pub fn get_completed_sweeps(&self) -> u64 {
		self.completed_sweeps
	}
	pub fn is_recalculating(&self) -> bool {
		matches!(self.state, SweepState::Recalculating { .. })
	}
	/// Begin a sweep over every registered agent. Returns `false` and does
	/// nothing when a sweep is already running
	pub fn notify_terrain_changed(&mut self) -> bool {
		if self.is_recalculating() {
			debug!("Terrain change dropped, a path sweep is already running");
			return false;
		}
		let queue: Vec<Entity> = self.registry.iter().copied().collect();
		debug!("Starting path sweep over {} agents", queue.len());
		self.state = SweepState::Recalculating { queue, cursor: 0 };
		true
	}
	/// Recalculate the next batch of agents by calling `recompute` for each.
	/// An agent for which `recompute` returns `false` no longer exists, it is
	/// deregistered and does not count towards the batch
	pub fn step<F: FnMut(Entity) -> bool>(&mut self, mut recompute: F) -> SweepProgress {
		let SweepState::Recalculating { queue, cursor } = &mut self.state else {
			return SweepProgress::Idle;
		};
		let mut processed = 0;
		while *cursor < queue.len() && processed < self.batch_size {
			let agent = queue[*cursor];
			*cursor += 1;
			if !self.registry.contains(&agent) {
				trace!("Skipping deregistered agent {}", agent);
			} else if recompute(agent) {
				processed += 1;
			} else {
				trace!("Agent {} has gone, deregistering", agent);
				self.registry.remove(&agent);
			}
		}
		if *cursor >= queue.len() {
			self.state = SweepState::Idle;
			self.completed_sweeps += 1;
			SweepProgress::Completed { processed }
		} else {
			SweepProgress::Yielded {
				processed,
				remaining: queue.len() - *cursor,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	fn coordinator_with(count: u32) -> PathInvalidationCoordinator {
		let mut coordinator = PathInvalidationCoordinator::default();
		for i in 0..count {
			coordinator.register_agent(Entity::from_raw(i));
		}
		coordinator
	}
	#[test]
	fn idle_step_does_nothing() {
		let mut coordinator = coordinator_with(3);
		let mut calls = 0;
		let progress = coordinator.step(|_| {
			calls += 1;
			true
		});
		assert_eq!(SweepProgress::Idle, progress);
		assert_eq!(0, calls);
	}
	#[test]
	fn five_agents_per_step() {
		let mut coordinator = coordinator_with(12);
		assert!(coordinator.notify_terrain_changed());
		let mut seen = Vec::new();
		assert_eq!(
			SweepProgress::Yielded {
				processed: 5,
				remaining: 7
			},
			coordinator.step(|e| {
				seen.push(e);
				true
			})
		);
		assert_eq!(
			SweepProgress::Yielded {
				processed: 5,
				remaining: 2
			},
			coordinator.step(|e| {
				seen.push(e);
				true
			})
		);
		assert_eq!(
			SweepProgress::Completed { processed: 2 },
			coordinator.step(|e| {
				seen.push(e);
				true
			})
		);
		assert_eq!(12, seen.len());
		assert!(!coordinator.is_recalculating());
		assert_eq!(1, coordinator.get_completed_sweeps());
	}
	#[test]
	fn exact_batch_completes_in_one_step() {
		let mut coordinator = coordinator_with(5);
		coordinator.notify_terrain_changed();
		assert_eq!(
			SweepProgress::Completed { processed: 5 },
			coordinator.step(|_| true)
		);
	}
	#[test]
	fn change_during_sweep_dropped() {
		let mut coordinator = coordinator_with(10);
		assert!(coordinator.notify_terrain_changed());
		coordinator.step(|_| true);
		assert!(!coordinator.notify_terrain_changed());
		// the running sweep carries on from where it was
		assert_eq!(
			SweepProgress::Completed { processed: 5 },
			coordinator.step(|_| true)
		);
		assert!(coordinator.notify_terrain_changed());
	}
	#[test]
	fn deregistered_mid_sweep_skipped() {
		let mut coordinator = coordinator_with(8);
		coordinator.notify_terrain_changed();
		let mut seen = Vec::new();
		coordinator.step(|e| {
			seen.push(e);
			true
		});
		coordinator.deregister_agent(Entity::from_raw(6));
		coordinator.step(|e| {
			seen.push(e);
			true
		});
		assert_eq!(7, seen.len());
		assert!(!seen.contains(&Entity::from_raw(6)));
	}
	#[test]
	fn registered_mid_sweep_waits_for_next() {
		let mut coordinator = coordinator_with(2);
		coordinator.notify_terrain_changed();
		coordinator.register_agent(Entity::from_raw(40));
		let mut seen = Vec::new();
		coordinator.step(|e| {
			seen.push(e);
			true
		});
		assert_eq!(2, seen.len());
		assert_eq!(3, coordinator.agent_count());
	}
	#[test]
	fn empty_registry_completes_immediately() {
		let mut coordinator = PathInvalidationCoordinator::default();
		assert!(coordinator.notify_terrain_changed());
		assert_eq!(
			SweepProgress::Completed { processed: 0 },
			coordinator.step(|_| true)
		);
	}
	#[test]
	fn duplicate_registration_ignored() {
		let mut coordinator = PathInvalidationCoordinator::default();
		assert!(coordinator.register_agent(Entity::from_raw(1)));
		assert!(!coordinator.register_agent(Entity::from_raw(1)));
		assert_eq!(1, coordinator.agent_count());
	}
	#[test]
	fn vanished_agents_not_counted() {
		let mut coordinator = coordinator_with(8);
		coordinator.notify_terrain_changed();
		let gone = [Entity::from_raw(1), Entity::from_raw(3)];
		let mut seen = Vec::new();
		let progress = coordinator.step(|e| {
			if gone.contains(&e) {
				return false;
			}
			seen.push(e);
			true
		});
		assert_eq!(
			SweepProgress::Yielded {
				processed: 5,
				remaining: 1
			},
			progress
		);
		assert_eq!(5, seen.len());
		assert_eq!(6, coordinator.agent_count());
		assert!(!coordinator.is_registered(Entity::from_raw(3)));
	}
}
