//! A* search over the navigation [Grid].
//!
//! Each step onto a neighbour costs `1`, whatever the direction, plus the
//! rounded movement cost of the node stepped onto. The estimate of the
//! remaining cost is the Manhattan distance to the goal plus a penalty for the
//! height difference between the node and the goal:
//!
//! ```text
//! g(n) = g(parent) + 1 + round(n.movement_cost)
//! h(n) = |dx| + |dy| + round(|n.y - goal.y| * height_weight)
//! ```
//!
//! The height penalty steers agents around hills but can overestimate, so a
//! route is not guaranteed to be the cheapest one.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Ordered world positions from the start cell to the goal cell inclusive
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavPath(Vec<Vec3>);

impl NavPath {
	pub fn new(waypoints: Vec<Vec3>) -> Self {
		NavPath(waypoints)
	}
	/// Get a reference to the waypoints
	pub fn get(&self) -> &[Vec3] {
		&self.0
	}
	/// Get the waypoint at `index`
	pub fn get_waypoint(&self, index: usize) -> Option<Vec3> {
		self.0.get(index).copied()
	}
	pub fn len(&self) -> usize {
		self.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
	/// The first waypoint, where the route begins
	pub fn first(&self) -> Option<Vec3> {
		self.0.first().copied()
	}
	/// The last waypoint, where the route ends
	pub fn last(&self) -> Option<Vec3> {
		self.0.last().copied()
	}
}

/// Finds routes across a [GridManager]'s grid
#[derive(Component, Debug, Clone)]
pub struct Pathfinder {
	/// Scales the height difference penalty of the heuristic
	height_weight: i32,
	/// Frontier reused between searches
	open: OpenSet,
}

impl Default for Pathfinder {
	fn default() -> Self {
		Pathfinder::new(10)
	}
}

impl Pathfinder {
	/// Create a new instance of [Pathfinder], a negative `height_weight` is
	/// treated as zero
	pub fn new(height_weight: i32) -> Self {
		Pathfinder {
			height_weight: height_weight.max(0),
			open: OpenSet::default(),
		}
	}
	pub fn get_height_weight(&self) -> i32 {
		self.height_weight
	}
	/// Estimated cost from `from` to the goal
	fn heuristic(&self, from: &GridNode, goal: &GridNode) -> i32 {
		let dy = (from.get_world_position().y - goal.get_world_position().y).abs();
		let penalty = (dy * self.height_weight as f32).round() as i32;
		from.get_cell().manhattan(&goal.get_cell()).saturating_add(penalty)
	}
	/// Search for a route from `start` to `goal`. Positions outside the grid
	/// are pulled onto the nearest edge cell first
	pub fn search(
		&mut self,
		manager: &mut GridManager,
		start: Vec3,
		goal: Vec3,
	) -> Result<NavPath, NoPathFound> {
		let start_cell = manager.clamped_cell(start);
		let goal_cell = manager.clamped_cell(goal);
		let stamp = manager.begin_search();
		let grid = manager.get_grid_mut();
		let start_index = grid.index(start_cell).ok_or(NoPathFound::StartBlocked)?;
		if !grid.get_node_by_index(start_index).is_walkable() {
			return Err(NoPathFound::StartBlocked);
		}
		let goal_index = grid.index(goal_cell).ok_or(NoPathFound::GoalBlocked)?;
		if !grid.get_node_by_index(goal_index).is_walkable() {
			return Err(NoPathFound::GoalBlocked);
		}
		let goal_node = grid.get_node_by_index(goal_index).clone();

		self.open.reset(grid.len());
		let start_h = self.heuristic(grid.get_node_by_index(start_index), &goal_node);
		let start_node = grid.get_node_by_index_mut(start_index);
		start_node.visit(stamp);
		start_node.set_route(0, start_h, None);
		self.open.push(start_index, start_h, start_h);

		while let Some(current) = self.open.pop() {
			if current == goal_index {
				return Ok(retrace(grid, goal_index));
			}
			let current_node = grid.get_node_by_index_mut(current);
			current_node.close();
			let current_cell = current_node.get_cell();
			let current_g = current_node.get_g_cost();

			for neighbour in grid.neighbour_indices(current_cell) {
				let node = grid.get_node_by_index_mut(neighbour);
				node.visit(stamp);
				if !node.is_walkable() || node.is_closed() {
					continue;
				}
				let step = 1_i32.saturating_add(node.get_movement_cost().round() as i32);
				let tentative_g = current_g.saturating_add(step);
				let in_open = self.open.contains(neighbour);
				if !in_open || tentative_g < node.get_g_cost() {
					let h = self.heuristic(node, &goal_node);
					node.set_route(tentative_g, h, Some(current_cell));
					if in_open {
						self.open.decrease_key(neighbour, tentative_g.saturating_add(h), h);
					} else {
						self.open.push(neighbour, tentative_g.saturating_add(h), h);
					}
				}
			}
		}
		Err(NoPathFound::Exhausted)
	}
	/// Find a route from `start` to `goal`, an empty [NavPath] when there is none
	pub fn find_path(&mut self, manager: &mut GridManager, start: Vec3, goal: Vec3) -> NavPath {
		match self.search(manager, start, goal) {
			Ok(path) => path,
			Err(e) => {
				debug!("No path from {} to {}: {}", start, goal, e);
				NavPath::default()
			}
		}
	}
}

/// Follow parents back from the goal and return the route in travel order
fn retrace(grid: &Grid, goal_index: usize) -> NavPath {
	let mut waypoints = Vec::new();
	let mut node = grid.get_node_by_index(goal_index);
	loop {
		waypoints.push(node.get_world_position());
		match node.get_parent().and_then(|cell| grid.get_node(cell)) {
			Some(parent) => node = parent,
			None => break,
		}
	}
	waypoints.reverse();
	NavPath::new(waypoints)
}
