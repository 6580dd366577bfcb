//! Components attached to the things that move across, or stand on, the terrain
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Distance on the ground plane within which a waypoint counts as reached
pub const WAYPOINT_TOLERANCE: f32 = 0.5;

/// A path holder. The host's movement code reads [NavAgent::next_waypoint]
/// and reports progress through [NavAgent::advance]
#[derive(Component, Debug, Clone, Default)]
pub struct NavAgent {
	/// Last reported world position
	position: Vec3,
	/// Where the agent is heading, [None] when it has no destination
	goal: Option<Vec3>,
	/// Current route
	path: NavPath,
	/// Index of the waypoint being walked towards
	waypoint: usize,
}

impl NavAgent {
	/// Create a new instance of [NavAgent] with no goal
	pub fn new(position: Vec3) -> Self {
		NavAgent {
			position,
			..Default::default()
		}
	}
	/// Create an agent already heading for `goal`
	pub fn with_goal(position: Vec3, goal: Vec3) -> Self {
		NavAgent {
			position,
			goal: Some(goal),
			..Default::default()
		}
	}
	pub fn get_position(&self) -> Vec3 {
		self.position
	}
	/// Move the agent without touching its route
	pub(crate) fn set_position(&mut self, position: Vec3) {
		self.position = position;
	}
	pub fn get_goal(&self) -> Option<Vec3> {
		self.goal
	}
	/// Change destination. The route is left as is until the next
	/// [NavAgent::recompute_path]
	pub fn set_goal(&mut self, goal: Vec3) {
		self.goal = Some(goal);
	}
	/// Drop the destination and the route towards it
	pub fn clear_goal(&mut self) {
		self.goal = None;
		self.path = NavPath::default();
		self.waypoint = 0;
	}
	pub fn get_path(&self) -> &NavPath {
		&self.path
	}
	/// Search for a fresh route from the current position to the goal and
	/// restart waypoint following. Returns whether a route was found
	pub fn recompute_path(&mut self, pathfinder: &mut Pathfinder, grid: &mut GridManager) -> bool {
		let Some(goal) = self.goal else {
			self.path = NavPath::default();
			self.waypoint = 0;
			return false;
		};
		self.path = pathfinder.find_path(grid, self.position, goal);
		self.waypoint = 0;
		!self.path.is_empty()
	}
	/// The waypoint currently being walked towards, [None] once the route is
	/// finished or when there is no route
	pub fn next_waypoint(&self) -> Option<Vec3> {
		self.path.get_waypoint(self.waypoint)
	}
	/// Whether the final waypoint has been reached
	pub fn has_arrived(&self) -> bool {
		!self.path.is_empty() && self.waypoint >= self.path.len()
	}
	/// Record a new position, moving past every waypoint within `tolerance`,
	/// and return the waypoint to head for next
	pub fn advance(&mut self, position: Vec3, tolerance: f32) -> Option<Vec3> {
		self.position = position;
		while let Some(waypoint) = self.next_waypoint() {
			let ground = Vec2::new(position.x - waypoint.x, position.z - waypoint.z);
			if ground.length() < tolerance {
				self.waypoint += 1;
			} else {
				break;
			}
		}
		self.next_waypoint()
	}
}

/// Marks a static structure which blocks the cells under its footprint
#[derive(Component, Debug, Clone, Default)]
pub struct NavObstacle {
	/// World-space `(x, z)` points covered by the structure
	footprint: Vec<Vec2>,
}

impl NavObstacle {
	pub fn new(footprint: Vec<Vec2>) -> Self {
		NavObstacle { footprint }
	}
	/// An obstacle covering the single cell at world `(x, z)`
	pub fn at(x: f32, z: f32) -> Self {
		NavObstacle {
			footprint: vec![Vec2::new(x, z)],
		}
	}
}

impl ObstacleSource for NavObstacle {
	fn footprint(&self) -> Vec<Vec2> {
		self.footprint.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	fn flat_grid() -> GridManager {
		let mut manager = GridManager::new(5, 5, 1.0);
		manager.regenerate(&HeightStorage::new(5, 5, 4.0, 1.0, 4.0));
		manager
	}
	#[test]
	fn no_goal_no_path() {
		let mut agent = NavAgent::new(Vec3::ZERO);
		let mut grid = flat_grid();
		assert!(!agent.recompute_path(&mut Pathfinder::default(), &mut grid));
		assert!(agent.next_waypoint().is_none());
	}
	#[test]
	fn recompute_finds_route() {
		let mut agent = NavAgent::with_goal(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
		let mut grid = flat_grid();
		assert!(agent.recompute_path(&mut Pathfinder::default(), &mut grid));
		assert_eq!(5, agent.get_path().len());
		assert_eq!(Some(Vec3::ZERO), agent.next_waypoint());
	}
	#[test]
	fn advance_walks_waypoints() {
		let mut agent = NavAgent::with_goal(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
		let mut grid = flat_grid();
		agent.recompute_path(&mut Pathfinder::default(), &mut grid);
		// standing on the start waypoint moves on to the next
		assert_eq!(
			Some(Vec3::new(1.0, 0.0, 0.0)),
			agent.advance(Vec3::new(0.1, 0.0, 0.0), WAYPOINT_TOLERANCE)
		);
		// not close enough yet
		assert_eq!(
			Some(Vec3::new(1.0, 0.0, 0.0)),
			agent.advance(Vec3::new(0.4, 0.0, 0.0), WAYPOINT_TOLERANCE)
		);
		assert_eq!(
			Some(Vec3::new(2.0, 0.0, 0.0)),
			agent.advance(Vec3::new(1.0, 0.0, 0.2), WAYPOINT_TOLERANCE)
		);
		// height is ignored
		assert_eq!(
			None,
			agent.advance(Vec3::new(1.95, 3.0, 0.0), WAYPOINT_TOLERANCE)
		);
		assert!(agent.has_arrived());
	}
	#[test]
	fn clear_goal_drops_route() {
		let mut agent = NavAgent::with_goal(Vec3::ZERO, Vec3::new(2.0, 0.0, 2.0));
		let mut grid = flat_grid();
		agent.recompute_path(&mut Pathfinder::default(), &mut grid);
		agent.clear_goal();
		assert!(agent.get_path().is_empty());
		assert!(!agent.has_arrived());
	}
	#[test]
	fn obstacle_component_is_a_source() {
		let obstacle = NavObstacle::at(2.0, 3.0);
		let mut grid = GridManager::new(5, 5, 1.0);
		grid.register_obstacle_source(Box::new(obstacle));
		grid.refresh_obstacles();
		assert!(grid.get_obstacles().contains(&(2, 3)));
	}
}
