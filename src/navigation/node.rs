//! A [GridNode] is one cell of the navigation grid together with the
//! bookkeeping A* needs while it searches.
//!
//! Search fields are never cleared in bulk between searches. Instead every
//! search carries a stamp and a node whose stamp is out of date is reset the
//! first time the search touches it.
//!

use bevy::prelude::*;

/// Integer coordinate of a cell in the navigation grid, `x` is the column and
/// `y` the row
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridCell((usize, usize));

impl GridCell {
	/// Create a new instance of [GridCell]
	pub fn new(x: usize, y: usize) -> Self {
		GridCell((x, y))
	}
	/// Column of the cell
	pub fn get_x(&self) -> usize {
		self.0 .0
	}
	/// Row of the cell
	pub fn get_y(&self) -> usize {
		self.0 .1
	}
	/// Get the `(column, row)` tuple
	pub fn get_xy(&self) -> (usize, usize) {
		self.0
	}
	/// Number of orthogonal steps between two cells
	pub fn manhattan(&self, other: &GridCell) -> i32 {
		(self.get_x().abs_diff(other.get_x()) + self.get_y().abs_diff(other.get_y())) as i32
	}
	/// Whether `other` is one of the 8 cells surrounding `self`
	pub fn is_adjacent(&self, other: &GridCell) -> bool {
		let dx = self.get_x().abs_diff(other.get_x());
		let dy = self.get_y().abs_diff(other.get_y());
		dx <= 1 && dy <= 1 && (dx + dy) > 0
	}
}

/// A cell of the navigation grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridNode {
	/// Where an agent stands on this node, `y` follows the terrain
	world_position: Vec3,
	/// Whether an agent may enter the node
	walkable: bool,
	/// Extra cost of stepping onto the node, never negative
	movement_cost: f32,
	/// Location in the grid
	cell: GridCell,
	/// Cost of the best known route from the search start
	g_cost: i32,
	/// Estimated cost from here to the search goal
	h_cost: i32,
	/// Previous cell on the best known route
	parent: Option<GridCell>,
	/// Search the fields above belong to
	stamp: u32,
	/// Whether the search has finished with this node
	closed: bool,
}

impl GridNode {
	/// Create a new instance of [GridNode]
	pub fn new(cell: GridCell, world_position: Vec3, walkable: bool, movement_cost: f32) -> Self {
		GridNode {
			world_position,
			walkable,
			movement_cost: movement_cost.max(0.0),
			cell,
			g_cost: 0,
			h_cost: 0,
			parent: None,
			stamp: 0,
			closed: false,
		}
	}
	pub fn get_world_position(&self) -> Vec3 {
		self.world_position
	}
	pub fn is_walkable(&self) -> bool {
		self.walkable
	}
	pub fn get_movement_cost(&self) -> f32 {
		self.movement_cost
	}
	pub fn get_cell(&self) -> GridCell {
		self.cell
	}
	pub fn get_g_cost(&self) -> i32 {
		self.g_cost
	}
	pub fn get_h_cost(&self) -> i32 {
		self.h_cost
	}
	/// Total estimated cost of a route through this node
	pub fn f_cost(&self) -> i32 {
		self.g_cost.saturating_add(self.h_cost)
	}
	pub fn get_parent(&self) -> Option<GridCell> {
		self.parent
	}
	pub fn is_closed(&self) -> bool {
		self.closed
	}
	/// Claim the node for the search identified by `stamp`, resetting any
	/// fields left over from an earlier search
	pub(crate) fn visit(&mut self, stamp: u32) {
		if self.stamp != stamp {
			self.stamp = stamp;
			self.g_cost = 0;
			self.h_cost = 0;
			self.parent = None;
			self.closed = false;
		}
	}
	/// Record a better route onto this node
	pub(crate) fn set_route(&mut self, g_cost: i32, h_cost: i32, parent: Option<GridCell>) {
		self.g_cost = g_cost;
		self.h_cost = h_cost;
		self.parent = parent;
	}
	/// Mark the node as fully explored
	pub(crate) fn close(&mut self) {
		self.closed = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn manhattan_distance() {
		let a = GridCell::new(1, 4);
		let b = GridCell::new(3, 1);
		assert_eq!(5, a.manhattan(&b));
		assert_eq!(5, b.manhattan(&a));
	}
	#[test]
	fn adjacency_includes_diagonals() {
		let a = GridCell::new(2, 2);
		assert!(a.is_adjacent(&GridCell::new(3, 3)));
		assert!(a.is_adjacent(&GridCell::new(2, 1)));
		assert!(!a.is_adjacent(&a));
		assert!(!a.is_adjacent(&GridCell::new(4, 2)));
	}
	#[test]
	fn negative_cost_floored() {
		let node = GridNode::new(GridCell::new(0, 0), Vec3::ZERO, true, -3.0);
		assert_eq!(0.0, node.get_movement_cost());
	}
	#[test]
	fn stale_search_fields_reset() {
		let mut node = GridNode::new(GridCell::new(0, 0), Vec3::ZERO, true, 0.0);
		node.visit(1);
		node.set_route(7, 3, Some(GridCell::new(1, 1)));
		node.close();
		assert_eq!(10, node.f_cost());
		// same search keeps its fields
		node.visit(1);
		assert!(node.is_closed());
		// a new search starts from scratch
		node.visit(2);
		assert!(!node.is_closed());
		assert_eq!(0, node.f_cost());
		assert_eq!(None, node.get_parent());
	}
}
