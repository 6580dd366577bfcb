//! The navigation grid and the [GridManager] that keeps it in step with the
//! terrain and its obstacles
//!

use std::collections::BTreeSet;

use crate::prelude::*;
use bevy::prelude::*;

/// Anything able to report the world-space `(x, z)` positions it occupies,
/// such as placed structures
pub trait ObstacleSource: Send + Sync {
	/// World-space `(x, z)` points covered by the obstacle
	fn footprint(&self) -> Vec<Vec2>;
}

/// A fixed list of occupied world positions
#[derive(Debug, Clone, Default)]
pub struct StaticObstacles(Vec<Vec2>);

impl StaticObstacles {
	pub fn new(footprint: Vec<Vec2>) -> Self {
		StaticObstacles(footprint)
	}
}

impl ObstacleSource for StaticObstacles {
	fn footprint(&self) -> Vec<Vec2> {
		self.0.clone()
	}
}

/// Row-major `width x height` array of [GridNode]s spaced `cell_size` apart
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// World size of a cell along `x` and `z`
	cell_size: f32,
	/// `width * height` nodes
	nodes: Vec<GridNode>,
}

impl Grid {
	/// Create a flat, fully walkable grid
	pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
		let mut nodes = Vec::with_capacity(width * height);
		for y in 0..height {
			for x in 0..width {
				let position = Vec3::new(x as f32 * cell_size, 0.0, y as f32 * cell_size);
				nodes.push(GridNode::new(GridCell::new(x, y), position, true, 0.0));
			}
		}
		Grid {
			width,
			height,
			cell_size,
			nodes,
		}
	}
	pub fn get_width(&self) -> usize {
		self.width
	}
	pub fn get_height(&self) -> usize {
		self.height
	}
	pub fn get_cell_size(&self) -> f32 {
		self.cell_size
	}
	/// Get a reference to every node in row-major order
	pub fn get_nodes(&self) -> &[GridNode] {
		&self.nodes
	}
	/// Number of nodes in the grid
	pub fn len(&self) -> usize {
		self.nodes.len()
	}
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
	/// Index of `cell` into the node array, [None] outside the grid
	pub fn index(&self, cell: GridCell) -> Option<usize> {
		if cell.get_x() < self.width && cell.get_y() < self.height {
			Some(cell.get_y() * self.width + cell.get_x())
		} else {
			None
		}
	}
	/// Get the node at `cell`
	pub fn get_node(&self, cell: GridCell) -> Option<&GridNode> {
		self.index(cell).map(|i| &self.nodes[i])
	}
	/// Get the node at a raw index, panics outside the grid
	pub(crate) fn get_node_by_index(&self, index: usize) -> &GridNode {
		&self.nodes[index]
	}
	/// Get the node at a raw index mutably, panics outside the grid
	pub(crate) fn get_node_by_index_mut(&mut self, index: usize) -> &mut GridNode {
		&mut self.nodes[index]
	}
	/// Indices of the nodes surrounding `cell` in all 8 directions
	pub fn neighbour_indices(&self, cell: GridCell) -> Vec<usize> {
		Ordinal::get_all_cell_neighbours(cell.get_xy(), self.width, self.height)
			.into_iter()
			.map(|(x, y)| y * self.width + x)
			.collect()
	}
}

/// Owns the navigation [Grid] and the set of cells blocked by obstacles
#[derive(Component)]
pub struct GridManager {
	/// Nodes rebuilt on every regeneration
	grid: Grid,
	/// Cells occupied by obstacles, they may lie outside the grid
	obstacles: BTreeSet<(i64, i64)>,
	/// Sources gathered by [GridManager::refresh_obstacles]
	sources: Vec<Box<dyn ObstacleSource>>,
	/// Scales terrain roughness into movement cost
	roughness_weight: f32,
	/// Identifies the most recent search
	search_stamp: u32,
}

impl std::fmt::Debug for GridManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GridManager")
			.field("grid", &self.grid)
			.field("obstacles", &self.obstacles)
			.field("sources", &self.sources.len())
			.field("roughness_weight", &self.roughness_weight)
			.field("search_stamp", &self.search_stamp)
			.finish()
	}
}

impl Default for GridManager {
	fn default() -> Self {
		GridManager::new(20, 20, 1.0)
	}
}

impl GridManager {
	/// Create a new instance of [GridManager] with a flat, fully walkable grid
	pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
		GridManager {
			grid: Grid::new(width, height, cell_size),
			obstacles: BTreeSet::new(),
			sources: Vec::new(),
			roughness_weight: 1.0,
			search_stamp: 0,
		}
	}
	/// Create a grid sized and weighted by `settings`
	pub fn from_settings(settings: &NavSettings) -> Self {
		let mut manager = GridManager::new(
			settings.grid_width,
			settings.grid_height,
			settings.cell_size,
		);
		manager.roughness_weight = settings.roughness_weight;
		manager
	}
	pub fn get_grid(&self) -> &Grid {
		&self.grid
	}
	/// Get a mutable reference to the grid, used by searches to record their progress
	pub(crate) fn get_grid_mut(&mut self) -> &mut Grid {
		&mut self.grid
	}
	/// Get the cells currently blocked by obstacles
	pub fn get_obstacles(&self) -> &BTreeSet<(i64, i64)> {
		&self.obstacles
	}
	/// Rebuild every node from the current terrain heights and obstacle set
	pub fn regenerate(&mut self, terrain: &dyn TerrainHeights) {
		let cell_size = self.grid.cell_size;
		let half = cell_size / 2.0;
		let (width, height) = (self.grid.width, self.grid.height);
		let mut nodes = Vec::with_capacity(width * height);
		let mut blocked = 0;
		for y in 0..height {
			for x in 0..width {
				let world_x = x as f32 * cell_size;
				let world_z = y as f32 * cell_size;
				let elevation = terrain.sample_height(world_x, world_z);
				let surrounding = (terrain.sample_height(world_x + half, world_z)
					+ terrain.sample_height(world_x - half, world_z)
					+ terrain.sample_height(world_x, world_z + half)
					+ terrain.sample_height(world_x, world_z - half))
					/ 4.0;
				let movement_cost = (elevation - surrounding).abs() * self.roughness_weight;
				let walkable = !self.obstacles.contains(&(x as i64, y as i64));
				if !walkable {
					blocked += 1;
				}
				nodes.push(GridNode::new(
					GridCell::new(x, y),
					Vec3::new(world_x, elevation, world_z),
					walkable,
					movement_cost,
				));
			}
		}
		self.grid.nodes = nodes;
		debug!(
			"Regenerated {}x{} navigation grid, {} cells blocked",
			width, height, blocked
		);
	}
	/// Replace the obstacle set with the cells covering `footprint`. Takes
	/// effect at the next [GridManager::regenerate]
	pub fn set_obstacles(&mut self, footprint: &[Vec2]) {
		self.obstacles = footprint
			.iter()
			.map(|p| self.world_to_cell(p.x, p.y))
			.collect();
	}
	/// Add a source whose footprint is gathered by [GridManager::refresh_obstacles]
	pub fn register_obstacle_source(&mut self, source: Box<dyn ObstacleSource>) {
		self.sources.push(source);
	}
	/// Number of registered obstacle sources
	pub fn obstacle_source_count(&self) -> usize {
		self.sources.len()
	}
	/// Rebuild the obstacle set from every registered source
	pub fn refresh_obstacles(&mut self) {
		self.refresh_obstacles_with(&[]);
	}
	/// Rebuild the obstacle set from every registered source plus `extra`
	pub fn refresh_obstacles_with(&mut self, extra: &[Vec2]) {
		let mut footprint: Vec<Vec2> = self.sources.iter().flat_map(|s| s.footprint()).collect();
		footprint.extend_from_slice(extra);
		self.set_obstacles(&footprint);
	}
	/// Floor divide a world `(x, z)` by the cell size
	fn world_to_cell(&self, world_x: f32, world_z: f32) -> (i64, i64) {
		let cell_size = self.grid.cell_size;
		(
			(world_x / cell_size).floor() as i64,
			(world_z / cell_size).floor() as i64,
		)
	}
	/// Find the node containing `world`, [None] when outside the grid
	pub fn node_at(&self, world: Vec3) -> Option<&GridNode> {
		let (x, y) = self.world_to_cell(world.x, world.z);
		if x < 0 || y < 0 {
			return None;
		}
		self.grid.get_node(GridCell::new(x as usize, y as usize))
	}
	/// The cell containing `world`, pulled onto the nearest edge cell when
	/// `world` lies outside the grid
	pub fn clamped_cell(&self, world: Vec3) -> GridCell {
		let (x, y) = self.world_to_cell(world.x, world.z);
		let max_x = self.grid.width.saturating_sub(1) as i64;
		let max_y = self.grid.height.saturating_sub(1) as i64;
		GridCell::new(x.clamp(0, max_x) as usize, y.clamp(0, max_y) as usize)
	}
	/// Pull a world position inside the grid extents, `y` is left alone
	pub fn clamp_to_grid(&self, world: Vec3) -> Vec3 {
		let cell_size = self.grid.cell_size;
		let max_x = self.grid.width.saturating_sub(1) as f32 * cell_size;
		let max_z = self.grid.height.saturating_sub(1) as f32 * cell_size;
		Vec3::new(world.x.clamp(0.0, max_x), world.y, world.z.clamp(0.0, max_z))
	}
	/// Keep only the positions that land on walkable nodes, moved onto the
	/// node's terrain-following world position
	pub fn snap_to_walkable(&self, positions: &[Vec3]) -> Vec<Vec3> {
		positions
			.iter()
			.filter_map(|p| self.node_at(*p))
			.filter(|node| node.is_walkable())
			.map(|node| node.get_world_position())
			.collect()
	}
	/// Start a new search and return its stamp
	pub(crate) fn begin_search(&mut self) -> u32 {
		self.search_stamp = self.search_stamp.wrapping_add(1);
		if self.search_stamp == 0 {
			// stamps wrapped, nodes may still hold any stamp so clear them all
			for node in self.grid.nodes.iter_mut() {
				node.visit(u32::MAX);
			}
			self.search_stamp = 1;
		}
		self.search_stamp
	}
}
