//! Useful structures and tools used by the grid
//!

/// The 8 directions of movement between grid cells. North is towards row `0`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Ordinal {
	North,
	East,
	South,
	West,
	NorthEast,
	SouthEast,
	SouthWest,
	NorthWest,
}

impl Ordinal {
	/// Every direction, orthogonal first
	pub const ALL: [Ordinal; 8] = [
		Ordinal::North,
		Ordinal::East,
		Ordinal::South,
		Ordinal::West,
		Ordinal::NorthEast,
		Ordinal::SouthEast,
		Ordinal::SouthWest,
		Ordinal::NorthWest,
	];
	/// The `(column, row)` step taken when moving in this direction
	pub fn offset(&self) -> (i32, i32) {
		match self {
			Ordinal::North => (0, -1),
			Ordinal::East => (1, 0),
			Ordinal::South => (0, 1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthEast => (1, -1),
			Ordinal::SouthEast => (1, 1),
			Ordinal::SouthWest => (-1, 1),
			Ordinal::NorthWest => (-1, -1),
		}
	}
	/// Step from the `(column, row)` cell in this direction, [None] if the
	/// result falls outside a `width x height` grid
	pub fn step(&self, cell: (usize, usize), width: usize, height: usize) -> Option<(usize, usize)> {
		let (dx, dy) = self.offset();
		let x = cell.0 as i64 + dx as i64;
		let y = cell.1 as i64 + dy as i64;
		if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
			None
		} else {
			Some((x as usize, y as usize))
		}
	}
	/// Based on a grid cells `(column, row)` position find all neighbours
	/// within a `width x height` grid including diagonal directions
	pub fn get_all_cell_neighbours(
		cell: (usize, usize),
		width: usize,
		height: usize,
	) -> Vec<(usize, usize)> {
		Ordinal::ALL
			.iter()
			.filter_map(|ordinal| ordinal.step(cell, width, height))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn corner_has_three_neighbours() {
		let result = Ordinal::get_all_cell_neighbours((0, 0), 4, 4);
		let actual = vec![(1, 0), (0, 1), (1, 1)];
		assert_eq!(actual, result);
	}
	#[test]
	fn centre_has_eight_neighbours() {
		let result = Ordinal::get_all_cell_neighbours((1, 1), 3, 3);
		assert_eq!(8, result.len());
	}
	#[test]
	fn single_cell_grid_has_no_neighbours() {
		assert!(Ordinal::get_all_cell_neighbours((0, 0), 1, 1).is_empty());
	}
}
