//! Useful structures and tools shared by the fields and the pathfinders
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Default edge length of the square clusters a [crate::prelude::PortalGraph] divides a grid into
pub const CLUSTER_RESOLUTION: usize = 10;

/// Convenience way of accessing the 4 sides of a cluster in a [crate::prelude::PortalGraph] and the 4 orthogonal neighbours of a [GridCell]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Ordinal {
	North,
	East,
	South,
	West,
}

impl Ordinal {
	/// Based on a grid cells `(column, row)` position find its neighbours based on the grid dimensions (up to 4)
	pub fn get_orthogonal_cell_neighbours(
		cell: GridCell,
		width: usize,
		height: usize,
	) -> Vec<GridCell> {
		let (column, row) = cell.get_column_row();
		let mut neighbours = Vec::with_capacity(4);
		if row > 0 {
			neighbours.push(GridCell::new(column, row - 1)); // northern cell coords
		}
		if column + 1 < width {
			neighbours.push(GridCell::new(column + 1, row)); // eastern cell coords
		}
		if row + 1 < height {
			neighbours.push(GridCell::new(column, row + 1)); // southern cell coords
		}
		if column > 0 {
			neighbours.push(GridCell::new(column - 1, row)); // western cell coords
		}
		neighbours
	}
	/// Based on a clusters `(column, row)` position find its neighbours based on the number of clusters along each axis (up to 4) and include the [Ordinal] direction in the result
	pub fn get_cluster_neighbours_with_ordinal(
		cluster: (usize, usize),
		cluster_columns: usize,
		cluster_rows: usize,
	) -> Vec<(Ordinal, (usize, usize))> {
		let mut neighbours = Vec::with_capacity(4);
		if cluster.1 > 0 {
			neighbours.push((Ordinal::North, (cluster.0, cluster.1 - 1)));
		}
		if cluster.0 + 1 < cluster_columns {
			neighbours.push((Ordinal::East, (cluster.0 + 1, cluster.1)));
		}
		if cluster.1 + 1 < cluster_rows {
			neighbours.push((Ordinal::South, (cluster.0, cluster.1 + 1)));
		}
		if cluster.0 > 0 {
			neighbours.push((Ordinal::West, (cluster.0 - 1, cluster.1)));
		}
		neighbours
	}
	/// Unit step in grid space, north is towards row `0`
	pub fn as_offset(&self) -> IVec2 {
		match self {
			Ordinal::North => IVec2::new(0, -1),
			Ordinal::East => IVec2::new(1, 0),
			Ordinal::South => IVec2::new(0, 1),
			Ordinal::West => IVec2::new(-1, 0),
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn ordinal_grid_cell_neighbours() {
		let cell = GridCell::new(0, 0);
		let result = Ordinal::get_orthogonal_cell_neighbours(cell, 10, 10);
		let actual = vec![GridCell::new(1, 0), GridCell::new(0, 1)];
		assert_eq!(actual, result);
	}
	#[test]
	fn ordinal_grid_cell_neighbours2() {
		let cell = GridCell::new(9, 4);
		let result = Ordinal::get_orthogonal_cell_neighbours(cell, 10, 5);
		let actual = vec![GridCell::new(9, 3), GridCell::new(8, 4)];
		assert_eq!(actual, result);
	}
	#[test]
	fn ordinal_grid_cell_neighbours3() {
		let cell = GridCell::new(4, 4);
		let result = Ordinal::get_orthogonal_cell_neighbours(cell, 10, 10);
		let actual = vec![
			GridCell::new(4, 3),
			GridCell::new(5, 4),
			GridCell::new(4, 5),
			GridCell::new(3, 4),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn ordinal_grid_cell_neighbours_single_cell() {
		let cell = GridCell::new(0, 0);
		let result = Ordinal::get_orthogonal_cell_neighbours(cell, 1, 1);
		assert!(result.is_empty());
	}
	#[test]
	fn ordinal_cluster_neighbours() {
		let result = Ordinal::get_cluster_neighbours_with_ordinal((0, 0), 5, 5);
		let actual = vec![(Ordinal::East, (1, 0)), (Ordinal::South, (0, 1))];
		assert_eq!(actual, result);
	}
	#[test]
	fn ordinal_cluster_neighbours2() {
		let result = Ordinal::get_cluster_neighbours_with_ordinal((4, 2), 5, 3);
		let actual = vec![(Ordinal::North, (4, 1)), (Ordinal::West, (3, 2))];
		assert_eq!(actual, result);
	}
	#[test]
	fn offsets_cancel() {
		let total = [Ordinal::North, Ordinal::East, Ordinal::South, Ordinal::West]
			.iter()
			.fold(IVec2::ZERO, |sum, o| sum + o.as_offset());
		assert_eq!(IVec2::ZERO, total);
		assert_eq!(IVec2::new(0, -1), Ordinal::North.as_offset());
	}
}
