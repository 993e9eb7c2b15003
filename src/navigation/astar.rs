//! Exact A* search between two cells of a [DungeonGrid], confined to a
//! rectangle of the grid. This is the workhorse of the portal graph, it
//! measures the cost between portals inside a cluster and it resolves
//! queries where the start and goal share a cluster.
//!
//! Movement is 4-connected with a uniform step cost of `1` and the heuristic
//! is the straight line distance to the goal. Nodes waiting to be explored
//! are kept in insertion order and scanned for the lowest score so equal
//! scores resolve to whichever was discovered first.
//!

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::prelude::*;

/// Find the shortest path from `start` to `goal` using only floor cells
/// inside `bounds` (clamped to the grid).
///
/// The path includes both end points. A `start` equal to the `goal` gives a
/// single cell path, an empty path means no route exists or either end point
/// is off the grid, outside the `bounds` or a wall
pub fn find_local_path(
	grid: &DungeonGrid,
	start: GridCell,
	goal: GridCell,
	bounds: CellBounds,
) -> Vec<GridCell> {
	let Some(bounds) = bounds.clamp_to(grid) else {
		return Vec::new();
	};
	if !bounds.contains(start)
		|| !bounds.contains(goal)
		|| !grid.is_walkable(start)
		|| !grid.is_walkable(goal)
	{
		trace!(
			"No local path from {:?} to {:?}, an end point is unusable",
			start,
			goal
		);
		return Vec::new();
	}
	if start == goal {
		return vec![start];
	}
	let heuristic = |cell: GridCell| cell.euclidean_distance(&goal);
	// nodes to explore with their a-star score
	let mut open: Vec<(GridCell, f32)> = vec![(start, heuristic(start))];
	let mut closed: HashSet<GridCell> = HashSet::new();
	let mut distances: HashMap<GridCell, f32> = HashMap::from([(start, 0.0)]);
	let mut came_from: HashMap<GridCell, GridCell> = HashMap::new();

	while !open.is_empty() {
		let mut best = 0;
		for (i, node) in open.iter().enumerate().skip(1) {
			if node.1 < open[best].1 {
				best = i;
			}
		}
		let (current, _) = open.remove(best);
		if current == goal {
			return reconstruct_path(&came_from, goal);
		}
		if !closed.insert(current) {
			continue;
		}
		let distance_so_far = distances.get(&current).copied().unwrap_or_default();
		for neighbour in grid.get_walkable_neighbours(current) {
			if !bounds.contains(neighbour) || closed.contains(&neighbour) {
				continue;
			}
			let distance = distance_so_far + 1.0;
			if distances.get(&neighbour).is_none_or(|known| distance < *known) {
				distances.insert(neighbour, distance);
				came_from.insert(neighbour, current);
				let score = distance + heuristic(neighbour);
				if let Some(node) = open.iter_mut().find(|n| n.0 == neighbour) {
					node.1 = score;
				} else {
					open.push((neighbour, score));
				}
			}
		}
	}
	trace!("No local path from {:?} to {:?}", start, goal);
	Vec::new()
}

/// Walk the `came_from` links back from the `goal` and reverse them into a start to goal path
fn reconstruct_path(came_from: &HashMap<GridCell, GridCell>, goal: GridCell) -> Vec<GridCell> {
	let mut path = vec![goal];
	let mut current = goal;
	while let Some(previous) = came_from.get(&current) {
		path.push(*previous);
		current = *previous;
	}
	path.reverse();
	path
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::VecDeque;
	/// Exact step count via breadth first search
	fn bfs_distance(grid: &DungeonGrid, start: GridCell, goal: GridCell) -> Option<usize> {
		let mut seen = HashSet::from([start]);
		let mut queue = VecDeque::from([(start, 0)]);
		while let Some((cell, d)) = queue.pop_front() {
			if cell == goal {
				return Some(d);
			}
			for n in grid.get_walkable_neighbours(cell) {
				if seen.insert(n) {
					queue.push_back((n, d + 1));
				}
			}
		}
		None
	}
	fn assert_contiguous(grid: &DungeonGrid, path: &[GridCell]) {
		for pair in path.windows(2) {
			assert_eq!(1, (pair[1].as_ivec2() - pair[0].as_ivec2()).abs().element_sum());
			assert!(grid.is_walkable(pair[1]));
		}
	}
	#[test]
	fn straight_line() {
		let grid = DungeonGrid::new_with_tile(5, 5, Tile::Floor).unwrap();
		let bounds = CellBounds::of_grid(&grid);
		let path = find_local_path(&grid, GridCell::new(0, 2), GridCell::new(4, 2), bounds);
		let actual = vec![
			GridCell::new(0, 2),
			GridCell::new(1, 2),
			GridCell::new(2, 2),
			GridCell::new(3, 2),
			GridCell::new(4, 2),
		];
		assert_eq!(actual, path);
	}
	#[test]
	fn around_a_wall() {
		//  _______________
		// |  S  |/////|  G  |
		// |_____|/////|_____|
		// |     |/////|     |
		// |_____|/////|_____|
		// |     |     |     |
		// |_____|_____|_____|
		let grid = DungeonGrid::from_ascii("
			.#.
			.#.
			...
		").unwrap();
		let bounds = CellBounds::of_grid(&grid);
		let path = find_local_path(&grid, GridCell::new(0, 0), GridCell::new(2, 0), bounds);
		assert_eq!(7, path.len());
		assert_eq!(GridCell::new(0, 0), path[0]);
		assert_eq!(GridCell::new(2, 0), path[6]);
		assert_contiguous(&grid, &path);
	}
	#[test]
	fn bounds_confine_the_search() {
		let grid = DungeonGrid::from_ascii("
			.#.
			.#.
			...
		").unwrap();
		// the only way round is through row 2
		let bounds = CellBounds::new(GridCell::new(0, 0), GridCell::new(2, 1));
		let path = find_local_path(&grid, GridCell::new(0, 0), GridCell::new(2, 0), bounds);
		assert!(path.is_empty());
		// goal outside of the bounds
		let bounds = CellBounds::new(GridCell::new(0, 0), GridCell::new(0, 2));
		let path = find_local_path(&grid, GridCell::new(0, 0), GridCell::new(2, 2), bounds);
		assert!(path.is_empty());
	}
	#[test]
	fn oversized_bounds_are_clamped() {
		let grid = DungeonGrid::new_with_tile(3, 3, Tile::Floor).unwrap();
		let bounds = CellBounds::new(GridCell::new(0, 0), GridCell::new(100, 100));
		let path = find_local_path(&grid, GridCell::new(0, 0), GridCell::new(2, 2), bounds);
		assert_eq!(5, path.len());
	}
	#[test]
	fn start_is_goal() {
		let grid = DungeonGrid::new_with_tile(3, 3, Tile::Floor).unwrap();
		let bounds = CellBounds::of_grid(&grid);
		let path = find_local_path(&grid, GridCell::new(1, 1), GridCell::new(1, 1), bounds);
		assert_eq!(vec![GridCell::new(1, 1)], path);
	}
	#[test]
	fn unusable_end_points() {
		let grid = DungeonGrid::from_ascii("
			..#
			...
		").unwrap();
		let bounds = CellBounds::of_grid(&grid);
		assert!(find_local_path(&grid, GridCell::new(0, 0), GridCell::new(2, 0), bounds).is_empty());
		assert!(find_local_path(&grid, GridCell::new(2, 0), GridCell::new(0, 0), bounds).is_empty());
		assert!(find_local_path(&grid, GridCell::new(0, 0), GridCell::new(9, 0), bounds).is_empty());
	}
	#[test]
	fn enclosed_cell() {
		let grid = DungeonGrid::from_ascii("
			.....
			..#..
			.#.#.
			..#..
		").unwrap();
		let bounds = CellBounds::of_grid(&grid);
		let enclosed = GridCell::new(2, 2);
		assert!(find_local_path(&grid, GridCell::new(0, 0), enclosed, bounds).is_empty());
		assert!(find_local_path(&grid, enclosed, GridCell::new(0, 0), bounds).is_empty());
	}
	#[test]
	fn matches_bfs_through_a_maze() {
		let grid = DungeonGrid::from_ascii("
			..........
			.########.
			.#......#.
			.#.####.#.
			.#.#..#.#.
			.#.#.##.#.
			.#.#....#.
			.#.######.
			.#........
			.#########
		").unwrap();
		let bounds = CellBounds::of_grid(&grid);
		let start = GridCell::new(0, 9);
		for i in 0..grid.get_size() {
			let goal = grid.get_cell(i);
			let path = find_local_path(&grid, start, goal, bounds);
			match bfs_distance(&grid, start, goal) {
				Some(d) if grid.is_walkable(goal) => {
					assert_eq!(d + 1, path.len(), "path to {:?}", goal);
					assert_contiguous(&grid, &path);
				}
				_ => assert!(path.is_empty(), "no path expected to {:?}", goal),
			}
		}
	}
}
