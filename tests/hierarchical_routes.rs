//! Compare the portal graph and local A* against a plain breadth first search
//! over randomly generated dungeons
//!

use std::collections::VecDeque;

use dungeon_navigation::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Exact number of steps between two cells, [None] when they are not connected
fn bfs_steps(grid: &DungeonGrid, start: GridCell, goal: GridCell) -> Option<usize> {
	let mut distances = vec![None; grid.get_size()];
	distances[grid.get_index(start)?] = Some(0);
	let mut queue = VecDeque::from([start]);
	while let Some(cell) = queue.pop_front() {
		let d = distances[grid.get_index(cell)?]?;
		if cell == goal {
			return Some(d);
		}
		for n in grid.get_walkable_neighbours(cell) {
			let i = grid.get_index(n)?;
			if distances[i].is_none() {
				distances[i] = Some(d + 1);
				queue.push_back(n);
			}
		}
	}
	None
}

/// Scattered walls with roughly a quarter of the cells blocked
fn scattered_dungeon(rng: &mut StdRng, size: usize) -> DungeonGrid {
	let tiles = (0..size * size)
		.map(|_| if rng.random_bool(0.25) { Tile::Wall } else { Tile::Floor })
		.collect();
	DungeonGrid::new(size, size, tiles).unwrap()
}

/// Scattered walls where every cluster boundary is sealed apart from one
/// single cell gap per cluster edge
fn narrow_gap_dungeon(rng: &mut StdRng, clusters: usize, cluster_size: usize) -> DungeonGrid {
	let size = clusters * cluster_size;
	let mut tiles: Vec<Tile> = (0..size * size)
		.map(|_| if rng.random_bool(0.15) { Tile::Wall } else { Tile::Floor })
		.collect();
	for k in 1..clusters {
		let line = k * cluster_size;
		for segment in 0..clusters {
			let gap = segment * cluster_size + rng.random_range(1..cluster_size);
			for offset in 0..cluster_size {
				let along = segment * cluster_size + offset;
				// western column of the eastern cluster
				tiles[along * size + line] = if along == gap { Tile::Floor } else { Tile::Wall };
				// northern row of the southern cluster
				tiles[line * size + along] = if along == gap { Tile::Floor } else { Tile::Wall };
			}
			// the far side of each gap is open
			tiles[gap * size + line - 1] = Tile::Floor;
			tiles[(line - 1) * size + gap] = Tile::Floor;
		}
	}
	DungeonGrid::new(size, size, tiles).unwrap()
}

/// Pick a random floor cell
fn random_floor(rng: &mut StdRng, grid: &DungeonGrid) -> GridCell {
	loop {
		let cell = GridCell::new(
			rng.random_range(0..grid.get_width()),
			rng.random_range(0..grid.get_height()),
		);
		if grid.is_walkable(cell) {
			return cell;
		}
	}
}

#[test]
fn local_path_is_shortest() {
	let mut rng = StdRng::seed_from_u64(11);
	for _ in 0..10 {
		let grid = scattered_dungeon(&mut rng, 30);
		let bounds = CellBounds::of_grid(&grid);
		for _ in 0..10 {
			let start = random_floor(&mut rng, &grid);
			let goal = random_floor(&mut rng, &grid);
			let path = find_local_path(&grid, start, goal, bounds);
			match bfs_steps(&grid, start, goal) {
				Some(steps) => {
					assert_eq!(steps + 1, path.len());
					assert_eq!(Some(&start), path.first());
					assert_eq!(Some(&goal), path.last());
					for pair in path.windows(2) {
						assert!(grid.is_walkable(pair[1]));
						assert_eq!(1, pair[0].get_column().abs_diff(pair[1].get_column()) + pair[0].get_row().abs_diff(pair[1].get_row()));
					}
				}
				None => assert!(path.is_empty()),
			}
		}
	}
}

#[test]
fn routes_only_between_connected_cells() {
	let mut rng = StdRng::seed_from_u64(23);
	for _ in 0..5 {
		let grid = scattered_dungeon(&mut rng, 30);
		let graph = PortalGraph::new(&grid, 10).unwrap();
		for (i, portal) in graph.get_portals().iter().enumerate() {
			for connection in portal.get_connections() {
				let other = graph.get_portal(connection.portal).unwrap();
				assert!(other.get_connections().iter().any(|c| c.portal == i && c.cost == connection.cost));
			}
		}
		for _ in 0..10 {
			let start = random_floor(&mut rng, &grid);
			let goal = random_floor(&mut rng, &grid);
			let route = graph.find_route(&grid, start, goal);
			if !route.is_empty() {
				assert!(bfs_steps(&grid, start, goal).is_some());
				assert_eq!(Some(RouteNode::Goal), route.last().map(|s| s.node));
			}
		}
	}
}

#[test]
fn narrow_gap_routes_never_undercut() {
	let mut rng = StdRng::seed_from_u64(5);
	for _ in 0..8 {
		let grid = narrow_gap_dungeon(&mut rng, 4, 5);
		let graph = PortalGraph::new(&grid, 5).unwrap();
		assert!(graph.get_portals().iter().all(|p| p.span_length() == 1));
		for _ in 0..12 {
			let start = random_floor(&mut rng, &grid);
			let goal = random_floor(&mut rng, &grid);
			let route = graph.find_route(&grid, start, goal);
			match bfs_steps(&grid, start, goal) {
				Some(steps) => {
					assert!(!route.is_empty(), "no route from {:?} to {:?}", start, goal);
					assert!(route_total_cost(&route) >= steps as f32);
				}
				None => assert!(route.is_empty()),
			}
		}
	}
}
