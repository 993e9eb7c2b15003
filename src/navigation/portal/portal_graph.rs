//! The PortalGraph divides a [DungeonGrid] into square clusters and records
//! every [Portal] between them. Portals sharing a cluster are linked with the
//! cost of walking between them, this coarse graph lets long routes be found
//! by searching a handful of portals rather than every cell.
//!
//! A 20x10 grid with clusters of 5 has 4x2 clusters:
//!
//! ```text
//!  _______________________
//! |     |     |     |     |
//! |(0,0)|(1,0)|(2,0)|(3,0)|
//! |_____|_____|_____|_____|
//! |     |     |     |     |
//! |(0,1)|(1,1)|(2,1)|(3,1)|
//! |_____|_____|_____|_____|
//! ```
//!
//! Building the graph runs an exact [find_local_path] search between every
//! cell of every pair of portals within a cluster. If any such pair of cells
//! cannot reach each other the two portals are left unlinked, otherwise the
//! cheapest path becomes the cost of the link in both directions.
//!
//! A route is then found by adding two temporary nodes, one for the start and
//! one for the goal, linking them to the portals of their clusters and
//! running A* from the start node to the goal node.
//!
//! Route costs are an estimate rather than an exact distance. Leaving two
//! portals unlinked when a single pairing of their cells is blocked can hide
//! the shortest route, so the route found may be longer than needed. Each
//! link is also measured from whichever cell of a portal is cheapest rather
//! than the cell the previous leg arrived on, so a route through portals
//! wider than one cell can cost less than actually walking it. With single
//! cell portals the cost never undercuts the walk. A route is only returned
//! when the goal can be reached.
//!

use std::collections::HashMap;

use bevy::prelude::*;

use crate::prelude::*;

/// A node visited by a route
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteNode {
	/// Index of a [Portal] within the [PortalGraph]
	Portal(usize),
	/// The goal cell of the query
	Goal,
}

/// A single leg of a route with the cost of reaching it from the previous leg
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteStep {
	/// Where this leg ends
	pub node: RouteNode,
	/// Cost of this leg alone
	pub cost: f32,
}

/// Sum the per leg costs of a route
pub fn route_total_cost(route: &[RouteStep]) -> f32 {
	route.iter().map(|step| step.cost).sum()
}

/// Clusters of a [DungeonGrid] and the weighted graph of [Portal]s between them
#[derive(Component, Clone, Debug)]
pub struct PortalGraph {
	/// Edge length of each square cluster
	cluster_size: usize,
	/// Number of clusters along the x axis
	cluster_columns: usize,
	/// Number of clusters along the y axis
	cluster_rows: usize,
	/// Every portal of the grid
	portals: Vec<Portal>,
	/// Indices into `portals` for each cluster, clusters are stored row-major
	cluster_portals: Vec<Vec<usize>>,
}

impl PortalGraph {
	/// Divide the `grid` into clusters of `cluster_size` and build the portal
	/// graph. The cluster size must be non-zero and divide both dimensions of
	/// the grid exactly
	pub fn new(grid: &DungeonGrid, cluster_size: usize) -> NavigationResult<Self> {
		if cluster_size == 0
			|| grid.get_width() % cluster_size != 0
			|| grid.get_height() % cluster_size != 0
		{
			return Err(NavigationError::ClusterSizeMismatch {
				width: grid.get_width(),
				height: grid.get_height(),
				cluster_size,
			});
		}
		let cluster_columns = grid.get_width() / cluster_size;
		let cluster_rows = grid.get_height() / cluster_size;
		let mut graph = PortalGraph {
			cluster_size,
			cluster_columns,
			cluster_rows,
			portals: Vec::new(),
			cluster_portals: vec![Vec::new(); cluster_columns * cluster_rows],
		};
		graph.insert_all_portals(grid);
		graph.build_all_cluster_connections(grid);
		debug!(
			"Built portal graph over {} clusters, {} portals and {} connections",
			graph.cluster_portals.len(),
			graph.portals.len(),
			graph.get_connection_count()
		);
		Ok(graph)
	}
	/// Scan every cluster for portals and register each one against the two clusters it joins
	fn insert_all_portals(&mut self, grid: &DungeonGrid) {
		for cluster_row in 0..self.cluster_rows {
			for cluster_column in 0..self.cluster_columns {
				let cluster = (cluster_column, cluster_row);
				let min = self.cluster_bounds(cluster).get_min();
				let neighbours = Ordinal::get_cluster_neighbours_with_ordinal(
					cluster,
					self.cluster_columns,
					self.cluster_rows,
				);
				for portal in find_cluster_portals(grid, min, self.cluster_size) {
					let Some((_, neighbour)) =
						neighbours.iter().find(|(side, _)| *side == portal.get_side())
					else {
						continue;
					};
					let neighbour = *neighbour;
					let index = self.portals.len();
					self.portals.push(portal);
					self.register_portal(cluster, index);
					self.register_portal(neighbour, index);
				}
			}
		}
	}
	/// Record that the portal at `index` touches the `cluster`
	fn register_portal(&mut self, cluster: (usize, usize), index: usize) {
		let i = self.cluster_index(cluster);
		self.cluster_portals[i].push(index);
	}
	/// Link every pair of portals within each cluster
	fn build_all_cluster_connections(&mut self, grid: &DungeonGrid) {
		for cluster_row in 0..self.cluster_rows {
			for cluster_column in 0..self.cluster_columns {
				self.build_cluster_connections(grid, (cluster_column, cluster_row));
			}
		}
	}
	/// Link the pairs of portals of a single cluster that can fully reach each other
	fn build_cluster_connections(&mut self, grid: &DungeonGrid, cluster: (usize, usize)) {
		let bounds = self.cluster_bounds(cluster);
		let indices = self.portals_of_cluster(cluster).to_vec();
		for (n, a) in indices.iter().enumerate() {
			for b in indices.iter().skip(n + 1) {
				let a_cells = self.portals[*a].cells_within(&bounds);
				let b_cells = self.portals[*b].cells_within(&bounds);
				if let Some(cost) = cheapest_crossing(grid, &a_cells, &b_cells, bounds) {
					self.portals[*a].add_connection(*b, cost);
					self.portals[*b].add_connection(*a, cost);
				}
			}
		}
	}
	/// Get the edge length of each cluster
	pub fn get_cluster_size(&self) -> usize {
		self.cluster_size
	}
	/// Get the number of clusters along the x axis
	pub fn get_cluster_columns(&self) -> usize {
		self.cluster_columns
	}
	/// Get the number of clusters along the y axis
	pub fn get_cluster_rows(&self) -> usize {
		self.cluster_rows
	}
	/// Get every portal of the graph
	pub fn get_portals(&self) -> &[Portal] {
		&self.portals
	}
	/// Get a portal by index
	pub fn get_portal(&self, index: usize) -> Option<&Portal> {
		self.portals.get(index)
	}
	/// Total number of one way links between portals
	pub fn get_connection_count(&self) -> usize {
		self.portals.iter().map(|p| p.get_connections().len()).sum()
	}
	/// Row-major index of a cluster
	fn cluster_index(&self, cluster: (usize, usize)) -> usize {
		cluster.1 * self.cluster_columns + cluster.0
	}
	/// The `(column, row)` of the cluster containing the `cell`, [None] when it is off the grid
	pub fn cluster_of(&self, cell: GridCell) -> Option<(usize, usize)> {
		let cluster = (
			cell.get_column() / self.cluster_size,
			cell.get_row() / self.cluster_size,
		);
		if cluster.0 < self.cluster_columns && cluster.1 < self.cluster_rows {
			Some(cluster)
		} else {
			None
		}
	}
	/// The cells covered by a cluster
	pub fn cluster_bounds(&self, cluster: (usize, usize)) -> CellBounds {
		let min = GridCell::new(cluster.0 * self.cluster_size, cluster.1 * self.cluster_size);
		let max = GridCell::new(
			min.get_column() + self.cluster_size - 1,
			min.get_row() + self.cluster_size - 1,
		);
		CellBounds::new(min, max)
	}
	/// Indices of the portals touching a cluster, empty for clusters off the grid
	pub fn portals_of_cluster(&self, cluster: (usize, usize)) -> &[usize] {
		if cluster.0 < self.cluster_columns && cluster.1 < self.cluster_rows {
			&self.cluster_portals[self.cluster_index(cluster)]
		} else {
			&[]
		}
	}
	/// Find a route from `start` to `goal` as a series of portals to pass
	/// through ending with the goal itself.
	///
	/// When both cells share a cluster and can reach each other within it the
	/// route is a single [RouteNode::Goal] step costing the exact number of
	/// steps. An empty route means no path was found
	pub fn find_route(&self, grid: &DungeonGrid, start: GridCell, goal: GridCell) -> Vec<RouteStep> {
		let (Some(start_cluster), Some(goal_cluster)) = (self.cluster_of(start), self.cluster_of(goal))
		else {
			trace!("Route from {:?} to {:?} leaves the grid", start, goal);
			return Vec::new();
		};
		if !grid.contains(start) || !grid.contains(goal) {
			return Vec::new();
		}
		if start_cluster == goal_cluster {
			let path = find_local_path(grid, start, goal, self.cluster_bounds(start_cluster));
			if !path.is_empty() {
				return vec![RouteStep {
					node: RouteNode::Goal,
					cost: (path.len() - 1) as f32,
				}];
			}
		}
		let start_links = self.endpoint_links(grid, start, start_cluster, true);
		let goal_links: HashMap<usize, f32> = self
			.endpoint_links(grid, goal, goal_cluster, false)
			.into_iter()
			.collect();
		self.astar(start, goal, &start_links, &goal_links)
	}
	/// Costs between an endpoint and each portal of its cluster it can reach,
	/// counted as the cells of the cheapest path to any cell of the portal.
	/// Both directions count the boundary crossing
	fn endpoint_links(
		&self,
		grid: &DungeonGrid,
		endpoint: GridCell,
		cluster: (usize, usize),
		is_start: bool,
	) -> Vec<(usize, f32)> {
		let bounds = self.cluster_bounds(cluster);
		let mut links = Vec::new();
		for index in self.portals_of_cluster(cluster) {
			let mut best: Option<usize> = None;
			for cell in self.portals[*index].cells_within(&bounds) {
				let path = if is_start {
					find_local_path(grid, endpoint, cell, bounds)
				} else {
					find_local_path(grid, cell, endpoint, bounds)
				};
				if !path.is_empty() {
					best = Some(best.map_or(path.len(), |b| b.min(path.len())));
				}
			}
			if let Some(cost) = best {
				links.push((*index, cost as f32));
			}
		}
		links
	}
	/// A* across the portals with virtual start and goal nodes. The start
	/// node is linked by `start_links` and the goal node is reached from the
	/// portals in `goal_links`
	fn astar(
		&self,
		start: GridCell,
		goal: GridCell,
		start_links: &[(usize, f32)],
		goal_links: &HashMap<usize, f32>,
	) -> Vec<RouteStep> {
		let goal_node = self.portals.len();
		let start_node = goal_node + 1;
		let goal_point = Vec2::new(goal.get_column() as f32 + 0.5, goal.get_row() as f32 + 0.5);
		let heuristic = |node: usize| {
			if node == goal_node {
				0.0
			} else if node == start_node {
				start.euclidean_distance(&goal)
			} else {
				self.portals[node].center().distance(goal_point)
			}
		};
		// nodes to explore with their a-star score
		let mut open: Vec<(usize, f32)> = vec![(start_node, heuristic(start_node))];
		let mut distances: HashMap<usize, f32> = HashMap::from([(start_node, 0.0)]);
		// previous node and the cost of the leg between them
		let mut came_from: HashMap<usize, (usize, f32)> = HashMap::new();
		let mut closed: Vec<bool> = vec![false; start_node + 1];

		while !open.is_empty() {
			let mut best = 0;
			for (i, node) in open.iter().enumerate().skip(1) {
				if node.1 < open[best].1 {
					best = i;
				}
			}
			let (current, _) = open.remove(best);
			if current == goal_node {
				let route = reconstruct_route(&came_from, goal_node, start_node);
				trace!(
					"Route from {:?} to {:?} through {} portals",
					start,
					goal,
					route.len() - 1
				);
				return route;
			}
			if closed[current] {
				continue;
			}
			closed[current] = true;
			let distance_so_far = distances.get(&current).copied().unwrap_or_default();
			let mut edges: Vec<(usize, f32)> = Vec::new();
			if current == start_node {
				edges.extend_from_slice(start_links);
			} else {
				edges.extend(
					self.portals[current]
						.get_connections()
						.iter()
						.map(|c| (c.portal, c.cost)),
				);
				if let Some(cost) = goal_links.get(&current) {
					edges.push((goal_node, *cost));
				}
			}
			for (neighbour, cost) in edges {
				if closed[neighbour] {
					continue;
				}
				let distance = distance_so_far + cost;
				if distances.get(&neighbour).is_none_or(|known| distance < *known) {
					distances.insert(neighbour, distance);
					came_from.insert(neighbour, (current, cost));
					let score = distance + heuristic(neighbour);
					if let Some(node) = open.iter_mut().find(|n| n.0 == neighbour) {
						node.1 = score;
					} else {
						open.push((neighbour, score));
					}
				}
			}
		}
		trace!("No route from {:?} to {:?}", start, goal);
		Vec::new()
	}
}

/// Cheapest path between any cell of `from` and any cell of `to` within the
/// `bounds`, counted in cells. [None] if any pairing cannot be walked
fn cheapest_crossing(
	grid: &DungeonGrid,
	from: &[GridCell],
	to: &[GridCell],
	bounds: CellBounds,
) -> Option<f32> {
	let mut best = usize::MAX;
	for a in from {
		for b in to {
			let path = find_local_path(grid, *a, *b, bounds);
			if path.is_empty() {
				return None;
			}
			best = best.min(path.len());
		}
	}
	if best == usize::MAX {
		None
	} else {
		Some(best as f32)
	}
}

/// Walk back from the goal node to the start node turning each leg into a [RouteStep]
fn reconstruct_route(
	came_from: &HashMap<usize, (usize, f32)>,
	goal_node: usize,
	start_node: usize,
) -> Vec<RouteStep> {
	let mut route = Vec::new();
	let mut current = goal_node;
	while current != start_node {
		let Some((previous, cost)) = came_from.get(&current) else {
			break;
		};
		let node = if current == goal_node {
			RouteNode::Goal
		} else {
			RouteNode::Portal(current)
		};
		route.push(RouteStep { node, cost: *cost });
		current = *previous;
	}
	route.reverse();
	route
}
