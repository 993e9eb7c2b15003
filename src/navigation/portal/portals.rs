//! A Portal is a gap in the boundary between two neighbouring clusters of a
//! [DungeonGrid]. A run of boundary cells forms a portal when every cell and
//! its neighbour across the boundary are both floors, the run is extended as
//! far as possible along the boundary.
//!
//! Each cluster only looks for portals along its northern and western
//! boundaries, the southern and eastern ones belong to its neighbours. The
//! span of a portal covers the cells on both sides of the boundary, `start`
//! sits on the far side and `end` on the near side:
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! |  #  |  S  |  x  |  x  |  #  |    cluster to the north
//! |_____|_____|_____|_____|_____|
//! ================================  boundary
//! |     |     |     |     |     |
//! |  #  |  x  |  x  |  E  |  #  |    owning cluster
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Clipping the span to the bounds of either cluster gives the cells of the
//! portal that cluster can use.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// A weighted link from one [Portal] to another through a shared cluster
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalConnection {
	/// Index of the connected [Portal] within the [crate::prelude::PortalGraph]
	pub portal: usize,
	/// Cheapest number of cells walked to reach the connected portal, including the boundary crossing
	pub cost: f32,
}

/// A maximal walkable span straddling one cluster boundary
#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
	/// First cell of the span, on the far side of the boundary
	start: GridCell,
	/// Last cell of the span, on the near side of the boundary
	end: GridCell,
	/// Boundary of the owning cluster the portal was found on
	side: Ordinal,
	/// Links to other portals sharing a cluster with this one
	connections: Vec<PortalConnection>,
}

impl Portal {
	/// Create a new instance of [Portal] without any connections
	pub fn new(start: GridCell, end: GridCell, side: Ordinal) -> Self {
		Portal {
			start,
			end,
			side,
			connections: Vec::new(),
		}
	}
	/// Get the first cell of the span
	pub fn get_start(&self) -> GridCell {
		self.start
	}
	/// Get the last cell of the span
	pub fn get_end(&self) -> GridCell {
		self.end
	}
	/// Get the boundary of the owning cluster
	pub fn get_side(&self) -> Ordinal {
		self.side
	}
	/// Get the links to other portals
	pub fn get_connections(&self) -> &[PortalConnection] {
		&self.connections
	}
	/// Link to another portal. When a link already exists the cheaper cost is kept
	pub fn add_connection(&mut self, portal: usize, cost: f32) {
		if let Some(existing) = self.connections.iter_mut().find(|c| c.portal == portal) {
			existing.cost = existing.cost.min(cost);
		} else {
			self.connections.push(PortalConnection { portal, cost });
		}
	}
	/// Number of cells along the boundary the portal covers
	pub fn span_length(&self) -> usize {
		match self.side {
			Ordinal::North | Ordinal::South => {
				self.end.get_column().abs_diff(self.start.get_column()) + 1
			}
			Ordinal::East | Ordinal::West => self.end.get_row().abs_diff(self.start.get_row()) + 1,
		}
	}
	/// Mid point of the span in continuous grid space, where cell `(c, r)`
	/// covers `[c, c + 1) x [r, r + 1)`. This lies on the boundary itself
	pub fn center(&self) -> Vec2 {
		Vec2::new(
			(self.start.get_column() + self.end.get_column() + 1) as f32 * 0.5,
			(self.start.get_row() + self.end.get_row() + 1) as f32 * 0.5,
		)
	}
	/// Rectangle covering both sides of the span
	pub fn get_bounds(&self) -> CellBounds {
		CellBounds::new(self.start, self.end)
	}
	/// Cells of the span that lie within `bounds`, in row-major order
	pub fn cells_within(&self, bounds: &CellBounds) -> Vec<GridCell> {
		self.get_bounds()
			.intersect(bounds)
			.map(|overlap| overlap.cells())
			.unwrap_or_default()
	}
}

/// Scan the northern and western boundaries of a cluster whose top-left cell
/// is `cluster_min` and collect every portal along them
pub fn find_cluster_portals(
	grid: &DungeonGrid,
	cluster_min: GridCell,
	cluster_size: usize,
) -> Vec<Portal> {
	let mut portals = Vec::new();
	let (min_column, min_row) = cluster_min.get_column_row();
	if min_row > 0 {
		let mut run: Option<usize> = None;
		for column in min_column..min_column + cluster_size {
			let open = grid.is_walkable(GridCell::new(column, min_row))
				&& grid.is_walkable(GridCell::new(column, min_row - 1));
			match (open, run) {
				(true, None) => run = Some(column),
				(false, Some(from)) => {
					portals.push(Portal::new(
						GridCell::new(from, min_row - 1),
						GridCell::new(column - 1, min_row),
						Ordinal::North,
					));
					run = None;
				}
				_ => {}
			}
		}
		if let Some(from) = run {
			portals.push(Portal::new(
				GridCell::new(from, min_row - 1),
				GridCell::new(min_column + cluster_size - 1, min_row),
				Ordinal::North,
			));
		}
	}
	if min_column > 0 {
		let mut run: Option<usize> = None;
		for row in min_row..min_row + cluster_size {
			let open = grid.is_walkable(GridCell::new(min_column, row))
				&& grid.is_walkable(GridCell::new(min_column - 1, row));
			match (open, run) {
				(true, None) => run = Some(row),
				(false, Some(from)) => {
					portals.push(Portal::new(
						GridCell::new(min_column - 1, from),
						GridCell::new(min_column, row - 1),
						Ordinal::West,
					));
					run = None;
				}
				_ => {}
			}
		}
		if let Some(from) = run {
			portals.push(Portal::new(
				GridCell::new(min_column - 1, from),
				GridCell::new(min_column, min_row + cluster_size - 1),
				Ordinal::West,
			));
		}
	}
	portals
}
