//! Tracks which cells of a [DungeonGrid] an explorer has seen. The mask is
//! owned by the caller and grows as agents move around, the research and
//! threat fields read it to decide where values may propagate.
//!
//! Revealing around an agent with a radius of `1` uncovers the surrounding
//! 3x3 block and any walls in the ring beyond it:
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! |  #  |  #  |     |  #  |     |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  #  |  R  |  R  |  R  |     |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |     |  R  |  A  |  R  |     |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |     |  R  |  R  |  R  |  #  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |     |     |     |     |     |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! `A` is the agent, `R` is revealed regardless of tile and `#` is a wall
//! revealed from the outer ring. Floors in the outer ring stay hidden.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Per cell visibility flags matching the layout of a [DungeonGrid]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, PartialEq)]
pub struct RevealMask {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Row-major flags
	revealed: Vec<bool>,
}

impl RevealMask {
	/// Creates a new [RevealMask] sized to the `grid` with nothing revealed
	pub fn new(grid: &DungeonGrid) -> Self {
		RevealMask {
			width: grid.get_width(),
			height: grid.get_height(),
			revealed: vec![false; grid.get_size()],
		}
	}
	/// Creates a new [RevealMask] sized to the `grid` with everything revealed
	pub fn new_revealed(grid: &DungeonGrid) -> Self {
		RevealMask {
			width: grid.get_width(),
			height: grid.get_height(),
			revealed: vec![true; grid.get_size()],
		}
	}
	/// Whether the `cell` has been seen, off grid cells never are
	pub fn is_revealed(&self, cell: GridCell) -> bool {
		cell.get_column() < self.width
			&& cell.get_row() < self.height
			&& self.revealed[cell.get_row() * self.width + cell.get_column()]
	}
	/// Mark a single `cell` as seen, off grid cells are ignored
	pub fn reveal(&mut self, cell: GridCell) {
		if cell.get_column() < self.width && cell.get_row() < self.height {
			self.revealed[cell.get_row() * self.width + cell.get_column()] = true;
		}
	}
	/// Reveal every cell within `radius` (chebyshev distance) of `center` and
	/// additionally any walls one step beyond that. A radius larger than the
	/// grid reveals all of it
	pub fn reveal_around(&mut self, grid: &DungeonGrid, center: IVec2, radius: usize) {
		let r = i64::try_from(radius).unwrap_or(i64::MAX);
		let outer = r.saturating_add(1);
		let (cx, cy) = (i64::from(center.x), i64::from(center.y));
		// only visit the part of the square that overlaps the grid
		let min_x = cx.saturating_sub(outer).max(0);
		let max_x = cx.saturating_add(outer).min(grid.get_width() as i64 - 1);
		let min_y = cy.saturating_sub(outer).max(0);
		let max_y = cy.saturating_add(outer).min(grid.get_height() as i64 - 1);
		for y in min_y..=max_y {
			for x in min_x..=max_x {
				let cell = GridCell::new(x as usize, y as usize);
				let inner = (x - cx).abs() <= r && (y - cy).abs() <= r;
				if inner || grid.get_tile(cell) == Some(Tile::Wall) {
					self.reveal(cell);
				}
			}
		}
	}
	/// Number of cells seen so far
	pub fn revealed_count(&self) -> usize {
		self.revealed.iter().filter(|r| **r).count()
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn reveal_inner_block_and_outer_walls() {
		let grid = DungeonGrid::from_ascii("
			##.#.
			#....
			.....
			....#
			.....
		").unwrap();
		let mut mask = RevealMask::new(&grid);
		mask.reveal_around(&grid, IVec2::new(2, 2), 1);
		let revealed: Vec<(usize, usize)> = (0..grid.get_size())
			.map(|i| grid.get_cell(i))
			.filter(|c| mask.is_revealed(*c))
			.map(|c| c.get_column_row())
			.collect();
		let actual = vec![
			(0, 0), (1, 0), (3, 0),
			(0, 1), (1, 1), (2, 1), (3, 1),
			(1, 2), (2, 2), (3, 2),
			(1, 3), (2, 3), (3, 3), (4, 3),
		];
		assert_eq!(actual, revealed);
		assert_eq!(14, mask.revealed_count());
	}
	#[test]
	fn reveal_clipped_at_grid_edge() {
		let grid = DungeonGrid::new_with_tile(4, 4, Tile::Floor).unwrap();
		let mut mask = RevealMask::new(&grid);
		mask.reveal_around(&grid, IVec2::new(0, 0), 1);
		assert_eq!(4, mask.revealed_count());
		assert!(mask.is_revealed(GridCell::new(1, 1)));
		assert!(!mask.is_revealed(GridCell::new(2, 2)));
	}
	#[test]
	fn huge_radius_reveals_everything() {
		let grid = DungeonGrid::new_with_tile(6, 3, Tile::Floor).unwrap();
		let mut mask = RevealMask::new(&grid);
		mask.reveal_around(&grid, IVec2::new(5, 2), usize::MAX);
		assert_eq!(18, mask.revealed_count());
		// a centre far off the grid is still in reach of a huge radius
		let mut mask = RevealMask::new(&grid);
		mask.reveal_around(&grid, IVec2::new(i32::MAX, i32::MIN), usize::MAX);
		assert_eq!(18, mask.revealed_count());
		let mut mask = RevealMask::new(&grid);
		mask.reveal_around(&grid, IVec2::new(i32::MAX, i32::MIN), 4);
		assert_eq!(0, mask.revealed_count());
	}
	#[test]
	fn off_grid_is_never_revealed() {
		let grid = DungeonGrid::new_with_tile(2, 2, Tile::Floor).unwrap();
		let mut mask = RevealMask::new_revealed(&grid);
		mask.reveal(GridCell::new(5, 5));
		assert!(!mask.is_revealed(GridCell::new(5, 5)));
		assert_eq!(4, mask.revealed_count());
	}
}
