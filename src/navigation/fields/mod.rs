//! A ScalarField (often called a Dijkstra map) holds one `f32` per cell of a
//! [DungeonGrid] describing how far that cell is from the nearest source.
//! Agents sample the fields around them and step towards lower values.
//!
//! Building a field is done in three stages:
//!
//! 1. Every cell starts at [UNREACHED] and each source cell is set to `0`
//! 2. Sweeps are performed over every floor cell. A cell looks at its
//!    walkable orthogonal neighbours and if the smallest of them is more than
//!    `1` below its own value the cell becomes that neighbour plus `1`.
//!    Sweeping stops once a full pass changes nothing
//! 3. A [FieldParameters] transform reshapes every reached value
//!
//! A single source in the middle of an open grid produces the familiar
//! diamond before the transform:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  1  |  0  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Walls are never written to and never contribute to a neighbour so the
//! values flow around them, cells that no source can reach keep
//! [UNREACHED].
//!

pub mod recipes;
pub mod reveal_mask;

use bevy::prelude::*;

use crate::prelude::*;

/// Value of a cell that no source has propagated to
pub const UNREACHED: f32 = 1e5;

/// Post-relaxation reshaping of a [ScalarField]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldParameters {
	/// Power (when `use_power`) or base of the transform
	pub exponent: f32,
	/// `true` gives `sign(v) * |v|^exponent`, `false` gives `exponent^v`
	pub use_power: bool,
}

impl Default for FieldParameters {
	/// Leaves distances untouched
	fn default() -> Self {
		FieldParameters {
			exponent: 1.0,
			use_power: true,
		}
	}
}

impl FieldParameters {
	/// Create a new instance of [FieldParameters]
	pub fn new(exponent: f32, use_power: bool) -> Self {
		FieldParameters {
			exponent,
			use_power,
		}
	}
	/// Reshape a single reached value
	pub fn transform(&self, value: f32) -> f32 {
		if self.use_power {
			value.abs().powf(self.exponent).copysign(value)
		} else {
			self.exponent.powf(value)
		}
	}
}

/// Row-major distance values matching the layout of a [DungeonGrid]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// One value per cell
	values: Vec<f32>,
}

impl ScalarField {
	/// Creates a new [ScalarField] sized to the `grid` with every cell set to [UNREACHED]
	pub fn new_unreached(grid: &DungeonGrid) -> Self {
		ScalarField {
			width: grid.get_width(),
			height: grid.get_height(),
			values: vec![UNREACHED; grid.get_size()],
		}
	}
	/// Seed the `sources` with `0`, relax and then transform with `params`
	pub fn propagate(grid: &DungeonGrid, sources: &[GridCell], params: &FieldParameters) -> Self {
		let mut field = ScalarField::new_unreached(grid);
		field.seed_sources(grid, sources);
		field.relax(grid, None);
		field.apply_transform(params);
		field
	}
	/// Number of columns
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// Get a reference to the row-major values
	pub fn get_values(&self) -> &[f32] {
		&self.values
	}
	/// Row-major index of a `cell`, [None] when it is off the field
	fn get_index(&self, cell: GridCell) -> Option<usize> {
		if cell.get_column() < self.width && cell.get_row() < self.height {
			Some(cell.get_row() * self.width + cell.get_column())
		} else {
			None
		}
	}
	/// Retrieve a cell value, [None] when it is off the field
	pub fn get_value(&self, cell: GridCell) -> Option<f32> {
		self.get_index(cell).map(|i| self.values[i])
	}
	/// Retrieve the value at signed coordinates, [None] when they are off the field
	pub fn get_value_signed(&self, position: IVec2) -> Option<f32> {
		GridCell::from_signed(position).and_then(|cell| self.get_value(cell))
	}
	/// Set a cell to a value, off field cells are ignored
	pub fn set_value(&mut self, cell: GridCell, value: f32) {
		if let Some(i) = self.get_index(cell) {
			self.values[i] = value;
		}
	}
	/// Whether anything has propagated to the `cell`
	pub fn is_reached(&self, cell: GridCell) -> bool {
		self.get_value(cell).is_some_and(|v| v.abs() < UNREACHED)
	}
	/// Set every walkable source cell to `0`, walls and off grid sources are skipped
	pub fn seed_sources(&mut self, grid: &DungeonGrid, sources: &[GridCell]) {
		for source in sources {
			if grid.is_walkable(*source) {
				self.set_value(*source, 0.0);
			} else {
				trace!("Ignoring field source {:?}, it is not a floor cell", source);
			}
		}
	}
	/// Sweep over the floor cells until no value improves. When a `mask` is
	/// supplied unrevealed cells are neither updated nor read from.
	///
	/// Returns the number of sweeps performed
	pub fn relax(&mut self, grid: &DungeonGrid, mask: Option<&RevealMask>) -> usize {
		let visible =
			|cell: GridCell| grid.is_walkable(cell) && mask.is_none_or(|m| m.is_revealed(cell));
		let mut sweeps = 0;
		loop {
			sweeps += 1;
			let mut dirty = false;
			for i in 0..self.values.len() {
				let cell = grid.get_cell(i);
				if !visible(cell) {
					continue;
				}
				let current = self.values[i];
				let mut min_neighbour = current;
				for n in Ordinal::get_orthogonal_cell_neighbours(cell, self.width, self.height) {
					if visible(n) {
						if let Some(value) = self.get_value(n) {
							min_neighbour = min_neighbour.min(value);
						}
					}
				}
				if min_neighbour < current - 1.0 {
					self.values[i] = min_neighbour + 1.0;
					dirty = true;
				}
			}
			if !dirty {
				break;
			}
		}
		trace!("Field relaxed after {} sweeps", sweeps);
		sweeps
	}
	/// Multiply every reached cell by `multiplier`
	pub fn scale_reached(&mut self, multiplier: f32) {
		for value in self.values.iter_mut() {
			if value.abs() < UNREACHED {
				*value *= multiplier;
			}
		}
	}
	/// Reshape every reached cell with the `params`
	pub fn apply_transform(&mut self, params: &FieldParameters) {
		for value in self.values.iter_mut() {
			if *value < UNREACHED {
				*value = params.transform(*value);
			}
		}
	}
}
