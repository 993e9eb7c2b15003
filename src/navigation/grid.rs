//! The DungeonGrid is the static obstacle map every navigation structure is
//! derived from. Each cell is either a [Tile::Wall] or a [Tile::Floor] and
//! cells are stored row-major so the index of `(column, row)` is
//! `row * width + column`.
//!
//! In textual form a wall is `#` and a floor is `.`:
//!
//! ```text
//! ##########
//! #....#...#
//! #....#...#
//! #........#
//! ##########
//! ```
//!
//! The grid is produced elsewhere (a dungeon generator, a level file) and is
//! only ever read by this crate.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Whether a cell of a [DungeonGrid] can be walked on
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tile {
	/// Impassable
	Wall,
	/// Walkable
	#[default]
	Floor,
}

impl Tile {
	/// Convert the textual representation of a tile, `#` is a wall while `.` and space are floors
	pub fn from_char(c: char) -> NavigationResult<Tile> {
		match c {
			'#' => Ok(Tile::Wall),
			'.' | ' ' => Ok(Tile::Floor),
			_ => Err(NavigationError::UnknownTile(c)),
		}
	}
	/// Get the textual representation of the tile
	pub fn as_char(&self) -> char {
		match self {
			Tile::Wall => '#',
			Tile::Floor => '.',
		}
	}
	/// Is the tile a floor
	pub fn is_walkable(&self) -> bool {
		*self == Tile::Floor
	}
}

/// `(column, row)` position of a cell within a [DungeonGrid]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct GridCell((usize, usize));

impl GridCell {
	/// Create a new instance of [GridCell]
	pub fn new(column: usize, row: usize) -> Self {
		GridCell((column, row))
	}
	/// Create a [GridCell] from signed coordinates, [None] if either is negative
	pub fn from_signed(position: IVec2) -> Option<Self> {
		if position.x < 0 || position.y < 0 {
			None
		} else {
			Some(GridCell::new(position.x as usize, position.y as usize))
		}
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
	/// Get the cell as signed coordinates
	pub fn as_ivec2(&self) -> IVec2 {
		IVec2::new(self.get_column() as i32, self.get_row() as i32)
	}
	/// Straight line distance between this cell and a point in cell space
	pub fn euclidean_distance_to(&self, point: Vec2) -> f32 {
		Vec2::new(self.get_column() as f32, self.get_row() as f32).distance(point)
	}
	/// Straight line distance between two cells
	pub fn euclidean_distance(&self, other: &GridCell) -> f32 {
		self.euclidean_distance_to(Vec2::new(
			other.get_column() as f32,
			other.get_row() as f32,
		))
	}
}

/// An inclusive axis-aligned rectangle of [GridCell]s, used to confine a search
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellBounds {
	/// Top-left corner
	min: GridCell,
	/// Bottom-right corner, inclusive
	max: GridCell,
}

impl CellBounds {
	/// Create a new instance of [CellBounds], the corners are reordered if necessary
	pub fn new(a: GridCell, b: GridCell) -> Self {
		CellBounds {
			min: GridCell::new(
				a.get_column().min(b.get_column()),
				a.get_row().min(b.get_row()),
			),
			max: GridCell::new(
				a.get_column().max(b.get_column()),
				a.get_row().max(b.get_row()),
			),
		}
	}
	/// Bounds covering every cell of the `grid`
	pub fn of_grid(grid: &DungeonGrid) -> Self {
		CellBounds::new(
			GridCell::new(0, 0),
			GridCell::new(grid.get_width() - 1, grid.get_height() - 1),
		)
	}
	/// Get the top-left corner
	pub fn get_min(&self) -> GridCell {
		self.min
	}
	/// Get the bottom-right corner
	pub fn get_max(&self) -> GridCell {
		self.max
	}
	/// Number of columns covered
	pub fn get_width(&self) -> usize {
		self.max.get_column() - self.min.get_column() + 1
	}
	/// Number of rows covered
	pub fn get_height(&self) -> usize {
		self.max.get_row() - self.min.get_row() + 1
	}
	/// Whether the `cell` lies inside the rectangle
	pub fn contains(&self, cell: GridCell) -> bool {
		cell.get_column() >= self.min.get_column()
			&& cell.get_column() <= self.max.get_column()
			&& cell.get_row() >= self.min.get_row()
			&& cell.get_row() <= self.max.get_row()
	}
	/// Shrink the rectangle so it fits within the `grid`. [None] if the two don't overlap
	pub fn clamp_to(&self, grid: &DungeonGrid) -> Option<Self> {
		if self.min.get_column() >= grid.get_width() || self.min.get_row() >= grid.get_height() {
			return None;
		}
		Some(CellBounds {
			min: self.min,
			max: GridCell::new(
				self.max.get_column().min(grid.get_width() - 1),
				self.max.get_row().min(grid.get_height() - 1),
			),
		})
	}
	/// Intersection of two rectangles. [None] if they don't overlap
	pub fn intersect(&self, other: &CellBounds) -> Option<Self> {
		let min_column = self.min.get_column().max(other.min.get_column());
		let min_row = self.min.get_row().max(other.min.get_row());
		let max_column = self.max.get_column().min(other.max.get_column());
		let max_row = self.max.get_row().min(other.max.get_row());
		if min_column > max_column || min_row > max_row {
			None
		} else {
			Some(CellBounds {
				min: GridCell::new(min_column, min_row),
				max: GridCell::new(max_column, max_row),
			})
		}
	}
	/// Every cell inside the rectangle in row-major order
	pub fn cells(&self) -> Vec<GridCell> {
		let mut cells = Vec::with_capacity(self.get_width() * self.get_height());
		for row in self.min.get_row()..=self.max.get_row() {
			for column in self.min.get_column()..=self.max.get_column() {
				cells.push(GridCell::new(column, row));
			}
		}
		cells
	}
}

/// Static obstacle map of a dungeon level
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridLayout"))]
#[derive(Component, Clone, Debug, PartialEq)]
pub struct DungeonGrid {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Row-major tiles, `width * height` long
	tiles: Vec<Tile>,
}

/// Unchecked form of a [DungeonGrid] as it appears in serialized data,
/// turned into a grid through [DungeonGrid::new]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridLayout {
	width: usize,
	height: usize,
	tiles: Vec<Tile>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridLayout> for DungeonGrid {
	type Error = NavigationError;
	fn try_from(layout: GridLayout) -> Result<Self, Self::Error> {
		DungeonGrid::new(layout.width, layout.height, layout.tiles)
	}
}

impl DungeonGrid {
	/// Create a new instance of [DungeonGrid], the `tiles` must be row-major and exactly `width * height` long
	pub fn new(width: usize, height: usize, tiles: Vec<Tile>) -> NavigationResult<Self> {
		if width == 0 || height == 0 {
			return Err(NavigationError::EmptyGrid { width, height });
		}
		if tiles.len() != width * height {
			return Err(NavigationError::TileCountMismatch {
				width,
				height,
				expected: width * height,
				found: tiles.len(),
			});
		}
		Ok(DungeonGrid {
			width,
			height,
			tiles,
		})
	}
	/// Create a new instance of [DungeonGrid] where every cell is the supplied `tile`
	pub fn new_with_tile(width: usize, height: usize, tile: Tile) -> NavigationResult<Self> {
		DungeonGrid::new(width, height, vec![tile; width * height])
	}
	/// Parse a grid from rows of text where `#` is a wall and `.` or space is a floor.
	/// Indentation tabs and blank lines are ignored
	pub fn from_ascii(text: &str) -> NavigationResult<Self> {
		let mut tiles = Vec::new();
		let mut width = 0;
		let mut height = 0;
		for line in text
			.lines()
			.map(|l| l.trim_matches(|c| c == '\t' || c == '\r'))
			.filter(|l| !l.is_empty())
		{
			let row_length = line.chars().count();
			if height == 0 {
				width = row_length;
			} else if row_length != width {
				return Err(NavigationError::RaggedRow {
					row: height,
					expected: width,
					found: row_length,
				});
			}
			for c in line.chars() {
				tiles.push(Tile::from_char(c)?);
			}
			height += 1;
		}
		DungeonGrid::new(width, height, tiles)
	}
	/// Number of columns
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// Total number of cells
	pub fn get_size(&self) -> usize {
		self.tiles.len()
	}
	/// Get a reference to the row-major tiles
	pub fn get_tiles(&self) -> &[Tile] {
		&self.tiles
	}
	/// Whether the `cell` lies within the grid
	pub fn contains(&self, cell: GridCell) -> bool {
		cell.get_column() < self.width && cell.get_row() < self.height
	}
	/// Row-major index of a `cell`, [None] when it is off the grid
	pub fn get_index(&self, cell: GridCell) -> Option<usize> {
		if self.contains(cell) {
			Some(cell.get_row() * self.width + cell.get_column())
		} else {
			None
		}
	}
	/// The [GridCell] at a row-major `index`
	pub fn get_cell(&self, index: usize) -> GridCell {
		GridCell::new(index % self.width, index / self.width)
	}
	/// Convert signed coordinates into a [GridCell] if they lie within the grid
	pub fn get_cell_from_signed(&self, position: IVec2) -> Option<GridCell> {
		GridCell::from_signed(position).filter(|cell| self.contains(*cell))
	}
	/// Get the [Tile] of a `cell`, [None] when it is off the grid
	pub fn get_tile(&self, cell: GridCell) -> Option<Tile> {
		self.get_index(cell).map(|i| self.tiles[i])
	}
	/// Whether a `cell` is on the grid and is a floor
	pub fn is_walkable(&self, cell: GridCell) -> bool {
		self.get_tile(cell).is_some_and(|t| t.is_walkable())
	}
	/// Whether signed coordinates are on the grid and are a floor
	pub fn is_walkable_signed(&self, position: IVec2) -> bool {
		self.get_cell_from_signed(position)
			.is_some_and(|cell| self.is_walkable(cell))
	}
	/// Orthogonal neighbours of a `cell` that are floors
	pub fn get_walkable_neighbours(&self, cell: GridCell) -> Vec<GridCell> {
		Ordinal::get_orthogonal_cell_neighbours(cell, self.width, self.height)
			.into_iter()
			.filter(|n| self.is_walkable(*n))
			.collect()
	}
	/// Render the grid back into its textual form
	pub fn to_ascii(&self) -> String {
		let mut text = String::with_capacity((self.width + 1) * self.height);
		for row in self.tiles.chunks(self.width) {
			for tile in row {
				text.push(tile.as_char());
			}
			text.push('\n');
		}
		text
	}
	/// From a `ron` file generate the [DungeonGrid]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> NavigationResult<Self> {
		let file = std::fs::File::open(path)?;
		let grid: DungeonGrid = ron::de::from_reader(file)?;
		Ok(grid)
	}
	/// From a `csv` file where each field is a `#` or `.` generate the [DungeonGrid]
	#[cfg(feature = "csv")]
	pub fn from_csv(path: String) -> NavigationResult<Self> {
		let data = std::fs::File::open(path)?;
		let mut rdr = csv::ReaderBuilder::new()
			.has_headers(false)
			.from_reader(data);
		let mut tiles = Vec::new();
		let mut width = 0;
		let mut height = 0;
		for (row, record) in rdr.records().enumerate() {
			let record = record?;
			if row == 0 {
				width = record.len();
			} else if record.len() != width {
				return Err(NavigationError::RaggedRow {
					row,
					expected: width,
					found: record.len(),
				});
			}
			for value in record.iter() {
				let c = value.trim().chars().next().unwrap_or(' ');
				tiles.push(Tile::from_char(c)?);
			}
			height += 1;
		}
		DungeonGrid::new(width, height, tiles)
	}
	/// Create a [DungeonGrid] from a greyscale image where each pixel
	/// represents a cell, dark pixels (red channel below `128`) are walls
	#[cfg(feature = "heightmap")]
	pub fn from_heightmap(path: String) -> NavigationResult<Self> {
		use photon_rs::native::open_image;
		let img =
			open_image(&path).map_err(|e| NavigationError::Heightmap(e.to_string()))?;
		let width = img.get_width() as usize;
		let height = img.get_height() as usize;
		// raw pixels are arranged from the top left of the image and come in sets of either 3 or 4 (if alpha channel is inlcuded).
		let raw_pixels = img.get_raw_pixels();
		let chunk_size = if raw_pixels.len() == width * height * 4 {
			4
		} else if raw_pixels.len() == width * height * 3 {
			3
		} else {
			return Err(NavigationError::Heightmap(format!(
				"Image of `({}, {})` pixels has {} channel bytes which is neither RGB nor RGBA",
				width,
				height,
				raw_pixels.len()
			)));
		};
		let tiles = raw_pixels
			.chunks(chunk_size)
			.map(|pixel| if pixel[0] < 128 { Tile::Wall } else { Tile::Floor })
			.collect();
		DungeonGrid::new(width, height, tiles)
	}
}
