//! Configuration and asset errors surfaced to the caller.
//!
//! Failing to find a path or to reach a cell is not an error, those are
//! represented as empty paths and [crate::prelude::UNREACHED] field values.
//! Only problems with the inputs themselves, such as a cluster size that
//! cannot tile the grid, end up here
//!

use thiserror::Error;

/// Everything that can go wrong when constructing navigation data
#[derive(Error, Debug)]
pub enum NavigationError {
	/// A grid must have at least one cell along each axis
	#[error("Grid dimensions `({width}, {height})` must both be greater than zero")]
	EmptyGrid {
		/// Requested number of columns
		width: usize,
		/// Requested number of rows
		height: usize,
	},
	/// The tile list does not describe a `width * height` grid
	#[error("Grid of `({width}, {height})` expects {expected} tiles, found {found}")]
	TileCountMismatch {
		/// Requested number of columns
		width: usize,
		/// Requested number of rows
		height: usize,
		/// `width * height`
		expected: usize,
		/// Length of the supplied tile list
		found: usize,
	},
	/// A textual grid contained a row of a different length to the first row
	#[error("Grid row {row} has {found} tiles, expected {expected}")]
	RaggedRow {
		/// Index of the offending row
		row: usize,
		/// Length of the first row
		expected: usize,
		/// Length of the offending row
		found: usize,
	},
	/// A textual grid contained a character that is neither a wall nor a floor
	#[error("Unrecognised tile character {0:?}, expected '#' or '.'")]
	UnknownTile(char),
	/// Clusters must be square and tile the grid exactly
	#[error("Grid dimensions `({width}, {height})` cannot support clusters, dimensions must be exact multiples of the cluster size {cluster_size}")]
	ClusterSizeMismatch {
		/// Number of grid columns
		width: usize,
		/// Number of grid rows
		height: usize,
		/// Edge length requested for each cluster
		cluster_size: usize,
	},
	/// Reading an asset from disk failed
	#[error("Failed reading asset: {0}")]
	Io(#[from] std::io::Error),
	/// A `ron` asset could not be deserialized
	#[cfg(feature = "ron")]
	#[error("Failed deserializing ron asset: {0}")]
	Ron(#[from] ron::error::SpannedError),
	/// A `csv` asset could not be parsed
	#[cfg(feature = "csv")]
	#[error("Failed parsing csv asset: {0}")]
	Csv(#[from] csv::Error),
	/// A heightmap image could not be opened or has an unexpected layout
	#[cfg(feature = "heightmap")]
	#[error("Failed loading heightmap: {0}")]
	Heightmap(String),
}

/// Shorthand for results carrying a [NavigationError]
pub type NavigationResult<T> = Result<T, NavigationError>;
