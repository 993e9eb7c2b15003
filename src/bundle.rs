//! A [Bundle] pairing a [DungeonGrid] with its prebuilt [PortalGraph]
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Everything a dungeon entity needs to answer route requests. Spawning this
/// skips the frame the plugin would otherwise spend building the graph
#[derive(Bundle)]
pub struct DungeonNavigationBundle {
	/// Static obstacles of the dungeon
	grid: DungeonGrid,
	/// Clusters and portals derived from the `grid`
	portal_graph: PortalGraph,
}

impl DungeonNavigationBundle {
	/// Create a new instance of [DungeonNavigationBundle] using the cluster size of the `config`
	pub fn new(grid: DungeonGrid, config: &NavigationConfig) -> NavigationResult<Self> {
		let portal_graph = PortalGraph::new(&grid, config.cluster_size)?;
		Ok(DungeonNavigationBundle { grid, portal_graph })
	}
	/// Create a new instance of [DungeonNavigationBundle] where the [DungeonGrid] is read from a `ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String, config: &NavigationConfig) -> NavigationResult<Self> {
		DungeonNavigationBundle::new(DungeonGrid::from_ron(path)?, config)
	}
	/// Create a new instance of [DungeonNavigationBundle] where the [DungeonGrid] is read from a `csv` file
	#[cfg(feature = "csv")]
	pub fn from_csv(path: String, config: &NavigationConfig) -> NavigationResult<Self> {
		DungeonNavigationBundle::new(DungeonGrid::from_csv(path)?, config)
	}
	/// Create a new instance of [DungeonNavigationBundle] where the [DungeonGrid] is read from a heightmap image
	#[cfg(feature = "heightmap")]
	pub fn from_heightmap(path: String, config: &NavigationConfig) -> NavigationResult<Self> {
		DungeonNavigationBundle::new(DungeonGrid::from_heightmap(path)?, config)
	}
	/// Get a reference to the grid
	pub fn get_grid(&self) -> &DungeonGrid {
		&self.grid
	}
	/// Get a reference to the portal graph
	pub fn get_portal_graph(&self) -> &PortalGraph {
		&self.portal_graph
	}
}
