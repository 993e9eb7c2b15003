//! Logic relating to [PortalGraph] construction and answering route requests
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A request to find a route across every dungeon from `start` to `goal`
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct EventPathRequest {
	/// Cell the route begins from
	start: GridCell,
	/// Cell the route should end at
	goal: GridCell,
}

impl EventPathRequest {
	/// Create a new instance of [EventPathRequest]
	pub fn new(start: GridCell, goal: GridCell) -> Self {
		EventPathRequest { start, goal }
	}
	/// Get the starting cell
	pub fn get_start(&self) -> GridCell {
		self.start
	}
	/// Get the goal cell
	pub fn get_goal(&self) -> GridCell {
		self.goal
	}
}

/// The answer to an [EventPathRequest] for one dungeon entity. An empty
/// route means the goal could not be reached
#[derive(Event, Clone, Debug, PartialEq)]
pub struct EventRouteCalculated {
	/// The dungeon the route was found in
	entity: Entity,
	/// Cell the route begins from
	start: GridCell,
	/// Cell the route ends at
	goal: GridCell,
	/// Portals to pass through followed by the goal
	route: Vec<RouteStep>,
}

impl EventRouteCalculated {
	/// Get the dungeon entity
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
	/// Get the starting cell
	pub fn get_start(&self) -> GridCell {
		self.start
	}
	/// Get the goal cell
	pub fn get_goal(&self) -> GridCell {
		self.goal
	}
	/// Get the route
	pub fn get_route(&self) -> &[RouteStep] {
		&self.route
	}
}

/// Marks a dungeon whose [PortalGraph] could not be built so it isn't retried every frame
#[derive(Component, Debug)]
pub struct PortalGraphUnavailable;

/// Build and insert a [PortalGraph] for each [DungeonGrid] that doesn't have one yet
#[cfg(not(tarpaulin_include))]
pub fn prebuild_portal_graphs(
	mut commands: Commands,
	dungeons: Query<(Entity, &DungeonGrid), (Without<PortalGraph>, Without<PortalGraphUnavailable>)>,
	config: Res<NavigationConfig>,
) {
	for (entity, grid) in dungeons.iter() {
		match PortalGraph::new(grid, config.cluster_size) {
			Ok(graph) => {
				debug!("Inserting portal graph for dungeon {:?}", entity);
				commands.entity(entity).insert(graph);
			}
			Err(e) => {
				error!("Unable to build a portal graph for dungeon {:?}: {}", entity, e);
				commands.entity(entity).insert(PortalGraphUnavailable);
			}
		}
	}
}

/// Answer each [EventPathRequest] for every dungeon with a [PortalGraph]
#[cfg(not(tarpaulin_include))]
pub fn process_path_requests(
	mut requests: EventReader<EventPathRequest>,
	dungeons: Query<(Entity, &DungeonGrid, &PortalGraph)>,
	mut results: EventWriter<EventRouteCalculated>,
) {
	for request in requests.read() {
		for (entity, grid, graph) in dungeons.iter() {
			let route = graph.find_route(grid, request.start, request.goal);
			trace!(
				"Dungeon {:?} route from {:?} to {:?} has {} steps",
				entity,
				request.start,
				request.goal,
				route.len()
			);
			results.write(EventRouteCalculated {
				entity,
				start: request.start,
				goal: request.goal,
				route,
			});
		}
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	fn twin_rooms() -> DungeonGrid {
		DungeonGrid::from_ascii("
			.....#....
			.....#....
			..........
			.....#....
			.....#....
		").unwrap()
	}
	fn calculated_routes(app: &App) -> Vec<EventRouteCalculated> {
		app.world()
			.resource::<Events<EventRouteCalculated>>()
			.iter_current_update_events()
			.cloned()
			.collect()
	}
	#[test]
	fn graph_inserted_and_route_answered() {
		let mut app = App::new();
		app.insert_resource(NavigationConfig { cluster_size: 5, ..Default::default() })
			.add_plugins(NavigationPlugin);
		let dungeon = app.world_mut().spawn(twin_rooms()).id();
		app.update();
		let graph = app.world().get::<PortalGraph>(dungeon).unwrap();
		assert_eq!(1, graph.get_portals().len());

		let request = EventPathRequest::new(GridCell::new(0, 0), GridCell::new(9, 4));
		app.world_mut().send_event(request);
		app.update();
		let routes = calculated_routes(&app);
		assert_eq!(1, routes.len());
		assert_eq!(dungeon, routes[0].get_entity());
		assert_eq!(GridCell::new(9, 4), routes[0].get_goal());
		assert_eq!(14.0, route_total_cost(routes[0].get_route()));
	}
	#[test]
	fn bad_cluster_size_is_not_retried() {
		let mut app = App::new();
		// default cluster size of 10 cannot tile a 10x5 grid
		app.add_plugins(NavigationPlugin);
		let dungeon = app.world_mut().spawn(twin_rooms()).id();
		app.update();
		app.update();
		assert!(app.world().get::<PortalGraph>(dungeon).is_none());
		assert!(app.world().get::<PortalGraphUnavailable>(dungeon).is_some());
		app.world_mut().send_event(EventPathRequest::new(GridCell::new(0, 0), GridCell::new(1, 1)));
		app.update();
		assert!(calculated_routes(&app).is_empty());
	}
	#[test]
	fn bundle_spawns_ready_to_route() {
		let mut app = App::new();
		let config = NavigationConfig { cluster_size: 5, ..Default::default() };
		app.insert_resource(config.clone()).add_plugins(NavigationPlugin);
		let bundle = DungeonNavigationBundle::new(twin_rooms(), &config).unwrap();
		app.world_mut().spawn(bundle);
		app.world_mut().send_event(EventPathRequest::new(GridCell::new(0, 0), GridCell::new(4, 4)));
		app.update();
		let routes = calculated_routes(&app);
		assert_eq!(1, routes.len());
		assert_eq!(vec![RouteStep { node: RouteNode::Goal, cost: 8.0 }], routes[0].get_route());
	}
}
