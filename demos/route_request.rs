//! Loads a dungeon and its settings from `ron` files, asks for a route across
//! it and logs the portals the answer passes through. Runs without a window
//!

use bevy::{log::LogPlugin, prelude::*};
use dungeon_navigation::prelude::*;

fn main() -> NavigationResult<()> {
	let assets = env!("CARGO_MANIFEST_DIR").to_string() + "/assets";
	let config = NavigationConfig::from_ron(assets.clone() + "/navigation_config.ron")?;
	let bundle = DungeonNavigationBundle::from_ron(assets + "/dungeon_grid.ron", &config)?;
	let portals = bundle.get_portal_graph().get_portals().len();

	let mut app = App::new();
	app.add_plugins((LogPlugin::default(), NavigationPlugin))
		.insert_resource(config);
	app.world_mut().spawn(bundle);
	app.update();
	info!("Dungeon has {} portals", portals);

	let requests = [
		EventPathRequest::new(GridCell::new(1, 1), GridCell::new(8, 8)),
		EventPathRequest::new(GridCell::new(1, 1), GridCell::new(3, 2)),
		// a wall
		EventPathRequest::new(GridCell::new(1, 1), GridCell::new(0, 0)),
	];
	for request in requests {
		app.world_mut().send_event(request);
		app.update();
		let events = app.world().resource::<Events<EventRouteCalculated>>();
		for answer in events.iter_current_update_events() {
			if answer.get_route().is_empty() {
				warn!("No route from {:?} to {:?}", answer.get_start(), answer.get_goal());
				continue;
			}
			info!(
				"Route from {:?} to {:?} costs {}",
				answer.get_start(),
				answer.get_goal(),
				route_total_cost(answer.get_route())
			);
			for step in answer.get_route() {
				info!("  {:?} +{}", step.node, step.cost);
			}
		}
	}
	Ok(())
}
