//! Defines the Bevy [Plugin] for dungeon navigation
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod field_layer;
pub mod route_layer;

/// Ordering of the navigation systems within [Update]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum NavigationSet {
	/// Portal graphs and influence fields are attached to new dungeons
	Prebuild,
	/// Path requests are answered
	Route,
	/// Influence fields are rebuilt from the agents
	Influence,
	/// Agents choose their next action
	Follow,
}

/// Builds a [PortalGraph] for every entity carrying a [DungeonGrid] and
/// answers [route_layer::EventPathRequest]s with
/// [route_layer::EventRouteCalculated]s.
///
/// Each tick the [field_layer::InfluenceFields] of the dungeon are rebuilt
/// from the agents with a [field_layer::GridPosition] and [Team], and agents
/// with [MovementWeights] pick a [field_layer::AgentAction]
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.init_resource::<NavigationConfig>()
			.add_event::<route_layer::EventPathRequest>()
			.add_event::<route_layer::EventRouteCalculated>()
			.configure_sets(
				Update,
				(
					NavigationSet::Prebuild,
					NavigationSet::Route,
					NavigationSet::Influence,
					NavigationSet::Follow,
				)
					.chain(),
			)
			.add_systems(
				Update,
				(
					(
						route_layer::prebuild_portal_graphs,
						field_layer::attach_influence_fields,
					)
						.in_set(NavigationSet::Prebuild),
					route_layer::process_path_requests.in_set(NavigationSet::Route),
					field_layer::update_influence_fields.in_set(NavigationSet::Influence),
					field_layer::follow_influence_fields.in_set(NavigationSet::Follow),
				),
			);
	}
}
