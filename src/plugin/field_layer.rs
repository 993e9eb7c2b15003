//! Logic relating to rebuilding the [InfluenceFields] of a dungeon each tick
//! and letting agents pick an [AgentAction] from them
//!

use std::collections::BTreeMap;

use crate::prelude::*;
use bevy::prelude::*;

/// Name of the field leading towards the home team
pub const APPROACH_FIELD: &str = "approach";
/// Name of the field leading away from the home team
pub const FLEE_FIELD: &str = "flee";
/// Name of the field leading towards hive agents
pub const PACK_FIELD: &str = "pack";
/// Name of the field leading towards unseen cells
pub const RESEARCH_FIELD: &str = "research";
/// Name of the field leading towards cells a home agent can be shot at from
pub const RANGED_FIELD: &str = "ranged";
/// Name of the field leading away from opposing agents that have been seen
pub const THREAT_FIELD: &str = "threat";

/// Cell an agent occupies
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPosition(pub IVec2);

/// Marks an agent as part of a hive pack, hive agents are the sources of the
/// [PACK_FIELD]
#[derive(Component, Debug)]
pub struct Hive;

/// Marks an agent that shoots rather than waits when no step improves on
/// staying put
#[derive(Component, Debug)]
pub struct Archer;

/// What an agent has decided to do this tick
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum AgentAction {
	/// Take a single step
	Move(MoveAction),
	/// Fire at whoever is in range
	RangedShot,
}

impl Default for AgentAction {
	fn default() -> Self {
		AgentAction::Move(MoveAction::Stay)
	}
}

/// Every field of a dungeon keyed by name, rebuilt each tick
#[derive(Component, Clone, Debug, Default)]
pub struct InfluenceFields(BTreeMap<String, ScalarField>);

impl InfluenceFields {
	/// Get a reference to the map of fields
	pub fn get_fields(&self) -> &BTreeMap<String, ScalarField> {
		&self.0
	}
	/// Get a field by name
	pub fn get(&self, name: &str) -> Option<&ScalarField> {
		self.0.get(name)
	}
	/// Store a field, replacing any previous one of the same name
	pub fn insert(&mut self, name: &str, field: ScalarField) {
		self.0.insert(name.to_string(), field);
	}
	/// Drop a field
	pub fn remove(&mut self, name: &str) -> Option<ScalarField> {
		self.0.remove(name)
	}
}

/// Give each [DungeonGrid] an empty [RevealMask] and [InfluenceFields]
#[cfg(not(tarpaulin_include))]
pub fn attach_influence_fields(
	mut commands: Commands,
	dungeons: Query<(Entity, &DungeonGrid), Without<InfluenceFields>>,
) {
	for (entity, grid) in dungeons.iter() {
		debug!("Attaching influence fields to dungeon {:?}", entity);
		commands
			.entity(entity)
			.insert((RevealMask::new(grid), InfluenceFields::default()));
	}
}

/// Rebuild every named field of the dungeon from the current agents.
///
/// The first agent of the home team is the explorer for the
/// [RESEARCH_FIELD] and the target of the [RANGED_FIELD], the rest of its
/// team reveal their surroundings too. Without a home agent those two fields
/// are dropped
#[cfg(not(tarpaulin_include))]
pub fn update_influence_fields(
	mut dungeons: Query<(&DungeonGrid, &mut RevealMask, &mut InfluenceFields)>,
	agents: Query<(&GridPosition, &Team, Has<Hive>)>,
	config: Res<NavigationConfig>,
) {
	let Ok((grid, mut mask, mut fields)) = dungeons.single_mut() else {
		trace!("Influence fields need exactly one dungeon");
		return;
	};
	let snapshot: Vec<AgentSnapshot> = agents
		.iter()
		.map(|(position, team, is_hive)| AgentSnapshot::new(position.0, *team, is_hive))
		.collect();
	let params = &config.field_parameters;
	fields.insert(APPROACH_FIELD, approach_field(grid, &snapshot, &config, params));
	fields.insert(FLEE_FIELD, flee_field(grid, &snapshot, &config, params));
	fields.insert(PACK_FIELD, pack_field(grid, &snapshot, params));
	let mut home = snapshot.iter().filter(|a| a.team == config.home_team);
	if let Some(explorer) = home.next() {
		for other in home {
			mask.reveal_around(grid, other.position, config.research_radius);
		}
		let research = research_field(grid, explorer, &mut mask, &config, params);
		fields.insert(RESEARCH_FIELD, research);
		fields.insert(RANGED_FIELD, ranged_field(grid, explorer, &config, params));
	} else {
		fields.remove(RESEARCH_FIELD);
		fields.remove(RANGED_FIELD);
	}
	let threat = flee_from_threat_field(grid, &snapshot, &mask, &config, params);
	fields.insert(THREAT_FIELD, threat);
}

/// Each agent with [MovementWeights] resolves its next [AgentAction]. An
/// [Archer] with nothing better than staying put takes a shot instead
#[cfg(not(tarpaulin_include))]
pub fn follow_influence_fields(
	dungeons: Query<(&DungeonGrid, &InfluenceFields)>,
	mut agents: Query<(&GridPosition, &MovementWeights, &mut AgentAction, Has<Archer>)>,
) {
	let Ok((grid, fields)) = dungeons.single() else {
		return;
	};
	for (position, weights, mut action, is_archer) in agents.iter_mut() {
		let chosen = match resolve_move(grid, position.0, fields.get_fields(), weights) {
			MoveAction::Stay if is_archer => AgentAction::RangedShot,
			step => AgentAction::Move(step),
		};
		action.set_if_neq(chosen);
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	fn open_dungeon(app: &mut App) -> Entity {
		let grid = DungeonGrid::new_with_tile(5, 5, Tile::Floor).unwrap();
		app.world_mut().spawn(grid).id()
	}
	fn navigation_app() -> App {
		let mut app = App::new();
		app.insert_resource(NavigationConfig { cluster_size: 5, ..Default::default() })
			.add_plugins(NavigationPlugin);
		app
	}
	fn weighted(field: &str) -> MovementWeights {
		MovementWeights::new().with_weight(field, FieldWeight::new(1.0, 1.0))
	}
	#[test]
	fn follower_steps_towards_home_team() {
		let mut app = navigation_app();
		open_dungeon(&mut app);
		app.world_mut().spawn((GridPosition(IVec2::new(0, 0)), Team(0)));
		let follower = app.world_mut().spawn((
			GridPosition(IVec2::new(4, 4)),
			Team(1),
			weighted(APPROACH_FIELD),
			AgentAction::default(),
		)).id();
		app.update();
		app.update();
		// left and up are equally close, left is weighed first
		let action = app.world().get::<AgentAction>(follower).unwrap();
		assert_eq!(AgentAction::Move(MoveAction::Left), *action);
	}
	#[test]
	fn archer_shoots_from_firing_position() {
		let mut app = navigation_app();
		open_dungeon(&mut app);
		app.world_mut().spawn((GridPosition(IVec2::new(0, 0)), Team(0)));
		// (2, 2) is on the ring 4 cells from the home agent
		let archer = app.world_mut().spawn((
			GridPosition(IVec2::new(2, 2)),
			Team(1),
			Archer,
			weighted(RANGED_FIELD),
			AgentAction::default(),
		)).id();
		let brute = app.world_mut().spawn((
			GridPosition(IVec2::new(2, 2)),
			Team(1),
			weighted(RANGED_FIELD),
			AgentAction::default(),
		)).id();
		app.update();
		app.update();
		assert_eq!(AgentAction::RangedShot, *app.world().get::<AgentAction>(archer).unwrap());
		assert_eq!(AgentAction::Move(MoveAction::Stay), *app.world().get::<AgentAction>(brute).unwrap());
	}
	#[test]
	fn archer_still_moves_when_out_of_position() {
		let mut app = navigation_app();
		open_dungeon(&mut app);
		app.world_mut().spawn((GridPosition(IVec2::new(0, 0)), Team(0)));
		let archer = app.world_mut().spawn((
			GridPosition(IVec2::new(0, 1)),
			Team(1),
			Archer,
			weighted(RANGED_FIELD),
			AgentAction::default(),
		)).id();
		app.update();
		app.update();
		let action = app.world().get::<AgentAction>(archer).unwrap();
		assert!(matches!(action, AgentAction::Move(step) if *step != MoveAction::Stay));
	}
	#[test]
	fn home_agents_reveal_the_dungeon() {
		let mut app = navigation_app();
		let dungeon = open_dungeon(&mut app);
		app.world_mut().spawn((GridPosition(IVec2::new(0, 0)), Team(0)));
		app.world_mut().spawn((GridPosition(IVec2::new(4, 4)), Team(0)));
		app.world_mut().spawn((GridPosition(IVec2::new(2, 0)), Team(3), Hive));
		app.update();
		app.update();
		// a 2x2 corner around each home agent
		let mask = app.world().get::<RevealMask>(dungeon).unwrap();
		assert_eq!(8, mask.revealed_count());
		assert!(mask.is_revealed(GridCell::new(3, 3)));
		let fields = app.world().get::<InfluenceFields>(dungeon).unwrap();
		for name in [APPROACH_FIELD, FLEE_FIELD, PACK_FIELD, RESEARCH_FIELD, RANGED_FIELD, THREAT_FIELD] {
			assert!(fields.get(name).is_some(), "missing {}", name);
		}
		assert_eq!(Some(0.0), fields.get(PACK_FIELD).unwrap().get_value(GridCell::new(2, 0)));
	}
	#[test]
	fn no_home_agent_drops_research_and_ranged() {
		let mut app = navigation_app();
		let dungeon = open_dungeon(&mut app);
		app.world_mut().spawn((GridPosition(IVec2::new(1, 1)), Team(5)));
		app.update();
		app.update();
		let fields = app.world().get::<InfluenceFields>(dungeon).unwrap();
		assert!(fields.get(RESEARCH_FIELD).is_none());
		assert!(fields.get(RANGED_FIELD).is_none());
		assert!(fields.get(APPROACH_FIELD).is_some());
		let mask = app.world().get::<RevealMask>(dungeon).unwrap();
		assert_eq!(0, mask.revealed_count());
	}
}
