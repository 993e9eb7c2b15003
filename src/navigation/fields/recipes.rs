//! Named [ScalarField] builders used by agents to decide where to go.
//!
//! Each recipe picks its sources from a snapshot of the agents in the dungeon
//! and then relaxes the field over the [DungeonGrid]:
//!
//! - approach, sources are every agent of the home team
//! - flee, the approach field inverted so that moving away from the home team is downhill
//! - pack, sources are every hive agent
//! - research, sources are the cells nobody has seen yet
//! - ranged, sources are cells a fixed distance from an agent with a clear straight line to it
//! - flee from threat, sources are opposing agents that have been seen, inverted
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Faction an agent belongs to
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Team(pub u32);

/// The subset of an agent's state the field recipes care about
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
	/// Current cell of the agent
	pub position: IVec2,
	/// Faction of the agent
	pub team: Team,
	/// Whether the agent is part of a hive pack
	pub is_hive: bool,
}

impl AgentSnapshot {
	/// Create a new instance of [AgentSnapshot]
	pub fn new(position: IVec2, team: Team, is_hive: bool) -> Self {
		AgentSnapshot {
			position,
			team,
			is_hive,
		}
	}
}

/// Grid cells of the agents that satisfy the `filter`
fn agent_cells(
	grid: &DungeonGrid,
	agents: &[AgentSnapshot],
	filter: impl Fn(&AgentSnapshot) -> bool,
) -> Vec<GridCell> {
	agents
		.iter()
		.filter(|a| filter(a))
		.filter_map(|a| grid.get_cell_from_signed(a.position))
		.collect()
}

/// Scale a relaxed field by the flee multiplier, relax it again and transform
fn invert_for_fleeing(
	field: &mut ScalarField,
	grid: &DungeonGrid,
	mask: Option<&RevealMask>,
	config: &NavigationConfig,
	params: &FieldParameters,
) {
	field.scale_reached(config.flee_multiplier);
	field.relax(grid, mask);
	field.apply_transform(params);
}

/// Field leading towards the agents of the configured home team
pub fn approach_field(
	grid: &DungeonGrid,
	agents: &[AgentSnapshot],
	config: &NavigationConfig,
	params: &FieldParameters,
) -> ScalarField {
	let sources = agent_cells(grid, agents, |a| a.team == config.home_team);
	ScalarField::propagate(grid, &sources, params)
}

/// Field leading away from the agents of the configured home team.
///
/// The untransformed approach field is multiplied by the (negative) flee
/// multiplier and relaxed again before the transform
pub fn flee_field(
	grid: &DungeonGrid,
	agents: &[AgentSnapshot],
	config: &NavigationConfig,
	params: &FieldParameters,
) -> ScalarField {
	let sources = agent_cells(grid, agents, |a| a.team == config.home_team);
	let mut field = ScalarField::new_unreached(grid);
	field.seed_sources(grid, &sources);
	field.relax(grid, None);
	invert_for_fleeing(&mut field, grid, None, config, params);
	field
}

/// Field leading towards the agents tagged as part of a hive
pub fn pack_field(
	grid: &DungeonGrid,
	agents: &[AgentSnapshot],
	params: &FieldParameters,
) -> ScalarField {
	let sources = agent_cells(grid, agents, |a| a.is_hive);
	ScalarField::propagate(grid, &sources, params)
}

/// Reveal the surroundings of the `explorer` and build a field leading
/// towards the frontier of unseen cells
pub fn research_field(
	grid: &DungeonGrid,
	explorer: &AgentSnapshot,
	mask: &mut RevealMask,
	config: &NavigationConfig,
	params: &FieldParameters,
) -> ScalarField {
	mask.reveal_around(grid, explorer.position, config.research_radius);
	let mut field = ScalarField::new_unreached(grid);
	for i in 0..grid.get_size() {
		let cell = grid.get_cell(i);
		if !mask.is_revealed(cell) {
			field.set_value(cell, 0.0);
		}
	}
	field.relax(grid, None);
	field.apply_transform(params);
	field
}

/// Move `from` one cell towards `to`, along whichever axis has the larger gap
fn step_towards(from: IVec2, to: IVec2) -> IVec2 {
	let delta = to - from;
	if delta.x.abs() > delta.y.abs() {
		from + IVec2::new(delta.x.signum(), 0)
	} else {
		from + IVec2::new(0, delta.y.signum())
	}
}

/// Whether `from` is walkable and stepping from it to `to` never lands on a
/// wall or leaves the grid
fn has_clear_line(grid: &DungeonGrid, from: IVec2, to: IVec2) -> bool {
	let mut current = from;
	while current != to {
		if !grid.is_walkable_signed(current) {
			return false;
		}
		current = step_towards(current, to);
	}
	true
}

/// Cells of the diamond ring `radius` steps (manhattan) from `center`
fn diamond_ring(center: IVec2, radius: i32) -> Vec<IVec2> {
	let mut ring = Vec::with_capacity(4 * radius.unsigned_abs() as usize);
	for i in (1..=radius).rev() {
		let j = radius - i;
		ring.push(center.saturating_add(IVec2::new(i, j)));
		ring.push(center.saturating_add(IVec2::new(-j, i)));
		ring.push(center.saturating_add(IVec2::new(-i, -j)));
		ring.push(center.saturating_add(IVec2::new(j, -i)));
	}
	ring
}

/// Find the cells a ranged attacker can shoot at the `target` from.
///
/// Rings are scanned from `ranged_distance` inwards. A ring cell without a
/// clear line to the target is pulled one step closer at a time, giving up
/// after `line_of_sight_step_cap` steps or on reaching the target. The first
/// ring to produce any cell ends the scan. A target off the grid has no
/// positions
pub fn find_ranged_positions(
	grid: &DungeonGrid,
	target: IVec2,
	config: &NavigationConfig,
) -> Vec<GridCell> {
	if grid.get_cell_from_signed(target).is_none() {
		warn!("Ranged target {:?} is off the grid", target);
		return Vec::new();
	}
	// rings further out than this can't be pulled back onto the grid
	let furthest = (grid.get_width() + grid.get_height()).saturating_add(config.line_of_sight_step_cap);
	let distance = i32::try_from(config.ranged_distance.min(furthest)).unwrap_or(i32::MAX);
	for radius in (1..=distance).rev() {
		let mut positions = Vec::new();
		for candidate in diamond_ring(target, radius) {
			let mut current = candidate;
			for _ in 0..=config.line_of_sight_step_cap {
				if current == target {
					break;
				}
				if has_clear_line(grid, current, target) {
					if let Some(cell) = grid.get_cell_from_signed(current) {
						if !positions.contains(&cell) {
							positions.push(cell);
						}
					}
					break;
				}
				current = step_towards(current, target);
			}
		}
		if !positions.is_empty() {
			trace!(
				"Found {} ranged positions {} cells from {:?}",
				positions.len(),
				radius,
				target
			);
			return positions;
		}
	}
	warn!(
		"No ranged positions with a clear line to {:?} within {} cells",
		target, config.ranged_distance
	);
	Vec::new()
}

/// Field leading towards the cells from which the `target` can be shot at
pub fn ranged_field(
	grid: &DungeonGrid,
	target: &AgentSnapshot,
	config: &NavigationConfig,
	params: &FieldParameters,
) -> ScalarField {
	let sources = find_ranged_positions(grid, target.position, config);
	ScalarField::propagate(grid, &sources, params)
}

/// Field leading away from opposing agents that have been seen, confined to
/// revealed cells. With no visible threats every revealed floor is `0`
pub fn flee_from_threat_field(
	grid: &DungeonGrid,
	agents: &[AgentSnapshot],
	mask: &RevealMask,
	config: &NavigationConfig,
	params: &FieldParameters,
) -> ScalarField {
	let threats: Vec<GridCell> = agent_cells(grid, agents, |a| a.team != config.home_team)
		.into_iter()
		.filter(|cell| mask.is_revealed(*cell))
		.collect();
	let mut field = ScalarField::new_unreached(grid);
	if threats.is_empty() {
		for i in 0..grid.get_size() {
			let cell = grid.get_cell(i);
			if grid.is_walkable(cell) && mask.is_revealed(cell) {
				field.set_value(cell, 0.0);
			}
		}
		return field;
	}
	field.seed_sources(grid, &threats);
	field.relax(grid, Some(mask));
	invert_for_fleeing(&mut field, grid, Some(mask), config, params);
	field
}
