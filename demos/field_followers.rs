//! A hero explores a dungeon loaded from `ron` while goblins close in on it,
//! an archer looks for a firing position and a pack of rats keeps together.
//! Each tick the agents' chosen actions are applied and logged, no window is
//! opened
//!

use bevy::{log::LogPlugin, prelude::*};
use dungeon_navigation::prelude::*;

/// Ticks to simulate
const TICKS: usize = 16;

fn main() -> NavigationResult<()> {
	let assets = env!("CARGO_MANIFEST_DIR").to_string() + "/assets";
	let config = NavigationConfig::from_ron(assets.clone() + "/navigation_config.ron")?;
	let grid = DungeonGrid::from_ron(assets + "/dungeon_grid.ron")?;
	let home_team = config.home_team;

	let mut app = App::new();
	app.add_plugins((LogPlugin::default(), NavigationPlugin))
		.insert_resource(config)
		.add_systems(Update, apply_actions.after(NavigationSet::Follow));
	app.world_mut().spawn(grid);
	// the hero wanders towards whatever it hasn't seen yet
	app.world_mut().spawn((
		GridPosition(IVec2::new(1, 1)),
		home_team,
		MovementWeights::new().with_weight(RESEARCH_FIELD, FieldWeight::new(1.0, 1.0)),
		AgentAction::default(),
	));
	let goblins = Team(home_team.0 + 1);
	app.world_mut().spawn((
		GridPosition(IVec2::new(7, 8)),
		goblins,
		MovementWeights::new().with_weight(APPROACH_FIELD, FieldWeight::new(1.0, 1.0)),
		AgentAction::default(),
	));
	app.world_mut().spawn((
		GridPosition(IVec2::new(8, 6)),
		goblins,
		Archer,
		MovementWeights::new().with_weight(RANGED_FIELD, FieldWeight::new(1.0, 1.0)),
		AgentAction::default(),
	));
	let rats = Team(home_team.0 + 2);
	for position in [IVec2::new(6, 1), IVec2::new(8, 3)] {
		app.world_mut().spawn((
			GridPosition(position),
			rats,
			Hive,
			MovementWeights::new()
				.with_weight(PACK_FIELD, FieldWeight::new(1.0, 1.0))
				.with_weight(APPROACH_FIELD, FieldWeight::new(0.5, 1.0)),
			AgentAction::default(),
		));
	}
	for tick in 0..TICKS {
		info!("Tick {}", tick);
		app.update();
	}
	Ok(())
}

/// Move each agent by its chosen step
fn apply_actions(
	dungeons: Query<&DungeonGrid>,
	mut agents: Query<(Entity, &mut GridPosition, &AgentAction)>,
) {
	let Ok(grid) = dungeons.single() else {
		return;
	};
	for (entity, mut position, action) in agents.iter_mut() {
		match action {
			AgentAction::Move(step) => {
				let next = position.0 + step.as_offset();
				if grid.is_walkable_signed(next) {
					position.0 = next;
				}
				info!("{:?} {:?} to {:?}", entity, step, position.0);
			}
			AgentAction::RangedShot => info!("{:?} shoots from {:?}", entity, position.0),
		}
	}
}
