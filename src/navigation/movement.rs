//! Picks a single step for an agent by blending several named [ScalarField]s.
//!
//! Every field is sampled at the cell each candidate move would land on, the
//! sample is scaled and reshaped by the agent's [FieldWeight] for that field
//! and the results are summed. The candidate with the smallest sum wins:
//!
//! ```text
//!  _________________
//! |     |     |     |
//! |     |  U  |     |
//! |_____|_____|_____|
//! |     |     |     |
//! |  L  |  S  |  R  |
//! |_____|_____|_____|
//! |     |     |     |
//! |     |  D  |     |
//! |_____|_____|_____|
//! ```
//!
//! Candidates are weighed in the order Stay, Left, Right, Up, Down and a
//! later candidate must be strictly better to replace an earlier one. This is
//! a greedy choice with no lookahead so agents can settle in local minima.
//!

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::prelude::*;

/// A single step an agent can take
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveAction {
	/// Remain on the current cell
	Stay,
	/// Towards column `0`
	Left,
	/// Away from column `0`
	Right,
	/// Towards row `0`
	Up,
	/// Away from row `0`
	Down,
}

impl MoveAction {
	/// Every action in the order they are weighed
	pub const ALL: [MoveAction; 5] = [
		MoveAction::Stay,
		MoveAction::Left,
		MoveAction::Right,
		MoveAction::Up,
		MoveAction::Down,
	];
	/// Change in position caused by the action
	pub fn as_offset(&self) -> IVec2 {
		match self {
			MoveAction::Stay => IVec2::ZERO,
			MoveAction::Left => Ordinal::West.as_offset(),
			MoveAction::Right => Ordinal::East.as_offset(),
			MoveAction::Up => Ordinal::North.as_offset(),
			MoveAction::Down => Ordinal::South.as_offset(),
		}
	}
}

/// How strongly an agent is drawn along a named field
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldWeight {
	/// Scales the sampled value, negative values turn attraction into repulsion
	pub multiplier: f32,
	/// Power applied to the scaled value, keeping its sign
	pub exponent: f32,
}

impl FieldWeight {
	/// Create a new instance of [FieldWeight]
	pub fn new(multiplier: f32, exponent: f32) -> Self {
		FieldWeight {
			multiplier,
			exponent,
		}
	}
	/// Reshape a field sample, `sign(v * m) * |v * m|^e`
	pub fn weigh(&self, value: f32) -> f32 {
		let scaled = value * self.multiplier;
		scaled.abs().powf(self.exponent).copysign(scaled)
	}
}

/// The [FieldWeight] an agent applies to each named field
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct MovementWeights(BTreeMap<String, FieldWeight>);

impl MovementWeights {
	/// Create an empty set of weights
	pub fn new() -> Self {
		MovementWeights(BTreeMap::new())
	}
	/// Builder style insertion of a weight
	pub fn with_weight(mut self, field: &str, weight: FieldWeight) -> Self {
		self.0.insert(field.to_string(), weight);
		self
	}
	/// Set the weight for a field, replacing any previous one
	pub fn insert(&mut self, field: &str, weight: FieldWeight) {
		self.0.insert(field.to_string(), weight);
	}
	/// Get the weight of a field
	pub fn get(&self, field: &str) -> Option<&FieldWeight> {
		self.0.get(field)
	}
	/// Get a reference to the map of weights
	pub fn get_weights(&self) -> &BTreeMap<String, FieldWeight> {
		&self.0
	}
}

/// Choose the step from `position` with the smallest weighted sum of the
/// `fields`. Moves onto walls or off the grid are never chosen, an agent
/// that is itself off the grid stays put
pub fn resolve_move(
	grid: &DungeonGrid,
	position: IVec2,
	fields: &BTreeMap<String, ScalarField>,
	weights: &MovementWeights,
) -> MoveAction {
	if grid.get_cell_from_signed(position).is_none() {
		trace!("Agent at {:?} is off the grid, staying put", position);
		return MoveAction::Stay;
	}
	let mut weighted_fields = Vec::with_capacity(weights.get_weights().len());
	for (name, weight) in weights.get_weights() {
		match fields.get(name) {
			Some(field) => weighted_fields.push((field, weight)),
			None => warn!("No field named `{}` to weigh movement with, skipping", name),
		}
	}
	let mut best = (MoveAction::Stay, f32::INFINITY);
	for action in MoveAction::ALL {
		let target = position + action.as_offset();
		if action != MoveAction::Stay && !grid.is_walkable_signed(target) {
			continue;
		}
		let mut sum = 0.0;
		for (field, weight) in weighted_fields.iter() {
			if let Some(value) = field.get_value_signed(target) {
				if value < UNREACHED {
					sum += weight.weigh(value);
				}
			}
		}
		if sum < best.1 {
			best = (action, sum);
		}
	}
	best.0
}
