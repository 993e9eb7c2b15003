//! Tunables shared by the field recipes and the plugin
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Navigation settings, inserted as a [Resource] by [crate::prelude::NavigationPlugin] if one doesn't already exist
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct NavigationConfig {
	/// Edge length of the clusters a [PortalGraph] divides a grid into
	pub cluster_size: usize,
	/// Manhattan radius of the outermost ring searched for ranged positions
	pub ranged_distance: usize,
	/// Steps a blocked ranged candidate may be pulled towards its target before it is abandoned
	pub line_of_sight_step_cap: usize,
	/// Factor applied to the approach field when building flee fields
	pub flee_multiplier: f32,
	/// Agents of this team are the sources of the approach and flee fields, everyone else is a threat
	pub home_team: Team,
	/// Chebyshev radius revealed around an explorer
	pub research_radius: usize,
	/// Transform applied to every field the plugin rebuilds
	pub field_parameters: FieldParameters,
}

impl Default for NavigationConfig {
	fn default() -> Self {
		NavigationConfig {
			cluster_size: CLUSTER_RESOLUTION,
			ranged_distance: 4,
			line_of_sight_step_cap: 8,
			flee_multiplier: -1.2,
			home_team: Team(0),
			research_radius: 1,
			field_parameters: FieldParameters::default(),
		}
	}
}

impl NavigationConfig {
	/// From a `ron` file generate the [NavigationConfig], missing fields take their default
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> NavigationResult<Self> {
		let file = std::fs::File::open(path)?;
		let config: NavigationConfig = ron::de::from_reader(file)?;
		Ok(config)
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn defaults() {
		let config = NavigationConfig::default();
		assert_eq!(10, config.cluster_size);
		assert_eq!(4, config.ranged_distance);
		assert_eq!(8, config.line_of_sight_step_cap);
		assert_eq!(-1.2, config.flee_multiplier);
		assert_eq!(Team(0), config.home_team);
		assert_eq!(1, config.research_radius);
		assert_eq!(FieldParameters::new(1.0, true), config.field_parameters);
	}
	#[test]
	#[cfg(feature = "ron")]
	fn config_file_ron() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/navigation_config.ron";
		let config = NavigationConfig::from_ron(path).unwrap();
		assert_eq!(5, config.cluster_size);
		assert_eq!(Team(2), config.home_team);
		assert_eq!(FieldParameters::new(2.0, true), config.field_parameters);
		// not present in the file
		assert_eq!(8, config.line_of_sight_step_cap);
	}
	#[test]
	#[cfg(feature = "ron")]
	fn missing_config_file() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/does_not_exist.ron";
		assert!(matches!(NavigationConfig::from_ron(path), Err(NavigationError::Io(_))));
	}
}
