//! `use dungeon_navigation::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::navigation::{
	astar::*,
	fields::{recipes::*, reveal_mask::*, *},
	grid::*,
	movement::*,
	portal::{portal_graph::*, portals::*},
	utilities::*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	config::*,
	error::*,
	plugin::{field_layer::*, route_layer::*, *},
};
