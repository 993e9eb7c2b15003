//! Navigation over a static grid based dungeon.
//!
//! [Dijkstra Maps Visualized](https://www.roguebasin.com/index.php/Dijkstra_Maps_Visualized)
//!
//! [The Incredible Power of Dijkstra Maps](https://www.roguebasin.com/index.php/The_Incredible_Power_of_Dijkstra_Maps)
//!
//! [Near Optimal Hierarchical Path-Finding](https://webdocs.cs.ualberta.ca/~mmueller/ps/hpastar.pdf)
//!
//! Two independent tools are built on top of a [grid::DungeonGrid]:
//!
//! * Influence fields - a value per cell measuring the distance to a set of
//!   sources. Agents combine several fields and greedily step downhill,
//!   see [fields] and [movement]
//! * Hierarchical routes - the grid is divided into square clusters and the
//!   gaps between neighbouring clusters become portals. An exact [astar]
//!   search measures the cost of crossing each cluster from portal to portal
//!   and routes are then found over the much smaller [portal::portal_graph::PortalGraph]
//!
//! Cells are addressed as `(column, row)` from the top-left corner of the
//! grid, row `0` is the northern edge:
//!
//! ```text
//!  ___________________________
//! |(0,0)|(1,0)|(2,0)|(3,0)|...
//! |_____|_____|_____|_____|
//! |(0,1)|(1,1)|(2,1)|(3,1)|...
//! |_____|_____|_____|_____|
//! |(0,2)|(1,2)|(2,2)|(3,2)|...
//! |_____|_____|_____|_____|
//! ```
//!

pub mod astar;
pub mod fields;
pub mod grid;
pub mod movement;
pub mod portal;
pub mod utilities;
