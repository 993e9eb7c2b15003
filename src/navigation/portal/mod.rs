//! A Portal marks a walkable gap between two neighbouring clusters.
//!
//! A [portal_graph::PortalGraph] links the portals sharing a cluster and is
//! searched to find a high level route of clusters to cross.

pub mod portal_graph;
pub mod portals;
