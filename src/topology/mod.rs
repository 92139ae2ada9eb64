//! Topology module - topology file loading and trunk endpoint index

mod connections;
mod loader;

pub use connections::{ConnectionIndex, TOPOLOGY_SOURCE};
pub use loader::{load_topology, parse_topology};

/// Build the trunk endpoint index for a topology
pub fn build_connection_index(topology: &crate::models::Topology) -> ConnectionIndex {
    ConnectionIndex::build(topology)
}
