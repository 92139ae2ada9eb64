//! Annotated network graph built from a detection report
//!
//! Switches and trunk links come from the topology; device nodes and access
//! edges come from the resolved device locations. Colors are plain Graphviz /
//! CSS color names or hex values, ready for any renderer.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{
    LEAKING_SWITCH_COLOR, SWITCH_COLOR, TRUNK_EDGE_COLOR, UNKNOWN_VLAN_COLOR, VLAN_PALETTE,
};
use crate::detection::DetectionReport;
use crate::models::{Topology, VlanId};
use crate::network::{lookup_vendor, MacAddress};
use crate::topology::ConnectionIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Switch,
    Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub color: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub leaking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Trunk,
    Access,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub vlan_colors: BTreeMap<VlanId, String>,
    /// Position of each node in `nodes`, by id
    #[serde(skip)]
    node_index: BTreeMap<String, usize>,
}

impl NetworkGraph {
    pub fn build(
        topology: &Topology,
        index: &ConnectionIndex,
        report: &DetectionReport,
    ) -> Self {
        let mut graph = NetworkGraph {
            vlan_colors: assign_vlan_colors(&report.device_vlans()),
            ..NetworkGraph::default()
        };

        for name in topology.switch_names() {
            graph.add_switch(name, report);
        }

        let mut linked_pairs = BTreeSet::new();
        for (a, b) in index.links() {
            graph.add_switch(&a.switch, report);
            graph.add_switch(&b.switch, report);

            let pair = if a.switch <= b.switch {
                (a.switch.clone(), b.switch.clone())
            } else {
                (b.switch.clone(), a.switch.clone())
            };
            if !linked_pairs.insert(pair) {
                continue;
            }
            graph.edges.push(GraphEdge {
                source: a.switch.clone(),
                target: b.switch.clone(),
                kind: EdgeKind::Trunk,
                label: format!("P{}<->P{}", a.port, b.port),
                color: TRUNK_EDGE_COLOR.to_string(),
            });
        }

        for (mac, location) in &report.device_locations {
            for sighting in location.sightings() {
                if index.is_trunk(&sighting.switch, &sighting.port) {
                    crate::log_debug!(
                        "Device {} on {} appears on an inter-switch link. Not adding separate device edge.",
                        mac,
                        sighting
                    );
                    continue;
                }
                if !graph.has_node(&sighting.switch) {
                    crate::log_warn!(
                        "Switch '{}' for MAC {} not found in graph nodes. Skipping edge.",
                        sighting.switch,
                        mac
                    );
                    continue;
                }

                let color = graph.vlan_color(sighting.vlan).to_string();
                graph.add_device(*mac, sighting.vlan, &color);
                graph.edges.push(GraphEdge {
                    source: sighting.switch.clone(),
                    target: mac.to_string(),
                    kind: EdgeKind::Access,
                    label: format!("P{}\nVLAN {}", sighting.port, sighting.vlan),
                    color,
                });
            }
        }

        graph
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).and_then(|&i| self.nodes.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn vlan_color(&self, vlan: VlanId) -> &str {
        self.vlan_colors
            .get(&vlan)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_VLAN_COLOR)
    }

    fn add_switch(&mut self, name: &str, report: &DetectionReport) {
        if self.has_node(name) {
            return;
        }
        let leaking = report.is_leaking(name);
        self.push_node(GraphNode {
            id: name.to_string(),
            kind: NodeKind::Switch,
            label: name.to_string(),
            color: if leaking {
                LEAKING_SWITCH_COLOR
            } else {
                SWITCH_COLOR
            }
            .to_string(),
            leaking,
            vendor: None,
        });
    }

    // The first VLAN a device is drawn with decides its node color.
    fn add_device(&mut self, mac: MacAddress, vlan: VlanId, color: &str) {
        let id = mac.to_string();
        if self.has_node(&id) {
            return;
        }
        self.push_node(GraphNode {
            label: format!("{id}\n(VLAN {vlan})"),
            id,
            kind: NodeKind::Device,
            color: color.to_string(),
            leaking: false,
            vendor: lookup_vendor(&mac),
        });
    }

    fn push_node(&mut self, node: GraphNode) {
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }
}

/// Assign palette colors to VLANs in ascending order, cycling the palette
pub fn assign_vlan_colors(vlans: &BTreeSet<VlanId>) -> BTreeMap<VlanId, String> {
    vlans
        .iter()
        .zip(VLAN_PALETTE.iter().cycle())
        .map(|(vlan, color)| (*vlan, color.to_string()))
        .collect()
}
