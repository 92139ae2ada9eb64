//! Graphviz DOT export
//!
//! Produces text for `dot`/`neato`; layout and drawing are left to Graphviz.

use std::fmt::Write;

use crate::graph::{EdgeKind, NetworkGraph, NodeKind};

const GRAPH_TITLE: &str = "Network Topology with VLAN Leak Detection";

/// Render the graph as an undirected DOT document
pub fn export_graph_dot(graph: &NetworkGraph) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "graph network {{");
    let _ = writeln!(
        out,
        "  graph [label={}, labelloc=t, fontsize=16, overlap=false];",
        quote(GRAPH_TITLE)
    );
    let _ = writeln!(out, "  node [style=filled, fontsize=8];");
    let _ = writeln!(out, "  edge [fontsize=7];");

    for node in &graph.nodes {
        let shape = match node.kind {
            NodeKind::Switch => "box",
            NodeKind::Device => "ellipse",
        };
        let tooltip = node
            .vendor
            .as_deref()
            .map(|v| format!(", tooltip={}", quote(v)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {} [label={}, shape={}, fillcolor={}{}];",
            quote(&node.id),
            quote(&node.label),
            shape,
            quote(&node.color),
            tooltip
        );
    }

    for edge in &graph.edges {
        let style = match edge.kind {
            EdgeKind::Trunk => "bold",
            EdgeKind::Access => "solid",
        };
        let _ = writeln!(
            out,
            "  {} -- {} [label={}, color={}, style={}];",
            quote(&edge.source),
            quote(&edge.target),
            quote(&edge.label),
            quote(&edge.color),
            style
        );
    }

    if !graph.vlan_colors.is_empty() {
        let _ = writeln!(out, "  subgraph cluster_legend {{");
        let _ = writeln!(out, "    label={};", quote("VLAN Colors (Devices)"));
        for (vlan, color) in &graph.vlan_colors {
            let _ = writeln!(
                out,
                "    {} [label={}, shape=circle, fillcolor={}];",
                quote(&format!("legend_vlan_{vlan}")),
                quote(&format!("VLAN {vlan}")),
                quote(color)
            );
        }
        let _ = writeln!(out, "  }}");
    }

    let _ = writeln!(out, "}}");
    out
}

/// Quote a DOT identifier, escaping quotes, backslashes and newlines
fn quote(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
