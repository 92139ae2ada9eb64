//! VLAN Mapper — device location and VLAN leak detection from switch MAC tables
//!
//! This crate provides:
//! - Topology loading and a symmetric trunk-port index
//! - Switch MAC table parsing with per-line diagnostics
//! - Per-MAC classification into access ports, trunk propagation and VLAN leaks
//! - An annotated network graph with DOT / JSON / CSV / text exports

pub mod analysis;
pub mod app;
pub mod cli;
pub mod command_handlers;
pub mod config;
pub mod detection;
pub mod error;
pub mod exports;
pub mod graph;
pub mod logging;
pub mod mactable;
pub mod models;
pub mod network;
pub mod topology;

pub use analysis::{analyze_inputs, run_analysis, AnalysisOutcome, AnalysisSummary};
pub use app::{execute_command, execute_command_with_context, run, AppContext, OutputHook};
pub use cli::{parse_cli_args, usage_text, version_text, CliCommand};
pub use config::*;
pub use detection::{
    count_findings_by_kind, detect, has_high_severity_findings, DetectionReport, DeviceLocation,
    Finding, FindingKind, LeakDetector, LeakEvent, MacClassification, Severity,
};
pub use error::{LineError, LinkError, SourceError};
pub use exports::{
    export_analysis_json, export_device_locations_csv, export_graph_dot, export_graph_json,
    export_leak_events_csv, export_summary_text,
};
pub use graph::{assign_vlan_colors, EdgeKind, GraphEdge, GraphNode, NetworkGraph, NodeKind};
pub use mactable::{
    load_mac_tables, parse_mac_table, parse_mac_table_bytes, parse_mac_table_line, MacEntry,
    MacTableLoad, MacTableOptions,
};
pub use models::*;
pub use network::{lookup_vendor, lookup_vendor_info, MacAddress, VendorInfo};
pub use topology::{build_connection_index, load_topology, parse_topology, ConnectionIndex};

// Re-export logging macros for use across crate
pub use crate::logging::macros;
