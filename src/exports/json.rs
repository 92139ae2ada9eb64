//! JSON export functionality
//!
//! Export analysis results and the annotated graph to JSON format

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::analysis::{AnalysisOutcome, AnalysisSummary};
use crate::detection::{DeviceLocation, Finding, LeakEvent};
use crate::graph::NetworkGraph;
use crate::models::{Diagnostic, Sighting};
use crate::network::{lookup_vendor_info, MacAddress};

/// Analysis export format
#[derive(Debug, Serialize)]
pub struct AnalysisExport {
    pub export_date: String,
    pub summary: AnalysisSummary,
    pub leaking_switches: BTreeSet<String>,
    pub devices: Vec<DeviceExport>,
    pub unresolved_macs: BTreeSet<MacAddress>,
    pub leak_events: Vec<LeakEvent>,
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One located device
#[derive(Debug, Serialize)]
pub struct DeviceExport {
    pub mac: MacAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_randomized: bool,
    pub vlans: Vec<u16>,
    pub multi_vlan: bool,
    pub locations: Vec<Sighting>,
}

impl DeviceExport {
    fn new(mac: MacAddress, location: &DeviceLocation) -> Self {
        let vendor = lookup_vendor_info(&mac);
        Self {
            mac,
            vendor: vendor.vendor,
            is_randomized: vendor.is_randomized,
            vlans: location.vlans().into_iter().map(|v| v.get()).collect(),
            multi_vlan: location.is_multi_vlan(),
            locations: location.sightings().to_vec(),
        }
    }
}

/// Export the full analysis to JSON
pub fn export_analysis_json(outcome: &AnalysisOutcome) -> Result<String> {
    let report = &outcome.report;
    let export = AnalysisExport {
        export_date: chrono::Utc::now().to_rfc3339(),
        summary: outcome.summary(),
        leaking_switches: report.leaking_switches.clone(),
        devices: report
            .device_locations
            .iter()
            .map(|(mac, location)| DeviceExport::new(*mac, location))
            .collect(),
        unresolved_macs: report.unresolved_macs.clone(),
        leak_events: report.leak_events.clone(),
        findings: report.findings.clone(),
        diagnostics: outcome.diagnostics.clone(),
    };

    let json = serde_json::to_string_pretty(&export)?;
    Ok(json)
}

/// Export the annotated graph (nodes, edges, VLAN colors) to JSON
pub fn export_graph_json(graph: &NetworkGraph) -> Result<String> {
    let json = serde_json::to_string_pretty(graph)?;
    Ok(json)
}
