//! End-to-end analysis workflow
//!
//! Topology → connection index → MAC tables → leak detection → graph.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::AnalyzerSettings;
use crate::detection::{detect, DetectionReport};
use crate::error::SourceError;
use crate::graph::NetworkGraph;
use crate::mactable::load_mac_tables;
use crate::models::{group_by_mac, Diagnostic, Observation, Topology};
use crate::topology::{load_topology, ConnectionIndex};

/// Everything produced by one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub topology: Topology,
    pub index: ConnectionIndex,
    pub report: DetectionReport,
    pub graph: NetworkGraph,
    /// Skipped topology entries and MAC table lines
    pub diagnostics: Vec<Diagnostic>,
    pub observation_count: usize,
    pub mac_count: usize,
}

/// Headline numbers for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub switches: usize,
    pub trunk_links: usize,
    pub observations: usize,
    pub macs: usize,
    pub devices_located: usize,
    pub unresolved_macs: usize,
    pub leaking_switches: usize,
    pub leak_events: usize,
    pub findings: usize,
    pub skipped_records: usize,
}

impl AnalysisOutcome {
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            switches: self.topology.switch_names().len(),
            trunk_links: self.index.links().len(),
            observations: self.observation_count,
            macs: self.mac_count,
            devices_located: self.report.device_locations.len(),
            unresolved_macs: self.report.unresolved_macs.len(),
            leaking_switches: self.report.leaking_switches.len(),
            leak_events: self.report.leak_events.len(),
            findings: self.report.findings.len(),
            skipped_records: self.diagnostics.len(),
        }
    }
}

/// Run the full workflow from files
///
/// An unusable topology stops the run. A missing MAC table directory does
/// not: detection runs on empty input and the caller sees an empty report.
pub fn run_analysis(settings: &AnalyzerSettings) -> Result<AnalysisOutcome> {
    crate::log_stderr!(
        "Loading topology from '{}'",
        settings.topology_file.display()
    );
    let topology = load_topology(&settings.topology_file).context("Failed to load topology")?;

    let (observations, table_diagnostics) =
        match load_mac_tables(&settings.mac_table_dir, &settings.mac_table_options()) {
            Ok(load) => {
                crate::log_stderr!(
                    "Parsed {} MAC table entries from {} files",
                    load.observations.len(),
                    load.files_read
                );
                (load.observations, load.diagnostics)
            }
            Err(e @ SourceError::MacTableDirNotFound(_)) => {
                crate::log_error!("{}", e);
                (Vec::new(), Vec::new())
            }
            Err(e) => return Err(e).context("Failed to read MAC tables"),
        };

    if observations.is_empty() {
        crate::log_warn!(
            "No MAC address information found or parsed. Visualization might be limited."
        );
    }

    let mut outcome = analyze_inputs(topology, observations);
    outcome.diagnostics.extend(table_diagnostics);
    Ok(outcome)
}

/// Run index build, detection and graph building on in-memory inputs
pub fn analyze_inputs(topology: Topology, observations: Vec<Observation>) -> AnalysisOutcome {
    let mut diagnostics = topology.validate();
    let (index, link_diagnostics) = ConnectionIndex::build_with_diagnostics(&topology);
    diagnostics.extend(link_diagnostics);

    let grouped = group_by_mac(&observations);
    let report = detect(&grouped, &index);
    log_results(&report);

    let graph = NetworkGraph::build(&topology, &index, &report);

    AnalysisOutcome {
        observation_count: observations.len(),
        mac_count: grouped.len(),
        topology,
        index,
        report,
        graph,
        diagnostics,
    }
}

fn log_results(report: &DetectionReport) {
    crate::log_stderr!("==============================");
    crate::log_stderr!("Analysis Results:");
    crate::log_stderr!("==============================");
    if report.leaking_switches.is_empty() {
        crate::log_stderr!("Leaking Switches: None");
    } else {
        crate::log_stderr!("Leaking Switches: {:?}", report.leaking_switches);
    }
    crate::log_stderr!("Device Locations (MAC: [(Switch, Port, VLAN), ...]):");
    if report.device_locations.is_empty() {
        crate::log_stderr!("  No device locations determined.");
    }
    for (mac, location) in &report.device_locations {
        let places: Vec<String> = location.sightings().iter().map(ToString::to_string).collect();
        crate::log_stderr!("  {}: [{}]", mac, places.join(", "));
    }
    if !report.unresolved_macs.is_empty() {
        crate::log_stderr!(
            "MACs seen only on inter-switch links: {}",
            report.unresolved_macs.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkEntry, PortId, VlanId};
    use crate::network::MacAddress;

    fn observation(switch: &str, port: u32, vlan: u16, mac: &str) -> Observation {
        Observation {
            switch: switch.to_string(),
            port: PortId::Numeric(port),
            vlan: VlanId::new(vlan).unwrap(),
            mac: mac.parse::<MacAddress>().unwrap(),
        }
    }

    #[test]
    fn analyze_inputs_collects_summary_and_diagnostics() {
        let topology = Topology {
            switches: vec!["SW1".into(), "SW2".into()],
            links: vec![
                LinkEntry::new("SW1", 1, "SW2", 1),
                LinkEntry {
                    source_port: None,
                    ..LinkEntry::new("SW1", 0, "SW2", 2)
                },
            ],
        };
        let observations = vec![
            observation("SW1", 1, 10, "aa:aa:aa:aa:aa:aa"),
            observation("SW2", 7, 99, "aa:aa:aa:aa:aa:aa"),
            observation("SW2", 3, 20, "bb:bb:bb:bb:bb:bb"),
        ];

        let outcome = analyze_inputs(topology, observations);
        let summary = outcome.summary();

        assert_eq!(summary.switches, 2);
        assert_eq!(summary.trunk_links, 1);
        assert_eq!(summary.observations, 3);
        assert_eq!(summary.macs, 2);
        assert_eq!(summary.devices_located, 2);
        assert_eq!(summary.leaking_switches, 1);
        assert_eq!(summary.skipped_records, 1);
        assert!(outcome.graph.has_node("SW1"));
    }
}
