//! Plain-text analysis summary

use std::fmt::Write;

use crate::analysis::AnalysisOutcome;

/// Human-readable report of leaking switches, device locations and findings
pub fn export_summary_text(outcome: &AnalysisOutcome) -> String {
    let report = &outcome.report;
    let summary = outcome.summary();
    let mut out = String::new();

    let _ = writeln!(out, "==============================");
    let _ = writeln!(out, "Analysis Results:");
    let _ = writeln!(out, "==============================");
    let _ = writeln!(
        out,
        "Switches: {}  Trunk links: {}  MAC entries: {}  MACs: {}",
        summary.switches, summary.trunk_links, summary.observations, summary.macs
    );

    if report.leaking_switches.is_empty() {
        let _ = writeln!(out, "Leaking Switches: None");
    } else {
        let names: Vec<&str> = report.leaking_switches.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Leaking Switches: {}", names.join(", "));
    }

    let _ = writeln!(out, "Device Locations (MAC: [(Switch, Port, VLAN), ...]):");
    if report.device_locations.is_empty() {
        let _ = writeln!(out, "  No device locations determined.");
    }
    for (mac, location) in &report.device_locations {
        let places: Vec<String> = location.sightings().iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "  {}: [{}]", mac, places.join(", "));
    }

    if !report.unresolved_macs.is_empty() {
        let _ = writeln!(out, "Seen only on inter-switch links:");
        for mac in &report.unresolved_macs {
            let _ = writeln!(out, "  {mac}");
        }
    }

    if !report.findings.is_empty() {
        let _ = writeln!(out, "Findings:");
        for finding in &report.findings {
            let _ = writeln!(out, "  [{}] {}", finding.severity.as_str(), finding.message);
        }
    }

    if !outcome.diagnostics.is_empty() {
        let _ = writeln!(out, "Skipped records: {}", outcome.diagnostics.len());
        for diagnostic in &outcome.diagnostics {
            let _ = writeln!(out, "  {diagnostic}");
        }
    }

    out
}
