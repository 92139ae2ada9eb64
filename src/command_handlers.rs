use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::analysis::{run_analysis, AnalysisOutcome};
use crate::app::AppContext;
use crate::config::{AnalyzerSettings, OutputFormat};
use crate::detection::count_findings_by_kind;
use crate::exports::{
    export_analysis_json, export_device_locations_csv, export_graph_dot, export_graph_json,
    export_leak_events_csv, export_summary_text,
};
use crate::models::{Diagnostic, Endpoint};
use crate::topology::{load_topology, ConnectionIndex};

/// Result of `validate`: what the index would contain and what was skipped
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub topology: String,
    pub switches: Vec<String>,
    pub links: Vec<ValidatedLink>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct ValidatedLink {
    pub a: Endpoint,
    pub b: Endpoint,
}

pub fn render_outcome(outcome: &AnalysisOutcome, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Summary => export_summary_text(outcome),
        OutputFormat::Json => export_analysis_json(outcome)?,
        OutputFormat::Csv => export_device_locations_csv(&outcome.report)?,
        OutputFormat::LeaksCsv => export_leak_events_csv(&outcome.report)?,
        OutputFormat::Dot => export_graph_dot(&outcome.graph),
        OutputFormat::GraphJson => export_graph_json(&outcome.graph)?,
    };
    Ok(rendered)
}

pub fn handle_analyze(settings: &AnalyzerSettings, context: &AppContext) -> Result<()> {
    let outcome = run_analysis(settings)?;
    let rendered = render_outcome(&outcome, settings.format)?;

    match &settings.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to '{}'", path.display()))?;
            crate::log_stderr!(
                "{} report written to {}",
                settings.format.as_str(),
                path.display()
            );
        }
        None => context.emit(rendered.trim_end()),
    }

    let report = &outcome.report;
    if report.has_leaks() {
        crate::log_warn!(
            "VLAN leaks on {} switch(es); findings by kind: {:?}",
            report.leaking_switches.len(),
            count_findings_by_kind(&report.findings)
        );
    }

    Ok(())
}

pub fn validate_topology(path: &Path) -> Result<ValidationReport> {
    let topology = load_topology(path).context("Failed to load topology")?;

    let mut diagnostics = topology.validate();
    let (index, link_diagnostics) = ConnectionIndex::build_with_diagnostics(&topology);
    diagnostics.extend(link_diagnostics);

    Ok(ValidationReport {
        topology: path.display().to_string(),
        switches: topology
            .switch_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        links: index
            .links()
            .into_iter()
            .map(|(a, b)| ValidatedLink { a, b })
            .collect(),
        diagnostics,
    })
}

pub fn handle_validate(path: &Path, context: &AppContext) -> Result<()> {
    let report = validate_topology(path)?;
    if report.diagnostics.is_empty() {
        crate::log_stderr!(
            "Topology OK: {} switches, {} links",
            report.switches.len(),
            report.links.len()
        );
    } else {
        crate::log_warn!(
            "Topology has {} skipped or questionable entries",
            report.diagnostics.len()
        );
    }
    context.emit(&serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_inputs;
    use crate::models::{LinkEntry, Observation, PortId, Topology, VlanId};

    fn outcome() -> AnalysisOutcome {
        let topology = Topology {
            switches: vec!["SW1".into(), "SW2".into()],
            links: vec![LinkEntry::new("SW1", 1, "SW2", 1)],
        };
        let observations = vec![Observation {
            switch: "SW2".into(),
            port: PortId::Numeric(5),
            vlan: VlanId::new(20).unwrap(),
            mac: "00:1c:b3:00:00:01".parse().unwrap(),
        }];
        analyze_inputs(topology, observations)
    }

    #[test]
    fn render_outcome_uses_requested_format() {
        let outcome = outcome();

        let csv = render_outcome(&outcome, OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("MAC Address,"));
        assert!(csv.contains("00:1c:b3:00:00:01"));

        let dot = render_outcome(&outcome, OutputFormat::Dot).unwrap();
        assert!(dot.starts_with("graph network {"));

        let summary = render_outcome(&outcome, OutputFormat::Summary).unwrap();
        assert!(summary.contains("Leaking Switches: None"));
    }

    #[test]
    fn leaks_csv_lists_each_leak_event() {
        let topology = Topology {
            switches: vec!["SW1".into(), "SW2".into()],
            links: vec![LinkEntry::new("SW1", 1, "SW2", 1)],
        };
        let mac = "aa:aa:aa:aa:aa:aa";
        let observations = vec![
            Observation {
                switch: "SW1".into(),
                port: PortId::Numeric(1),
                vlan: VlanId::new(10).unwrap(),
                mac: mac.parse().unwrap(),
            },
            Observation {
                switch: "SW2".into(),
                port: PortId::Numeric(7),
                vlan: VlanId::new(99).unwrap(),
                mac: mac.parse().unwrap(),
            },
        ];
        let outcome = analyze_inputs(topology, observations);

        let csv = render_outcome(&outcome, OutputFormat::LeaksCsv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "MAC Address,Switch,Port,VLAN,Remote Switch,Remote Port");
        assert_eq!(lines[1], "aa:aa:aa:aa:aa:aa,SW1,1,10,SW2,1");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn validate_missing_topology_fails_with_context() {
        let err = validate_topology(Path::new("/nonexistent/vlan-mapper/topology.yaml"))
            .expect_err("missing topology should fail");
        assert!(format!("{:#}", err).contains("Failed to load topology"));
    }
}
