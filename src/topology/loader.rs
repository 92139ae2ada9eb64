//! Topology file loading
//!
//! ```yaml
//! switches:
//!   - name: SW1
//!   - name: SW2
//! links:
//!   - source: SW1
//!     source_port: 1
//!     destination: SW2
//!     destination_port: 1
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::SourceError;
use crate::models::{Diagnostic, SwitchEntry, Topology};

use super::connections::TOPOLOGY_SOURCE;

/// Load and deserialize a topology file
pub fn load_topology(path: impl AsRef<Path>) -> Result<Topology, SourceError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SourceError::TopologyNotFound(path.to_path_buf()),
        _ => SourceError::io(path, e),
    })?;

    let topology = parse_topology(&content).map_err(|source| SourceError::TopologyParse {
        path: path.to_path_buf(),
        source,
    })?;

    topology.ok_or_else(|| SourceError::TopologyEmpty(path.to_path_buf()))
}

/// Parse topology YAML. `Ok(None)` for an empty or null document.
pub fn parse_topology(content: &str) -> Result<Option<Topology>, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str::<Option<Topology>>(content)
}

impl Topology {
    /// Declared switch names, in file order, without unnamed entries
    pub fn switch_names(&self) -> Vec<&str> {
        self.switches.iter().filter_map(|s| s.name()).collect()
    }

    /// Structural checks that do not affect trunk detection
    ///
    /// Reports unnamed switch entries and links that mention switches missing
    /// from the `switches` list.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (position, switch) in self.switches.iter().enumerate() {
            let problem = match switch {
                SwitchEntry::Other(_) => "skipping entry that is not a name or mapping",
                _ if switch.name().is_none() => "skipping switch with no name",
                _ => continue,
            };
            diagnostics.push(Diagnostic::new(
                TOPOLOGY_SOURCE,
                format!("switch #{}: {}", position + 1, problem),
            ));
        }

        let declared: BTreeSet<&str> = self.switch_names().into_iter().collect();
        for (position, link) in self.links.iter().enumerate() {
            for name in [link.source.as_deref(), link.destination.as_deref()]
                .into_iter()
                .flatten()
                .map(str::trim)
            {
                if !name.is_empty() && !declared.contains(name) {
                    diagnostics.push(Diagnostic::new(
                        TOPOLOGY_SOURCE,
                        format!(
                            "link #{}: switch '{}' is not declared in the switch list",
                            position + 1,
                            name
                        ),
                    ));
                }
            }
        }

        for diagnostic in &diagnostics {
            crate::log_warn!("{}", diagnostic);
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkEntry, PortValue};

    const TOPOLOGY: &str = r#"
switches:
  - name: SW1
  - name: SW2
  - SW3
links:
  - source: SW1
    source_port: 1
    destination: SW2
    destination_port: 1
  - src_switch: SW2
    src_port: "2"
    dst_switch: SW3
    dst_port: 1
"#;

    #[test]
    fn parses_both_link_spellings() {
        let topology = parse_topology(TOPOLOGY).unwrap().unwrap();
        assert_eq!(topology.switch_names(), vec!["SW1", "SW2", "SW3"]);
        assert_eq!(topology.links.len(), 2);
        assert_eq!(topology.links[0], LinkEntry::new("SW1", 1, "SW2", 1));
        assert_eq!(
            topology.links[1].source_port,
            Some(PortValue::Text("2".to_string()))
        );
        assert_eq!(topology.links[1].destination.as_deref(), Some("SW3"));
    }

    #[test]
    fn empty_document_is_none() {
        assert!(parse_topology("").unwrap().is_none());
        assert!(parse_topology("   \n").unwrap().is_none());
        assert!(parse_topology("~").unwrap().is_none());
    }

    #[test]
    fn odd_port_values_do_not_fail_the_document() {
        let topology = parse_topology(
            "links:\n  - source: SW1\n    source_port: 1.5\n    destination: SW2\n    destination_port: [1]\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(topology.links.len(), 1);
        assert_eq!(topology.links[0].source_port.as_ref().and_then(PortValue::as_port_number), None);
    }

    #[test]
    fn string_link_entry_does_not_reject_the_document() {
        let topology = parse_topology(
            "switches:\n  - SW1\n  - SW2\n  - true\nlinks:\n  - source: SW1\n    source_port: 1\n    destination: SW2\n    destination_port: 1\n  - SW1-SW2\n",
        )
        .unwrap()
        .unwrap();

        assert_eq!(topology.switch_names(), vec!["SW1", "SW2"]);
        assert_eq!(topology.links.len(), 2);
        assert_eq!(topology.links[0], LinkEntry::new("SW1", 1, "SW2", 1));
        assert!(topology.links[1].malformed.is_some());

        let diagnostics = topology.validate();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("switch #3"));
        assert!(diagnostics[0].message.contains("not a name or mapping"));
    }

    #[test]
    fn validate_reports_unknown_and_unnamed_switches() {
        let topology = parse_topology(
            "switches:\n  - name: SW1\n  - model: x\nlinks:\n  - source: SW1\n    source_port: 1\n    destination: SW9\n    destination_port: 1\n",
        )
        .unwrap()
        .unwrap();
        let diagnostics = topology.validate();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("no name"));
        assert!(diagnostics[1].message.contains("SW9"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_topology("/nonexistent/vlan-mapper/topology.yaml").unwrap_err();
        assert!(matches!(err, SourceError::TopologyNotFound(_)));
    }
}
