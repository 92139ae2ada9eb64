//! Trunk endpoint lookup built from the declared topology
//!
//! Every accepted link is stored in both directions, so a lookup from either
//! end returns the other one.

use std::collections::BTreeMap;

use crate::error::LinkError;
use crate::models::{Diagnostic, Endpoint, LinkEntry, PortId, PortValue, Topology};

/// Diagnostic source name for link validation problems
pub const TOPOLOGY_SOURCE: &str = "topology";

/// Symmetric `(switch, port) -> remote endpoint` map. Read-only after build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionIndex {
    by_switch: BTreeMap<String, BTreeMap<u32, Endpoint>>,
}

impl ConnectionIndex {
    /// Build the index, logging and skipping malformed links
    pub fn build(topology: &Topology) -> Self {
        Self::build_with_diagnostics(topology).0
    }

    /// Build the index and return the skipped links as diagnostics
    pub fn build_with_diagnostics(topology: &Topology) -> (Self, Vec<Diagnostic>) {
        let mut index = Self::default();
        let mut diagnostics = Vec::new();

        for (position, link) in topology.links.iter().enumerate() {
            let result = validate_link(link).and_then(|(a, b)| index.insert(a, b));
            if let Err(e) = result {
                crate::log_warn!(
                    "Skipping invalid link entry #{}: {:?}. Error: {}",
                    position + 1,
                    link,
                    e
                );
                diagnostics.push(Diagnostic::new(
                    TOPOLOGY_SOURCE,
                    format!("link #{}: {}", position + 1, e),
                ));
            }
        }

        crate::log_debug!(
            "Connection index built: {} trunk endpoints, {} links skipped",
            index.len(),
            diagnostics.len()
        );

        (index, diagnostics)
    }

    fn insert(&mut self, a: Endpoint, b: Endpoint) -> Result<(), LinkError> {
        for (local, remote) in [(&a, &b), (&b, &a)] {
            if let Some(existing) = self.lookup(&local.switch, local.port) {
                if existing != remote {
                    return Err(LinkError::ConflictingEndpoint {
                        endpoint: local.to_string(),
                        existing: existing.to_string(),
                    });
                }
            }
        }

        self.by_switch
            .entry(a.switch.clone())
            .or_default()
            .insert(a.port, b.clone());
        self.by_switch.entry(b.switch.clone()).or_default().insert(b.port, a);
        Ok(())
    }

    /// Remote end of the link on `(switch, port)`, if that port is a trunk
    pub fn lookup(&self, switch: &str, port: u32) -> Option<&Endpoint> {
        self.by_switch.get(switch)?.get(&port)
    }

    /// Like [`lookup`](Self::lookup); opaque port tokens never match.
    pub fn lookup_port(&self, switch: &str, port: &PortId) -> Option<&Endpoint> {
        port.as_number().and_then(|n| self.lookup(switch, n))
    }

    pub fn is_trunk(&self, switch: &str, port: &PortId) -> bool {
        self.lookup_port(switch, port).is_some()
    }

    /// Number of trunk endpoints (twice the number of links, minus self-loops)
    pub fn len(&self) -> usize {
        self.by_switch.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_switch.is_empty()
    }

    /// Each accepted link once, as `(lower endpoint, higher endpoint)`
    pub fn links(&self) -> Vec<(Endpoint, Endpoint)> {
        let mut links = Vec::new();
        for (switch, ports) in &self.by_switch {
            for (port, remote) in ports {
                let local = Endpoint::new(switch.clone(), *port);
                if local <= *remote {
                    links.push((local, remote.clone()));
                }
            }
        }
        links
    }
}

fn validate_link(link: &LinkEntry) -> Result<(Endpoint, Endpoint), LinkError> {
    if let Some(reason) = &link.malformed {
        return Err(LinkError::Malformed(reason.clone()));
    }
    let source = required_name(link.source.as_deref(), "source")?;
    let destination = required_name(link.destination.as_deref(), "destination")?;
    let source_port = required_port(link.source_port.as_ref(), "source_port")?;
    let destination_port = required_port(link.destination_port.as_ref(), "destination_port")?;

    Ok((
        Endpoint::new(source, source_port),
        Endpoint::new(destination, destination_port),
    ))
}

fn required_name<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, LinkError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(LinkError::MissingField(field))
}

fn required_port(value: Option<&PortValue>, field: &'static str) -> Result<u32, LinkError> {
    let value = value.ok_or(LinkError::MissingField(field))?;
    value.as_port_number().ok_or_else(|| LinkError::InvalidPort {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology(links: Vec<LinkEntry>) -> Topology {
        Topology {
            switches: vec!["SW1".into(), "SW2".into(), "SW3".into()],
            links,
        }
    }

    #[test]
    fn lookup_is_symmetric() {
        let index = ConnectionIndex::build(&topology(vec![
            LinkEntry::new("SW1", 1, "SW2", 1),
            LinkEntry::new("SW2", 24, "SW3", 48),
        ]));

        assert_eq!(index.lookup("SW1", 1), Some(&Endpoint::new("SW2", 1)));
        assert_eq!(index.lookup("SW2", 1), Some(&Endpoint::new("SW1", 1)));
        assert_eq!(index.lookup("SW2", 24), Some(&Endpoint::new("SW3", 48)));
        assert_eq!(index.lookup("SW3", 48), Some(&Endpoint::new("SW2", 24)));
        assert_eq!(index.lookup("SW3", 1), None);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn opaque_ports_never_match() {
        let index = ConnectionIndex::build(&topology(vec![LinkEntry::new("SW1", 1, "SW2", 1)]));
        assert!(index.is_trunk("SW1", &PortId::Numeric(1)));
        assert!(!index.is_trunk("SW1", &PortId::Opaque("Po1".to_string())));
    }

    #[test]
    fn numeric_string_ports_are_accepted() {
        let link = LinkEntry {
            source: Some("SW1".into()),
            destination: Some("SW2".into()),
            source_port: Some(PortValue::Text("3".into())),
            destination_port: Some(PortValue::Number(4)),
            ..LinkEntry::default()
        };
        let (index, diagnostics) = ConnectionIndex::build_with_diagnostics(&topology(vec![link]));
        assert!(diagnostics.is_empty());
        assert_eq!(index.lookup("SW1", 3), Some(&Endpoint::new("SW2", 4)));
    }

    #[test]
    fn malformed_links_are_skipped_not_fatal() {
        let missing_destination = LinkEntry {
            destination: None,
            ..LinkEntry::new("SW1", 2, "SW3", 2)
        };
        let channel_port = LinkEntry {
            source_port: Some(PortValue::Text("Po1".into())),
            ..LinkEntry::new("SW1", 0, "SW3", 9)
        };
        let (index, diagnostics) = ConnectionIndex::build_with_diagnostics(&topology(vec![
            missing_destination,
            LinkEntry::new("SW1", 1, "SW2", 1),
            channel_port,
        ]));

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("link #1"));
        assert!(diagnostics[0].message.contains("destination"));
        assert!(diagnostics[1].message.contains("Po1"));
        assert_eq!(index.links().len(), 1);
        assert!(index.lookup("SW3", 9).is_none());
    }

    #[test]
    fn entries_that_are_not_mappings_become_diagnostics() {
        let topology = crate::topology::parse_topology(
            "links:\n  - source: SW1\n    source_port: 1\n    destination: SW2\n    destination_port: 1\n  - SW1-SW2\n",
        )
        .unwrap()
        .unwrap();

        let (index, diagnostics) = ConnectionIndex::build_with_diagnostics(&topology);

        assert_eq!(index.lookup("SW1", 1), Some(&Endpoint::new("SW2", 1)));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "link #2: not a mapping (string 'SW1-SW2')"
        );
    }

    #[test]
    fn conflicting_link_keeps_first_declaration() {
        let (index, diagnostics) = ConnectionIndex::build_with_diagnostics(&topology(vec![
            LinkEntry::new("SW1", 1, "SW2", 1),
            LinkEntry::new("SW1", 1, "SW3", 5),
        ]));

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("already linked"));
        assert_eq!(index.lookup("SW1", 1), Some(&Endpoint::new("SW2", 1)));
        assert!(index.lookup("SW3", 5).is_none());
    }

    #[test]
    fn duplicate_link_is_harmless() {
        let (index, diagnostics) = ConnectionIndex::build_with_diagnostics(&topology(vec![
            LinkEntry::new("SW1", 1, "SW2", 1),
            LinkEntry::new("SW2", 1, "SW1", 1),
        ]));
        assert!(diagnostics.is_empty());
        assert_eq!(
            index.links(),
            vec![(Endpoint::new("SW1", 1), Endpoint::new("SW2", 1))]
        );
    }

    #[test]
    fn empty_topology_gives_empty_index() {
        let index = ConnectionIndex::build(&Topology::default());
        assert!(index.is_empty());
        assert!(index.links().is_empty());
    }
}
