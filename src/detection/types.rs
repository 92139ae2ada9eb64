//! Detection result types
//!
//! Defines device locations, leak events and finding categories

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Endpoint, PortId, Sighting, VlanId};
use crate::network::MacAddress;

/// Finding severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

/// Kinds of findings the detector reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    /// MAC seen with differing VLANs, one sighting on a trunk port
    VlanLeak,
    /// Retained access-port sightings span more than one VLAN
    MultiVlanAccess,
    /// Every sighting was trunk traffic; attachment point unknown
    UnresolvedLocation,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::VlanLeak => "VLAN_LEAK",
            FindingKind::MultiVlanAccess => "MULTI_VLAN_ACCESS",
            FindingKind::UnresolvedLocation => "UNRESOLVED_LOCATION",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::VlanLeak => Severity::High,
            FindingKind::MultiVlanAccess => Severity::Medium,
            FindingKind::UnresolvedLocation => Severity::Low,
        }
    }
}

/// A reportable observation about one MAC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub mac: MacAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn new(kind: FindingKind, mac: MacAddress, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            mac,
            switch: None,
            message: message.into(),
        }
    }

    pub fn with_switch(mut self, switch: impl Into<String>) -> Self {
        self.switch = Some(switch.into());
        self
    }
}

/// A MAC seen on a trunk port while its sightings disagree on VLAN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeakEvent {
    pub mac: MacAddress,
    pub switch: String,
    pub port: u32,
    pub vlan: VlanId,
    /// Far end of the trunk the MAC was seen on
    pub remote: Endpoint,
}

/// Access-port sightings judged to be a device's own attachment points
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeviceLocation {
    sightings: Vec<Sighting>,
}

impl DeviceLocation {
    /// Keeps first-seen order and drops exact duplicates
    pub fn from_sightings(sightings: impl IntoIterator<Item = Sighting>) -> Self {
        let mut seen = BTreeSet::new();
        let mut location = Self::default();
        for sighting in sightings {
            if seen.insert(sighting.clone()) {
                location.sightings.push(sighting);
            }
        }
        location
    }

    pub fn sightings(&self) -> &[Sighting] {
        &self.sightings
    }

    pub fn contains(&self, switch: &str, port: &PortId, vlan: VlanId) -> bool {
        self.sightings
            .iter()
            .any(|s| s.switch == switch && &s.port == port && s.vlan == vlan)
    }

    pub fn vlans(&self) -> BTreeSet<VlanId> {
        self.sightings.iter().map(|s| s.vlan).collect()
    }

    pub fn is_multi_vlan(&self) -> bool {
        self.vlans().len() > 1
    }

    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }
}

/// Output of one detection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectionReport {
    pub device_locations: BTreeMap<MacAddress, DeviceLocation>,
    /// Switches carrying cross-VLAN traffic for a MAC over a trunk port
    pub leaking_switches: BTreeSet<String>,
    /// MACs that were observed but whose sightings were all trunk traffic
    pub unresolved_macs: BTreeSet<MacAddress>,
    pub leak_events: Vec<LeakEvent>,
    pub findings: Vec<Finding>,
}

impl DetectionReport {
    pub fn has_leaks(&self) -> bool {
        !self.leaking_switches.is_empty()
    }

    pub fn is_leaking(&self, switch: &str) -> bool {
        self.leaking_switches.contains(switch)
    }

    /// Every distinct VLAN on a retained sighting
    pub fn device_vlans(&self) -> BTreeSet<VlanId> {
        self.device_locations
            .values()
            .flat_map(|location| location.vlans())
            .collect()
    }
}

/// Count findings by kind
pub fn count_findings_by_kind(findings: &[Finding]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.kind.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Quick check if any finding is high severity
pub fn has_high_severity_findings(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::High)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlan(id: u16) -> VlanId {
        VlanId::new(id).unwrap()
    }

    #[test]
    fn device_location_dedupes_in_order() {
        let location = DeviceLocation::from_sightings([
            Sighting::new("SW2", 7, vlan(99)),
            Sighting::new("SW1", 3, vlan(10)),
            Sighting::new("SW2", 7, vlan(99)),
        ]);
        assert_eq!(location.len(), 2);
        assert_eq!(location.sightings()[0].switch, "SW2");
        assert!(location.is_multi_vlan());
        assert!(location.contains("SW1", &PortId::Numeric(3), vlan(10)));
    }

    #[test]
    fn finding_takes_kind_severity() {
        let mac: MacAddress = "aa:aa:aa:aa:aa:aa".parse().unwrap();
        let finding = Finding::new(FindingKind::VlanLeak, mac, "leak").with_switch("SW1");
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.switch.as_deref(), Some("SW1"));

        let findings = vec![
            finding,
            Finding::new(FindingKind::UnresolvedLocation, mac, "unresolved"),
            Finding::new(FindingKind::VlanLeak, mac, "leak again"),
        ];
        let counts = count_findings_by_kind(&findings);
        assert_eq!(counts["VLAN_LEAK"], 2);
        assert_eq!(counts["UNRESOLVED_LOCATION"], 1);
        assert!(has_high_severity_findings(&findings));
    }

    #[test]
    fn large_sighting_lists_dedupe_to_distinct_entries() {
        let sightings = (0..5_000u32).map(|i| Sighting::new("SW1", i % 50, vlan(10)));
        let location = DeviceLocation::from_sightings(sightings);
        assert_eq!(location.len(), 50);
        assert_eq!(location.sightings()[49], Sighting::new("SW1", 49, vlan(10)));
    }

    #[test]
    fn serialized_names_match_display_names() {
        for kind in [
            FindingKind::VlanLeak,
            FindingKind::MultiVlanAccess,
            FindingKind::UnresolvedLocation,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
            assert_eq!(
                serde_json::to_value(kind.severity()).unwrap(),
                kind.severity().as_str()
            );
        }
        let parsed: FindingKind = serde_json::from_str("\"MULTI_VLAN_ACCESS\"").unwrap();
        assert_eq!(parsed, FindingKind::MultiVlanAccess);
    }
}
