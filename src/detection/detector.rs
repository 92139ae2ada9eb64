//! VLAN leak detection and device location inference
//!
//! Each MAC is classified on its own: sightings on declared trunk ports are
//! dropped as inter-switch traffic, the rest are the device's access ports.
//! A trunk sighting of a MAC whose sightings disagree on VLAN marks that
//! switch as leaking.

use std::collections::BTreeSet;

use super::types::{DetectionReport, DeviceLocation, Finding, FindingKind, LeakEvent};
use crate::models::{MacObservations, PortId, Sighting};
use crate::network::MacAddress;
use crate::topology::ConnectionIndex;

/// Outcome of classifying the sightings of a single MAC
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacClassification {
    /// Access-port sightings, in observation order
    pub retained: Vec<Sighting>,
    /// Trunk sightings that carried an inconsistent VLAN
    pub leaks: Vec<LeakEvent>,
    /// Trunk sightings dropped as consistent-VLAN propagation
    pub propagated: usize,
}

/// Classifies MAC sightings against a trunk index
#[derive(Debug, Clone, Copy)]
pub struct LeakDetector<'a> {
    index: &'a ConnectionIndex,
}

impl<'a> LeakDetector<'a> {
    pub fn new(index: &'a ConnectionIndex) -> Self {
        Self { index }
    }

    /// Classify every MAC and collect locations, leaking switches and findings
    pub fn detect(&self, observations: &MacObservations) -> DetectionReport {
        let mut report = DetectionReport::default();

        for (mac, sightings) in observations {
            let Some(classification) = self.classify_mac(*mac, sightings) else {
                continue;
            };
            record(&mut report, *mac, classification);
        }

        report
    }

    /// Classify one MAC's sightings. `None` when there are none.
    ///
    /// A single sighting is always an access port, even on a trunk endpoint:
    /// one sighting cannot show a leak.
    pub fn classify_mac(&self, mac: MacAddress, sightings: &[Sighting]) -> Option<MacClassification> {
        match sightings {
            [] => None,
            [only] => {
                crate::log_debug!(
                    "MAC {} seen in a single location. Treating as access port: {}",
                    mac,
                    only
                );
                Some(MacClassification {
                    retained: vec![only.clone()],
                    ..MacClassification::default()
                })
            }
            [first, rest @ ..] => {
                let same_vlan = rest.iter().all(|s| s.vlan == first.vlan);
                if same_vlan {
                    crate::log_debug!("MAC {}: all locations have the same VLAN: {}", mac, first.vlan);
                } else {
                    crate::log_stderr!(
                        "MAC {}: VLANs are NOT same: {:?}",
                        mac,
                        sightings.iter().map(|s| s.vlan.get()).collect::<Vec<_>>()
                    );
                }
                Some(self.filter_trunk_sightings(mac, sightings, same_vlan))
            }
        }
    }

    // Leak marking and retention happen in this single pass.
    fn filter_trunk_sightings(
        &self,
        mac: MacAddress,
        sightings: &[Sighting],
        same_vlan: bool,
    ) -> MacClassification {
        let mut classification = MacClassification::default();

        for sighting in sightings {
            let port = match &sighting.port {
                PortId::Numeric(port) => *port,
                PortId::Opaque(token) => {
                    crate::log_debug!(
                        "  Port '{}' on switch '{}' is non-numeric. Assuming access port.",
                        token,
                        sighting.switch
                    );
                    classification.retained.push(sighting.clone());
                    continue;
                }
            };

            let Some(remote) = self.index.lookup(&sighting.switch, port) else {
                crate::log_debug!("  ({}, {}) is an access port.", sighting.switch, port);
                classification.retained.push(sighting.clone());
                continue;
            };

            if same_vlan {
                crate::log_debug!(
                    "  ({}, {}) is inter-switch (to {}). Ignoring for device location.",
                    sighting.switch,
                    port,
                    remote
                );
                classification.propagated += 1;
            } else {
                crate::log_stderr!(
                    "  VLAN leak detected: MAC {} (VLAN {}) on inter-switch link ({}, {}). Switch '{}' marked as leaking.",
                    mac,
                    sighting.vlan,
                    sighting.switch,
                    port,
                    sighting.switch
                );
                classification.leaks.push(LeakEvent {
                    mac,
                    switch: sighting.switch.clone(),
                    port,
                    vlan: sighting.vlan,
                    remote: remote.clone(),
                });
            }
        }

        classification
    }
}

fn record(report: &mut DetectionReport, mac: MacAddress, classification: MacClassification) {
    for leak in classification.leaks {
        report.leaking_switches.insert(leak.switch.clone());
        report.findings.push(
            Finding::new(
                FindingKind::VlanLeak,
                mac,
                format!(
                    "MAC {} seen with VLAN {} on inter-switch port {}:{} (link to {})",
                    mac, leak.vlan, leak.switch, leak.port, leak.remote
                ),
            )
            .with_switch(&leak.switch),
        );
        report.leak_events.push(leak);
    }

    if classification.retained.is_empty() {
        crate::log_debug!(
            "MAC {}: all observed locations were filtered out (all were inter-switch links).",
            mac
        );
        report.unresolved_macs.insert(mac);
        report.findings.push(Finding::new(
            FindingKind::UnresolvedLocation,
            mac,
            format!("MAC {mac} was only seen on inter-switch links; attachment point unknown"),
        ));
        return;
    }

    let location = DeviceLocation::from_sightings(classification.retained);
    if location.is_multi_vlan() {
        let vlans: BTreeSet<u16> = location.vlans().into_iter().map(|v| v.get()).collect();
        let places: Vec<String> = location.sightings().iter().map(ToString::to_string).collect();
        crate::log_warn!(
            "MAC {}: after filtering, device appears on access ports with multiple VLANs: {:?}. Locations: {}",
            mac,
            vlans,
            places.join(", ")
        );
        report.findings.push(Finding::new(
            FindingKind::MultiVlanAccess,
            mac,
            format!(
                "MAC {} is on access ports in VLANs {:?}: {}",
                mac,
                vlans,
                places.join(", ")
            ),
        ));
    }
    report.device_locations.insert(mac, location);
}

/// Run leak detection over grouped observations
pub fn detect(observations: &MacObservations, index: &ConnectionIndex) -> DetectionReport {
    LeakDetector::new(index).detect(observations)
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod detector_tests;
