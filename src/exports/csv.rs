//! CSV export functionality
//!
//! Export device locations and leak events to CSV format

use crate::detection::DetectionReport;
use crate::network::lookup_vendor;
use anyhow::Result;
use csv::Writer;

/// Export device locations, one row per retained sighting
pub fn export_device_locations_csv(report: &DetectionReport) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    writer.write_record([
        "MAC Address",
        "Vendor",
        "Switch",
        "Port",
        "VLAN",
        "Multi-VLAN",
        "Switch Leaking",
    ])?;

    for (mac, location) in &report.device_locations {
        let vendor = lookup_vendor(mac).unwrap_or_else(|| "Unknown".to_string());
        let multi_vlan = location.is_multi_vlan().to_string();
        for sighting in location.sightings() {
            writer.write_record([
                mac.to_string().as_str(),
                &vendor,
                &sighting.switch,
                &sighting.port.to_string(),
                &sighting.vlan.to_string(),
                &multi_vlan,
                &report.is_leaking(&sighting.switch).to_string(),
            ])?;
        }
    }

    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}

/// Export leak events, one row per trunk sighting with an inconsistent VLAN
pub fn export_leak_events_csv(report: &DetectionReport) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    writer.write_record([
        "MAC Address",
        "Switch",
        "Port",
        "VLAN",
        "Remote Switch",
        "Remote Port",
    ])?;

    for event in &report.leak_events {
        writer.write_record([
            event.mac.to_string().as_str(),
            &event.switch,
            &event.port.to_string(),
            &event.vlan.to_string(),
            &event.remote.switch,
            &event.remote.port.to_string(),
        ])?;
    }

    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::detect;
    use crate::models::{LinkEntry, MacObservations, Sighting, Topology, VlanId};
    use crate::topology::ConnectionIndex;

    fn report() -> DetectionReport {
        let index = ConnectionIndex::build(&Topology {
            switches: vec!["SW1".into(), "SW2".into()],
            links: vec![LinkEntry::new("SW1", 1, "SW2", 1)],
        });
        let mut observations = MacObservations::new();
        observations.insert(
            "aa:aa:aa:aa:aa:aa".parse().unwrap(),
            vec![
                Sighting::new("SW1", 1, VlanId::new(10).unwrap()),
                Sighting::new("SW2", "Po2", VlanId::new(99).unwrap()),
            ],
        );
        detect(&observations, &index)
    }

    #[test]
    fn test_export_device_locations_csv() {
        let csv = export_device_locations_csv(&report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("MAC Address,Vendor,Switch"));
        assert_eq!(lines[1], "aa:aa:aa:aa:aa:aa,Unknown,SW2,Po2,99,false,false");
    }

    #[test]
    fn test_export_leak_events_csv() {
        let csv = export_leak_events_csv(&report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "aa:aa:aa:aa:aa:aa,SW1,1,10,SW2,1");
    }
}
