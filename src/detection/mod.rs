//! VLAN leak detection module
//!
//! Decides, per MAC address, which switch-table sightings are device access
//! ports and which are inter-switch trunk traffic.

pub mod detector;
pub mod types;

pub use detector::{detect, LeakDetector, MacClassification};
pub use types::{
    count_findings_by_kind, has_high_severity_findings, DetectionReport, DeviceLocation, Finding,
    FindingKind, LeakEvent, Severity,
};
