//! Data models shared by the loaders, the detector and the exports

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::LineError;
use crate::network::MacAddress;

/// Declared network topology, as loaded from `topology.yaml`
///
/// Links are kept raw; validation happens when the
/// [`ConnectionIndex`](crate::ConnectionIndex) is built so that one bad link
/// never rejects the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub switches: Vec<SwitchEntry>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

/// A switch declaration: either `- SW1` or `- name: SW1`
///
/// Anything else is kept as `Other` so one odd entry does not reject the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SwitchEntry {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
    },
    Other(serde_yaml::Value),
}

impl SwitchEntry {
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            SwitchEntry::Name(name) => Some(name.as_str()),
            SwitchEntry::Detailed { name } => name.as_deref(),
            SwitchEntry::Other(_) => None,
        };
        name.map(str::trim).filter(|n| !n.is_empty())
    }
}

impl From<&str> for SwitchEntry {
    fn from(name: &str) -> Self {
        SwitchEntry::Detailed {
            name: Some(name.to_string()),
        }
    }
}

/// One inter-switch link as written in the topology file
///
/// Deserialization never fails: an entry that is not a usable mapping keeps
/// the reason in `malformed` and is reported when the index is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub struct LinkEntry {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub source_port: Option<PortValue>,
    pub destination_port: Option<PortValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
}

impl LinkEntry {
    pub fn new(source: &str, source_port: u32, destination: &str, destination_port: u32) -> Self {
        Self {
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            source_port: Some(PortValue::Number(i64::from(source_port))),
            destination_port: Some(PortValue::Number(i64::from(destination_port))),
            malformed: None,
        }
    }

    fn malformed(reason: String) -> Self {
        Self {
            malformed: Some(reason),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct LinkFields {
    #[serde(default, alias = "src_switch")]
    source: Option<String>,
    #[serde(default, alias = "dst_switch")]
    destination: Option<String>,
    #[serde(default, alias = "src_port")]
    source_port: Option<PortValue>,
    #[serde(default, alias = "dst_port")]
    destination_port: Option<PortValue>,
}

impl From<serde_yaml::Value> for LinkEntry {
    fn from(value: serde_yaml::Value) -> Self {
        if !value.is_mapping() {
            return LinkEntry::malformed(format!("not a mapping ({})", describe_value(&value)));
        }
        match serde_yaml::from_value::<LinkFields>(value) {
            Ok(fields) => LinkEntry {
                source: fields.source,
                destination: fields.destination,
                source_port: fields.source_port,
                destination_port: fields.destination_port,
                malformed: None,
            },
            Err(e) => LinkEntry::malformed(format!("unreadable fields: {e}")),
        }
    }
}

fn describe_value(value: &serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match value {
        Value::Null => "empty entry".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string '{s}'"),
        Value::Sequence(items) => format!("list of {} items", items.len()),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}

/// A port value exactly as YAML gave it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
    Other(serde_yaml::Value),
}

impl PortValue {
    /// Trunk ports must be non-negative integers; numeric strings count.
    pub fn as_port_number(&self) -> Option<u32> {
        match self {
            PortValue::Number(n) => u32::try_from(*n).ok(),
            PortValue::Text(s) => s.trim().parse::<u32>().ok(),
            PortValue::Other(_) => None,
        }
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortValue::Number(n) => write!(f, "{n}"),
            PortValue::Text(s) => f.write_str(s),
            PortValue::Other(v) => match serde_yaml::to_string(v) {
                Ok(s) => f.write_str(s.trim()),
                Err(_) => f.write_str("<unprintable>"),
            },
        }
    }
}

/// Port identifier as seen in a MAC table
///
/// Aggregated links (`Po1`, `ae0`, ...) are opaque tokens and never take part
/// in trunk matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortId {
    Numeric(u32),
    Opaque(String),
}

impl PortId {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u32>() {
            Ok(n) => PortId::Numeric(n),
            Err(_) => PortId::Opaque(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            PortId::Numeric(n) => Some(*n),
            PortId::Opaque(_) => None,
        }
    }
}

impl From<u32> for PortId {
    fn from(n: u32) -> Self {
        PortId::Numeric(n)
    }
}

impl From<&str> for PortId {
    fn from(raw: &str) -> Self {
        PortId::parse(raw)
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortId::Numeric(n) => write!(f, "{n}"),
            PortId::Opaque(s) => f.write_str(s),
        }
    }
}

/// Highest 802.1Q VLAN id
pub const MAX_VLAN_ID: u16 = 4095;

/// 802.1Q VLAN id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VlanId(u16);

impl VlanId {
    pub fn new(id: u16) -> Option<Self> {
        (id <= MAX_VLAN_ID).then_some(Self(id))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl FromStr for VlanId {
    type Err = LineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        trimmed
            .parse::<u16>()
            .ok()
            .and_then(VlanId::new)
            .ok_or_else(|| LineError::InvalidVlan(trimmed.to_string()))
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One end of a declared inter-switch link
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Endpoint {
    pub switch: String,
    pub port: u32,
}

impl Endpoint {
    pub fn new(switch: impl Into<String>, port: u32) -> Self {
        Self {
            switch: switch.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.switch, self.port)
    }
}

/// One raw MAC-table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub switch: String,
    pub port: PortId,
    pub vlan: VlanId,
    pub mac: MacAddress,
}

impl Observation {
    pub fn sighting(&self) -> Sighting {
        Sighting {
            switch: self.switch.clone(),
            port: self.port.clone(),
            vlan: self.vlan,
        }
    }
}

/// Where a MAC was seen: `(switch, port, vlan)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sighting {
    pub switch: String,
    pub port: PortId,
    pub vlan: VlanId,
}

impl Sighting {
    pub fn new(switch: impl Into<String>, port: impl Into<PortId>, vlan: VlanId) -> Self {
        Self {
            switch: switch.into(),
            port: port.into(),
            vlan,
        }
    }
}

impl fmt::Display for Sighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, VLAN {})", self.switch, self.port, self.vlan)
    }
}

/// All sightings per MAC, in the order they were read
pub type MacObservations = BTreeMap<MacAddress, Vec<Sighting>>;

/// Group flat observations by MAC address, keeping per-MAC order
pub fn group_by_mac(observations: &[Observation]) -> MacObservations {
    let mut grouped = MacObservations::new();
    for observation in observations {
        grouped
            .entry(observation.mac)
            .or_default()
            .push(observation.sighting());
    }
    grouped
}

/// A skipped input record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// File name, or `topology` for index validation
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.source, line, self.message),
            None => write!(f, "{}: {}", self.source, self.message),
        }
    }
}
