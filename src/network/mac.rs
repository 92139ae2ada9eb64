//! MAC address parsing and normalisation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LineError;

/// A 48-bit MAC address
///
/// Accepts `aa:bb:cc:dd:ee:ff`, `AA-BB-CC-DD-EE-FF` and Cisco-style
/// `aabb.ccdd.eeff`. Always displayed as lowercase, colon separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Bit 1 of the first octet set means locally administered
    /// (randomized or virtual interface).
    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl FromStr for MacAddress {
    type Err = LineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || LineError::InvalidMac(trimmed.to_string());

        let groups: Vec<&str> = trimmed.split([':', '-', '.']).collect();
        let well_formed = match groups.len() {
            6 => groups.iter().all(|g| g.len() == 2),
            3 => groups.iter().all(|g| g.len() == 4),
            1 => groups[0].len() == 12,
            _ => false,
        };
        if !well_formed {
            return Err(invalid());
        }

        let hex: String = groups.concat();
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = LineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_notations_to_same_address() {
        let colon: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        let dash: MacAddress = "aa-bb-cc-dd-ee-ff".parse().unwrap();
        let dotted: MacAddress = "aabb.ccdd.eeff".parse().unwrap();

        assert_eq!(colon, dash);
        assert_eq!(colon, dotted);
        assert_eq!(colon.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "aa:bb:cc", "aa:bb:cc:dd:ee:gg", "aab:bcc:dde:eff", "Po1"] {
            assert!(raw.parse::<MacAddress>().is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn locally_administered_bit() {
        assert!("5a:05:d7:51:07:81"
            .parse::<MacAddress>()
            .unwrap()
            .is_locally_administered());
        assert!(!"00:1c:b3:00:00:00"
            .parse::<MacAddress>()
            .unwrap()
            .is_locally_administered());
    }

    #[test]
    fn serializes_as_normalized_string() {
        let mac: MacAddress = "AABB.CCDD.EEFF".parse().unwrap();
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"aa:bb:cc:dd:ee:ff\"");

        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
