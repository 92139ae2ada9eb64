//! MAC Address Vendor Lookup using OUI Database
//!
//! Labels device nodes and exported locations with the manufacturer name.

use mac_oui::Oui;
use serde::Serialize;
use std::sync::OnceLock;

use super::mac::MacAddress;

/// Global OUI database instance (loaded once)
static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB.get_or_init(|| Oui::default().ok()).as_ref()
}

/// Vendor lookup result with randomization detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_randomized: bool,
}

/// Look up the manufacturer for a MAC address
///
/// Locally administered addresses are never looked up; they carry no OUI.
pub fn lookup_vendor_info(mac: &MacAddress) -> VendorInfo {
    if mac.is_locally_administered() {
        return VendorInfo {
            vendor: None,
            is_randomized: true,
        };
    }

    let vendor = get_oui_db()
        .and_then(|db| db.lookup_by_mac(&mac.to_string()).ok().flatten())
        .map(|entry| entry.company_name.clone());

    VendorInfo {
        vendor,
        is_randomized: false,
    }
}

pub fn lookup_vendor(mac: &MacAddress) -> Option<String> {
    lookup_vendor_info(mac).vendor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn randomized_macs_skip_oui_lookup() {
        let mac: MacAddress = "de:b2:52:65:8c:55".parse().unwrap();
        let info = lookup_vendor_info(&mac);
        assert!(info.is_randomized);
        assert!(info.vendor.is_none());
    }

    #[test]
    fn registered_oui_resolves_to_a_vendor() {
        let mac: MacAddress = "00:1C:B3:00:00:00".parse().unwrap();
        let info = lookup_vendor_info(&mac);
        assert!(!info.is_randomized);
        assert!(info.vendor.is_some());
        assert_eq!(lookup_vendor(&mac), info.vendor);
    }
}
