//! Network module - MAC address handling and vendor lookup

mod mac;
mod vendor;

pub use mac::MacAddress;
pub use vendor::{lookup_vendor, lookup_vendor_info, VendorInfo};
