//! VLAN mapper CLI
//!
//! Reads a switch topology and per-switch MAC tables, then reports where
//! each device is attached and which switches leak VLANs onto trunks.

/// Logs an error message to stderr
macro_rules! log_error {
    ($($arg:tt)*) => {
        vlan_mapper::log_error!($($arg)*);
    };
}

fn main() {
    if let Err(e) = vlan_mapper::logging::init_logging() {
        eprintln!("[WARN] Failed to initialize structured logging: {}", e);
    }

    match vlan_mapper::app::run(std::env::args()) {
        Ok(()) => {}
        Err(e) => {
            log_error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
