//! MAC address table dump parsing
//!
//! One file per switch, named after the switch (`SW1.txt`). Entries look like
//!
//! ```text
//! aa:bb:cc:dd:ee:ff (port: 5) VLAN: 10
//! 11:22:33:44:55:66 (port: Po1) VLAN: 20
//! ```
//!
//! Everything else in the file (headers, separators) is ignored.

use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{LineError, SourceError};
use crate::models::{Diagnostic, Observation, PortId, VlanId};
use crate::network::MacAddress;

const PORT_MARKER: &str = "(port:";
const VLAN_MARKER: &str = "VLAN:";

static PORT_RE: OnceLock<Regex> = OnceLock::new();
static VLAN_RE: OnceLock<Regex> = OnceLock::new();

fn port_re() -> &'static Regex {
    PORT_RE.get_or_init(|| Regex::new(r"\(port:\s*([^)\s]+)\s*\)?").expect("static regex"))
}

fn vlan_re() -> &'static Regex {
    VLAN_RE.get_or_init(|| Regex::new(r"VLAN:\s*(\S+)").expect("static regex"))
}

/// One parsed table row, before the switch name is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacEntry {
    pub mac: MacAddress,
    pub port: PortId,
    pub vlan: VlanId,
}

/// Parse a single line. `Ok(None)` when the line is not a table entry.
pub fn parse_mac_table_line(line: &str) -> Result<Option<MacEntry>, LineError> {
    if !(line.contains(PORT_MARKER) && line.contains(VLAN_MARKER)) {
        return Ok(None);
    }

    let first = line.split_whitespace().next().unwrap_or_default();
    let mac: MacAddress = first.parse()?;

    let port = port_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| PortId::parse(m.as_str()))
        .ok_or(LineError::MissingPort)?;

    let vlan: VlanId = vlan_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .ok_or(LineError::MissingVlan)?
        .as_str()
        .parse()?;

    Ok(Some(MacEntry { mac, port, vlan }))
}

/// Parse a whole table for one switch
///
/// Malformed entries become diagnostics; the remaining lines are still read.
pub fn parse_mac_table(
    switch: &str,
    source: &str,
    content: &str,
) -> (Vec<Observation>, Vec<Diagnostic>) {
    let mut observations = Vec::new();
    let mut diagnostics = Vec::new();

    for (number, line) in content.lines().enumerate() {
        match parse_mac_table_line(line) {
            Ok(Some(entry)) => observations.push(Observation {
                switch: switch.to_string(),
                port: entry.port,
                vlan: entry.vlan,
                mac: entry.mac,
            }),
            Ok(None) => {}
            Err(e) => {
                crate::log_warn!("Malformed line in '{}': {} ({})", source, line.trim(), e);
                diagnostics.push(
                    Diagnostic::new(source, format!("{}: {}", e, line.trim())).at_line(number + 1),
                );
            }
        }
    }

    (observations, diagnostics)
}

/// Parse a raw table dump that may not be valid UTF-8
///
/// Invalid bytes (a Latin-1 banner, say) are replaced line by line instead of
/// rejecting the file; entries themselves are ASCII.
pub fn parse_mac_table_bytes(
    switch: &str,
    source: &str,
    bytes: &[u8],
) -> (Vec<Observation>, Vec<Diagnostic>) {
    let content = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = content {
        crate::log_warn!(
            "'{}' contains bytes that are not valid UTF-8; those characters were replaced",
            source
        );
    }
    parse_mac_table(switch, source, &content)
}

/// Which files in the table directory are switch tables
#[derive(Debug, Clone, Default)]
pub struct MacTableOptions {
    /// File extension of table dumps, without the dot
    pub extension: String,
    /// Only read files whose name starts with this prefix
    pub switch_prefix: Option<String>,
    /// Never read this path (the topology file may live in the same directory)
    pub exclude: Option<PathBuf>,
}

impl MacTableOptions {
    fn accepts(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let extension_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
        let prefix_matches = self
            .switch_prefix
            .as_deref()
            .map_or(true, |prefix| file_name.starts_with(prefix));
        let excluded = self
            .exclude
            .as_deref()
            .and_then(Path::file_name)
            .is_some_and(|excluded| excluded.to_str() == Some(file_name));

        extension_matches && prefix_matches && !excluded
    }
}

/// Everything read from a MAC table directory
#[derive(Debug, Clone, Default)]
pub struct MacTableLoad {
    pub observations: Vec<Observation>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_read: usize,
}

/// Read every switch table in `dir`, in file name order
pub fn load_mac_tables(
    dir: impl AsRef<Path>,
    options: &MacTableOptions,
) -> Result<MacTableLoad, SourceError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SourceError::MacTableDirNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| SourceError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && options.accepts(path))
        .collect();
    paths.sort();

    let mut load = MacTableLoad::default();
    for path in paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let switch = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                crate::log_error!("Could not read file '{}': {}", path.display(), e);
                load.diagnostics
                    .push(Diagnostic::new(&file_name, format!("could not read file: {e}")));
                continue;
            }
        };

        crate::log_debug!("Parsing MAC table from {}", file_name);
        let (observations, diagnostics) = parse_mac_table_bytes(&switch, &file_name, &bytes);
        crate::log_debug!(
            "  {} entries, {} malformed lines",
            observations.len(),
            diagnostics.len()
        );
        load.observations.extend(observations);
        load.diagnostics.extend(diagnostics);
        load.files_read += 1;
    }

    Ok(load)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(raw: &str) -> MacAddress {
        raw.parse().unwrap()
    }

    #[test]
    fn parses_numeric_and_channel_ports() {
        let entry = parse_mac_table_line("aa:bb:cc:dd:ee:ff (port: 5) VLAN: 10")
            .unwrap()
            .unwrap();
        assert_eq!(entry.mac, mac("aa:bb:cc:dd:ee:ff"));
        assert_eq!(entry.port, PortId::Numeric(5));
        assert_eq!(entry.vlan, VlanId::new(10).unwrap());

        let entry = parse_mac_table_line("  11:22:33:44:55:66   (port: Po1)  VLAN: 20  ")
            .unwrap()
            .unwrap();
        assert_eq!(entry.port, PortId::Opaque("Po1".to_string()));
    }

    #[test]
    fn non_entry_lines_are_ignored() {
        assert_eq!(parse_mac_table_line("MAC table for SW1").unwrap(), None);
        assert_eq!(parse_mac_table_line("").unwrap(), None);
        assert_eq!(parse_mac_table_line("----------------").unwrap(), None);
    }

    #[test]
    fn malformed_entries_are_errors() {
        assert!(matches!(
            parse_mac_table_line("zz:bb:cc:dd:ee:ff (port: 5) VLAN: 10"),
            Err(LineError::InvalidMac(_))
        ));
        assert!(matches!(
            parse_mac_table_line("aa:bb:cc:dd:ee:ff (port: 5) VLAN: blue"),
            Err(LineError::InvalidVlan(_))
        ));
        assert!(matches!(
            parse_mac_table_line("aa:bb:cc:dd:ee:ff (port: 5) VLAN:"),
            Err(LineError::MissingVlan)
        ));
        assert!(matches!(
            parse_mac_table_line("aa:bb:cc:dd:ee:ff (port:) VLAN: 10"),
            Err(LineError::MissingPort)
        ));
    }

    #[test]
    fn parse_table_collects_diagnostics_and_continues() {
        let content = "MAC table\n\
                       aa:aa:aa:aa:aa:aa (port: 1) VLAN: 10\n\
                       broken (port: 2) VLAN: 10\n\
                       bb:bb:bb:bb:bb:bb (port: 3) VLAN: 20\n";
        let (observations, diagnostics) = parse_mac_table("SW1", "SW1.txt", content);

        assert_eq!(observations.len(), 2);
        assert!(observations.iter().all(|o| o.switch == "SW1"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(3));
        assert_eq!(diagnostics[0].source, "SW1.txt");
    }

    #[test]
    fn invalid_utf8_only_affects_its_own_line() {
        let bytes = b"aa:aa:aa:aa:aa:aa (port: 1) VLAN: 10\nSwitch \xe9 header\nbb:bb:bb:bb:bb:bb (port: 2) VLAN: 20\n";
        let (observations, diagnostics) = parse_mac_table_bytes("SW1", "SW1.txt", bytes);

        assert_eq!(observations.len(), 2);
        assert!(diagnostics.is_empty());
        assert_eq!(observations[1].mac, mac("bb:bb:bb:bb:bb:bb"));
        assert_eq!(observations[1].port, PortId::Numeric(2));
    }

    #[test]
    fn invalid_utf8_in_an_entry_is_a_line_diagnostic() {
        let bytes = b"aa:aa:aa:aa:aa:\xff (port: 1) VLAN: 10\nbb:bb:bb:bb:bb:bb (port: 2) VLAN: 20\n";
        let (observations, diagnostics) = parse_mac_table_bytes("SW1", "SW1.txt", bytes);

        assert_eq!(observations.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(1));
    }

    #[test]
    fn options_filter_by_extension_prefix_and_exclude() {
        let options = MacTableOptions {
            extension: "txt".to_string(),
            switch_prefix: Some("SW".to_string()),
            exclude: Some(PathBuf::from("./notes.txt")),
        };
        assert!(options.accepts(Path::new("/tables/SW1.txt")));
        assert!(!options.accepts(Path::new("/tables/SW1.log")));
        assert!(!options.accepts(Path::new("/tables/router.txt")));

        let options = MacTableOptions {
            extension: "txt".to_string(),
            switch_prefix: None,
            exclude: Some(PathBuf::from("./notes.txt")),
        };
        assert!(!options.accepts(Path::new("/tables/notes.txt")));
        assert!(options.accepts(Path::new("/tables/core.txt")));
    }

    #[test]
    fn missing_directory_is_a_source_error() {
        let err = load_mac_tables("/nonexistent/vlan-mapper/tables", &MacTableOptions::default())
            .unwrap_err();
        assert!(matches!(err, SourceError::MacTableDirNotFound(_)));
    }
}
