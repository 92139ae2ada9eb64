//! Configuration for the VLAN mapper
//!
//! Compile-time defaults plus env-driven runtime settings. CLI flags
//! override the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::mactable::MacTableOptions;

/// Topology file read when nothing else is configured
pub const DEFAULT_TOPOLOGY_FILE: &str = "topology.yaml";

/// Directory holding the per-switch MAC table dumps
pub const DEFAULT_MAC_TABLE_DIR: &str = ".";

/// Extension of MAC table dump files
pub const MAC_TABLE_EXTENSION: &str = "txt";

// ====== Graph Presentation ======

pub const SWITCH_COLOR: &str = "skyblue";

pub const LEAKING_SWITCH_COLOR: &str = "red";

pub const TRUNK_EDGE_COLOR: &str = "gray";

/// Used when a VLAN has no palette entry
pub const UNKNOWN_VLAN_COLOR: &str = "lightgrey";

/// VLAN colors, assigned in ascending VLAN order and cycled (Tableau 10)
pub const VLAN_PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Report format for the `analyze` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
    Csv,
    LeaksCsv,
    Dot,
    GraphJson,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "summary" | "text" => Some(OutputFormat::Summary),
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            "leaks-csv" => Some(OutputFormat::LeaksCsv),
            "dot" | "graphviz" => Some(OutputFormat::Dot),
            "graph-json" => Some(OutputFormat::GraphJson),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Summary => "summary",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::LeaksCsv => "leaks-csv",
            OutputFormat::Dot => "dot",
            OutputFormat::GraphJson => "graph-json",
        }
    }
}

/// Runtime analyzer settings (env-driven).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    pub topology_file: PathBuf,
    pub mac_table_dir: PathBuf,
    /// Only files starting with this prefix are read as switch tables
    pub switch_prefix: Option<String>,
    pub format: OutputFormat,
    /// Write the report here instead of stdout
    pub output: Option<PathBuf>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            topology_file: PathBuf::from(DEFAULT_TOPOLOGY_FILE),
            mac_table_dir: PathBuf::from(DEFAULT_MAC_TABLE_DIR),
            switch_prefix: None,
            format: OutputFormat::default(),
            output: None,
        }
    }
}

impl AnalyzerSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            topology_file: env_var("VLAN_MAPPER_TOPOLOGY")
                .map(PathBuf::from)
                .unwrap_or(defaults.topology_file),
            mac_table_dir: env_var("VLAN_MAPPER_MAC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.mac_table_dir),
            switch_prefix: env_var("VLAN_MAPPER_SWITCH_PREFIX"),
            format: env_var("VLAN_MAPPER_FORMAT")
                .and_then(|v| OutputFormat::parse(&v))
                .unwrap_or(defaults.format),
            output: None,
        }
    }

    pub fn with_topology(mut self, path: impl Into<PathBuf>) -> Self {
        self.topology_file = path.into();
        self
    }

    pub fn with_mac_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.mac_table_dir = path.into();
        self
    }

    pub fn with_switch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.switch_prefix = Some(prefix.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub(crate) fn mac_table_options(&self) -> MacTableOptions {
        MacTableOptions {
            extension: MAC_TABLE_EXTENSION.to_string(),
            switch_prefix: self.switch_prefix.clone(),
            exclude: Some(self.topology_file.clone()),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
