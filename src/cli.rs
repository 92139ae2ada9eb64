use anyhow::Result;
use std::path::PathBuf;

use crate::config::{OutputFormat, DEFAULT_MAC_TABLE_DIR, DEFAULT_TOPOLOGY_FILE};

/// A parsed command line. Unset options fall back to [`AnalyzerSettings`](crate::AnalyzerSettings).
#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    Analyze {
        topology: Option<PathBuf>,
        mac_dir: Option<PathBuf>,
        switch_prefix: Option<String>,
        format: Option<OutputFormat>,
        output: Option<PathBuf>,
    },
    Validate {
        topology: Option<PathBuf>,
    },
    Help,
    Version,
}

pub fn version_text() -> String {
    format!("vlan-mapper {}", env!("CARGO_PKG_VERSION"))
}

pub fn usage_text() -> String {
    format!(
        "{version}
Switch MAC-table analysis: device locations and VLAN leak detection

Usage:
  vlan-mapper [analyze] [--topology <FILE>] [--mac-dir <DIR>] [--prefix <P>] [--format <FMT>] [--output <FILE>]
  vlan-mapper validate [--topology <FILE>]
  vlan-mapper --help
  vlan-mapper --version

Options:
  -t, --topology <FILE>  Topology YAML file (default: {topology})
  -m, --mac-dir <DIR>    Directory with per-switch MAC table .txt files (default: {mac_dir})
  -p, --prefix <P>       Only read MAC table files starting with this prefix
  -f, --format <FMT>     summary | json | csv | leaks-csv | dot | graph-json (default: summary)
  -o, --output <FILE>    Write the report to a file instead of stdout
  -h, --help             Show this help text
  -V, --version          Show version

Environment:
  VLAN_MAPPER_TOPOLOGY, VLAN_MAPPER_MAC_DIR, VLAN_MAPPER_SWITCH_PREFIX,
  VLAN_MAPPER_FORMAT supply defaults; RUST_LOG sets the log level.",
        version = version_text(),
        topology = DEFAULT_TOPOLOGY_FILE,
        mac_dir = DEFAULT_MAC_TABLE_DIR,
    )
}

fn parse_format_arg(raw: &str) -> Result<OutputFormat> {
    OutputFormat::parse(raw).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for --format: '{}'. Expected summary, json, csv, leaks-csv, dot or graph-json.\n\n{}",
            raw,
            usage_text()
        )
    })
}

pub fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut topology: Option<PathBuf> = None;
    let mut mac_dir: Option<PathBuf> = None;
    let mut switch_prefix: Option<String> = None;
    let mut format: Option<OutputFormat> = None;
    let mut output: Option<PathBuf> = None;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();

        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg, None),
        };

        let mut value_for = |name: &str| -> Result<String> {
            let value = match &inline_value {
                Some(v) => v.clone(),
                None => iter
                    .next()
                    .map(|v| v.as_ref().to_string())
                    .unwrap_or_default(),
            };
            if value.is_empty() {
                return Err(anyhow::anyhow!(
                    "Missing value for {}.\n\n{}",
                    name,
                    usage_text()
                ));
            }
            Ok(value)
        };

        match flag {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "analyze" | "validate" => {
                if command.as_deref().is_some_and(|existing| existing != flag) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(flag.to_string());
            }
            "-t" | "--topology" => topology = Some(PathBuf::from(value_for("--topology")?)),
            "-m" | "--mac-dir" => mac_dir = Some(PathBuf::from(value_for("--mac-dir")?)),
            "-p" | "--prefix" => switch_prefix = Some(value_for("--prefix")?),
            "-f" | "--format" => format = Some(parse_format_arg(&value_for("--format")?)?),
            "-o" | "--output" => output = Some(PathBuf::from(value_for("--output")?)),
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
        }
    }

    match command.as_deref().unwrap_or("analyze") {
        "validate" => {
            if mac_dir.is_some() || switch_prefix.is_some() || format.is_some() || output.is_some()
            {
                return Err(anyhow::anyhow!(
                    "--mac-dir/--prefix/--format/--output are only valid with analyze.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::Validate { topology })
        }
        _ => Ok(CliCommand::Analyze {
            topology,
            mac_dir,
            switch_prefix,
            format,
            output,
        }),
    }
}
