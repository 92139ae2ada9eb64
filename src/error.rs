//! Error types for topology and MAC-table records
//!
//! Record-level errors never abort a run; they are turned into
//! [`Diagnostic`](crate::models::Diagnostic)s by the loaders.

use std::path::PathBuf;

use thiserror::Error;

/// Why a topology link was not added to the connection index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// A required field is absent or empty
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A port value is not a non-negative integer
    #[error("invalid value for '{field}': '{value}' (ports must be non-negative integers)")]
    InvalidPort { field: &'static str, value: String },

    /// The entry could not be read as a link at all
    #[error("{0}")]
    Malformed(String),

    /// One endpoint is already bound to a different remote endpoint
    #[error("endpoint {endpoint} is already linked to {existing}")]
    ConflictingEndpoint { endpoint: String, existing: String },
}

/// Why a MAC-table line could not be turned into an observation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("invalid MAC address '{0}'")]
    InvalidMac(String),

    #[error("could not find a port value")]
    MissingPort,

    #[error("could not find a VLAN value")]
    MissingVlan,

    #[error("invalid VLAN id '{0}'")]
    InvalidVlan(String),
}

/// A whole input source could not be used
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("topology file '{}' not found", .0.display())]
    TopologyNotFound(PathBuf),

    #[error("topology file '{}' is empty or invalid", .0.display())]
    TopologyEmpty(PathBuf),

    #[error("error parsing topology file '{}': {source}", path.display())]
    TopologyParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("MAC address table directory '{}' not found", .0.display())]
    MacTableDirNotFound(PathBuf),

    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_error_messages_name_the_field() {
        let err = LinkError::InvalidPort {
            field: "source_port",
            value: "Po1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("source_port"));
        assert!(msg.contains("Po1"));
        assert_eq!(
            LinkError::MissingField("destination").to_string(),
            "missing required field 'destination'"
        );
    }

    #[test]
    fn source_error_includes_path() {
        let err = SourceError::TopologyNotFound(PathBuf::from("lab/topology.yaml"));
        assert!(err.to_string().contains("lab/topology.yaml"));
    }
}
