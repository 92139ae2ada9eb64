//! Export functionality for reports
//!
//! Provides JSON, CSV, Graphviz DOT and plain-text output

pub mod csv;
pub mod dot;
pub mod json;
pub mod summary;

pub use self::csv::*;
pub use self::dot::*;
pub use self::json::*;
pub use self::summary::*;
