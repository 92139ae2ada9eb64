//! MAC table module - switch table dump parsing

mod parser;

pub use parser::{
    load_mac_tables, parse_mac_table, parse_mac_table_bytes, parse_mac_table_line, MacEntry,
    MacTableLoad, MacTableOptions,
};
