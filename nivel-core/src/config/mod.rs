//! Configuration types and parser
//!
//! Board-agnostic configuration structures, parsed from a TOML subset and
//! optionally stored as postcard binary data.

pub mod parse;
pub mod types;

pub use parse::{load_config, parse_config, ParseError};
pub use types::*;
