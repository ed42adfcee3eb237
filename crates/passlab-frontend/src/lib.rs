//! # passlab frontend
//!
//! Parser for the textual IR.

#![forbid(unsafe_code)]

pub mod errors;
pub mod parser;

pub use errors::{FrontendError, SourcePosition};
pub use parser::{parse, parse_module};
