//! # passlab CLI
//!
//! Command parsing, rendering and the interactive loop behind the `passlab`
//! binary.

#![forbid(unsafe_code)]

pub mod commands;
pub mod render;
pub mod repl;

pub use commands::{Command, CommandError, PassRef};
pub use render::{render_result, Report, NO_INPUT};
pub use repl::{Flow, Repl, DEMO_PROGRAM};
