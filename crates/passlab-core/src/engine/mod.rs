//! The pipeline engine.
//!
//! - **apply**: parses source text and runs a pass sequence over it
//! - **condense**: finds the catalog passes that would change a program
//! - **state**: the session controller tying both together
//! - **errors**: pipeline and session errors

pub mod apply;
pub mod condense;
pub mod errors;
pub mod state;
