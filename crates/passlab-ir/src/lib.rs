//! # passlab IR
//!
//! Program and environment models for passlab: an SSA module made of
//! functions over the `func` and `arith` dialects, a [`Context`] holding the
//! loaded dialects, the canonical printer, structural equivalence, and the
//! built-in module passes with their [`PassCatalog`].

#![forbid(unsafe_code)]

pub mod context;
pub mod dialect;
pub mod equivalence;
pub mod errors;
pub mod module;
pub mod passes;
pub mod printer;
pub mod types;

// Re-export commonly used types
pub use context::Context;
pub use dialect::{all_dialects, BinaryOp, Dialect, OpDef, OpKind};
pub use errors::{CatalogError, PassError};
pub use module::{Function, Module, Operation, Value};
pub use passes::{ModulePass, PassCatalog, PassDefinition};
pub use types::{Attribute, Type};
