//! The environment passes and the parser operate in.

use std::collections::BTreeMap;

use crate::dialect::{all_dialects, dialect_prefix, Dialect, OpDef};

/// Holds the set of loaded dialects.
///
/// Cloning a context is a deep copy of its loaded-dialect state; the dialect
/// tables themselves are static and shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    dialects: BTreeMap<&'static str, &'static Dialect>,
    allow_unregistered: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Context {
    /// Creates an empty context. When `allow_unregistered` is set, operations
    /// of unknown dialects are accepted in generic form.
    pub fn new(allow_unregistered: bool) -> Self {
        Self {
            dialects: BTreeMap::new(),
            allow_unregistered,
        }
    }

    /// Creates a context with every known dialect loaded.
    pub fn with_all_dialects(allow_unregistered: bool) -> Self {
        let mut ctx = Self::new(allow_unregistered);
        ctx.load_all_dialects();
        ctx
    }

    /// Loads a dialect. Loading the same dialect twice is a no-op.
    pub fn load_dialect(&mut self, dialect: &'static Dialect) {
        self.dialects.entry(dialect.name).or_insert(dialect);
    }

    pub fn load_all_dialects(&mut self) {
        for dialect in all_dialects() {
            self.load_dialect(dialect);
        }
    }

    pub fn allow_unregistered(&self) -> bool {
        self.allow_unregistered
    }

    pub fn is_loaded(&self, dialect: &str) -> bool {
        self.dialects.contains_key(dialect)
    }

    pub fn dialect_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dialects.keys().copied()
    }

    /// Looks up the definition of a fully qualified operation name.
    pub fn lookup_op(&self, name: &str) -> Option<&'static OpDef> {
        let prefix = dialect_prefix(name)?;
        self.dialects.get(prefix)?.op(name)
    }

    /// Unregistered operations are conservatively treated as side-effecting.
    pub fn is_pure(&self, name: &str) -> bool {
        self.lookup_op(name).map(|def| def.pure).unwrap_or(false)
    }
}
