//! Module passes and the pass catalog.
//!
//! A [`PassDefinition`] names a pass and knows how to instantiate it. The
//! [`PassCatalog`] is the immutable, name-sorted set of definitions offered to
//! the user. Passes mutate the module in place and report failures through
//! [`PassError`].

mod canonicalize;
mod constant_fold;
mod cse;
mod dce;
mod normalize_names;
mod strength_reduce;
mod verify;

use std::fmt;

use rustc_hash::FxHashMap;

use crate::context::Context;
use crate::errors::{CatalogError, PassError};
use crate::module::{Function, Module};

pub use canonicalize::Canonicalize;
pub use constant_fold::ConstantFold;
pub use cse::CommonSubexpressionElimination;
pub use dce::DeadCodeElimination;
pub use normalize_names::NormalizeNames;
pub use strength_reduce::StrengthReduce;
pub use verify::{verify_module, Verify};

/// A transformation over a whole module.
pub trait ModulePass: Send {
    fn name(&self) -> &'static str;

    /// Applies the pass, mutating `module` in place.
    fn apply(&self, ctx: &mut Context, module: &mut Module) -> Result<(), PassError>;
}

/// Constructor for a fresh pass instance.
pub type PassFactory = fn() -> Box<dyn ModulePass>;

/// Factory for any default-constructible pass.
pub fn boxed<P: ModulePass + Default + 'static>() -> Box<dyn ModulePass> {
    Box::new(P::default())
}

/// A named, instantiable pass. Two definitions are equal when their names are.
#[derive(Clone, Copy)]
pub struct PassDefinition {
    name: &'static str,
    description: &'static str,
    factory: PassFactory,
}

impl PassDefinition {
    pub const fn new(name: &'static str, description: &'static str, factory: PassFactory) -> Self {
        Self {
            name,
            description,
            factory,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Creates a runnable instance of this pass.
    pub fn instantiate(&self) -> Box<dyn ModulePass> {
        (self.factory)()
    }
}

impl PartialEq for PassDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PassDefinition {}

impl fmt::Debug for PassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PassDefinition").field(&self.name).finish()
    }
}

impl fmt::Display for PassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Immutable collection of pass definitions, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassCatalog {
    passes: Vec<PassDefinition>,
}

impl PassCatalog {
    /// Builds a catalog, sorting by name and rejecting duplicate names.
    pub fn new(mut passes: Vec<PassDefinition>) -> Result<Self, CatalogError> {
        passes.sort_by_key(|def| def.name);
        if let Some(pair) = passes.windows(2).find(|pair| pair[0].name == pair[1].name) {
            return Err(CatalogError::DuplicatePass(pair[0].name.to_string()));
        }
        Ok(Self { passes })
    }

    /// The catalog of every pass shipped with this crate.
    pub fn builtin() -> Self {
        Self {
            passes: builtin_passes(),
        }
    }

    pub fn find(&self, name: &str) -> Option<&PassDefinition> {
        self.passes
            .binary_search_by(|def| def.name.cmp(name))
            .ok()
            .map(|idx| &self.passes[idx])
    }

    pub fn as_slice(&self) -> &[PassDefinition] {
        &self.passes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PassDefinition> {
        self.passes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|def| def.name)
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl<'a> IntoIterator for &'a PassCatalog {
    type Item = &'a PassDefinition;
    type IntoIter = std::slice::Iter<'a, PassDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.passes.iter()
    }
}

/// Definitions of every built-in pass, in name order.
pub fn builtin_passes() -> Vec<PassDefinition> {
    vec![
        PassDefinition::new(
            Canonicalize::NAME,
            "apply algebraic identities and erase dead pure operations",
            boxed::<Canonicalize>,
        ),
        PassDefinition::new(
            ConstantFold::NAME,
            "fold arithmetic on constant operands",
            boxed::<ConstantFold>,
        ),
        PassDefinition::new(
            CommonSubexpressionElimination::NAME,
            "merge identical pure operations",
            boxed::<CommonSubexpressionElimination>,
        ),
        PassDefinition::new(
            DeadCodeElimination::NAME,
            "erase pure operations whose results are unused",
            boxed::<DeadCodeElimination>,
        ),
        PassDefinition::new(
            NormalizeNames::NAME,
            "rename SSA values to %argN and %N",
            boxed::<NormalizeNames>,
        ),
        PassDefinition::new(
            StrengthReduce::NAME,
            "turn multiplication by a power of two into a shift",
            boxed::<StrengthReduce>,
        ),
        PassDefinition::new(
            Verify::NAME,
            "check IR invariants without modifying the module",
            boxed::<Verify>,
        ),
    ]
}

/// Maps each `arith.constant` result defined so far to its value.
pub(crate) fn constant_values(function: &Function) -> FxHashMap<String, i64> {
    function
        .body
        .iter()
        .filter_map(|op| Some((op.single_result()?.name.clone(), op.constant_value()?)))
        .collect()
}

/// Erases pure operations whose results are never used, repeating until no
/// more operations can be erased. Returns true when anything was erased.
pub(crate) fn erase_dead_ops(ctx: &Context, function: &mut Function) -> bool {
    let mut erased_any = false;
    loop {
        let uses = function.use_counts();
        let before = function.body.len();
        function.body.retain(|op| {
            let unused = op
                .results
                .iter()
                .all(|r| uses.get(&r.name).copied().unwrap_or(0) == 0);
            !(ctx.is_pure(&op.name) && !op.results.is_empty() && unused)
        });
        if function.body.len() == before {
            return erased_any;
        }
        erased_any = true;
    }
}
