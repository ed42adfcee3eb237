//! Condensation filter: which catalog passes would change a program.
//!
//! Every pass is tried independently on its own clone of the environment and
//! the program. Trials never chain and never touch the inputs. A pass is kept
//! when its trial changed the program structurally or failed; failures are
//! kept so that a broken pass is never hidden from the user.
//!
//! With the `parallel` feature the trials run on the rayon thread pool. The
//! outcomes are collected in catalog order either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use passlab_ir::{Context, Module, PassCatalog, PassDefinition};

use crate::engine::apply::{fresh_context, run_pass};
use crate::engine::errors::PipelineError;

/// Result of applying one pass to a throwaway copy of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The program is no longer structurally equivalent.
    Changed,
    /// The pass was a no-op up to SSA renaming.
    Unchanged,
    /// The pass failed or panicked.
    Failed(PipelineError),
}

impl TrialOutcome {
    /// Whether the pass belongs in the condensed list.
    pub fn is_interesting(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Applies `def` to a clone of `base`.
pub fn trial(def: &PassDefinition, base: &Module, template: &Context) -> TrialOutcome {
    let mut ctx = fresh_context(template);
    let mut module = base.clone();
    let outcome = match run_pass(def, &mut ctx, &mut module) {
        Err(err) => TrialOutcome::Failed(err),
        Ok(()) if module.is_structurally_equivalent(base) => TrialOutcome::Unchanged,
        Ok(()) => TrialOutcome::Changed,
    };
    debug!(pass = def.name(), ?outcome, "condensation trial");
    outcome
}

/// Trial outcome for every catalog pass, in catalog order.
pub fn condense_with_outcomes(
    base: &Module,
    catalog: &PassCatalog,
    template: &Context,
) -> Vec<(PassDefinition, TrialOutcome)> {
    #[cfg(feature = "parallel")]
    let passes = catalog.as_slice().par_iter();
    #[cfg(not(feature = "parallel"))]
    let passes = catalog.as_slice().iter();

    passes
        .map(|def| (*def, trial(def, base, template)))
        .collect()
}

/// The catalog passes that are not structural no-ops on `base`, in catalog
/// order.
pub fn condense(base: &Module, catalog: &PassCatalog, template: &Context) -> Vec<PassDefinition> {
    condense_with_outcomes(base, catalog, template)
        .into_iter()
        .filter(|(_, outcome)| outcome.is_interesting())
        .map(|(def, _)| def)
        .collect()
}
