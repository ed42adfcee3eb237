//! Dead code elimination.

use tracing::trace;

use super::{erase_dead_ops, ModulePass};
use crate::context::Context;
use crate::errors::PassError;
use crate::module::Module;

/// Erases pure operations whose results have no uses, to a fixpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeadCodeElimination;

impl DeadCodeElimination {
    pub const NAME: &'static str = "dce";
}

impl ModulePass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut Context, module: &mut Module) -> Result<(), PassError> {
        for function in &mut module.functions {
            if erase_dead_ops(ctx, function) {
                trace!(function = %function.name, "erased dead operations");
            }
        }
        Ok(())
    }
}
