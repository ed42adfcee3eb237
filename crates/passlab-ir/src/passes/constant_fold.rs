//! Constant folding for integer arithmetic.

use tracing::trace;

use super::{constant_values, ModulePass};
use crate::context::Context;
use crate::errors::PassError;
use crate::module::{Function, Module};

/// Replaces binary operations whose operands are both constants with an
/// `arith.constant` holding the result. Folded constants feed later folds in
/// the same function. Operations with an undefined result (division by zero,
/// out-of-range shifts) are left alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantFold;

impl ConstantFold {
    pub const NAME: &'static str = "constant-fold";
}

impl ModulePass for ConstantFold {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, _ctx: &mut Context, module: &mut Module) -> Result<(), PassError> {
        for function in &mut module.functions {
            fold_function(function);
        }
        Ok(())
    }
}

fn fold_function(function: &mut Function) {
    let mut constants = constant_values(function);
    for op in &mut function.body {
        let Some(binary) = op.binary_op() else {
            continue;
        };
        let (Some(&lhs), Some(&rhs)) = (
            constants.get(&op.operands[0].name),
            constants.get(&op.operands[1].name),
        ) else {
            continue;
        };
        let result = op.results[0].clone();
        if let Some(folded) = binary.fold(lhs, rhs, result.ty) {
            trace!(op = %binary, lhs, rhs, folded, "folded constant");
            op.replace_with_constant(folded);
            constants.insert(result.name, folded);
        }
    }
}
