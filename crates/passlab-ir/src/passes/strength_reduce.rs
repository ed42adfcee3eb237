//! Strength reduction of multiplications.

use super::{constant_values, ModulePass};
use crate::context::Context;
use crate::dialect::BinaryOp;
use crate::errors::PassError;
use crate::module::{Function, Module, Operation, Value};

/// Rewrites `arith.muli x, c` where `c` is a constant power of two greater
/// than one into `arith.shli x, log2(c)`. The shift amount is materialized as
/// a new constant right before the shift.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrengthReduce;

impl StrengthReduce {
    pub const NAME: &'static str = "strength-reduce";
}

impl ModulePass for StrengthReduce {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, _ctx: &mut Context, module: &mut Module) -> Result<(), PassError> {
        for function in &mut module.functions {
            reduce_function(function);
        }
        Ok(())
    }
}

fn reduce_function(function: &mut Function) {
    let constants = constant_values(function);
    let mut idx = 0;
    while idx < function.body.len() {
        let op = &function.body[idx];
        if op.binary_op() != Some(BinaryOp::Mul) {
            idx += 1;
            continue;
        }
        let ty = op.results[0].ty;
        let exponent = |value: &Value| {
            constants
                .get(&value.name)
                .and_then(|c| power_of_two_exponent(ty.wrap(*c)))
        };
        let rewrite = match (exponent(&op.operands[0]), exponent(&op.operands[1])) {
            (_, Some(k)) => Some((op.operands[0].clone(), k)),
            (Some(k), None) => Some((op.operands[1].clone(), k)),
            (None, None) => None,
        };
        let Some((operand, shift)) = rewrite else {
            idx += 1;
            continue;
        };

        let result = op.results[0].clone();
        let amount = Value::new(function.fresh_name(&format!("{}_shamt", result.name)), ty);
        function.body[idx] = Operation::binary(BinaryOp::Shl, result, operand, amount.clone());
        function
            .body
            .insert(idx, Operation::constant(amount, i64::from(shift)));
        idx += 2;
    }
}

fn power_of_two_exponent(value: i64) -> Option<u32> {
    if value > 1 && value.count_ones() == 1 {
        Some(value.trailing_zeros())
    } else {
        None
    }
}
