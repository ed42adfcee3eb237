//! IR verifier exposed as a pass.

use rustc_hash::{FxHashMap, FxHashSet};

use super::ModulePass;
use crate::context::Context;
use crate::dialect::{OpKind, FUNC_OP};
use crate::errors::PassError;
use crate::module::{Function, Module, Operation};
use crate::types::Type;

/// Checks IR invariants and fails on the first violation. Never modifies the
/// module.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verify;

impl Verify {
    pub const NAME: &'static str = "verify";
}

impl ModulePass for Verify {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut Context, module: &mut Module) -> Result<(), PassError> {
        verify_module(ctx, module)
    }
}

/// Verifies a module without requiring mutable access.
pub fn verify_module(ctx: &Context, module: &Module) -> Result<(), PassError> {
    let mut names = FxHashSet::default();
    for function in &module.functions {
        if !names.insert(function.name.as_str()) {
            return Err(PassError::Verification(format!(
                "duplicate function @{}",
                function.name
            )));
        }
        verify_function(ctx, function)
            .map_err(|msg| PassError::Verification(format!("@{}: {}", function.name, msg)))?;
    }
    Ok(())
}

fn verify_function(ctx: &Context, function: &Function) -> Result<(), String> {
    let mut defined: FxHashMap<&str, Type> = FxHashMap::default();
    for arg in &function.args {
        if defined.insert(arg.name.as_str(), arg.ty).is_some() {
            return Err(format!("argument %{} is defined twice", arg.name));
        }
    }

    let last = function.body.len().checked_sub(1);
    for (idx, op) in function.body.iter().enumerate() {
        if op.name == FUNC_OP {
            return Err(format!("'{}' is not allowed inside a function body", FUNC_OP));
        }
        for operand in &op.operands {
            match defined.get(operand.name.as_str()) {
                None => return Err(format!("use of undefined value %{}", operand.name)),
                Some(ty) if *ty != operand.ty => {
                    return Err(format!(
                        "operand %{} has type {} but is defined as {}",
                        operand.name, operand.ty, ty
                    ))
                }
                Some(_) => {}
            }
        }
        verify_operation(ctx, function, op, Some(idx) == last)?;
        for result in &op.results {
            if defined.insert(result.name.as_str(), result.ty).is_some() {
                return Err(format!("value %{} is defined twice", result.name));
            }
        }
    }

    match function.body.last() {
        Some(op) if op.is_return() => Ok(()),
        _ => Err("function body must end with 'func.return'".to_string()),
    }
}

fn verify_operation(
    ctx: &Context,
    function: &Function,
    op: &Operation,
    is_last: bool,
) -> Result<(), String> {
    let Some(def) = ctx.lookup_op(&op.name) else {
        return Ok(());
    };
    match def.kind {
        OpKind::Function => Ok(()),
        OpKind::Constant => {
            if op.results.len() != 1 || !op.operands.is_empty() {
                return Err(format!("'{}' expects no operands and one result", op.name));
            }
            if op.constant_value().is_none() {
                return Err(format!("'{}' is missing its integer value", op.name));
            }
            Ok(())
        }
        OpKind::Binary(binary) => {
            if op.operands.len() != 2 || op.results.len() != 1 {
                return Err(format!("'{}' expects two operands and one result", binary));
            }
            let result_ty = op.results[0].ty;
            match op.operands.iter().find(|operand| operand.ty != result_ty) {
                Some(operand) => Err(format!(
                    "'{}' operand %{} has type {} but the result type is {}",
                    binary, operand.name, operand.ty, result_ty
                )),
                None => Ok(()),
            }
        }
        OpKind::Return => {
            if !is_last {
                return Err(format!("'{}' must be the last operation", op.name));
            }
            if !op.results.is_empty() {
                return Err(format!("'{}' cannot produce results", op.name));
            }
            let returned: Vec<Type> = op.operands.iter().map(|v| v.ty).collect();
            if returned != function.result_types {
                return Err(format!(
                    "returned types ({}) do not match the signature ({})",
                    join_types(&returned),
                    join_types(&function.result_types)
                ));
            }
            Ok(())
        }
    }
}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(Type::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
