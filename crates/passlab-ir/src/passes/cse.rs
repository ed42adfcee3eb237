//! Common subexpression elimination.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::ModulePass;
use crate::context::Context;
use crate::errors::PassError;
use crate::module::{Function, Module, Value};
use crate::types::{Attribute, Type};

/// Merges pure single-result operations that compute the same thing: same
/// name, operands, attributes and result type. Later duplicates are erased
/// and their uses redirected to the first occurrence.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonSubexpressionElimination;

impl CommonSubexpressionElimination {
    pub const NAME: &'static str = "cse";
}

impl ModulePass for CommonSubexpressionElimination {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut Context, module: &mut Module) -> Result<(), PassError> {
        for function in &mut module.functions {
            eliminate_common_subexpressions(ctx, function);
        }
        Ok(())
    }
}

#[derive(PartialEq, Eq, Hash)]
struct OpKey {
    name: String,
    operands: Vec<String>,
    attributes: BTreeMap<String, Attribute>,
    result_ty: Type,
}

fn eliminate_common_subexpressions(ctx: &Context, function: &mut Function) {
    let mut seen: FxHashMap<OpKey, Value> = FxHashMap::default();
    let mut idx = 0;
    while idx < function.body.len() {
        let op = &function.body[idx];
        let Some(result) = op.single_result().cloned() else {
            idx += 1;
            continue;
        };
        if !ctx.is_pure(&op.name) {
            idx += 1;
            continue;
        }
        let key = OpKey {
            name: op.name.clone(),
            operands: op.operands.iter().map(|v| v.name.clone()).collect(),
            attributes: op.attributes.clone(),
            result_ty: result.ty,
        };
        match seen.get(&key) {
            Some(existing) => {
                let existing = existing.clone();
                function.body.remove(idx);
                function.replace_all_uses(&result.name, &existing);
            }
            None => {
                seen.insert(key, result);
                idx += 1;
            }
        }
    }
}
