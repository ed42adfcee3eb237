//! Canonicalization: algebraic identities and dead code removal.

use rustc_hash::FxHashMap;

use super::{constant_values, erase_dead_ops, ModulePass};
use crate::context::Context;
use crate::dialect::BinaryOp;
use crate::errors::PassError;
use crate::module::{Function, Module, Operation, Value};

/// Simplifies arithmetic using identities that hold for any operand value:
///
/// - constants move to the right-hand side of commutative operations
/// - `x + 0`, `x - 0`, `x * 1`, `x / 1`, `x << 0`, `x | 0`, `x ^ 0`,
///   `x & -1`, `x & x` and `x | x` forward `x`
/// - `x * 0`, `x & 0`, `x % 1`, `x - x` and `x ^ x` become the constant `0`
///
/// Pure operations left without uses are erased afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct Canonicalize;

impl Canonicalize {
    pub const NAME: &'static str = "canonicalize";
}

impl ModulePass for Canonicalize {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut Context, module: &mut Module) -> Result<(), PassError> {
        for function in &mut module.functions {
            canonicalize_function(ctx, function);
        }
        Ok(())
    }
}

enum Rewrite {
    Keep,
    Forward(Value),
    Constant(i64),
}

fn canonicalize_function(ctx: &Context, function: &mut Function) {
    let mut constants = constant_values(function);
    let mut idx = 0;
    while idx < function.body.len() {
        match simplify(&mut function.body[idx], &constants) {
            Rewrite::Keep => idx += 1,
            Rewrite::Constant(value) => {
                let op = &mut function.body[idx];
                op.replace_with_constant(value);
                if let Some(result) = op.single_result() {
                    constants.insert(result.name.clone(), value);
                }
                idx += 1;
            }
            Rewrite::Forward(value) => {
                let op = function.body.remove(idx);
                if let Some(result) = op.single_result() {
                    function.replace_all_uses(&result.name, &value);
                }
            }
        }
    }
    erase_dead_ops(ctx, function);
}

fn simplify(op: &mut Operation, constants: &FxHashMap<String, i64>) -> Rewrite {
    let Some(binary) = op.binary_op() else {
        return Rewrite::Keep;
    };
    let ty = op.results[0].ty;
    let constant = |value: &Value| constants.get(&value.name).map(|c| ty.wrap(*c));

    if binary.is_commutative()
        && constant(&op.operands[0]).is_some()
        && constant(&op.operands[1]).is_none()
    {
        op.operands.swap(0, 1);
    }

    let lhs = &op.operands[0];
    let rhs = &op.operands[1];
    let same = lhs.name == rhs.name;
    let forward = || {
        if lhs.ty == ty {
            Rewrite::Forward(lhs.clone())
        } else {
            Rewrite::Keep
        }
    };

    match (binary, constant(rhs)) {
        (BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor | BinaryOp::Shl, Some(0)) => {
            forward()
        }
        (BinaryOp::Mul | BinaryOp::DivS, Some(1)) => forward(),
        (BinaryOp::And, Some(-1)) => forward(),
        (BinaryOp::Mul | BinaryOp::And, Some(0)) => Rewrite::Constant(0),
        (BinaryOp::RemS, Some(1)) => Rewrite::Constant(0),
        (BinaryOp::Sub | BinaryOp::Xor, _) if same => Rewrite::Constant(0),
        (BinaryOp::And | BinaryOp::Or, _) if same => forward(),
        _ => Rewrite::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    fn index(name: &str) -> Value {
        Value::new(name, Type::Index)
    }

    fn single_binary(op: BinaryOp, rhs_const: Option<i64>) -> Module {
        let n = index("n");
        let c = index("c");
        let r = index("r");
        let mut func = Function::new("f", vec![n.clone()], vec![Type::Index]);
        let rhs = match rhs_const {
            Some(value) => {
                func.body.push(Operation::constant(c.clone(), value));
                c
            }
            None => n.clone(),
        };
        func.body.push(Operation::binary(op, r.clone(), n, rhs));
        func.body.push(Operation::ret(vec![r]));
        Module::new(vec![func])
    }

    fn run(module: &mut Module) {
        Canonicalize
            .apply(&mut Context::with_all_dialects(true), module)
            .expect("canonicalize never fails");
    }

    #[test]
    fn add_zero_forwards_operand() {
        let mut module = single_binary(BinaryOp::Add, Some(0));
        run(&mut module);
        let body = &module.functions[0].body;
        assert_eq!(body.len(), 1, "constant and add should be gone: {:?}", body);
        assert!(body[0].is_return());
        assert_eq!(body[0].operands[0].name, "n");
    }

    #[test]
    fn mul_zero_becomes_constant() {
        let mut module = single_binary(BinaryOp::Mul, Some(0));
        run(&mut module);
        let body = &module.functions[0].body;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].constant_value(), Some(0));
        assert_eq!(body[0].results[0].name, "r");
    }

    #[test]
    fn sub_self_becomes_zero() {
        let mut module = single_binary(BinaryOp::Sub, None);
        run(&mut module);
        assert_eq!(module.functions[0].body[0].constant_value(), Some(0));
    }

    #[test]
    fn and_all_ones_forwards_operand() {
        let mut module = single_binary(BinaryOp::And, Some(-1));
        run(&mut module);
        let body = &module.functions[0].body;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].operands[0].name, "n");
    }

    #[test]
    fn moves_constants_to_the_right() {
        let n = index("n");
        let c = index("c");
        let r = index("r");
        let mut func = Function::new("f", vec![n.clone()], vec![Type::Index]);
        func.body.push(Operation::constant(c.clone(), 7));
        func.body.push(Operation::binary(BinaryOp::Add, r.clone(), c, n));
        func.body.push(Operation::ret(vec![r]));
        let mut module = Module::new(vec![func]);

        run(&mut module);

        let add = &module.functions[0].body[1];
        assert_eq!(add.operands[0].name, "n");
        assert_eq!(add.operands[1].name, "c");
    }

    #[test]
    fn leaves_canonical_form_unchanged() {
        let mut module = single_binary(BinaryOp::Mul, Some(3));
        let before = module.clone();
        run(&mut module);
        assert_eq!(module, before);
    }
}
