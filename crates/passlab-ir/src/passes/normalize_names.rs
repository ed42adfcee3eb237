//! SSA value renaming.

use rustc_hash::FxHashMap;

use super::ModulePass;
use crate::context::Context;
use crate::errors::PassError;
use crate::module::{Function, Module};

/// Renames function arguments to `%argN` and operation results to `%N`, in
/// definition order. The result is structurally equivalent to the input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeNames;

impl NormalizeNames {
    pub const NAME: &'static str = "normalize-names";
}

impl ModulePass for NormalizeNames {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, _ctx: &mut Context, module: &mut Module) -> Result<(), PassError> {
        for function in &mut module.functions {
            normalize_function(function);
        }
        Ok(())
    }
}

fn normalize_function(function: &mut Function) {
    let mut renames: FxHashMap<String, String> = FxHashMap::default();

    for (i, arg) in function.args.iter_mut().enumerate() {
        let name = format!("arg{}", i);
        renames.insert(std::mem::replace(&mut arg.name, name.clone()), name);
    }

    let mut next = 0usize;
    for op in &mut function.body {
        for operand in &mut op.operands {
            if let Some(renamed) = renames.get(&operand.name) {
                operand.name = renamed.clone();
            }
        }
        for result in &mut op.results {
            let name = next.to_string();
            next += 1;
            renames.insert(std::mem::replace(&mut result.name, name.clone()), name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::BinaryOp;
    use crate::module::{Operation, Value};
    use crate::types::Type;

    #[test]
    fn renames_consistently_and_stays_equivalent() {
        let n = Value::new("n", Type::Index);
        let two = Value::new("two", Type::Index);
        let res = Value::new("res", Type::Index);
        let mut func = Function::new("f", vec![n.clone()], vec![Type::Index]);
        func.body.push(Operation::constant(two.clone(), 2));
        func.body
            .push(Operation::binary(BinaryOp::Mul, res.clone(), n, two));
        func.body.push(Operation::ret(vec![res]));
        let before = Module::new(vec![func]);
        let mut module = before.clone();

        NormalizeNames
            .apply(&mut Context::with_all_dialects(true), &mut module)
            .expect("renaming never fails");

        let body = &module.functions[0].body;
        assert_eq!(module.functions[0].args[0].name, "arg0");
        assert_eq!(body[0].results[0].name, "0");
        assert_eq!(body[1].operands[0].name, "arg0");
        assert_eq!(body[1].operands[1].name, "0");
        assert_eq!(body[2].operands[0].name, "1");
        assert_ne!(module, before);
        assert!(module.is_structurally_equivalent(&before));
    }
}
