//! Structural equivalence of modules.
//!
//! Two modules are structurally equivalent when they differ at most in the
//! names of their SSA values. Operands are compared through a correspondence
//! map built while walking both functions in lockstep: an argument or result
//! on the left is bound to the value at the same position on the right, and
//! every later use must respect that binding.

use rustc_hash::FxHashMap;

use crate::module::{Function, Module, Operation, Value};

impl Module {
    /// Deep structural comparison; SSA value names are not significant.
    pub fn is_structurally_equivalent(&self, other: &Module) -> bool {
        self.functions.len() == other.functions.len()
            && self
                .functions
                .iter()
                .zip(&other.functions)
                .all(|(lhs, rhs)| lhs.is_structurally_equivalent(rhs))
    }
}

impl Function {
    pub fn is_structurally_equivalent(&self, other: &Function) -> bool {
        if self.name != other.name
            || self.result_types != other.result_types
            || self.args.len() != other.args.len()
            || self.body.len() != other.body.len()
        {
            return false;
        }

        let mut bindings = ValueBindings::default();
        for (lhs, rhs) in self.args.iter().zip(&other.args) {
            if !bindings.bind(lhs, rhs) {
                return false;
            }
        }

        self.body
            .iter()
            .zip(&other.body)
            .all(|(lhs, rhs)| operations_equivalent(lhs, rhs, &mut bindings))
    }
}

fn operations_equivalent<'a>(
    lhs: &'a Operation,
    rhs: &'a Operation,
    bindings: &mut ValueBindings<'a>,
) -> bool {
    if lhs.name != rhs.name
        || lhs.attributes != rhs.attributes
        || lhs.operands.len() != rhs.operands.len()
        || lhs.results.len() != rhs.results.len()
    {
        return false;
    }

    let operands_match = lhs
        .operands
        .iter()
        .zip(&rhs.operands)
        .all(|(l, r)| l.ty == r.ty && bindings.uses_match(l, r));
    if !operands_match {
        return false;
    }

    lhs.results
        .iter()
        .zip(&rhs.results)
        .all(|(l, r)| bindings.bind(l, r))
}

/// Bijective correspondence between left and right value names.
#[derive(Default)]
struct ValueBindings<'a> {
    forward: FxHashMap<&'a str, &'a str>,
    backward: FxHashMap<&'a str, &'a str>,
}

impl<'a> ValueBindings<'a> {
    /// Binds a newly defined pair. Fails on type mismatch or when either side
    /// is already bound to something else.
    fn bind(&mut self, lhs: &'a Value, rhs: &'a Value) -> bool {
        if lhs.ty != rhs.ty {
            return false;
        }
        let lhs_name = lhs.name.as_str();
        let rhs_name = rhs.name.as_str();
        match (self.forward.get(lhs_name), self.backward.get(rhs_name)) {
            (None, None) => {
                self.forward.insert(lhs_name, rhs_name);
                self.backward.insert(rhs_name, lhs_name);
                true
            }
            (Some(bound), Some(back)) => *bound == rhs_name && *back == lhs_name,
            _ => false,
        }
    }

    /// Checks a use. Values defined outside the walked region are compared
    /// by name.
    fn uses_match(&self, lhs: &Value, rhs: &Value) -> bool {
        match (
            self.forward.get(lhs.name.as_str()),
            self.backward.get(rhs.name.as_str()),
        ) {
            (Some(bound), _) => *bound == rhs.name,
            (None, None) => lhs.name == rhs.name,
            (None, Some(_)) => false,
        }
    }
}
