//! Program model: modules, functions and operations.
//!
//! Values are referenced by SSA name (stored without the leading `%`). Each
//! operand carries the type of the value it refers to, so passes never need a
//! separate symbol table to know operand types.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::dialect::{BinaryOp, CONSTANT_OP, RETURN_OP, VALUE_ATTR};
use crate::types::{Attribute, Type};

/// A named SSA value and its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    pub name: String,
    pub ty: Type,
}

impl Value {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A single operation inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Fully qualified name, e.g. `arith.addi`.
    pub name: String,
    pub operands: Vec<Value>,
    pub results: Vec<Value>,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
            results: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// `%result = arith.constant value : ty`
    pub fn constant(result: Value, value: i64) -> Self {
        let mut op = Self::new(CONSTANT_OP);
        op.attributes
            .insert(VALUE_ATTR.to_string(), Attribute::Integer(value));
        op.results.push(result);
        op
    }

    /// `%result = arith.<op> lhs, rhs : ty`
    pub fn binary(op: BinaryOp, result: Value, lhs: Value, rhs: Value) -> Self {
        let mut operation = Self::new(op.op_name());
        operation.operands = vec![lhs, rhs];
        operation.results.push(result);
        operation
    }

    /// `func.return operands`
    pub fn ret(operands: Vec<Value>) -> Self {
        let mut op = Self::new(RETURN_OP);
        op.operands = operands;
        op
    }

    pub fn with_results(mut self, results: Vec<Value>) -> Self {
        self.results = results;
        self
    }

    /// The binary operator, if this is a well-formed binary arith operation.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        if self.operands.len() != 2 || self.results.len() != 1 {
            return None;
        }
        BinaryOp::from_op_name(&self.name)
    }

    /// The value of an `arith.constant`.
    pub fn constant_value(&self) -> Option<i64> {
        if self.name != CONSTANT_OP {
            return None;
        }
        self.attributes.get(VALUE_ATTR)?.as_integer()
    }

    /// The only result of a single-result operation.
    pub fn single_result(&self) -> Option<&Value> {
        match self.results.as_slice() {
            [result] => Some(result),
            _ => None,
        }
    }

    pub fn is_return(&self) -> bool {
        self.name == RETURN_OP
    }

    /// Rewrites this operation in place into a constant producing its first result.
    pub fn replace_with_constant(&mut self, value: i64) {
        let result = self.results.first().cloned();
        let mut constant = Self::new(CONSTANT_OP);
        constant
            .attributes
            .insert(VALUE_ATTR.to_string(), Attribute::Integer(value));
        constant.results.extend(result);
        *self = constant;
    }
}

/// A function with typed arguments, result types and a flat body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Symbol name without the leading `@`.
    pub name: String,
    pub args: Vec<Value>,
    pub result_types: Vec<Type>,
    pub body: Vec<Operation>,
}

impl Function {
    pub fn new(name: impl Into<String>, args: Vec<Value>, result_types: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            args,
            result_types,
            body: Vec::new(),
        }
    }

    /// Replaces every operand named `from` with `to`. Returns the number of
    /// rewritten operands.
    pub fn replace_all_uses(&mut self, from: &str, to: &Value) -> usize {
        let mut replaced = 0;
        for op in &mut self.body {
            for operand in &mut op.operands {
                if operand.name == from {
                    *operand = to.clone();
                    replaced += 1;
                }
            }
        }
        replaced
    }

    /// Number of operand uses per value name.
    pub fn use_counts(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for op in &self.body {
            for operand in &op.operands {
                *counts.entry(operand.name.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Names of all arguments and operation results.
    pub fn defined_names(&self) -> FxHashSet<String> {
        self.args
            .iter()
            .chain(self.body.iter().flat_map(|op| op.results.iter()))
            .map(|value| value.name.clone())
            .collect()
    }

    /// Returns `base` if it is unused in this function, otherwise `base_N` for
    /// the smallest free `N`.
    pub fn fresh_name(&self, base: &str) -> String {
        let defined = self.defined_names();
        if !defined.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}_{}", base, n))
            .find(|candidate| !defined.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// The top-level program: an ordered list of functions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(functions: Vec<Function>) -> Self {
        Self { functions }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Total number of operations across all function bodies.
    pub fn op_count(&self) -> usize {
        self.functions.iter().map(|f| f.body.len()).sum()
    }
}
