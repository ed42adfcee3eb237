//! Canonical textual form of a module.
//!
//! The printed form is accepted by the frontend parser, so printing and
//! re-parsing yields a structurally equivalent module.

use std::fmt::{self, Write};

use crate::dialect::{FUNC_OP, MODULE_OP, VALUE_ATTR};
use crate::module::{Function, Module, Operation, Value};
use crate::types::Type;

const INDENT: &str = "  ";

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", MODULE_OP)?;
        for function in &self.functions {
            print_function(f, function)?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_function(f, self)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.results.is_empty() {
            write_value_names(f, &self.results)?;
            f.write_str(" = ")?;
        }
        f.write_str(&self.name)?;

        if let Some(value) = self.attributes.get(VALUE_ATTR) {
            write!(f, " {}", value)?;
        }
        if !self.operands.is_empty() {
            f.write_char(' ')?;
            write_value_names(f, &self.operands)?;
        }

        // Result types when there are results, operand types otherwise.
        let annotated = if self.results.is_empty() {
            &self.operands
        } else {
            &self.results
        };
        if !annotated.is_empty() {
            f.write_str(" : ")?;
            write_types(f, annotated.iter().map(|v| v.ty))?;
        }
        Ok(())
    }
}

fn print_function(f: &mut fmt::Formatter<'_>, function: &Function) -> fmt::Result {
    write!(f, "{}{} @{}(", INDENT, FUNC_OP, function.name)?;
    for (i, arg) in function.args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "%{} : {}", arg.name, arg.ty)?;
    }
    f.write_char(')')?;

    match function.result_types.as_slice() {
        [] => {}
        [single] => write!(f, " -> {}", single)?,
        many => {
            f.write_str(" -> (")?;
            write_types(f, many.iter().copied())?;
            f.write_char(')')?;
        }
    }

    writeln!(f, " {{")?;
    for op in &function.body {
        writeln!(f, "{}{}{}", INDENT, INDENT, op)?;
    }
    writeln!(f, "{}}}", INDENT)
}

fn write_value_names(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "%{}", value.name)?;
    }
    Ok(())
}

fn write_types(f: &mut fmt::Formatter<'_>, types: impl Iterator<Item = Type>) -> fmt::Result {
    for (i, ty) in types.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}
