//! # IR Parser
//!
//! Turns the textual IR into a [`Module`] using the pest grammar in
//! `grammar.pest`.
//!
//! Parsing happens in two steps. The grammar accepts any syntactically
//! well-formed program, then the builder functions walk the parse tree and
//! check it against the loaded dialects of a [`Context`]:
//!
//! - each function has its own SSA scope; values must be defined before use
//!   and may be defined only once
//! - operand types are taken from the defining value, never re-annotated
//! - registered operations must have the shape their [`OpKind`] requires
//! - operations of unknown dialects are kept in generic form when the context
//!   allows unregistered operations
//!
//! Errors carry the 1-based line and column of the offending token.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use rustc_hash::FxHashMap;

use passlab_ir::dialect::{dialect_prefix, FUNC_OP, VALUE_ATTR};
use passlab_ir::{Attribute, Context, Function, Module, OpKind, Operation, Type, Value};

use crate::errors::{FrontendError, SourcePosition};

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct IrParser;

/// Parses `source` against the dialects loaded in `ctx`.
///
/// # Example
///
/// ```rust,ignore
/// let ctx = Context::with_all_dialects(true);
/// let module = parse_module(&ctx, "func.func @f() { func.return }")?;
/// assert_eq!(module.functions.len(), 1);
/// ```
pub fn parse_module(ctx: &Context, source: &str) -> Result<Module, FrontendError> {
    let mut pairs = IrParser::parse(Rule::program, source)
        .map_err(|e| FrontendError::ParseError(e.to_string()))?;

    let mut functions = Vec::new();
    if let Some(program) = pairs.next() {
        debug_assert_eq!(program.as_rule(), Rule::program);
        for inner in program.into_inner() {
            match inner.as_rule() {
                Rule::module_op => {
                    for func in inner.into_inner() {
                        functions.push(build_function(ctx, func)?);
                    }
                }
                Rule::func_op => functions.push(build_function(ctx, inner)?),
                _ => {}
            }
        }
    }
    Ok(Module::new(functions))
}

/// Parses `source` with every built-in dialect loaded and unregistered
/// operations allowed.
pub fn parse(source: &str) -> Result<Module, FrontendError> {
    parse_module(&Context::with_all_dialects(true), source)
}

/// SSA values visible inside one function body.
#[derive(Default)]
struct Scope {
    values: FxHashMap<String, Type>,
}

impl Scope {
    fn define(&mut self, pair: &Pair<Rule>, ty: Type) -> Result<Value, FrontendError> {
        let name = value_name(pair);
        if self.values.contains_key(&name) {
            return Err(FrontendError::Redefinition {
                name,
                at: SourcePosition::of(pair.as_span()),
            });
        }
        self.values.insert(name.clone(), ty);
        Ok(Value::new(name, ty))
    }

    fn resolve(&self, pair: &Pair<Rule>) -> Result<Value, FrontendError> {
        let name = value_name(pair);
        match self.values.get(&name) {
            Some(ty) => Ok(Value::new(name, *ty)),
            None => Err(FrontendError::UndefinedValue {
                name,
                at: SourcePosition::of(pair.as_span()),
            }),
        }
    }
}

fn value_name(pair: &Pair<Rule>) -> String {
    pair.as_str().trim_start_matches('%').to_string()
}

fn build_type(pair: Pair<Rule>) -> Result<Type, FrontendError> {
    Type::parse(pair.as_str()).ok_or_else(|| FrontendError::InvalidType {
        text: pair.as_str().to_string(),
        at: SourcePosition::of(pair.as_span()),
    })
}

fn build_type_list(pair: Pair<Rule>) -> Result<Vec<Type>, FrontendError> {
    pair.into_inner().map(build_type).collect()
}

fn build_function(ctx: &Context, pair: Pair<Rule>) -> Result<Function, FrontendError> {
    let mut scope = Scope::default();
    let mut name = String::new();
    let mut args = Vec::new();
    let mut result_types = Vec::new();
    let mut body = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::symbol => name = part.as_str().trim_start_matches('@').to_string(),
            Rule::arg_list => {
                for arg in part.into_inner() {
                    let mut it = arg.into_inner();
                    let (Some(id), Some(ty)) = (it.next(), it.next()) else {
                        continue;
                    };
                    let ty = build_type(ty)?;
                    args.push(scope.define(&id, ty)?);
                }
            }
            Rule::result_sig => {
                for sig in part.into_inner() {
                    match sig.as_rule() {
                        Rule::type_list => result_types = build_type_list(sig)?,
                        Rule::type_name => result_types = vec![build_type(sig)?],
                        _ => {}
                    }
                }
            }
            Rule::operation => body.push(build_operation(ctx, &mut scope, part)?),
            _ => {}
        }
    }

    let mut function = Function::new(name, args, result_types);
    function.body = body;
    Ok(function)
}

fn build_operation(
    ctx: &Context,
    scope: &mut Scope,
    pair: Pair<Rule>,
) -> Result<Operation, FrontendError> {
    let at = SourcePosition::of(pair.as_span());
    let mut result_ids = Vec::new();
    let mut name = String::new();
    let mut payload: Option<Pair<Rule>> = None;
    let mut operands = Vec::new();
    let mut types = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::result_list => result_ids.extend(part.into_inner()),
            Rule::op_name => name = part.as_str().to_string(),
            Rule::integer => payload = Some(part),
            Rule::operand_list => {
                for operand in part.into_inner() {
                    if let Some(id) = operand.into_inner().next() {
                        operands.push(scope.resolve(&id)?);
                    }
                }
            }
            Rule::type_list => types = build_type_list(part)?,
            _ => {}
        }
    }

    let kind = match ctx.lookup_op(&name) {
        Some(def) => Some(def.kind),
        None => {
            let known_dialect = dialect_prefix(&name).is_some_and(|d| ctx.is_loaded(d));
            if known_dialect || !ctx.allow_unregistered() {
                return Err(FrontendError::UnregisteredOperation { name, at });
            }
            None
        }
    };

    let value = payload.map(|p| parse_integer(&name, p)).transpose()?;
    check_shape(&name, kind, &result_ids, &operands, &types, value, at)?;

    let mut op = Operation::new(name);
    if result_ids.is_empty() {
        check_operand_types(&op.name, &operands, &types, at)?;
    } else {
        for (id, ty) in result_ids.iter().zip(&types) {
            op.results.push(scope.define(id, *ty)?);
        }
    }
    if let Some(v) = value {
        let v = match op.results.first() {
            Some(result) if kind == Some(OpKind::Constant) => result.ty.wrap(v),
            _ => v,
        };
        op.attributes
            .insert(VALUE_ATTR.to_string(), Attribute::Integer(v));
    }
    op.operands = operands;
    Ok(op)
}

fn parse_integer(op: &str, pair: Pair<Rule>) -> Result<i64, FrontendError> {
    pair.as_str().parse::<i64>().map_err(|_| {
        FrontendError::malformed(
            op,
            format!("integer literal {} is out of range", pair.as_str()),
            SourcePosition::of(pair.as_span()),
        )
    })
}

fn check_shape(
    name: &str,
    kind: Option<OpKind>,
    results: &[Pair<Rule>],
    operands: &[Value],
    types: &[Type],
    value: Option<i64>,
    at: SourcePosition,
) -> Result<(), FrontendError> {
    let fail = |message: &str| Err(FrontendError::malformed(name, message, at));

    if !results.is_empty() && types.len() != results.len() {
        return Err(FrontendError::malformed(
            name,
            format!(
                "defines {} result(s) but is annotated with {} type(s)",
                results.len(),
                types.len()
            ),
            at,
        ));
    }

    match kind {
        None => Ok(()),
        Some(OpKind::Function) => fail(&format!("is not allowed inside a function body ({})", FUNC_OP)),
        Some(OpKind::Constant) => {
            if value.is_none() {
                return fail("expects an integer value");
            }
            if results.len() != 1 || !operands.is_empty() {
                return fail("expects no operands and exactly one result");
            }
            Ok(())
        }
        Some(OpKind::Binary(_)) => {
            if value.is_some() {
                return fail("does not take an integer value");
            }
            if operands.len() != 2 || results.len() != 1 {
                return fail("expects two operands and exactly one result");
            }
            match operands.iter().find(|operand| operand.ty != types[0]) {
                Some(operand) => Err(FrontendError::malformed(
                    name,
                    format!(
                        "operand %{} has type {} but the result type is {}",
                        operand.name, operand.ty, types[0]
                    ),
                    at,
                )),
                None => Ok(()),
            }
        }
        Some(OpKind::Return) => {
            if value.is_some() {
                return fail("does not take an integer value");
            }
            if !results.is_empty() {
                return fail("cannot produce results");
            }
            Ok(())
        }
    }
}

/// Result-less operations annotate their operand types; the annotation must
/// agree with the defining values.
fn check_operand_types(
    name: &str,
    operands: &[Value],
    types: &[Type],
    at: SourcePosition,
) -> Result<(), FrontendError> {
    let actual: Vec<Type> = operands.iter().map(|v| v.ty).collect();
    if actual == types {
        return Ok(());
    }
    let render = |tys: &[Type]| {
        tys.iter()
            .map(Type::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    Err(FrontendError::malformed(
        name,
        format!(
            "operand types ({}) do not match the annotation ({})",
            render(&actual),
            render(types)
        ),
        at,
    ))
}
