//! Shared fixtures for the passlab integration and property tests.

use passlab_ir::passes::{boxed, builtin_passes};
use passlab_ir::{
    BinaryOp, Context, Function, Module, ModulePass, Operation, PassCatalog, PassDefinition,
    PassError, Type, Value,
};
use proptest::prelude::*;
use proptest::sample::Index;

pub const HELLO: &str = include_str!("../../../passlab-samples/hello.ir");
pub const FOLD: &str = include_str!("../../../passlab-samples/fold.ir");
pub const REDUNDANT: &str = include_str!("../../../passlab-samples/redundant.ir");
pub const GENERIC: &str = include_str!("../../../passlab-samples/generic.ir");
pub const DIVIDE: &str = include_str!("../../../passlab-samples/divide.ir");

pub const SAMPLES: &[(&str, &str)] = &[
    ("hello", HELLO),
    ("fold", FOLD),
    ("redundant", REDUNDANT),
    ("generic", GENERIC),
    ("divide", DIVIDE),
];

pub fn parse_sample(source: &str) -> Module {
    passlab_frontend::parse(source).expect("sample parses")
}

#[derive(Default)]
pub struct AlwaysFails;

impl ModulePass for AlwaysFails {
    fn name(&self) -> &'static str {
        "zz-always-fails"
    }

    fn apply(&self, _ctx: &mut Context, _module: &mut Module) -> Result<(), PassError> {
        Err(PassError::Failed("refused".to_string()))
    }
}

#[derive(Default)]
pub struct AlwaysPanics;

impl ModulePass for AlwaysPanics {
    fn name(&self) -> &'static str {
        "zz-always-panics"
    }

    fn apply(&self, _ctx: &mut Context, _module: &mut Module) -> Result<(), PassError> {
        panic!("boom")
    }
}

/// Renames nothing and changes nothing.
#[derive(Default)]
pub struct Nothing;

impl ModulePass for Nothing {
    fn name(&self) -> &'static str {
        "aa-nothing"
    }

    fn apply(&self, _ctx: &mut Context, _module: &mut Module) -> Result<(), PassError> {
        Ok(())
    }
}

pub fn failing_pass() -> PassDefinition {
    PassDefinition::new("zz-always-fails", "always fails", boxed::<AlwaysFails>)
}

pub fn panicking_pass() -> PassDefinition {
    PassDefinition::new("zz-always-panics", "always panics", boxed::<AlwaysPanics>)
}

pub fn nothing_pass() -> PassDefinition {
    PassDefinition::new("aa-nothing", "does nothing", boxed::<Nothing>)
}

/// Built-in passes plus the failing, panicking and no-op test passes.
pub fn extended_catalog() -> PassCatalog {
    let mut passes = builtin_passes();
    passes.extend([failing_pass(), panicking_pass(), nothing_pass()]);
    PassCatalog::new(passes).expect("unique pass names")
}

/// One step of a generated function body.
#[derive(Debug, Clone)]
enum Step {
    Constant(i64),
    Binary(BinaryOp, Index, Index),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-4i64..=16).prop_map(Step::Constant),
        (
            prop::sample::select(BinaryOp::ALL.to_vec()),
            any::<Index>(),
            any::<Index>()
        )
            .prop_map(|(op, lhs, rhs)| Step::Binary(op, lhs, rhs)),
    ]
}

fn build_function(name: &str, ty: Type, steps: &[Step], returned: Index) -> Function {
    let mut values = vec![Value::new("x", ty), Value::new("y", ty)];
    let mut func = Function::new(name, values.clone(), vec![ty]);
    for (i, step) in steps.iter().enumerate() {
        let result = Value::new(format!("v{}", i), ty);
        let op = match step {
            Step::Constant(c) => Operation::constant(result.clone(), ty.wrap(*c)),
            Step::Binary(op, lhs, rhs) => Operation::binary(
                *op,
                result.clone(),
                lhs.get(&values).clone(),
                rhs.get(&values).clone(),
            ),
        };
        func.body.push(op);
        values.push(result);
    }
    func.body
        .push(Operation::ret(vec![returned.get(&values).clone()]));
    func
}

/// Well-formed single-type functions built from constants and arith ops.
pub fn arb_function(name: &'static str) -> impl Strategy<Value = Function> {
    (
        prop::sample::select(vec![Type::Index, Type::Integer(8), Type::Integer(32)]),
        prop::collection::vec(arb_step(), 0..12),
        any::<Index>(),
    )
        .prop_map(move |(ty, steps, returned)| build_function(name, ty, &steps, returned))
}

/// Modules with one or two generated functions.
pub fn arb_module() -> impl Strategy<Value = Module> {
    (arb_function("f"), prop::option::of(arb_function("g"))).prop_map(|(f, g)| {
        let mut functions = vec![f];
        functions.extend(g);
        Module::new(functions)
    })
}
