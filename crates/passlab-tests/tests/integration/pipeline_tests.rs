use passlab_core::{apply_pipeline, CurrentResult, PipelineError};
use passlab_ir::{BinaryOp, Context, PassCatalog, PassDefinition, PassError};
use passlab_tests::{failing_pass, panicking_pass, FOLD, HELLO, REDUNDANT};

fn passes(names: &[&str]) -> Vec<PassDefinition> {
    let catalog = PassCatalog::builtin();
    names
        .iter()
        .map(|name| *catalog.find(name).expect("builtin pass"))
        .collect()
}

fn run(source: &str, names: &[&str]) -> CurrentResult {
    apply_pipeline(source, &passes(names), &Context::default())
}

#[test]
fn empty_source_is_empty_for_any_pipeline() {
    assert_eq!(run("", &["verify", "cse"]), CurrentResult::Empty);
    assert_eq!(
        apply_pipeline("", &[failing_pass()], &Context::default()),
        CurrentResult::Empty
    );
}

#[test]
fn constant_fold_folds_the_product() {
    let result = run(FOLD, &["constant-fold"]);
    let func = &result.program().expect("program").functions[0];
    let product = func
        .body
        .iter()
        .find(|op| op.single_result().map(|r| r.name.as_str()) == Some("a"))
        .expect("product still defined");
    assert_eq!(product.constant_value(), Some(42));
    assert!(func.body.iter().all(|op| op.binary_op() != Some(BinaryOp::Mul)));
}

#[test]
fn full_cleanup_leaves_a_constant_return() {
    let result = run(FOLD, &["constant-fold", "dce"]);
    let expected = "builtin.module {\n  func.func @area() -> i32 {\n    %a = arith.constant 42 : i32\n    func.return %a : i32\n  }\n}\n";
    assert_eq!(result.program().expect("program").to_string(), expected);
}

#[test]
fn cse_then_canonicalize_simplifies_redundant() {
    let result = run(REDUNDANT, &["cse", "canonicalize"]);
    let body = &result.program().expect("program").functions[0].body;
    let names: Vec<_> = body.iter().map(|op| op.name.as_str()).collect();
    assert_eq!(names, vec!["arith.addi", "arith.muli", "func.return"]);
    assert_eq!(body[1].operands[0].name, "s1");
    assert_eq!(body[1].operands[1].name, "s1");
}

#[test]
fn strength_reduction_produces_a_shift() {
    let result = run(HELLO, &["strength-reduce"]);
    let text = result.program().expect("program").to_string();
    assert!(text.contains("%res_shamt = arith.constant 1 : index"));
    assert!(text.contains("%res = arith.shli %n, %res_shamt : index"));
}

#[test]
fn failing_pass_aborts_before_later_passes() {
    let pipeline = vec![failing_pass(), panicking_pass()];
    let result = apply_pipeline(HELLO, &pipeline, &Context::default());
    assert_eq!(
        result,
        CurrentResult::Failure(PipelineError::PassFailed {
            pass: "zz-always-fails".to_string(),
            source: PassError::Failed("refused".to_string()),
        })
    );
}

#[test]
fn panicking_pass_becomes_a_failure() {
    let pipeline = passes(&["cse"])
        .into_iter()
        .chain([panicking_pass()])
        .collect::<Vec<_>>();
    let result = apply_pipeline(HELLO, &pipeline, &Context::default());
    let err = result.error().expect("failure");
    assert_eq!(err.pass(), Some("zz-always-panics"));
    assert_eq!(err.to_string(), "pass 'zz-always-panics' panicked: boom");
}

#[test]
fn parse_errors_are_failures() {
    let result = run("func.func @f() { %x = }", &["cse"]);
    assert!(matches!(
        result,
        CurrentResult::Failure(PipelineError::Parse(_))
    ));
}
