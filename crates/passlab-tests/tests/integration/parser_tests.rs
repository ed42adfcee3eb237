use passlab_frontend::{parse, parse_module, FrontendError};
use passlab_ir::{Context, Type};
use passlab_tests::{parse_sample, HELLO, SAMPLES};

#[test]
fn all_samples_parse_and_verify() {
    let ctx = Context::with_all_dialects(true);
    for (name, source) in SAMPLES {
        let module = parse(source).unwrap_or_else(|e| panic!("sample {} failed: {}", name, e));
        passlab_ir::passes::verify_module(&ctx, &module)
            .unwrap_or_else(|e| panic!("sample {} does not verify: {}", name, e));
    }
}

#[test]
fn samples_survive_a_print_round_trip() {
    for (name, source) in SAMPLES {
        let module = parse_sample(source);
        let printed = module.to_string();
        let reparsed = parse(&printed).unwrap_or_else(|e| panic!("{}: {}", name, e));
        assert!(
            reparsed.is_structurally_equivalent(&module),
            "{} changed after printing:\n{}",
            name,
            printed
        );
    }
}

#[test]
fn hello_prints_in_canonical_form() {
    let expected = "builtin.module {\n  func.func @hello(%n : index) -> index {\n    %two = arith.constant 2 : index\n    %res = arith.muli %n, %two : index\n    func.return %res : index\n  }\n}\n";
    assert_eq!(parse_sample(HELLO).to_string(), expected);
}

#[test]
fn multiple_results_keep_their_order() {
    let module = parse_sample(passlab_tests::DIVIDE);
    let func = &module.functions[0];
    assert_eq!(func.result_types, vec![Type::Integer(8), Type::Integer(8)]);
    let ret = func.body.last().expect("terminator");
    let names: Vec<_> = ret.operands.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["q", "r"]);
}

#[test]
fn strict_context_rejects_generic_operations() {
    let strict = Context::with_all_dialects(false);
    assert!(matches!(
        parse_module(&strict, passlab_tests::GENERIC),
        Err(FrontendError::UnregisteredOperation { .. })
    ));
}

#[test]
fn errors_report_line_and_column() {
    let source = "func.func @f() -> index {\n  %a = arith.constant 1 : index\n  %a = arith.constant 2 : index\n  func.return %a : index\n}\n";
    let err = parse(source).unwrap_err();
    let at = err.position().expect("positioned error");
    assert_eq!((at.line, at.column), (3, 3));
    assert!(err.to_string().starts_with("3:3: redefinition of value %a"));
}
