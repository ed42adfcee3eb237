use std::io::Cursor;

use passlab_cli::{Repl, Report, DEMO_PROGRAM};
use passlab_core::PipelineState;
use passlab_tests::FOLD;

fn run_script(state: PipelineState, script: &str) -> (PipelineState, String) {
    let mut repl = Repl::new(state, "passlab-opt", Cursor::new(script.to_string()), Vec::new());
    repl.run().expect("in-memory io");
    let state = repl.state().clone();
    (state, String::from_utf8(repl.into_output()).expect("utf-8"))
}

#[test]
fn session_starts_with_demo_output_and_pass_list() {
    let mut state = PipelineState::default();
    state.set_source(DEMO_PROGRAM);
    let (_, output) = run_script(state, "quit\n");
    assert!(output.starts_with("passlab: type 'help' for commands\nbuiltin.module {\n"));
    assert!(output.contains("Available passes:\n   1. canonicalize"));
}

#[test]
fn load_file_and_build_pipeline() {
    let path = std::env::temp_dir().join(format!("passlab-cli-test-{}.ir", std::process::id()));
    std::fs::write(&path, FOLD).expect("write temp file");

    let script = format!(
        "load {}\ncondense\nadd constant-fold\nadd dce\nquery\nquit\n",
        path.display()
    );
    let (state, output) = run_script(PipelineState::default(), &script);
    std::fs::remove_file(&path).ok();

    assert_eq!(state.query_string("x"), "x -p constant-fold, dce");
    assert!(output.contains("%a = arith.constant 42 : i32"));
    assert!(output.contains("Passes that change the program:\n  (no passes available)"));
}

#[test]
fn json_report_is_serializable() {
    let mut state = PipelineState::default();
    state.set_source(DEMO_PROGRAM);
    state.push_pass("strength-reduce").expect("known pass");
    let report = Report::from_state(&state, "passlab-opt");
    let json = serde_json::to_value(&report).expect("serializes");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["query"], "passlab-opt -p strength-reduce");
    assert_eq!(json["pipeline"][0], "strength-reduce");
    assert_eq!(json["condensed"], false);
}
