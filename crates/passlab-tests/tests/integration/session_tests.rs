use passlab_core::{CurrentResult, PipelineError, PipelineState, SessionConfig, SessionError};
use passlab_ir::{Context, PassCatalog};
use passlab_tests::{extended_catalog, FOLD, HELLO};

fn names(state: &PipelineState) -> Vec<&'static str> {
    state.available().iter().map(|d| d.name()).collect()
}

#[test]
fn scenario_fold_then_inspect() {
    let mut state = PipelineState::new(PassCatalog::builtin(), Context::default());
    state.set_source(FOLD);
    state.set_condense(true);
    assert_eq!(names(&state), vec!["canonicalize", "constant-fold", "dce"]);

    state.push_pass("constant-fold").expect("known pass");
    assert_eq!(names(&state), vec!["canonicalize", "dce"]);

    state.push_pass("dce").expect("known pass");
    assert!(state.available().is_empty());
    assert_eq!(
        state.query_string("passlab-opt"),
        "passlab-opt -p constant-fold, dce"
    );

    let update = state.pop_pass();
    assert!(update.result_changed);
    assert!(update.available_changed);
    assert_eq!(names(&state), vec!["canonicalize", "dce"]);
}

#[test]
fn failure_suppresses_suggestions_until_fixed() {
    let mut state = PipelineState::new(extended_catalog(), Context::default());
    state.set_source(HELLO);
    state.push_pass("zz-always-fails").expect("known pass");
    state.push_pass("strength-reduce").expect("known pass");
    assert!(matches!(
        state.current(),
        CurrentResult::Failure(PipelineError::PassFailed { .. })
    ));
    assert!(state.available().is_empty());
    state.toggle_condense();
    assert!(state.available().is_empty());

    state.clear_pipeline();
    assert!(state.current().program().is_some());
    assert_eq!(
        names(&state),
        vec!["strength-reduce", "zz-always-fails", "zz-always-panics"]
    );
}

#[test]
fn condensation_toggle_never_touches_the_result() {
    let mut state = PipelineState::default();
    state.set_source(HELLO);
    let result = state.current().clone();
    let revision = state.revision();
    for _ in 0..4 {
        let update = state.toggle_condense();
        assert!(!update.result_changed);
        assert_eq!(state.current(), &result);
    }
    assert_eq!(state.revision(), revision + 4);
}

#[test]
fn unknown_pass_is_rejected() {
    let mut state = PipelineState::default();
    assert_eq!(
        state.push_pass("loop-unroll"),
        Err(SessionError::UnknownPass("loop-unroll".to_string()))
    );
    assert_eq!(state.revision(), 0);
}

#[test]
fn load_source_resets_the_pipeline() {
    let mut state = PipelineState::default();
    state.set_source(HELLO);
    state.push_pass("strength-reduce").expect("known pass");
    state.load_source(FOLD);
    assert!(state.pipeline().is_empty());
    let program = state.current().program().expect("program");
    assert!(program.function("area").is_some());
    assert!(program.function("hello").is_none());
}

#[test]
fn config_drives_the_initial_session() {
    let config = SessionConfig::from_toml_str(
        r#"
        tool_name = "opt"
        condense = true
        initial_passes = ["cse", "verify"]
        "#,
    )
    .expect("valid config");
    let mut state = PipelineState::from_config(&config).expect("known passes");
    assert_eq!(state.query_string(&config.tool_name), "opt -p cse, verify");
    assert!(state.current().is_empty());
    state.set_source(HELLO);
    assert_eq!(names(&state), vec!["strength-reduce"]);
}
