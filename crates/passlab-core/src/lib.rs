//! # passlab core
//!
//! Pipeline state and condensation engine: applies a pass pipeline to source
//! text and works out which catalog passes would change the result.

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;

pub use config::{ConfigError, SessionConfig};
pub use engine::apply::{apply_pipeline, run_pass, CurrentResult};
pub use engine::condense::{condense, condense_with_outcomes, trial, TrialOutcome};
pub use engine::errors::{PipelineError, SessionError};
pub use engine::state::{PipelineState, Update};

#[cfg(test)]
pub(crate) mod test_support {
    use passlab_ir::passes::{boxed, builtin_passes};
    use passlab_ir::{Context, Module, ModulePass, PassCatalog, PassDefinition, PassError};

    pub const HELLO: &str = r#"
builtin.module {
  func.func @hello(%n : index) -> index {
    %two = arith.constant 2 : index
    %res = arith.muli %n, %two : index
    func.return %res : index
  }
}
"#;

    #[derive(Default)]
    struct AlwaysFails;

    impl ModulePass for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn apply(&self, _ctx: &mut Context, _module: &mut Module) -> Result<(), PassError> {
            Err(PassError::Failed("refused".to_string()))
        }
    }

    #[derive(Default)]
    struct AlwaysPanics;

    impl ModulePass for AlwaysPanics {
        fn name(&self) -> &'static str {
            "always-panics"
        }

        fn apply(&self, _ctx: &mut Context, _module: &mut Module) -> Result<(), PassError> {
            panic!("pass exploded")
        }
    }

    pub fn failing() -> PassDefinition {
        PassDefinition::new("always-fails", "fails on every input", boxed::<AlwaysFails>)
    }

    pub fn panicking() -> PassDefinition {
        PassDefinition::new("always-panics", "panics on every input", boxed::<AlwaysPanics>)
    }

    pub fn catalog_with_test_passes() -> PassCatalog {
        let mut passes = builtin_passes();
        passes.push(failing());
        passes.push(panicking());
        PassCatalog::new(passes).expect("unique pass names")
    }

    pub fn hello() -> Module {
        passlab_frontend::parse(HELLO).expect("hello parses")
    }
}
