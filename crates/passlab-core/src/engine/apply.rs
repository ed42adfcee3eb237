//! Pipeline applier: source text plus pass sequence to a result.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use passlab_frontend::parse_module;
use passlab_ir::{Context, Module, PassDefinition};
use tracing::{debug, info};

use crate::engine::errors::PipelineError;

/// The derived state of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CurrentResult {
    /// No source text.
    #[default]
    Empty,
    /// The source parsed and every pass succeeded.
    Program(Module),
    /// Parsing or a pass failed.
    Failure(PipelineError),
}

impl CurrentResult {
    pub fn program(&self) -> Option<&Module> {
        match self {
            Self::Program(module) => Some(module),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Result<Module, PipelineError>> for CurrentResult {
    fn from(result: Result<Module, PipelineError>) -> Self {
        match result {
            Ok(module) => Self::Program(module),
            Err(err) => Self::Failure(err),
        }
    }
}

/// Clones `template` and loads every known dialect into the copy.
pub fn fresh_context(template: &Context) -> Context {
    let mut ctx = template.clone();
    ctx.load_all_dialects();
    ctx
}

/// Parses `source` and applies `pipeline` in order.
///
/// Empty source yields [`CurrentResult::Empty`] without parsing. The first
/// failing pass aborts the rest and its error becomes the result; the
/// partially transformed program is dropped.
pub fn apply_pipeline(
    source: &str,
    pipeline: &[PassDefinition],
    template: &Context,
) -> CurrentResult {
    if source.is_empty() {
        return CurrentResult::Empty;
    }
    let result = run_pipeline(source, pipeline, template);
    if let Err(err) = &result {
        info!(error = %err, "pipeline evaluation failed");
    }
    result.into()
}

fn run_pipeline(
    source: &str,
    pipeline: &[PassDefinition],
    template: &Context,
) -> Result<Module, PipelineError> {
    let mut ctx = fresh_context(template);
    let mut module = parse_module(&ctx, source)?;
    for def in pipeline {
        run_pass(def, &mut ctx, &mut module)?;
        debug!(pass = def.name(), ops = module.op_count(), "applied pass");
    }
    Ok(module)
}

/// Instantiates `def` and applies it, turning errors and panics into
/// [`PipelineError`].
pub fn run_pass(
    def: &PassDefinition,
    ctx: &mut Context,
    module: &mut Module,
) -> Result<(), PipelineError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| def.instantiate().apply(ctx, module)));
    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(PipelineError::PassFailed {
            pass: def.name().to_string(),
            source,
        }),
        Err(payload) => Err(PipelineError::PassPanicked {
            pass: def.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
