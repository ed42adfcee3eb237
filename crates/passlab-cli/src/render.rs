//! Text and JSON rendering of session state.

use passlab_core::{CurrentResult, PipelineState, TrialOutcome};
use passlab_ir::PassDefinition;
use serde::Serialize;

/// Shown in place of a program when there is no source text.
pub const NO_INPUT: &str = "No input";

/// The printed program, the error text, or [`NO_INPUT`].
pub fn render_result(result: &CurrentResult) -> String {
    match result {
        CurrentResult::Empty => NO_INPUT.to_string(),
        CurrentResult::Program(module) => module.to_string(),
        CurrentResult::Failure(err) => format!("error: {}", err),
    }
}

/// Numbered pass list; the numbers are accepted by `add`.
pub fn render_pass_list(passes: &[PassDefinition]) -> String {
    if passes.is_empty() {
        return "  (no passes available)\n".to_string();
    }
    let width = passes.iter().map(|p| p.name().len()).max().unwrap_or(0);
    passes
        .iter()
        .enumerate()
        .map(|(i, pass)| {
            format!(
                "  {:>2}. {:<width$}  {}\n",
                i + 1,
                pass.name(),
                pass.description(),
                width = width
            )
        })
        .collect()
}

/// Header plus the offered passes.
pub fn render_available(state: &PipelineState) -> String {
    let header = if state.is_condensed() {
        "Passes that change the program:"
    } else {
        "Available passes:"
    };
    format!("{}\n{}", header, render_pass_list(state.available()))
}

pub fn render_outcomes(outcomes: &[(PassDefinition, TrialOutcome)]) -> String {
    let width = outcomes
        .iter()
        .map(|(p, _)| p.name().len())
        .max()
        .unwrap_or(0);
    outcomes
        .iter()
        .map(|(pass, outcome)| {
            let verdict = match outcome {
                TrialOutcome::Changed => "changes the program".to_string(),
                TrialOutcome::Unchanged => "no effect".to_string(),
                TrialOutcome::Failed(err) => format!("fails: {}", err),
            };
            format!("  {:<width$}  {}\n", pass.name(), verdict, width = width)
        })
        .collect()
}

/// Machine-readable snapshot of a session, used by `--format json`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub query: String,
    pub pipeline: Vec<&'static str>,
    pub condensed: bool,
    pub status: &'static str,
    pub output: String,
    pub available: Vec<&'static str>,
}

impl Report {
    pub fn from_state(state: &PipelineState, tool: &str) -> Self {
        let status = match state.current() {
            CurrentResult::Empty => "empty",
            CurrentResult::Program(_) => "ok",
            CurrentResult::Failure(_) => "error",
        };
        Self {
            query: state.query_string(tool),
            pipeline: state.pipeline().iter().map(|p| p.name()).collect(),
            condensed: state.is_condensed(),
            status,
            output: render_result(state.current()),
            available: state.available().iter().map(|p| p.name()).collect(),
        }
    }
}
