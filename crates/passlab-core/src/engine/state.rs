//! Pipeline state controller.
//!
//! Owns the source text, the chosen pass sequence and the condensation mode,
//! and keeps two derived values in sync with them:
//!
//! 1. the current result, recomputed when the source or the pipeline changes
//! 2. the available pass list, recomputed when the current result or the mode
//!    changes
//!
//! Every mutating method performs exactly one refresh, bumps the revision
//! counter once and reports which derived values changed.

use passlab_ir::{Context, PassCatalog, PassDefinition};
use tracing::debug;

use crate::config::SessionConfig;
use crate::engine::apply::{apply_pipeline, CurrentResult};
use crate::engine::condense::{condense, condense_with_outcomes, TrialOutcome};
use crate::engine::errors::SessionError;

/// Which derived values a mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Update {
    pub result_changed: bool,
    pub available_changed: bool,
}

impl Update {
    pub fn any(self) -> bool {
        self.result_changed || self.available_changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refresh {
    /// Re-run the pipeline, then the available list.
    Result,
    /// Only the available list.
    Available,
}

/// The interactive session state.
#[derive(Debug, Clone)]
pub struct PipelineState {
    catalog: PassCatalog,
    context: Context,
    source: String,
    pipeline: Vec<PassDefinition>,
    condensed: bool,
    current: CurrentResult,
    available: Vec<PassDefinition>,
    revision: u64,
}

impl PipelineState {
    /// Empty source, empty pipeline, condensation off.
    pub fn new(catalog: PassCatalog, context: Context) -> Self {
        let available = catalog.as_slice().to_vec();
        Self {
            catalog,
            context,
            source: String::new(),
            pipeline: Vec::new(),
            condensed: false,
            current: CurrentResult::Empty,
            available,
            revision: 0,
        }
    }

    /// Builds a session over the built-in catalog from `config`.
    ///
    /// Unknown names in `initial_passes` are rejected.
    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        let mut state = Self::new(
            PassCatalog::builtin(),
            Context::new(config.allow_unregistered),
        );
        state.pipeline = config
            .initial_passes
            .iter()
            .map(|name| state.resolve(name))
            .collect::<Result<_, _>>()?;
        state.condensed = config.condense;
        state.current = apply_pipeline(&state.source, &state.pipeline, &state.context);
        state.available = state.compute_available();
        Ok(state)
    }

    pub fn catalog(&self) -> &PassCatalog {
        &self.catalog
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pipeline(&self) -> &[PassDefinition] {
        &self.pipeline
    }

    pub fn is_condensed(&self) -> bool {
        self.condensed
    }

    pub fn current(&self) -> &CurrentResult {
        &self.current
    }

    pub fn available(&self) -> &[PassDefinition] {
        &self.available
    }

    /// Number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The pipeline as a command line, e.g. `passlab-opt -p cse, dce`.
    pub fn query_string(&self, tool: &str) -> String {
        if self.pipeline.is_empty() {
            return tool.to_string();
        }
        let names: Vec<&str> = self.pipeline.iter().map(|def| def.name()).collect();
        format!("{} -p {}", tool, names.join(", "))
    }

    /// Trial outcome of every catalog pass on the current program, or `None`
    /// when there is no program.
    pub fn explain(&self) -> Option<Vec<(PassDefinition, TrialOutcome)>> {
        let program = self.current.program()?;
        Some(condense_with_outcomes(program, &self.catalog, &self.context))
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> Update {
        self.source = source.into();
        self.commit(Refresh::Result)
    }

    /// Replaces the source and clears the pipeline in one mutation.
    pub fn load_source(&mut self, source: impl Into<String>) -> Update {
        self.source = source.into();
        self.pipeline.clear();
        self.commit(Refresh::Result)
    }

    /// Appends the catalog pass called `name`.
    pub fn push_pass(&mut self, name: &str) -> Result<Update, SessionError> {
        let def = self.resolve(name)?;
        self.pipeline.push(def);
        Ok(self.commit(Refresh::Result))
    }

    /// Removes the last pass. A no-op on an empty pipeline.
    pub fn pop_pass(&mut self) -> Update {
        self.pipeline.pop();
        self.commit(Refresh::Result)
    }

    pub fn clear_pipeline(&mut self) -> Update {
        self.pipeline.clear();
        self.commit(Refresh::Result)
    }

    pub fn set_condense(&mut self, condensed: bool) -> Update {
        self.condensed = condensed;
        self.commit(Refresh::Available)
    }

    pub fn toggle_condense(&mut self) -> Update {
        self.set_condense(!self.condensed)
    }

    fn resolve(&self, name: &str) -> Result<PassDefinition, SessionError> {
        self.catalog
            .find(name)
            .copied()
            .ok_or_else(|| SessionError::UnknownPass(name.to_string()))
    }

    fn commit(&mut self, refresh: Refresh) -> Update {
        let mut update = Update::default();
        if refresh == Refresh::Result {
            let next = apply_pipeline(&self.source, &self.pipeline, &self.context);
            update.result_changed = next != self.current;
            self.current = next;
        }
        let available = self.compute_available();
        update.available_changed = available != self.available;
        self.available = available;
        self.revision += 1;
        debug!(
            revision = self.revision,
            passes = self.pipeline.len(),
            condensed = self.condensed,
            result_changed = update.result_changed,
            available_changed = update.available_changed,
            "pipeline state refreshed"
        );
        update
    }

    fn compute_available(&self) -> Vec<PassDefinition> {
        match &self.current {
            CurrentResult::Empty => self.catalog.as_slice().to_vec(),
            CurrentResult::Failure(_) => Vec::new(),
            CurrentResult::Program(_) if !self.condensed => self.catalog.as_slice().to_vec(),
            CurrentResult::Program(module) => condense(module, &self.catalog, &self.context),
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(PassCatalog::builtin(), Context::default())
    }
}
