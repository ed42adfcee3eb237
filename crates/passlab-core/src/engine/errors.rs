//! Error types for pipeline evaluation and session control.

use passlab_frontend::FrontendError;
use passlab_ir::PassError;
use thiserror::Error;

/// Why the current pipeline could not produce a program.
///
/// Stored inside [`crate::CurrentResult`], so it is `Clone + PartialEq`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The source text did not parse.
    #[error(transparent)]
    Parse(#[from] FrontendError),

    /// A pass returned an error.
    #[error("pass '{pass}' failed: {source}")]
    PassFailed { pass: String, source: PassError },

    /// A pass panicked; the payload is kept as text.
    #[error("pass '{pass}' panicked: {message}")]
    PassPanicked { pass: String, message: String },
}

impl PipelineError {
    /// Name of the pass that failed, if a pass is to blame.
    pub fn pass(&self) -> Option<&str> {
        match self {
            Self::Parse(_) => None,
            Self::PassFailed { pass, .. } | Self::PassPanicked { pass, .. } => Some(pass),
        }
    }
}

/// Rejected session mutations. The state is left unchanged.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown pass '{0}'")]
    UnknownPass(String),
}
