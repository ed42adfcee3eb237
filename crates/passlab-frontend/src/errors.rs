//! Error types for parsing.

use std::fmt;

use thiserror::Error;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub(crate) fn of(span: pest::Span<'_>) -> Self {
        let (line, column) = span.start_pos().line_col();
        Self {
            line: line as u32,
            column: column as u32,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while turning source text into a module.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
    /// Syntax error reported by the grammar.
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("{at}: use of undefined value %{name}")]
    UndefinedValue { name: String, at: SourcePosition },

    #[error("{at}: redefinition of value %{name}")]
    Redefinition { name: String, at: SourcePosition },

    #[error("{at}: unregistered operation '{name}'")]
    UnregisteredOperation { name: String, at: SourcePosition },

    #[error("{at}: invalid type '{text}'")]
    InvalidType { text: String, at: SourcePosition },

    /// A registered operation written with the wrong shape.
    #[error("{at}: '{op}' {message}")]
    MalformedOperation {
        op: String,
        message: String,
        at: SourcePosition,
    },
}

impl FrontendError {
    pub(crate) fn malformed(
        op: impl Into<String>,
        message: impl Into<String>,
        at: SourcePosition,
    ) -> Self {
        Self::MalformedOperation {
            op: op.into(),
            message: message.into(),
            at,
        }
    }

    /// Source position of the error, when known.
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            Self::ParseError(_) => None,
            Self::UndefinedValue { at, .. }
            | Self::Redefinition { at, .. }
            | Self::UnregisteredOperation { at, .. }
            | Self::InvalidType { at, .. }
            | Self::MalformedOperation { at, .. } => Some(*at),
        }
    }
}
