//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Malformed producer text is
//! never an error: the interpretation layer absorbs it into sentinel values.

use thiserror::Error;

/// Invalid arguments to the interpretation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("target count {requested} outside [{min}, {max}]")]
    TargetCountOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("invalid count bounds: min {min} > max {max}")]
    InvalidBounds { min: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("UI error: {0}")]
    Ui(String),

    #[error(transparent)]
    Interpret(#[from] InterpretError),
}
