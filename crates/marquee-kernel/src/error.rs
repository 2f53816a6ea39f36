//! Failure types surfaced by the evaluators.

use crate::validator::Issues;
use serde_json::Value;

/// A source delivered data, but the data failed its validator.
///
/// Always carries the raw payload that was received, so a report can show
/// both what was wrong and what arrived.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", summary(.message.as_deref(), .issues))]
pub struct ValidationError {
    pub message: Option<String>,
    pub issues: Issues,
    pub raw: Value,
}

impl ValidationError {
    pub fn new(message: Option<&str>, issues: Issues, raw: Value) -> Self {
        Self {
            message: message.map(str::to_string),
            issues,
            raw,
        }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

fn summary(message: Option<&str>, issues: &Issues) -> String {
    let head = message.unwrap_or("validation failed");
    if issues.is_empty() {
        head.to_string()
    } else {
        format!("{head}: {issues}")
    }
}

/// The first failure found by an evaluation.
///
/// `Source` relays the source's own error value unchanged; `Validation` is
/// built by the kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError<E> {
    #[error("{0}")]
    Source(E),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl<E> LoadError<E> {
    pub fn is_source(&self) -> bool {
        matches!(self, LoadError::Source(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LoadError::Validation(_))
    }

    pub fn as_source(&self) -> Option<&E> {
        match self {
            LoadError::Source(error) => Some(error),
            LoadError::Validation(_) => None,
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LoadError::Source(_) => None,
            LoadError::Validation(error) => Some(error),
        }
    }
}
