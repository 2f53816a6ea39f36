//! Verdict types produced by the resolver and the evaluators.

use crate::error::{LoadError, ValidationError};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Verdict for one source checked against one validator.
///
/// Exactly one variant holds; there is no state in which a source is both
/// pending and failed, or failed and valid.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T, E> {
    Pending,
    SourceError { error: E },
    ValidationError { error: ValidationError },
    Valid { data: T },
}

/// Discriminant of a [`ValidationOutcome`], for logs and serialized views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Pending,
    SourceError,
    ValidationError,
    Valid,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Pending => "pending",
            OutcomeKind::SourceError => "source_error",
            OutcomeKind::ValidationError => "validation_error",
            OutcomeKind::Valid => "valid",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T, E> ValidationOutcome<T, E> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ValidationOutcome::Pending => OutcomeKind::Pending,
            ValidationOutcome::SourceError { .. } => OutcomeKind::SourceError,
            ValidationOutcome::ValidationError { .. } => OutcomeKind::ValidationError,
            ValidationOutcome::Valid { .. } => OutcomeKind::Valid,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ValidationOutcome::Pending)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationOutcome<U, E> {
        match self {
            ValidationOutcome::Pending => ValidationOutcome::Pending,
            ValidationOutcome::SourceError { error } => ValidationOutcome::SourceError { error },
            ValidationOutcome::ValidationError { error } => {
                ValidationOutcome::ValidationError { error }
            }
            ValidationOutcome::Valid { data } => ValidationOutcome::Valid { data: f(data) },
        }
    }

    /// `None` while pending, otherwise the settled result.
    pub fn into_result(self) -> Option<Result<T, LoadError<E>>> {
        match self {
            ValidationOutcome::Pending => None,
            ValidationOutcome::SourceError { error } => Some(Err(LoadError::Source(error))),
            ValidationOutcome::ValidationError { error } => {
                Some(Err(LoadError::Validation(error)))
            }
            ValidationOutcome::Valid { data } => Some(Ok(data)),
        }
    }
}

/// Validated values of every enabled definition, keyed by definition key.
///
/// Values keep the type their validator produced; read them back with
/// [`ValidRecord::get`] or [`ValidRecord::take`] naming that type.
pub struct ValidRecord<K> {
    values: BTreeMap<K, Box<dyn Any>>,
}

impl<K: Ord> ValidRecord<K> {
    pub(crate) fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Later inserts for the same key replace earlier ones.
    pub(crate) fn insert(&mut self, key: K, value: Box<dyn Any>) {
        self.values.insert(key, value);
    }

    /// Borrow the value for `key` as `T`. `None` if the key is absent or the
    /// validator produced a different type.
    pub fn get<T: 'static>(&self, key: &K) -> Option<&T> {
        self.values.get(key)?.downcast_ref::<T>()
    }

    /// Move the value for `key` out as `T`. On a type mismatch the value is
    /// left in place.
    pub fn take<T: 'static>(&mut self, key: &K) -> Option<T> {
        let (key, value) = self.values.remove_entry(key)?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                self.values.insert(key, value);
                None
            }
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: fmt::Debug> fmt::Debug for ValidRecord<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidRecord")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Four-way verdict over a whole definition list.
pub type CombinedOutcome<K, E> = ValidationOutcome<ValidRecord<K>, E>;

/// Render-style verdict: what a call site should draw.
#[derive(Debug)]
pub enum BoundaryDirective<K, E> {
    Loading,
    Error(LoadError<E>),
    Valid(ValidRecord<K>),
}

impl<K, E> BoundaryDirective<K, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, BoundaryDirective::Loading)
    }

    pub fn error(&self) -> Option<&LoadError<E>> {
        match self {
            BoundaryDirective::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_valid(self) -> Option<ValidRecord<K>> {
        match self {
            BoundaryDirective::Valid(record) => Some(record),
            _ => None,
        }
    }
}

impl<K, E> From<CombinedOutcome<K, E>> for BoundaryDirective<K, E> {
    fn from(outcome: CombinedOutcome<K, E>) -> Self {
        match outcome {
            ValidationOutcome::Pending => BoundaryDirective::Loading,
            ValidationOutcome::SourceError { error } => {
                BoundaryDirective::Error(LoadError::Source(error))
            }
            ValidationOutcome::ValidationError { error } => {
                BoundaryDirective::Error(LoadError::Validation(error))
            }
            ValidationOutcome::Valid { data } => BoundaryDirective::Valid(data),
        }
    }
}

/// Non-failing result of a throw-style evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Loadable::Loading => None,
            Loadable::Ready(value) => Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Ready(value) => Loadable::Ready(f(value)),
        }
    }
}
