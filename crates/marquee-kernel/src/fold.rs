//! The shared left-to-right fold behind both evaluator styles.
//!
//! Ordering and short-circuit rules live here and only here:
//!
//! 1. disabled definitions are ignored entirely;
//! 2. any pending source, or (per [`LoadingPolicy`]) a fetch in flight while
//!    some source has no data, yields loading before anything is validated;
//! 3. definitions are walked in list order and the first failure stops the
//!    walk, so later definitions are never inspected;
//! 4. only when every definition validated is a record produced.
//!
//! What a verdict turns into is the [`FailureSink`]'s business.

use crate::definition::QueryDefinition;
use crate::error::LoadError;
use crate::filter::filter_active;
use crate::outcome::{
    BoundaryDirective, CombinedOutcome, Loadable, ValidRecord, ValidationOutcome,
};
use std::any::Any;

/// When an in-flight fetch should block validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingPolicy {
    pub loader_on_fetch: bool,
}

/// Strategy turning the fold's verdict into the caller's result type.
pub trait FailureSink<K, E> {
    type Output;

    fn loading(self) -> Self::Output;
    fn fail(self, error: LoadError<E>) -> Self::Output;
    fn succeed(self, record: ValidRecord<K>) -> Self::Output;
}

/// Returns failures as data: a [`BoundaryDirective`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Render;

impl<K, E> FailureSink<K, E> for Render {
    type Output = BoundaryDirective<K, E>;

    fn loading(self) -> Self::Output {
        BoundaryDirective::Loading
    }

    fn fail(self, error: LoadError<E>) -> Self::Output {
        BoundaryDirective::Error(error)
    }

    fn succeed(self, record: ValidRecord<K>) -> Self::Output {
        BoundaryDirective::Valid(record)
    }
}

/// Raises failures as `Err`, for `?`-propagation to an enclosing boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raise;

impl<K, E> FailureSink<K, E> for Raise {
    type Output = Result<Loadable<ValidRecord<K>>, LoadError<E>>;

    fn loading(self) -> Self::Output {
        Ok(Loadable::Loading)
    }

    fn fail(self, error: LoadError<E>) -> Self::Output {
        Err(error)
    }

    fn succeed(self, record: ValidRecord<K>) -> Self::Output {
        Ok(Loadable::Ready(record))
    }
}

/// Keeps the four-way [`CombinedOutcome`] shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collect;

impl<K, E> FailureSink<K, E> for Collect {
    type Output = CombinedOutcome<K, E>;

    fn loading(self) -> Self::Output {
        ValidationOutcome::Pending
    }

    fn fail(self, error: LoadError<E>) -> Self::Output {
        match error {
            LoadError::Source(error) => ValidationOutcome::SourceError { error },
            LoadError::Validation(error) => ValidationOutcome::ValidationError { error },
        }
    }

    fn succeed(self, record: ValidRecord<K>) -> Self::Output {
        ValidationOutcome::Valid { data: record }
    }
}

enum Step<E> {
    Wait,
    Fail(LoadError<E>),
    Accept(Box<dyn Any>),
}

fn step<K, E: Clone>(def: &QueryDefinition<'_, K, E>) -> Step<E> {
    let source = def.source();
    if source.is_error() {
        return match source.error() {
            Some(error) => Step::Fail(LoadError::Source(error.clone())),
            None => {
                tracing::warn!("source reports an error without an error value; waiting");
                Step::Wait
            }
        };
    }
    let Some(raw) = source.data() else {
        // Settled without data: nothing to validate yet.
        return Step::Wait;
    };
    match def.validate(raw) {
        Ok(value) => Step::Accept(value),
        Err(error) => Step::Fail(LoadError::Validation(error)),
    }
}

/// Fold `defs` into one verdict and hand it to `sink`.
pub fn fold<K, E, F>(
    defs: &[QueryDefinition<'_, K, E>],
    policy: LoadingPolicy,
    sink: F,
) -> F::Output
where
    K: Ord + Clone,
    E: Clone,
    F: FailureSink<K, E>,
{
    let active = filter_active(defs);
    let readiness = active.readiness();
    if readiness.blocks(policy.loader_on_fetch) {
        tracing::debug!(
            definitions = active.len(),
            pending = readiness.is_pending,
            fetching = readiness.is_fetching,
            has_data = readiness.has_data,
            "evaluation blocked on sources"
        );
        return sink.loading();
    }

    let mut record = ValidRecord::new();
    for (position, def) in active.active.iter().enumerate() {
        match step(def) {
            Step::Wait => {
                tracing::debug!(position, "definition has nothing to validate yet");
                return sink.loading();
            }
            Step::Fail(error) => {
                tracing::debug!(
                    position,
                    source_error = error.is_source(),
                    "evaluation stopped at first failure"
                );
                return sink.fail(error);
            }
            Step::Accept(value) => {
                tracing::trace!(position, "definition validated");
                record.insert(def.key().clone(), value);
            }
        }
    }

    tracing::debug!(keys = record.len(), "all definitions validated");
    sink.succeed(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceSnapshot;
    use crate::validator::{Issue, Issues};
    use serde_json::{Value, json};
    use std::cell::Cell;

    fn any(raw: &Value) -> Result<Value, Issues> {
        Ok(raw.clone())
    }

    fn requires_array(raw: &Value) -> Result<Vec<Value>, Issues> {
        raw.as_array()
            .cloned()
            .ok_or_else(|| Issue::at_root("expected array").into())
    }

    #[test]
    fn sinks_agree_on_the_failing_definition() {
        let valid: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": "Arrival"}));
        let broken: SourceSnapshot<String> = SourceSnapshot::success(json!({"notAnArray": true}));
        let failed: SourceSnapshot<String> = SourceSnapshot::failure("HTTP 404".to_string());
        let defs = vec![
            QueryDefinition::new("movie", &valid, any),
            QueryDefinition::new("credits", &broken, requires_array),
            QueryDefinition::new("showtimes", &failed, any),
        ];

        let rendered = fold(&defs, LoadingPolicy::default(), Render);
        let raised = fold(&defs, LoadingPolicy::default(), Raise).expect_err("raises");
        let collected = fold(&defs, LoadingPolicy::default(), Collect);

        assert_eq!(rendered.error(), Some(&raised));
        assert!(raised.is_validation());
        assert_eq!(collected.kind(), crate::outcome::OutcomeKind::ValidationError);
    }

    #[test]
    fn walk_stops_before_later_validators_run() {
        let calls = Cell::new(0);
        let counting = |raw: &Value| -> Result<Value, Issues> {
            calls.set(calls.get() + 1);
            Ok(raw.clone())
        };
        let failed: SourceSnapshot<String> = SourceSnapshot::failure("HTTP 404".to_string());
        let later: SourceSnapshot<String> = SourceSnapshot::success(json!([]));
        let defs = vec![
            QueryDefinition::new("movie", &failed, counting),
            QueryDefinition::new("credits", &later, counting),
        ];

        let directive = fold(&defs, LoadingPolicy::default(), Render);
        assert!(directive.error().is_some_and(LoadError::is_source));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn settled_source_without_data_waits() {
        let empty: SourceSnapshot<String> = SourceSnapshot {
            is_pending: false,
            is_fetching: false,
            is_error: false,
            error: None,
            data: None,
        };
        let defs = vec![QueryDefinition::new("movie", &empty, any)];
        assert!(fold(&defs, LoadingPolicy::default(), Render).is_loading());
    }
}
