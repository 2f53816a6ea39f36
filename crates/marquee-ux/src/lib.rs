//! UX composition layer.
//!
//! The kernel decides *which* verdict a set of sources produces; this crate
//! decides nothing about that and only dispatches a verdict to the
//! caller's presentation. Loading and error presentation are supplied by
//! the caller as a [`Fallback`] and stay opaque here.

pub mod view;

pub use view::{DirectiveView, ErrorKind, ErrorView, JsonFallback, ViewError};

use marquee_kernel::{
    BoundaryDirective, BoundaryOptions, LoadError, Loadable, QueryDefinition, ValidRecord,
    evaluate_combined,
};

/// Caller-supplied presentation for the non-valid verdicts.
pub trait Fallback<E> {
    type View;

    fn loading(&self) -> Self::View;
    fn error(&self, error: &LoadError<E>) -> Self::View;
}

/// Render-style boundary: evaluate inline and pick a render path.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBoundary {
    options: BoundaryOptions,
}

impl QueryBoundary {
    pub fn new(options: BoundaryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BoundaryOptions {
        &self.options
    }

    pub fn directive<K, E>(&self, defs: &[QueryDefinition<'_, K, E>]) -> BoundaryDirective<K, E>
    where
        K: Ord + Clone,
        E: Clone,
    {
        evaluate_combined(defs, &self.options)
    }

    /// Evaluate `defs`; hand a valid record to `on_valid`, anything else to
    /// `fallback`.
    pub fn render<K, E, F>(
        &self,
        defs: &[QueryDefinition<'_, K, E>],
        fallback: &F,
        on_valid: impl FnOnce(ValidRecord<K>) -> F::View,
    ) -> F::View
    where
        K: Ord + Clone,
        E: Clone,
        F: Fallback<E>,
    {
        match self.directive(defs) {
            BoundaryDirective::Loading => fallback.loading(),
            BoundaryDirective::Error(error) => fallback.error(&error),
            BoundaryDirective::Valid(record) => on_valid(record),
        }
    }
}

/// Enclosing boundary for throw-style loaders.
///
/// The body loads with `evaluate_or_throw(..)?` at any depth; whatever it
/// raises is presented here, uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBoundary;

impl ErrorBoundary {
    pub fn catch<E, F>(
        fallback: &F,
        body: impl FnOnce() -> Result<Loadable<F::View>, LoadError<E>>,
    ) -> F::View
    where
        F: Fallback<E>,
    {
        match body() {
            Ok(Loadable::Ready(view)) => view,
            Ok(Loadable::Loading) => fallback.loading(),
            Err(error) => {
                tracing::debug!(source_error = error.is_source(), "error boundary caught failure");
                fallback.error(&error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_kernel::{Issue, Issues, SourceSnapshot, evaluate_or_throw};
    use serde_json::{Value, json};

    struct TextFallback;

    impl Fallback<String> for TextFallback {
        type View = String;

        fn loading(&self) -> String {
            "Loading…".to_string()
        }

        fn error(&self, error: &LoadError<String>) -> String {
            format!("Something went wrong: {error}")
        }
    }

    fn title(raw: &Value) -> Result<String, Issues> {
        raw.get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Issue::new("$.title", "expected string").into())
    }

    fn movie_header(defs: &[QueryDefinition<'_, &'static str, String>]) -> String {
        QueryBoundary::default().render(defs, &TextFallback, |record| {
            format!(
                "Now showing: {}",
                record.get::<String>(&"movie").map_or("?", String::as_str)
            )
        })
    }

    #[test]
    fn boundary_dispatches_each_verdict() {
        let pending: SourceSnapshot<String> = SourceSnapshot::pending();
        let failed: SourceSnapshot<String> = SourceSnapshot::failure("HTTP 404".to_string());
        let loaded: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": "Arrival"}));

        assert_eq!(
            movie_header(&[QueryDefinition::new("movie", &pending, title)]),
            "Loading…"
        );
        assert_eq!(
            movie_header(&[QueryDefinition::new("movie", &failed, title)]),
            "Something went wrong: HTTP 404"
        );
        assert_eq!(
            movie_header(&[QueryDefinition::new("movie", &loaded, title)]),
            "Now showing: Arrival"
        );
    }

    #[test]
    fn error_boundary_catches_nested_raise() {
        let loaded: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": "Arrival"}));
        let malformed: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": 7}));

        fn seat_map(
            defs: &[QueryDefinition<'_, &'static str, String>],
        ) -> Result<Loadable<String>, LoadError<String>> {
            let loaded = evaluate_or_throw(defs)?;
            Ok(loaded.map(|record| {
                format!("Seats for {}", record.get::<String>(&"movie").map_or("?", String::as_str))
            }))
        }

        let ok_defs = [QueryDefinition::new("movie", &loaded, title)];
        assert_eq!(
            ErrorBoundary::catch(&TextFallback, || seat_map(&ok_defs)),
            "Seats for Arrival"
        );

        let bad_defs = [QueryDefinition::new("movie", &malformed, title)];
        assert_eq!(
            ErrorBoundary::catch(&TextFallback, || seat_map(&bad_defs)),
            "Something went wrong: validation failed: $.title: expected string"
        );
    }

    #[test]
    fn loader_on_fetch_option_reaches_the_kernel() {
        let cold: SourceSnapshot<String> = SourceSnapshot {
            is_fetching: true,
            ..SourceSnapshot::failure("HTTP 503".to_string())
        };
        let defs = [QueryDefinition::new("movie", &cold, title)];
        let boundary = QueryBoundary::new(BoundaryOptions {
            loader_on_fetch: true,
        });
        assert!(boundary.directive(&defs).is_loading());
        assert!(QueryBoundary::default().directive(&defs).error().is_some());
    }
}
