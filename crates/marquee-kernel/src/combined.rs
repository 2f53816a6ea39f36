//! Render-style combined boundary evaluation.

use crate::definition::QueryDefinition;
use crate::fold::{Collect, LoadingPolicy, Render, fold};
use crate::outcome::{BoundaryDirective, CombinedOutcome};
use serde::{Deserialize, Serialize};

/// Options for a render-style boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryOptions {
    /// Show the loader while a fetch is in flight and some source has never
    /// delivered data. Off by default: cached data is validated and shown
    /// while background refreshes run.
    #[serde(default)]
    pub loader_on_fetch: bool,
}

impl BoundaryOptions {
    pub fn loading_policy(&self) -> LoadingPolicy {
        LoadingPolicy {
            loader_on_fetch: self.loader_on_fetch,
        }
    }
}

/// Evaluate `defs` into a loading / error / valid directive. Never panics
/// and never raises: every failure is returned as data.
pub fn evaluate_combined<K, E>(
    defs: &[QueryDefinition<'_, K, E>],
    options: &BoundaryOptions,
) -> BoundaryDirective<K, E>
where
    K: Ord + Clone,
    E: Clone,
{
    fold(defs, options.loading_policy(), Render)
}

/// Same evaluation as [`evaluate_combined`], reported in the four-way
/// [`CombinedOutcome`] shape.
pub fn evaluate_outcome<K, E>(
    defs: &[QueryDefinition<'_, K, E>],
    options: &BoundaryOptions,
) -> CombinedOutcome<K, E>
where
    K: Ord + Clone,
    E: Clone,
{
    fold(defs, options.loading_policy(), Collect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::outcome::OutcomeKind;
    use crate::source::SourceSnapshot;
    use crate::validator::{Issue, Issues};
    use serde_json::{Value, json};
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Movie {
        title: String,
    }

    fn requires_title_string(raw: &Value) -> Result<Movie, Issues> {
        match raw.get("title").and_then(Value::as_str) {
            Some(title) => Ok(Movie {
                title: title.to_string(),
            }),
            None => Err(Issue::new("$.title", "expected string").into()),
        }
    }

    fn requires_array(raw: &Value) -> Result<Vec<Value>, Issues> {
        raw.as_array()
            .cloned()
            .ok_or_else(|| Issue::at_root("expected array").into())
    }

    fn ok(raw: &Value) -> Result<Value, Issues> {
        Ok(raw.clone())
    }

    fn defaults() -> BoundaryOptions {
        BoundaryOptions::default()
    }

    #[test]
    fn single_valid_definition_yields_typed_record() {
        let movie: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": "Arrival"}));
        let defs = vec![QueryDefinition::new("movie", &movie, requires_title_string)];

        let record = evaluate_combined(&defs, &defaults())
            .into_valid()
            .expect("valid directive");
        assert_eq!(
            record.get::<Movie>(&"movie"),
            Some(&Movie {
                title: "Arrival".to_string()
            })
        );
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn source_error_short_circuits_before_later_validators() {
        let calls = Cell::new(0);
        let counting_array = |raw: &Value| -> Result<Vec<Value>, Issues> {
            calls.set(calls.get() + 1);
            requires_array(raw)
        };
        let movie: SourceSnapshot<String> = SourceSnapshot::failure("HTTP 404".to_string());
        let credits: SourceSnapshot<String> = SourceSnapshot::success(json!([]));
        let defs = vec![
            QueryDefinition::new("movie", &movie, ok),
            QueryDefinition::new("credits", &credits, counting_array),
        ];

        let directive = evaluate_combined(&defs, &defaults());
        assert_eq!(
            directive.error(),
            Some(&LoadError::Source("HTTP 404".to_string()))
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn validation_error_discards_earlier_valid_data() {
        let movie: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": "Arrival"}));
        let credits: SourceSnapshot<String> = SourceSnapshot::success(json!({"notAnArray": true}));
        let defs = vec![
            QueryDefinition::new("movie", &movie, ok),
            QueryDefinition::new("credits", &credits, requires_array),
        ];

        match evaluate_combined(&defs, &defaults()) {
            BoundaryDirective::Error(LoadError::Validation(error)) => {
                assert_eq!(error.raw, json!({"notAnArray": true}));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn short_circuit_reports_first_failure_in_list_order() {
        let a: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": "Arrival"}));
        let b: SourceSnapshot<String> = SourceSnapshot::failure("B failed".to_string());
        let c: SourceSnapshot<String> = SourceSnapshot::success(json!({}));
        let defs = vec![
            QueryDefinition::new("a", &a, ok),
            QueryDefinition::new("b", &b, ok),
            QueryDefinition::new("c", &c, requires_array),
        ];

        let outcome = evaluate_outcome(&defs, &defaults());
        assert_eq!(outcome.kind(), OutcomeKind::SourceError);
        let directive = evaluate_combined(&defs, &defaults());
        assert_eq!(
            directive.error().and_then(LoadError::as_source).map(String::as_str),
            Some("B failed")
        );
    }

    #[test]
    fn any_pending_source_dominates_errors() {
        let failed: SourceSnapshot<String> = SourceSnapshot::failure("HTTP 500".to_string());
        let pending: SourceSnapshot<String> = SourceSnapshot::pending();
        let defs = vec![
            QueryDefinition::new("movie", &failed, ok),
            QueryDefinition::new("seats", &pending, ok),
        ];

        assert!(evaluate_combined(&defs, &defaults()).is_loading());
        assert!(
            evaluate_combined(
                &defs,
                &BoundaryOptions {
                    loader_on_fetch: true
                }
            )
            .is_loading()
        );
    }

    #[test]
    fn background_refetch_keeps_cached_data_by_default() {
        let movie: SourceSnapshot<String> =
            SourceSnapshot::refetching(json!({"title": "Arrival"}));
        let credits: SourceSnapshot<String> = SourceSnapshot::success(json!([]));
        let defs = vec![
            QueryDefinition::new("movie", &movie, requires_title_string),
            QueryDefinition::new("credits", &credits, requires_array),
        ];

        let record = evaluate_combined(&defs, &defaults())
            .into_valid()
            .expect("stale-while-revalidate should validate cached data");
        assert_eq!(
            record.get::<Movie>(&"movie").map(|m| m.title.as_str()),
            Some("Arrival")
        );

        let with_loader = BoundaryOptions {
            loader_on_fetch: true,
        };
        assert!(
            evaluate_combined(&defs, &with_loader).into_valid().is_some(),
            "loader_on_fetch has no effect once every source has data"
        );
    }

    #[test]
    fn loader_on_fetch_blocks_while_some_source_has_no_data() {
        let movie: SourceSnapshot<String> =
            SourceSnapshot::refetching(json!({"title": "Arrival"}));
        let retrying: SourceSnapshot<String> = SourceSnapshot {
            is_fetching: true,
            ..SourceSnapshot::failure("HTTP 503".to_string())
        };
        let defs = vec![
            QueryDefinition::new("movie", &movie, ok),
            QueryDefinition::new("credits", &retrying, ok),
        ];

        assert!(
            evaluate_combined(
                &defs,
                &BoundaryOptions {
                    loader_on_fetch: true
                }
            )
            .is_loading()
        );
        assert!(
            evaluate_combined(&defs, &defaults())
                .error()
                .is_some_and(LoadError::is_source)
        );
    }

    #[test]
    fn record_keys_are_exactly_the_enabled_keys() {
        let movie: SourceSnapshot<String> = SourceSnapshot::success(json!({"title": "Arrival"}));
        let theatre: SourceSnapshot<String> = SourceSnapshot::success(json!({"name": "Rex"}));
        let seats: SourceSnapshot<String> = SourceSnapshot::pending();
        let defs = vec![
            QueryDefinition::new("movie", &movie, ok),
            QueryDefinition::new("seats", &seats, ok).enabled(false),
            QueryDefinition::new("theatre", &theatre, ok),
        ];

        let record = evaluate_combined(&defs, &defaults())
            .into_valid()
            .expect("disabled pending source must not block");
        assert_eq!(record.keys().copied().collect::<Vec<_>>(), vec!["movie", "theatre"]);
    }

    #[test]
    fn empty_list_is_vacuously_valid() {
        let defs: Vec<QueryDefinition<'_, &str, String>> = Vec::new();
        let record = evaluate_combined(&defs, &defaults())
            .into_valid()
            .expect("nothing to wait for");
        assert!(record.is_empty());
    }

    #[test]
    fn options_parse_from_camel_case() {
        let options: BoundaryOptions =
            serde_json::from_value(json!({"loaderOnFetch": true})).expect("options parse");
        assert!(options.loader_on_fetch);
        let options: BoundaryOptions = serde_json::from_value(json!({})).expect("defaults");
        assert!(!options.loader_on_fetch);
    }
}
