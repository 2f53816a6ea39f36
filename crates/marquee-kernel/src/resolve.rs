//! Single-source resolver.

use crate::error::ValidationError;
use crate::outcome::ValidationOutcome;
use crate::source::RemoteSource;
use crate::validator::Validator;

/// Resolve one source against one validator.
///
/// Order of checks:
/// 1. pending, or failed before ever delivering data → `Pending`;
/// 2. failed with earlier data still held → `SourceError`;
/// 3. no payload to check → `Pending`;
/// 4. validator verdict → `Valid` or `ValidationError` (with `message`).
///
/// Case 1 folds "still loading" and "failed before first success" together:
/// for an inline single-source loader both simply mean there is nothing to
/// show yet. The multi-source evaluators do not use this folding; they
/// report every failed source as an error.
pub fn resolve<S, V>(
    source: &S,
    validator: &V,
    message: Option<&str>,
) -> ValidationOutcome<V::Output, S::Error>
where
    S: RemoteSource + ?Sized,
    S::Error: Clone,
    V: Validator + ?Sized,
{
    if source.is_pending() || (source.is_error() && !source.has_data()) {
        return ValidationOutcome::Pending;
    }

    if source.is_error() {
        return match source.error() {
            Some(error) => ValidationOutcome::SourceError {
                error: error.clone(),
            },
            None => {
                tracing::warn!(
                    "source reports an error without an error value; treating as pending"
                );
                ValidationOutcome::Pending
            }
        };
    }

    let Some(raw) = source.data() else {
        return ValidationOutcome::Pending;
    };

    match validator.validate(raw) {
        Ok(data) => ValidationOutcome::Valid { data },
        Err(issues) => {
            tracing::debug!(issues = issues.len(), "payload failed validation");
            ValidationOutcome::ValidationError {
                error: ValidationError::new(message, issues, raw.clone()),
            }
        }
    }
}
