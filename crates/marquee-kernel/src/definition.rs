use crate::error::ValidationError;
use crate::source::RemoteSource;
use crate::validator::{ErasedValidator, Issues, Validator};
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// One source to load, the key its value is reported under, and the
/// validator its payload must pass.
///
/// Definitions are rebuilt by the caller for every evaluation and carry no
/// identity between evaluations. Keys should be unique within one list; if
/// they are not, the last definition with a key wins in the output record.
pub struct QueryDefinition<'a, K, E> {
    key: K,
    source: &'a dyn RemoteSource<Error = E>,
    validator: Box<dyn ErasedValidator + 'a>,
    enabled: bool,
    message: Option<String>,
}

impl<'a, K, E> QueryDefinition<'a, K, E> {
    pub fn new<S, V>(key: K, source: &'a S, validator: V) -> Self
    where
        S: RemoteSource<Error = E>,
        V: Validator + 'a,
        V::Output: 'static,
    {
        Self {
            key,
            source,
            validator: Box::new(validator),
            enabled: true,
            message: None,
        }
    }

    /// Disabled definitions take no part in an evaluation: they neither
    /// block nor unblock it and never appear in the output.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Message attached to this definition's validation errors.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn source(&self) -> &'a dyn RemoteSource<Error = E> {
        self.source
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn validate(&self, raw: &Value) -> Result<Box<dyn Any>, ValidationError> {
        self.validator
            .validate_erased(raw)
            .map_err(|issues: Issues| ValidationError::new(self.message(), issues, raw.clone()))
    }
}

impl<K: fmt::Debug, E> fmt::Debug for QueryDefinition<'_, K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDefinition")
            .field("key", &self.key)
            .field("enabled", &self.enabled)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
