//! Serializable views of verdicts, for JSON consumers.

use crate::Fallback;
use marquee_kernel::{BoundaryDirective, Issue, LoadError, ValidRecord};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Source,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: String,
    /// The source's own error value, as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
    /// Payload that failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl ErrorView {
    pub fn from_error<E: Serialize>(error: &LoadError<E>) -> Self {
        match error {
            LoadError::Source(source) => {
                let detail = serde_json::to_value(source).ok();
                let message = match &detail {
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                    None => "unserializable source error".to_string(),
                };
                ErrorView {
                    kind: ErrorKind::Source,
                    message,
                    error: detail,
                    issues: Vec::new(),
                    raw: None,
                }
            }
            LoadError::Validation(validation) => ErrorView {
                kind: ErrorKind::Validation,
                message: validation.to_string(),
                error: None,
                issues: validation.issues.as_slice().to_vec(),
                raw: Some(validation.raw.clone()),
            },
        }
    }
}

/// `{"kind": "loading" | "error" | "valid", ...}` summary of a verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectiveView {
    Loading,
    Error { error: ErrorView },
    Valid {
        data: BTreeMap<String, Value>,
        /// Keys whose validated value is not JSON and so cannot be shown.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        opaque: Vec<String>,
    },
}

impl DirectiveView {
    /// View of a valid record. Entries whose validator produced a JSON value
    /// go to `data`; the keys of all other entries are listed in `opaque`.
    pub fn valid<K: ToString + Ord>(record: &ValidRecord<K>) -> Self {
        let mut data = BTreeMap::new();
        let mut opaque = Vec::new();
        for key in record.keys() {
            match record.get::<Value>(key) {
                Some(value) => {
                    data.insert(key.to_string(), value.clone());
                }
                None => opaque.push(key.to_string()),
            }
        }
        DirectiveView::Valid { data, opaque }
    }

    pub fn from_directive<K, E>(directive: &BoundaryDirective<K, E>) -> Self
    where
        K: ToString + Ord,
        E: Serialize,
    {
        match directive {
            BoundaryDirective::Loading => DirectiveView::Loading,
            BoundaryDirective::Error(error) => DirectiveView::Error {
                error: ErrorView::from_error(error),
            },
            BoundaryDirective::Valid(record) => DirectiveView::valid(record),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DirectiveView::Loading => "loading",
            DirectiveView::Error { .. } => "error",
            DirectiveView::Valid { .. } => "valid",
        }
    }

    pub fn to_json(&self) -> Result<Value, ViewError> {
        serde_json::to_value(self).map_err(|e| ViewError::Serialization(e.to_string()))
    }
}

/// Fallback rendering the non-valid verdicts as [`DirectiveView`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFallback;

impl<E: Serialize> Fallback<E> for JsonFallback {
    type View = DirectiveView;

    fn loading(&self) -> DirectiveView {
        DirectiveView::Loading
    }

    fn error(&self, error: &LoadError<E>) -> DirectiveView {
        DirectiveView::Error {
            error: ErrorView::from_error(error),
        }
    }
}
