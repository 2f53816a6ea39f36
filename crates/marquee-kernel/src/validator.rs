//! Validator contract and the structured issue list it reports.
//!
//! A validator is a pure, synchronous function from an untyped payload
//! (`serde_json::Value`) to either a typed value or a list of issues. Any
//! closure `Fn(&Value) -> Result<T, Issues>` is a validator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt::{Display, Formatter};

/// Path reported for issues about the payload as a whole.
pub const ROOT_PATH: &str = "$";

/// One problem found in a payload: where it is and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn at_root(message: impl Into<String>) -> Self {
        Self::new(ROOT_PATH, message)
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered list of issues, in the order the validator found them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issues(Vec<Issue>);

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(issue: Issue) -> Self {
        Self(vec![issue])
    }

    pub fn push(&mut self, issue: Issue) {
        self.0.push(issue);
    }

    pub fn extend(&mut self, other: Issues) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }
}

impl From<Vec<Issue>> for Issues {
    fn from(issues: Vec<Issue>) -> Self {
        Self(issues)
    }
}

impl From<Issue> for Issues {
    fn from(issue: Issue) -> Self {
        Self::single(issue)
    }
}

impl FromIterator<Issue> for Issues {
    fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for Issues {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Shape check over an untyped payload.
///
/// Implementations must be pure: the evaluators may call a validator on
/// every re-evaluation, and never call it for definitions behind the first
/// failure.
pub trait Validator {
    type Output;

    fn validate(&self, raw: &Value) -> Result<Self::Output, Issues>;
}

impl<T, F> Validator for F
where
    F: Fn(&Value) -> Result<T, Issues>,
{
    type Output = T;

    fn validate(&self, raw: &Value) -> Result<T, Issues> {
        self(raw)
    }
}

/// Validator with its output type erased, so definitions with different
/// outputs can share one list.
pub(crate) trait ErasedValidator {
    fn validate_erased(&self, raw: &Value) -> Result<Box<dyn Any>, Issues>;
}

impl<V> ErasedValidator for V
where
    V: Validator,
    V::Output: 'static,
{
    fn validate_erased(&self, raw: &Value) -> Result<Box<dyn Any>, Issues> {
        self.validate(raw)
            .map(|value| Box::new(value) as Box<dyn Any>)
    }
}
