//! Serde-backed validators producing Rust types.

use crate::schema::Schema;
use marquee_kernel::{Issue, Issues, Validator};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Decode the payload into `T` with serde.
///
/// Serde stops at the first error, so a failure carries a single root
/// issue. Pair with a [`Schema`] via [`Shaped`] for per-field reporting.
pub struct Typed<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Typed<T> {}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typed<{}>", std::any::type_name::<T>())
    }
}

impl<T: DeserializeOwned> Validator for Typed<T> {
    type Output = T;

    fn validate(&self, raw: &Value) -> Result<T, Issues> {
        T::deserialize(raw).map_err(|e| Issue::at_root(e.to_string()).into())
    }
}

/// Schema check first (every issue reported), then typed decoding.
#[derive(Debug, Clone)]
pub struct Shaped<T> {
    schema: Schema,
    typed: Typed<T>,
}

impl<T> Shaped<T> {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            typed: Typed::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl<T: DeserializeOwned> Validator for Shaped<T> {
    type Output = T;

    fn validate(&self, raw: &Value) -> Result<T, Issues> {
        let issues = self.schema.issues(raw);
        if !issues.is_empty() {
            return Err(issues);
        }
        self.typed.validate(raw)
    }
}

impl Schema {
    /// Check with this schema, then decode into `T`.
    pub fn typed<T: DeserializeOwned>(self) -> Shaped<T> {
        Shaped::new(self)
    }
}
