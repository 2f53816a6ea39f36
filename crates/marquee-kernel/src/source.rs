//! Remote source contract and an in-memory snapshot implementation.
//!
//! A remote source is owned by the fetch layer. The kernel only reads it;
//! it never starts, cancels or retries a fetch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current status and result of one asynchronous fetch.
///
/// Implementations must uphold:
/// - `is_error()` implies `error().is_some()`;
/// - `data()` is present only once the source has succeeded at least once.
pub trait RemoteSource {
    type Error;

    /// No fetch has settled yet.
    fn is_pending(&self) -> bool;

    /// A fetch (first load or background refresh) is in flight.
    fn is_fetching(&self) -> bool;

    /// The most recent fetch failed.
    fn is_error(&self) -> bool;

    fn error(&self) -> Option<&Self::Error>;

    /// Last successfully fetched payload, still untyped.
    fn data(&self) -> Option<&Value>;

    fn has_data(&self) -> bool {
        self.data().is_some()
    }
}

/// Plain-data [`RemoteSource`], as a fetch layer would expose it at one
/// instant.
///
/// Serializes with the camelCase field names query caches commonly use
/// (`isPending`, `isFetching`, `isError`, `error`, `data`), so snapshots can
/// be captured from a client and replayed in fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSnapshot<E> {
    #[serde(default)]
    pub is_pending: bool,
    #[serde(default)]
    pub is_fetching: bool,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<E>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl<E> SourceSnapshot<E> {
    /// First load in flight.
    pub fn pending() -> Self {
        Self {
            is_pending: true,
            is_fetching: true,
            is_error: false,
            error: None,
            data: None,
        }
    }

    pub fn success(data: Value) -> Self {
        Self {
            is_pending: false,
            is_fetching: false,
            is_error: false,
            error: None,
            data: Some(data),
        }
    }

    /// Failed before ever delivering data.
    pub fn failure(error: E) -> Self {
        Self {
            is_pending: false,
            is_fetching: false,
            is_error: true,
            error: Some(error),
            data: None,
        }
    }

    /// Background refresh in flight over previously fetched data.
    pub fn refetching(data: Value) -> Self {
        Self {
            is_fetching: true,
            ..Self::success(data)
        }
    }

    /// A refresh failed; the last good payload is kept.
    pub fn stale_failure(data: Value, error: E) -> Self {
        Self {
            data: Some(data),
            ..Self::failure(error)
        }
    }

    /// Start a fetch. Status, error and data of the previous fetch stay as
    /// they were until this one settles, so a retry after a failed first load
    /// is fetching and failed, not pending.
    pub fn begin_fetch(&mut self) {
        self.is_fetching = true;
    }

    /// Complete the in-flight fetch successfully.
    pub fn settle(&mut self, data: Value) {
        self.is_pending = false;
        self.is_fetching = false;
        self.is_error = false;
        self.error = None;
        self.data = Some(data);
    }

    /// Fail the in-flight fetch. Previously fetched data survives.
    pub fn reject(&mut self, error: E) {
        self.is_pending = false;
        self.is_fetching = false;
        self.is_error = true;
        self.error = Some(error);
    }

    /// Whether the snapshot satisfies the [`RemoteSource`] invariants.
    pub fn is_consistent(&self) -> bool {
        let error_reported = !self.is_error || self.error.is_some();
        let pending_without_data = !self.is_pending || self.data.is_none();
        error_reported && pending_without_data
    }
}

impl<E> RemoteSource for SourceSnapshot<E> {
    type Error = E;

    fn is_pending(&self) -> bool {
        self.is_pending
    }

    fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    fn is_error(&self) -> bool {
        self.is_error
    }

    fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}
