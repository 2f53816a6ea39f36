//! # Marquee Kernel
//!
//! Turns one or more independent, still-in-flight remote fetches into a
//! single schema-verified verdict.
//!
//! The kernel is **transport-agnostic**: it never fetches, caches or
//! retries. It reads the fetch state a [`RemoteSource`] exposes, runs the
//! caller's [`Validator`] over the raw payload, and reports exactly one of
//! pending / source error / validation error / valid.
//!
//! ## Architecture
//!
//! ```text
//! RemoteSource + Validator   ← external collaborators (fetch layer, schemas)
//!     │
//! resolve                    ← one source → ValidationOutcome
//!     │
//! QueryDefinition            ← key + source + validator (+ enabled)
//!     │
//! filter_active              ← enabled subset, order preserved
//!     │
//! fold<FailureSink>          ← left-to-right, first failure wins
//!     ├── evaluate_combined  ← render style: BoundaryDirective
//!     └── evaluate_or_throw  ← throw style: Result<Loadable<_>, LoadError<_>>
//! ```
//!
//! Both evaluator styles go through the same [`fold`], so a given scenario
//! reports the same error whichever style a call site uses.

pub mod combined;
pub mod definition;
pub mod error;
pub mod filter;
pub mod fold;
pub mod outcome;
pub mod resolve;
pub mod source;
pub mod throwing;
pub mod validator;

pub use combined::{BoundaryOptions, evaluate_combined, evaluate_outcome};
pub use definition::QueryDefinition;
pub use error::{LoadError, ValidationError};
pub use filter::{ActiveSources, Readiness, filter_active};
pub use fold::{Collect, FailureSink, LoadingPolicy, Raise, Render, fold};
pub use outcome::{
    BoundaryDirective, CombinedOutcome, Loadable, OutcomeKind, ValidRecord, ValidationOutcome,
};
pub use resolve::resolve;
pub use source::{RemoteSource, SourceSnapshot};
pub use throwing::evaluate_or_throw;
pub use validator::{Issue, Issues, Validator};
