//! # marquee-schema
//!
//! Concrete validators for `marquee-kernel` definitions:
//! - [`Schema`]: declarative shape checks (serde-loadable, JSON-Schema-like
//!   vocabulary) that report every issue with its path;
//! - [`Typed`]: serde decoding into a Rust type;
//! - [`Shaped`]: a schema check followed by typed decoding.

pub mod path;
pub mod schema;
pub mod typed;

pub use schema::{
    ArraySchema, IntegerSchema, NumberSchema, ObjectSchema, Pattern, Schema, StringSchema,
};
pub use typed::{Shaped, Typed};
