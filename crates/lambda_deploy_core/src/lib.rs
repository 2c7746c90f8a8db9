//! Lambda alias and function deployment tasks.
//!
//! This crate owns task semantics: input validation, field-by-field fallback
//! against the deployed configuration, and the create/update branching. It
//! intentionally excludes AWS SDK concerns; callers inject a
//! [`client::LambdaApi`] implementation.

pub mod client;
pub mod error;
pub mod merge;
pub mod model;
pub mod tasks;
