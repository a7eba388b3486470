//! Base error type.
//!
//! Sub-crates define their own error enums (`NetworkError`, `FlowError`,
//! `EvalError`, …).  `BrError` covers the few failures that belong to the
//! shared primitives themselves, chiefly an invalid [`RunConfig`].
//!
//! [`RunConfig`]: crate::RunConfig

use thiserror::Error;

/// The top-level error type for `br-core`.
#[derive(Debug, Error)]
pub enum BrError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `br-core`.
pub type BrResult<T> = Result<T, BrError>;
