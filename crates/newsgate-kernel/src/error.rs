//! Kernel error types.
//!
//! [`KernelError`] covers every failure that can be detected *locally*,
//! before any upstream dependency is contacted: malformed query parameters,
//! impossible comment drafts, invalid pagination input. Failures reported by
//! a dependency are not errors at this level; they are
//! [`UpstreamOutcome`](crate::UpstreamOutcome) values.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum KernelError {
    /// A query parameter is missing, non-numeric, or out of range.
    #[error("parameter '{name}' has invalid value '{value}'")]
    InvalidParameter { name: &'static str, value: String },

    /// A comment must reference a positive news id.
    #[error("comment references non-positive news id {0}")]
    NonPositiveNewsId(i64),

    /// Parent comment ids are either `0` (top level) or positive.
    #[error("comment references negative parent comment id {0}")]
    NegativeParentCommentId(i64),

    /// Page size used for pagination arithmetic must be positive.
    #[error("page size must be positive")]
    ZeroPageSize,
}
