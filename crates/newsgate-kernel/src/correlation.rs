//! Per-request correlation identifier.

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque identifier assigned once per inbound request.
///
/// The id is threaded unchanged through every upstream call (as the
/// `request_id` query parameter) and every log line of that request. It is
/// immutable once created; clones share the same allocation so handing it to
/// each concurrent subtask is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    /// Longest caller-supplied id that is accepted verbatim.
    pub const MAX_LEN: usize = 128;

    /// Generate a fresh id.
    pub fn generate() -> Self {
        Self(Arc::from(Uuid::new_v4().simple().to_string()))
    }

    /// Adopt a caller-supplied id.
    ///
    /// Returns `None` when the value is empty, too long, or contains
    /// characters that would need escaping in a URL query or a header.
    pub fn from_caller(value: &str) -> Option<Self> {
        let value = value.trim();
        let acceptable = !value.is_empty()
            && value.len() <= Self::MAX_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
        acceptable.then(|| Self(Arc::from(value)))
    }

    /// Caller-supplied id if acceptable, otherwise a generated one.
    pub fn from_caller_or_generate(value: Option<&str>) -> Self {
        value
            .and_then(Self::from_caller)
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
