//! Upstream call descriptions and the transport seam.
//!
//! An [`UpstreamCallSpec`] says *which* dependency is asked *what*; an
//! [`UpstreamClient`] turns it into an [`UpstreamOutcome`]. The gateway
//! runtime ships a reqwest-backed client; tests use an in-memory one.

use crate::correlation::CorrelationId;
use crate::outcome::UpstreamOutcome;
use crate::types::Comment;
use async_trait::async_trait;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Dependency
// ─────────────────────────────────────────────────────────────────────────────

/// The independent services the gateway sits in front of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// News items ("news" service).
    ContentStore,
    /// Comment threads ("comments" service).
    DiscussionStore,
    /// Comment content validation ("verification" service).
    Validation,
}

impl Dependency {
    pub fn as_str(self) -> &'static str {
        match self {
            Dependency::ContentStore => "content-store",
            Dependency::DiscussionStore => "discussion-store",
            Dependency::Validation => "validation",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UpstreamOperation / UpstreamCallSpec
// ─────────────────────────────────────────────────────────────────────────────

/// What is asked of a dependency, with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOperation {
    /// One page of headlines, optionally filtered by a title substring.
    ListNews {
        amount: u32,
        page: u32,
        search: String,
    },
    FetchNews { news_id: i64 },
    NewsExists { news_id: i64 },
    /// Full comment thread of a news item.
    FetchThread { news_id: i64 },
    /// Succeeds only if the comment exists *and* belongs to `news_id`.
    ParentCommentExists { parent_comment_id: i64, news_id: i64 },
    ValidateComment { comment: Comment },
    StoreComment { comment: Comment },
}

/// One immutable upstream call, built once per subtask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCallSpec {
    operation: UpstreamOperation,
}

impl UpstreamCallSpec {
    pub fn new(operation: UpstreamOperation) -> Self {
        Self { operation }
    }

    pub fn list_news(amount: u32, page: u32, search: impl Into<String>) -> Self {
        Self::new(UpstreamOperation::ListNews {
            amount,
            page,
            search: search.into(),
        })
    }

    pub fn fetch_news(news_id: i64) -> Self {
        Self::new(UpstreamOperation::FetchNews { news_id })
    }

    pub fn news_exists(news_id: i64) -> Self {
        Self::new(UpstreamOperation::NewsExists { news_id })
    }

    pub fn fetch_thread(news_id: i64) -> Self {
        Self::new(UpstreamOperation::FetchThread { news_id })
    }

    pub fn parent_comment_exists(parent_comment_id: i64, news_id: i64) -> Self {
        Self::new(UpstreamOperation::ParentCommentExists {
            parent_comment_id,
            news_id,
        })
    }

    pub fn validate_comment(comment: Comment) -> Self {
        Self::new(UpstreamOperation::ValidateComment { comment })
    }

    pub fn store_comment(comment: Comment) -> Self {
        Self::new(UpstreamOperation::StoreComment { comment })
    }

    pub fn operation(&self) -> &UpstreamOperation {
        &self.operation
    }

    /// The dependency this call targets.
    pub fn dependency(&self) -> Dependency {
        match self.operation {
            UpstreamOperation::ListNews { .. }
            | UpstreamOperation::FetchNews { .. }
            | UpstreamOperation::NewsExists { .. } => Dependency::ContentStore,
            UpstreamOperation::FetchThread { .. }
            | UpstreamOperation::ParentCommentExists { .. }
            | UpstreamOperation::StoreComment { .. } => Dependency::DiscussionStore,
            UpstreamOperation::ValidateComment { .. } => Dependency::Validation,
        }
    }

    /// Stable operation name used in logs and call accounting.
    pub fn name(&self) -> &'static str {
        match self.operation {
            UpstreamOperation::ListNews { .. } => "list_news",
            UpstreamOperation::FetchNews { .. } => "fetch_news",
            UpstreamOperation::NewsExists { .. } => "news_exists",
            UpstreamOperation::FetchThread { .. } => "fetch_thread",
            UpstreamOperation::ParentCommentExists { .. } => "parent_comment_exists",
            UpstreamOperation::ValidateComment { .. } => "validate_comment",
            UpstreamOperation::StoreComment { .. } => "store_comment",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UpstreamClient
// ─────────────────────────────────────────────────────────────────────────────

/// Performs upstream calls.
///
/// Implementations never fail out-of-band: every transport problem is folded
/// into [`UpstreamOutcome::Unavailable`], every explicit refusal into
/// [`UpstreamOutcome::Rejected`]. The correlation id must reach the
/// dependency so it can tag its own log lines.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn call(&self, spec: &UpstreamCallSpec, correlation_id: &CorrelationId)
        -> UpstreamOutcome;
}
