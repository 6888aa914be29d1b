//! Classification of upstream answers.

use crate::types::{Comment, NewsItem, PaginationNewsList};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// StatusClass
// ─────────────────────────────────────────────────────────────────────────────

/// The error taxonomy surfaced across the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusClass {
    BadRequest,
    NotFound,
    InternalError,
}

impl StatusClass {
    /// HTTP status code carried in the `Error` field of gateway responses.
    pub fn http_status(self) -> u16 {
        match self {
            StatusClass::BadRequest => 400,
            StatusClass::NotFound => 404,
            StatusClass::InternalError => 500,
        }
    }

    /// Classify an upstream HTTP status. `None` for success (2xx).
    ///
    /// Codes other than 400 and 404 have no dedicated class and count as
    /// internal errors.
    pub fn from_http_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 => Some(StatusClass::BadRequest),
            404 => Some(StatusClass::NotFound),
            _ => Some(StatusClass::InternalError),
        }
    }

    /// Rank used when several failures compete for the response code.
    /// Lower wins.
    ///
    /// A missing resource is the most specific answer, then a rejected
    /// input, then a generic internal failure.
    pub fn precedence(self) -> u8 {
        match self {
            StatusClass::NotFound => 0,
            StatusClass::BadRequest => 1,
            StatusClass::InternalError => 2,
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusClass::BadRequest => "bad request",
            StatusClass::NotFound => "not found",
            StatusClass::InternalError => "internal error",
        };
        f.write_str(name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UpstreamPayload / UpstreamOutcome
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded body of a successful upstream answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamPayload {
    /// Existence checks, validation and writes carry no body.
    Empty,
    News(NewsItem),
    Thread(Vec<Comment>),
    NewsPage(PaginationNewsList),
}

/// Exactly one of these is produced per dispatched call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Ok(UpstreamPayload),
    /// The dependency answered and said no.
    Rejected(StatusClass, String),
    /// The dependency could not be reached, timed out, or answered with
    /// something that could not be decoded.
    Unavailable(String),
}

impl UpstreamOutcome {
    pub fn ok_empty() -> Self {
        UpstreamOutcome::Ok(UpstreamPayload::Empty)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, UpstreamOutcome::Ok(_))
    }

    /// Failure class of this outcome; `None` when it is `Ok`.
    pub fn status_class(&self) -> Option<StatusClass> {
        match self {
            UpstreamOutcome::Ok(_) => None,
            UpstreamOutcome::Rejected(class, _) => Some(*class),
            UpstreamOutcome::Unavailable(_) => Some(StatusClass::InternalError),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_class() == Some(StatusClass::NotFound)
    }

    /// Human-readable description of a failure, for diagnostics.
    pub fn failure_detail(&self) -> Option<&str> {
        match self {
            UpstreamOutcome::Ok(_) => None,
            UpstreamOutcome::Rejected(_, detail) | UpstreamOutcome::Unavailable(detail) => {
                Some(detail)
            }
        }
    }

    /// Pick the failure that decides a multi-call operation.
    ///
    /// Evaluated once all outcomes are in, so the answer depends only on the
    /// outcomes themselves, never on which call finished first: lowest
    /// [`StatusClass::precedence`] wins, ties go to the lowest index.
    /// Returns the winning index and its class.
    pub fn decisive_failure<'a, I>(outcomes: I) -> Option<(usize, StatusClass)>
    where
        I: IntoIterator<Item = &'a UpstreamOutcome>,
    {
        outcomes
            .into_iter()
            .enumerate()
            .filter_map(|(index, outcome)| outcome.status_class().map(|class| (index, class)))
            .min_by_key(|(index, class)| (class.precedence(), *index))
    }

    pub fn into_news(self) -> Result<NewsItem, StatusClass> {
        match self {
            UpstreamOutcome::Ok(UpstreamPayload::News(item)) => Ok(item),
            other => Err(other.mismatch_class()),
        }
    }

    pub fn into_thread(self) -> Result<Vec<Comment>, StatusClass> {
        match self {
            UpstreamOutcome::Ok(UpstreamPayload::Thread(comments)) => Ok(comments),
            other => Err(other.mismatch_class()),
        }
    }

    pub fn into_news_page(self) -> Result<PaginationNewsList, StatusClass> {
        match self {
            UpstreamOutcome::Ok(UpstreamPayload::NewsPage(page)) => Ok(page),
            other => Err(other.mismatch_class()),
        }
    }

    // An `Ok` carrying the wrong payload kind is an internal fault.
    fn mismatch_class(&self) -> StatusClass {
        self.status_class().unwrap_or(StatusClass::InternalError)
    }
}
