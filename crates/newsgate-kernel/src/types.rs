//! Wire types shared by the gateway and its upstream dependencies.
//!
//! Field names on the wire follow the services' JSON contract (`ID`,
//! `NewsID`, `PubTime`, …). Inbound comment drafts also accept the
//! `Id` / `NewsId` / `ParentCommentId` spellings.

use crate::error::KernelError;
use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Comments
// ─────────────────────────────────────────────────────────────────────────────

/// A comment attached to a news item, optionally replying to another comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Assigned by the discussion store; ignored on submission.
    #[serde(rename = "ID", alias = "Id", default)]
    pub id: i64,
    #[serde(rename = "NewsID", alias = "NewsId")]
    pub news_id: i64,
    #[serde(rename = "Comment")]
    pub text: String,
    /// `0` marks a top-level comment.
    #[serde(rename = "ParentCommentID", alias = "ParentCommentId", default)]
    pub parent_comment_id: i64,
    /// Creation time (unix seconds), supplied by the client.
    #[serde(rename = "PubTime")]
    pub pub_time: i64,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id != 0
    }

    /// Checks that can be made without contacting any dependency.
    pub fn validate_draft(&self) -> Result<(), KernelError> {
        if self.news_id <= 0 {
            return Err(KernelError::NonPositiveNewsId(self.news_id));
        }
        if self.parent_comment_id < 0 {
            return Err(KernelError::NegativeParentCommentId(self.parent_comment_id));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// News
// ─────────────────────────────────────────────────────────────────────────────

/// Full news item as held by the content store.
///
/// `link` is the natural external key; its uniqueness is enforced by the
/// content store, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "PubTime")]
    pub pub_time: i64,
    #[serde(rename = "Link")]
    pub link: String,
}

/// Headline entry of a news list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsShort {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "PubTime")]
    pub pub_time: i64,
}

impl From<&NewsItem> for NewsShort {
    fn from(item: &NewsItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            pub_time: item.pub_time,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    #[serde(rename = "Page")]
    pub page: u32,
    #[serde(rename = "NewsOnPage")]
    pub news_on_page: u32,
    #[serde(rename = "TotalPages")]
    pub total_pages: u64,
    #[serde(rename = "TotalNews")]
    pub total_news: u64,
}

impl Pagination {
    pub fn new(page: u32, news_on_page: u32, total_news: u64) -> Result<Self, KernelError> {
        Ok(Self {
            page,
            news_on_page,
            total_pages: total_pages(total_news, news_on_page)?,
            total_news,
        })
    }

    /// Number of items to skip to reach the first item of `page` (1-based).
    pub fn offset(&self) -> u64 {
        u64::from(self.news_on_page) * u64::from(self.page.saturating_sub(1))
    }
}

/// Pages needed to show `total_news` items at `news_on_page` per page.
///
/// An exact multiple does not get an extra trailing page.
pub fn total_pages(total_news: u64, news_on_page: u32) -> Result<u64, KernelError> {
    if news_on_page == 0 {
        return Err(KernelError::ZeroPageSize);
    }
    Ok(total_news.div_ceil(u64::from(news_on_page)))
}

/// One page of headlines plus its pagination info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationNewsList {
    #[serde(rename = "NewsList", default, deserialize_with = "null_as_empty")]
    pub news_list: Vec<NewsShort>,
    #[serde(rename = "PaginationInfo", default)]
    pub pagination: Pagination,
    #[serde(rename = "Error", default)]
    pub error: u16,
}

// ─────────────────────────────────────────────────────────────────────────────
// Composite results
// ─────────────────────────────────────────────────────────────────────────────

/// Result of the combined news + thread retrieval.
///
/// On failure `news` is the zero-valued item and `comments` is empty; only
/// `error` carries information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsComments {
    #[serde(rename = "News", default)]
    pub news: NewsItem,
    #[serde(rename = "Comments", default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
    /// `0` on success, otherwise the HTTP code of the fatal status class.
    #[serde(rename = "Error", default)]
    pub error: u16,
}

impl NewsComments {
    pub fn merged(news: NewsItem, comments: Vec<Comment>) -> Self {
        Self {
            news,
            comments,
            error: 0,
        }
    }

    pub fn failed(error: u16) -> Self {
        Self {
            error,
            ..Self::default()
        }
    }
}

/// Result of a validated comment submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    #[serde(rename = "Error")]
    pub error: u16,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
