//! Composite operations built on the [`FanOutCoordinator`](crate::fanout::FanOutCoordinator).
//!
//! Both operations follow the same single-shot lifecycle and keep no state
//! between invocations:
//!
//! ```text
//! Dispatched ──► AllJoined ──► Merged ──► Responded
//! ```

mod aggregate;
mod submission;

pub use aggregate::{fetch_news_with_comments, merge_news_and_thread};
pub use submission::{submission_checks, submit_comment};
