//! `newsgate-kernel`: contracts shared by the gateway runtime and its test
//! doubles.
//!
//! Nothing in this crate performs I/O. It describes *what* the gateway asks
//! of its upstream dependencies and *how* their answers are classified:
//!
//! | Concept | Type |
//! |---------|------|
//! | Per-request trace id | [`CorrelationId`] |
//! | One upstream call | [`UpstreamCallSpec`] / [`UpstreamOperation`] |
//! | Its answer | [`UpstreamOutcome`] / [`UpstreamPayload`] |
//! | Error taxonomy | [`StatusClass`] |
//! | Transport seam | [`UpstreamClient`] |
//! | Wire types | [`types`] |
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │              newsgate-kernel  (this crate)                │
//! │  UpstreamClient trait   UpstreamCallSpec   StatusClass    │
//! │  Comment / NewsItem / Pagination   CorrelationId          │
//! └──────────────────────────┬────────────────────────────────┘
//!                            │  depends on
//! ┌──────────────────────────▼────────────────────────────────┐
//! │              newsgate-gateway  (runtime crate)            │
//! │  HttpUpstream: impl UpstreamClient (reqwest)              │
//! │  FanOutCoordinator   ErrorSink   axum server              │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod correlation;
pub mod error;
pub mod outcome;
pub mod types;
pub mod upstream;

// ── Flat re-exports ────────────────────────────────────────────────────────

pub use correlation::CorrelationId;
pub use error::KernelError;
pub use outcome::{StatusClass, UpstreamOutcome, UpstreamPayload};
pub use types::{
    Comment, NewsComments, NewsItem, NewsShort, Pagination, PaginationNewsList,
    SubmissionOutcome,
};
pub use upstream::{Dependency, UpstreamCallSpec, UpstreamClient, UpstreamOperation};
