//! Upstream client implementations.

mod http;

pub use http::HttpUpstream;
