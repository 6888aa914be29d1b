//! newsgate testing utilities
//!
//! Provides an in-memory stand-in for the news, comments and verification
//! services so the gateway can be exercised end to end without any network.


pub use upstream::{DEFAULT_BANNED_WORDS, InMemoryUpstream, RecordedCall};
