//! HTTP middleware

pub mod correlation;

pub use correlation::{REQUEST_ID_HEADER, REQUEST_ID_PARAM, RequestCorrelation, track_correlation};
