//! Query parameter parsing shared by the handlers.
//!
//! Parameters arrive as raw strings so that a bad value becomes a
//! `KernelError::InvalidParameter` (and a 400 with the usual `Error` body)
//! instead of an extractor rejection.

use axum::extract::rejection::QueryRejection;
use newsgate_kernel::KernelError;
use std::str::FromStr;

pub const DEFAULT_AMOUNT: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;

/// Parse a strictly positive integer, falling back to `default` when the
/// parameter is absent or blank.
pub fn positive_or<T>(
    name: &'static str,
    raw: Option<&str>,
    default: T,
) -> Result<T, KernelError>
where
    T: FromStr + PartialOrd + Default,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => parse_positive(name, value),
    }
}

/// Parse a required, strictly positive integer.
pub fn required_positive<T>(name: &'static str, raw: Option<&str>) -> Result<T, KernelError>
where
    T: FromStr + PartialOrd + Default,
{
    match raw.map(str::trim) {
        Some(value) => parse_positive(name, value),
        None => Err(KernelError::InvalidParameter {
            name,
            value: String::new(),
        }),
    }
}

fn parse_positive<T>(name: &'static str, value: &str) -> Result<T, KernelError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(KernelError::InvalidParameter {
            name,
            value: value.to_string(),
        }),
    }
}

/// A query string axum could not decode at all (bad percent-encoding,
/// repeated keys).
pub fn undecodable_query(rejection: QueryRejection) -> KernelError {
    KernelError::InvalidParameter {
        name: "query",
        value: rejection.body_text(),
    }
}
