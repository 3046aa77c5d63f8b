//! Base types and error handling.
//!
//! - [`CookieError`](error::CookieError): failures reported by every cookie operation
//! - [`context`]: helpers mapping transport errors into `RequestFailed`

pub mod context;
pub mod error;

#[cfg(test)]
mod tests;
