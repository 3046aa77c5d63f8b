//! Ergonomic error context helpers.
//!
//! Provides extension traits for turning transport failures into
//! `RequestFailed`, keeping the underlying message verbatim.

use crate::base::error::CookieError;
use std::io;

/// Extension trait for adding request context to transport Results.
pub trait FetchResultExt<T> {
    /// Map a transport error into [`CookieError::RequestFailed`].
    ///
    /// # Example
    /// ```ignore
    /// use keet::base::context::FetchResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await.request_context()?;
    /// // Error: RequestFailed { message: "connection refused" }
    /// ```
    fn request_context(self) -> Result<T, CookieError>;
}

impl<T> FetchResultExt<T> for Result<T, io::Error> {
    fn request_context(self) -> Result<T, CookieError> {
        self.map_err(|e| CookieError::request_failed(e.to_string()))
    }
}

impl<T> FetchResultExt<T> for Result<T, hyper::Error> {
    fn request_context(self) -> Result<T, CookieError> {
        self.map_err(|e| CookieError::request_failed(e.to_string()))
    }
}

impl<T> FetchResultExt<T> for Result<T, boring::error::ErrorStack> {
    fn request_context(self) -> Result<T, CookieError> {
        self.map_err(|e| CookieError::request_failed(e.to_string()))
    }
}
