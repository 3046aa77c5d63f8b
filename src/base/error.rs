use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by every cookie operation.
///
/// Each variant carries a short, stable [`code`](CookieError::code) for the host
/// bridge and a human-readable message via `Display`. Low-level error types never
/// leak through this boundary.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CookieError {
    #[error("The URL provided is not valid. It may be missing a protocol (ex. http:// or https://).")]
    InvalidUrl,

    #[error("Cookie URL host {host} and domain {domain} mismatched. The cookie won't set correctly.")]
    DomainMismatch { host: String, domain: String },

    #[error("Failed to create cookie: {reason}")]
    ConstructionFailed { reason: String },

    #[error("{message}")]
    RequestFailed { message: String },

    #[error("The response is not valid.")]
    InvalidResponse,

    #[error("{reason}")]
    Unsupported { reason: String },
}

impl CookieError {
    pub fn construction_failed(reason: impl Into<String>) -> Self {
        CookieError::ConstructionFailed {
            reason: reason.into(),
        }
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        CookieError::RequestFailed {
            message: message.into(),
        }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        CookieError::Unsupported {
            reason: reason.into(),
        }
    }

    /// The engine cookie store is not available on this platform.
    pub fn engine_unavailable() -> Self {
        Self::unsupported("The engine cookie store is not available on this platform.")
    }

    /// Short wire code reported alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            CookieError::InvalidUrl => "InvalidURL",
            CookieError::DomainMismatch { .. } => "DomainMismatch",
            CookieError::ConstructionFailed { .. } => "ConstructionFailed",
            CookieError::RequestFailed { .. } => "RequestFailed",
            CookieError::InvalidResponse => "InvalidResponse",
            CookieError::Unsupported { .. } => "Unsupported",
        }
    }

    /// Validation failures are raised before any store is touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CookieError::InvalidUrl
                | CookieError::DomainMismatch { .. }
                | CookieError::ConstructionFailed { .. }
        )
    }

    /// Convert into the `{ code, message }` pair a promise is rejected with.
    pub fn to_rejection(&self) -> Rejection {
        Rejection {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Serializable rejection payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub code: &'static str,
    pub message: String,
}
