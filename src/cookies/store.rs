//! Uniform contract over the two cookie backends.

use crate::base::error::CookieError;
use crate::cookies::canonicalcookie::CanonicalCookie;
use async_trait::async_trait;
use std::fmt;

/// Which backend an operation targets.
///
/// Always chosen explicitly by the caller, never detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CookieStoreBackend {
    /// Process-global shared jar. Synchronous.
    Legacy,
    /// Web-engine store. Asynchronous, confined to the main context.
    Engine,
}

impl CookieStoreBackend {
    pub fn select(use_engine_store: bool) -> Self {
        if use_engine_store {
            CookieStoreBackend::Engine
        } else {
            CookieStoreBackend::Legacy
        }
    }
}

impl fmt::Display for CookieStoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieStoreBackend::Legacy => f.write_str("legacy"),
            CookieStoreBackend::Engine => f.write_str("engine"),
        }
    }
}

/// Storage backend for cookies.
///
/// Implementations own persistence and their own thread safety. Callers do no
/// locking of their own.
#[async_trait]
pub trait CookieStore: Send + Sync {
    fn backend(&self) -> CookieStoreBackend;

    /// Every cookie held, expired ones included.
    async fn all_cookies(&self) -> Result<Vec<CanonicalCookie>, CookieError>;

    /// Store `cookie`, replacing any cookie in the same (name, domain, path) slot.
    async fn set_cookie(&self, cookie: CanonicalCookie) -> Result<(), CookieError>;

    /// Remove the cookie occupying `cookie`'s slot. Returns whether one was removed.
    async fn delete_cookie(&self, cookie: &CanonicalCookie) -> Result<bool, CookieError>;
}
