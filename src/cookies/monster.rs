use crate::base::error::CookieError;
use crate::cookies::canonicalcookie::CanonicalCookie;
use crate::cookies::store::{CookieStore, CookieStoreBackend};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};
use time::OffsetDateTime;
use url::Url;

/// Maximum cookies per domain (Chromium default).
const MAX_COOKIES_PER_DOMAIN: usize = 50;

static SHARED: OnceLock<Arc<CookieMonster>> = OnceLock::new();

/// The legacy shared cookie jar.
///
/// Synchronous and safe to call from any thread. One instance,
/// [`CookieMonster::shared`], lives for the whole process; separate instances
/// exist for tests and embedding.
pub struct CookieMonster {
    // Store: Map<Domain, List<Cookie>>
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// The process-global jar.
    pub fn shared() -> Arc<CookieMonster> {
        SHARED.get_or_init(|| Arc::new(CookieMonster::new())).clone()
    }

    /// Insert or replace a cookie.
    ///
    /// An already-expired cookie removes whatever occupies its slot and is not
    /// stored.
    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) {
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();

        entry.retain(|c| !c.is_same_slot(&cookie));

        if cookie.is_expired(OffsetDateTime::now_utc()) {
            tracing::debug!(name = %cookie.name, domain = %cookie.domain, "expired cookie removed");
            return;
        }

        // Enforce per-domain limit with LRU eviction
        while entry.len() >= MAX_COOKIES_PER_DOMAIN {
            let Some(oldest_idx) = entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.last_access_time)
                .map(|(i, _)| i)
            else {
                break;
            };
            let evicted = entry.remove(oldest_idx);
            tracing::debug!(name = %evicted.name, domain = %evicted.domain, "cookie evicted");
        }

        entry.push(cookie);
    }

    /// Write every cookie parsed from a response to `url`.
    pub fn set_cookies(&self, cookies: Vec<CanonicalCookie>, url: &Url) {
        tracing::debug!(url = %url, count = cookies.len(), "storing response cookies");
        for cookie in cookies {
            self.set_canonical_cookie(cookie);
        }
    }

    /// Remove the cookie occupying `cookie`'s (name, domain, path) slot.
    pub fn delete_canonical_cookie(&self, cookie: &CanonicalCookie) -> bool {
        let Some(mut entry) = self.store.get_mut(&cookie.domain) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|c| !c.is_same_slot(cookie));
        let removed = entry.len() != before;
        let now_empty = entry.is_empty();
        drop(entry);

        if now_empty {
            self.store.remove_if(&cookie.domain, |_, v| v.is_empty());
        }
        removed
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    /// Iterate over all cookies (for persistence).
    pub fn iter_all_cookies(&self) -> impl Iterator<Item = CanonicalCookie> + '_ {
        self.store.iter().flat_map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl CookieStore for CookieMonster {
    fn backend(&self) -> CookieStoreBackend {
        CookieStoreBackend::Legacy
    }

    async fn all_cookies(&self) -> Result<Vec<CanonicalCookie>, CookieError> {
        Ok(self.iter_all_cookies().collect())
    }

    async fn set_cookie(&self, cookie: CanonicalCookie) -> Result<(), CookieError> {
        self.set_canonical_cookie(cookie);
        Ok(())
    }

    async fn delete_cookie(&self, cookie: &CanonicalCookie) -> Result<bool, CookieError> {
        Ok(self.delete_canonical_cookie(cookie))
    }
}
