//! Cookie manager facade.
//!
//! Every public operation takes an explicit backend selector. Legacy-store calls
//! complete immediately; engine-store calls are marshalled onto the main context
//! and resolve once the engine's callback fires.
//!
//! # Example
//!
//! ```rust,no_run
//! use keet::CookieManager;
//! use serde_json::json;
//!
//! # async fn demo() -> Result<(), keet::CookieError> {
//! let manager = CookieManager::new();
//! let props = json!({ "name": "sid", "value": "abc", "secure": true });
//! manager.set("https://example.com", props.as_object().unwrap(), true).await?;
//!
//! let cookies = manager.get("https://example.com", true).await?;
//! assert_eq!(cookies["sid"].value, "abc");
//! # Ok(())
//! # }
//! ```

use crate::base::error::CookieError;
use crate::cookies::builder::{self, CookieProps};
use crate::cookies::canonicalcookie::CanonicalCookie;
use crate::cookies::enginestore::{EngineCookieStore, EngineStoreAdapter};
use crate::cookies::matcher;
use crate::cookies::monster::CookieMonster;
use crate::cookies::record::CookieRecord;
use crate::cookies::store::{CookieStore, CookieStoreBackend};
use crate::dispatch::MainThread;
use crate::http::fetch::{HttpFetcher, ResponseFetcher, DEFAULT_USER_AGENT};
use crate::socket::tls::TlsConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;

/// Entry point for all cookie operations.
///
/// Use [`CookieManager::builder()`] to substitute stores or the fetcher.
#[derive(Clone)]
pub struct CookieManager {
    legacy: Arc<CookieMonster>,
    legacy_store: Arc<dyn CookieStore>,
    engine_store: Option<Arc<dyn CookieStore>>,
    fetcher: Arc<dyn ResponseFetcher>,
}

impl Default for CookieManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieManager {
    /// Manager over the process-wide stores.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CookieManagerBuilder {
        CookieManagerBuilder::default()
    }

    fn store(&self, use_engine_store: bool) -> Result<&dyn CookieStore, CookieError> {
        match CookieStoreBackend::select(use_engine_store) {
            CookieStoreBackend::Legacy => Ok(self.legacy_store.as_ref()),
            CookieStoreBackend::Engine => self
                .engine_store
                .as_deref()
                .ok_or_else(CookieError::engine_unavailable),
        }
    }

    /// Cookies visible to `url`, keyed by name.
    ///
    /// Uses the permissive read matcher; expired cookies are left out. When two
    /// visible cookies share a name, the one listed last by the backend wins.
    pub async fn get(
        &self,
        url: &str,
        use_engine_store: bool,
    ) -> Result<BTreeMap<String, CookieRecord>, CookieError> {
        let (_, host) = builder::parse_url_host(url)?;
        let store = self.store(use_engine_store)?;
        tracing::debug!(url = %url, backend = %store.backend(), "get cookies");

        let cookies = store.all_cookies().await?;
        let now = OffsetDateTime::now_utc();
        Ok(cookies
            .iter()
            .filter(|c| !c.is_expired(now) && matcher::matches_for_read(&host, &c.domain))
            .map(|c| (c.name.clone(), CookieRecord::from(c)))
            .collect())
    }

    /// Every cookie in the selected backend, unfiltered.
    pub async fn get_all(&self, use_engine_store: bool) -> Result<Vec<CookieRecord>, CookieError> {
        let store = self.store(use_engine_store)?;
        tracing::debug!(backend = %store.backend(), "get all cookies");

        let cookies = store.all_cookies().await?;
        Ok(cookies.iter().map(CookieRecord::from).collect())
    }

    /// Validate `props` against `url` and write the cookie.
    ///
    /// Validation happens before the backend is consulted, so a bad cookie never
    /// reaches either store.
    pub async fn set(
        &self,
        url: &str,
        props: &CookieProps,
        use_engine_store: bool,
    ) -> Result<bool, CookieError> {
        let cookie = builder::build(url, props).map_err(|e| {
            tracing::debug!(url = %url, code = e.code(), validation = e.is_validation(), "cookie rejected");
            e
        })?;
        let store = self.store(use_engine_store)?;
        tracing::debug!(
            name = %cookie.name,
            domain = %cookie.domain,
            backend = %store.backend(),
            "set cookie"
        );

        store.set_cookie(cookie).await?;
        Ok(true)
    }

    /// Parse a raw `Set-Cookie` value as if received from `url` and store the
    /// result in the legacy jar.
    ///
    /// The engine store is never written by this operation.
    pub async fn set_from_response(&self, url: &str, header_value: &str) -> Result<bool, CookieError> {
        let (parsed, _) = builder::parse_url_host(url)?;
        let cookies = CanonicalCookie::parse_response_header(&parsed, header_value);
        self.legacy.set_cookies(cookies, &parsed);
        Ok(true)
    }

    /// GET `url`, store every cookie it sets in the legacy jar, and return them
    /// as a name → value map.
    pub async fn get_from_response(&self, url: &str) -> Result<BTreeMap<String, String>, CookieError> {
        let (parsed, _) = builder::parse_url_host(url)?;
        let head = self.fetcher.fetch(&parsed).await?;
        let response_url = head.url.clone().ok_or(CookieError::InvalidResponse)?;
        if response_url.host_str().is_none() {
            return Err(CookieError::InvalidResponse);
        }

        let mut values = BTreeMap::new();
        for header_value in head.set_cookie_values() {
            for cookie in CanonicalCookie::parse_response_header(&response_url, header_value) {
                values.insert(cookie.name.clone(), cookie.value.clone());
                self.legacy.set_canonical_cookie(cookie);
            }
        }

        tracing::debug!(url = %response_url, count = values.len(), "harvested response cookies");
        Ok(values)
    }

    /// Delete every cookie called `name` whose domain strictly matches the host
    /// of `url`. Returns whether anything was removed.
    pub async fn clear_by_name(
        &self,
        url: &str,
        name: &str,
        use_engine_store: bool,
    ) -> Result<bool, CookieError> {
        let (_, host) = builder::parse_url_host(url)?;
        let store = self.store(use_engine_store)?;

        let mut found = false;
        for cookie in store.all_cookies().await? {
            if cookie.name == name && matcher::matches_origin(&host, &cookie.domain) {
                found |= store.delete_cookie(&cookie).await?;
            }
        }

        tracing::debug!(name = %name, host = %host, backend = %store.backend(), found, "clear by name");
        Ok(found)
    }
}

/// Builder for a [`CookieManager`].
#[derive(Default)]
pub struct CookieManagerBuilder {
    legacy: Option<Arc<CookieMonster>>,
    legacy_override: Option<Arc<dyn CookieStore>>,
    engine_store: Option<Arc<EngineCookieStore>>,
    engine_override: Option<Arc<dyn CookieStore>>,
    main_thread: Option<MainThread>,
    engine_disabled: bool,
    fetcher: Option<Arc<dyn ResponseFetcher>>,
    tls_config: Option<TlsConfig>,
    user_agent: Option<String>,
}

impl CookieManagerBuilder {
    /// Legacy jar used by every legacy-store operation and by response harvesting.
    pub fn legacy_store(mut self, jar: Arc<CookieMonster>) -> Self {
        self.legacy = Some(jar);
        self
    }

    /// Engine store to marshal onto the main context.
    pub fn engine_store(mut self, store: Arc<EngineCookieStore>) -> Self {
        self.engine_store = Some(store);
        self
    }

    /// Main context for engine-store work.
    pub fn main_thread(mut self, main: MainThread) -> Self {
        self.main_thread = Some(main);
        self
    }

    /// Replace the store behind `backend` with any [`CookieStore`].
    ///
    /// Response harvesting keeps writing to the legacy jar.
    pub fn backend(mut self, backend: CookieStoreBackend, store: Arc<dyn CookieStore>) -> Self {
        match backend {
            CookieStoreBackend::Legacy => self.legacy_override = Some(store),
            CookieStoreBackend::Engine => self.engine_override = Some(store),
        }
        self
    }

    /// Behave like a platform without the engine cookie API.
    pub fn without_engine_store(mut self) -> Self {
        self.engine_disabled = true;
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn ResponseFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// TLS options for the default fetcher.
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// User-Agent for the default fetcher.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> CookieManager {
        let legacy = self.legacy.unwrap_or_else(CookieMonster::shared);
        let legacy_store = self
            .legacy_override
            .unwrap_or_else(|| legacy.clone() as Arc<dyn CookieStore>);

        let engine_store = if self.engine_disabled {
            None
        } else if let Some(store) = self.engine_override {
            Some(store)
        } else {
            match self.main_thread.or_else(MainThread::shared) {
                Some(main) => {
                    let store = self.engine_store.unwrap_or_else(EngineCookieStore::default_store);
                    Some(Arc::new(EngineStoreAdapter::new(store, main)) as Arc<dyn CookieStore>)
                }
                None => None,
            }
        };

        let fetcher = self.fetcher.unwrap_or_else(|| {
            Arc::new(HttpFetcher::new(
                self.tls_config.unwrap_or_default(),
                self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            ))
        });

        CookieManager {
            legacy,
            legacy_store,
            engine_store,
            fetcher,
        }
    }
}
