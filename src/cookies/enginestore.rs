//! Web-engine cookie store.
//!
//! [`EngineCookieStore`] stands in for the rendering engine's data store: every
//! method requires a [`MainContext`] and reports back through a completion
//! callback that runs on a later turn of the main queue.
//! [`EngineStoreAdapter`] marshals [`CookieStore`] calls onto that context and
//! suspends the caller until the callback fires.

use crate::base::error::CookieError;
use crate::cookies::canonicalcookie::CanonicalCookie;
use crate::cookies::store::{CookieStore, CookieStoreBackend};
use crate::dispatch::{MainContext, MainThread};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, OnceLock};

static DEFAULT_STORE: OnceLock<Arc<EngineCookieStore>> = OnceLock::new();

/// Cookie store owned by the rendering engine.
#[derive(Default)]
pub struct EngineCookieStore {
    cookies: Mutex<Vec<CanonicalCookie>>,
}

impl EngineCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The engine's default data store, shared by every view in the process.
    pub fn default_store() -> Arc<EngineCookieStore> {
        DEFAULT_STORE
            .get_or_init(|| Arc::new(EngineCookieStore::new()))
            .clone()
    }

    pub fn get_all_cookies<F>(&self, cx: &MainContext, completion: F)
    where
        F: FnOnce(Vec<CanonicalCookie>) + Send + 'static,
    {
        let snapshot = self.with_cookies(|cookies| cookies.clone());
        cx.post(move |_| completion(snapshot));
    }

    pub fn set_cookie<F>(&self, cx: &MainContext, cookie: CanonicalCookie, completion: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.with_cookies(|cookies| {
            cookies.retain(|c| !c.is_same_slot(&cookie));
            if !cookie.is_expired(time::OffsetDateTime::now_utc()) {
                cookies.push(cookie);
            }
        });
        cx.post(move |_| completion());
    }

    /// Delete the cookie in `cookie`'s slot. The completion reports whether one existed.
    pub fn delete_cookie<F>(&self, cx: &MainContext, cookie: &CanonicalCookie, completion: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let removed = self.with_cookies(|cookies| {
            let before = cookies.len();
            cookies.retain(|c| !c.is_same_slot(cookie));
            cookies.len() != before
        });
        cx.post(move |_| completion(removed));
    }

    fn with_cookies<R>(&self, f: impl FnOnce(&mut Vec<CanonicalCookie>) -> R) -> R {
        // Only ever locked from the main context, so a poisoned lock still holds
        // consistent data.
        let mut guard = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

/// [`CookieStore`] over an [`EngineCookieStore`], always run on the main context.
pub struct EngineStoreAdapter {
    store: Arc<EngineCookieStore>,
    main: MainThread,
}

impl EngineStoreAdapter {
    pub fn new(store: Arc<EngineCookieStore>, main: MainThread) -> Self {
        Self { store, main }
    }
}

#[async_trait]
impl CookieStore for EngineStoreAdapter {
    fn backend(&self) -> CookieStoreBackend {
        CookieStoreBackend::Engine
    }

    async fn all_cookies(&self) -> Result<Vec<CanonicalCookie>, CookieError> {
        let store = self.store.clone();
        self.main
            .run(move |cx, reply| {
                store.get_all_cookies(cx, move |cookies| {
                    let _ = reply.send(cookies);
                });
            })
            .await
    }

    async fn set_cookie(&self, cookie: CanonicalCookie) -> Result<(), CookieError> {
        let store = self.store.clone();
        self.main
            .run(move |cx, reply| {
                store.set_cookie(cx, cookie, move || {
                    let _ = reply.send(());
                });
            })
            .await
    }

    async fn delete_cookie(&self, cookie: &CanonicalCookie) -> Result<bool, CookieError> {
        let store = self.store.clone();
        let cookie = cookie.clone();
        self.main
            .run(move |cx, reply| {
                store.delete_cookie(cx, &cookie, move |removed| {
                    let _ = reply.send(removed);
                });
            })
            .await
    }
}
