//! Cookie persistence - save and load the legacy jar to/from disk.
//!
//! Provides JSON-based persistence for [`CookieMonster`].

use crate::cookies::canonicalcookie::{CanonicalCookie, SameSite};
use crate::cookies::monster::CookieMonster;
use std::fs;
use std::io;
use std::path::Path;
use time::OffsetDateTime;

use serde::{Deserialize, Serialize};

/// Serializable representation of a cookie for persistence.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct PersistentCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
    #[serde(default)]
    version: i32,
    secure: bool,
    http_only: bool,
    host_only: bool,
    expires_unix_secs: Option<i64>,
}

/// Save every non-session cookie from `monster` to `path`.
///
/// Session cookies (no expiry) end with the process and are not written.
pub fn save_cookies(monster: &CookieMonster, path: &Path) -> io::Result<usize> {
    let all_cookies: Vec<PersistentCookie> = monster
        .iter_all_cookies()
        .filter_map(|cookie| {
            let expires = cookie.expiration_time?.unix_timestamp();
            Some(PersistentCookie {
                name: cookie.name,
                value: cookie.value,
                domain: cookie.domain,
                path: cookie.path,
                version: cookie.version,
                secure: cookie.secure,
                http_only: cookie.http_only,
                host_only: cookie.host_only,
                expires_unix_secs: Some(expires),
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&all_cookies)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), count = all_cookies.len(), "cookies saved");
    Ok(all_cookies.len())
}

/// Load cookies from `path` into `monster`, skipping expired ones.
///
/// Returns how many cookies were restored.
pub fn load_cookies(monster: &CookieMonster, path: &Path) -> io::Result<usize> {
    let json = fs::read_to_string(path)?;
    let persistent_cookies: Vec<PersistentCookie> =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let now = OffsetDateTime::now_utc();
    let mut restored = 0;

    for pc in persistent_cookies {
        let expiration_time =
            pc.expires_unix_secs.and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok());
        if expiration_time.is_some_and(|t| t < now) {
            continue;
        }

        monster.set_canonical_cookie(CanonicalCookie {
            name: pc.name,
            value: pc.value,
            domain: pc.domain,
            path: pc.path,
            version: pc.version,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure: pc.secure,
            http_only: pc.http_only,
            host_only: pc.host_only,
            same_site: SameSite::Unspecified,
        });
        restored += 1;
    }

    tracing::debug!(path = %path.display(), count = restored, "cookies loaded");
    Ok(restored)
}
