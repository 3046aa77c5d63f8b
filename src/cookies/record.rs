//! External record shape returned to callers.

use crate::cookies::canonicalcookie::CanonicalCookie;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// A cookie as seen by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl From<&CanonicalCookie> for CookieRecord {
    fn from(cookie: &CanonicalCookie) -> Self {
        Self {
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            path: cookie.path.clone(),
            domain: cookie.domain.clone(),
            version: cookie.version.to_string(),
            expires: cookie.expiration_time.and_then(format_expires),
            secure: cookie.secure,
            http_only: cookie.http_only,
        }
    }
}

/// Format an expiry as `yyyy-MM-dd'T'HH:mm:ss.SSSZ`, always in UTC.
pub fn format_expires(at: OffsetDateTime) -> Option<String> {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .ok()
}
