use crate::base::error::CookieError;
use crate::cookies::psl;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::Url;

/// Represents a cookie held by either backend.
///
/// `domain` is stored lowercased and without a leading dot. `host_only` records
/// whether the cookie was created without an explicit domain attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub version: i32,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

/// Attribute set handed to the native cookie constructor.
///
/// Values are kept exactly as the caller supplied them; only
/// [`CanonicalCookie::from_properties`] interprets them. `secure` and `http_only`
/// are either absent or `Some(true)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieProperties {
    pub name: Option<Value>,
    pub value: Option<Value>,
    pub path: Option<Value>,
    pub domain: Option<String>,
    pub version: Option<Value>,
    pub expires: Option<Value>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
}

impl CanonicalCookie {
    pub fn new(
        name: String,
        value: String,
        domain: String,
        path: String,
        creation_time: OffsetDateTime,
        expiration_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name,
            value,
            domain,
            path,
            version: 0,
            creation_time,
            expiration_time,
            last_access_time: creation_time,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: SameSite::Unspecified,
        }
    }

    /// Native constructor: turn an attribute set into a cookie, or reject it.
    ///
    /// A domain written with a leading dot produces a domain cookie; without one the
    /// cookie is host-only.
    pub fn from_properties(props: &CookieProperties) -> Result<Self, CookieError> {
        let name = required_string(props.name.as_ref(), "name")?;
        if name.is_empty() {
            return Err(CookieError::construction_failed("cookie name must not be empty"));
        }
        if !is_valid_name(name) {
            return Err(CookieError::construction_failed(format!(
                "cookie name {name:?} contains forbidden characters"
            )));
        }

        let value = required_string(props.value.as_ref(), "value")?;
        if !is_valid_value(value) {
            return Err(CookieError::construction_failed(format!(
                "cookie value for {name:?} contains forbidden characters"
            )));
        }

        let path = required_string(props.path.as_ref(), "path")?;

        let raw_domain = props
            .domain
            .as_deref()
            .ok_or_else(|| CookieError::construction_failed("missing domain"))?;
        let host_only = !raw_domain.starts_with('.');
        let domain = raw_domain.trim_start_matches('.').to_lowercase();
        if domain.is_empty() {
            return Err(CookieError::construction_failed("cookie domain must not be empty"));
        }

        let version = props.version.as_ref().map(parse_version).unwrap_or(0);
        let expiration_time = match props.expires.as_ref() {
            None | Some(Value::Null) => None,
            Some(expires) => Some(parse_expiry(expires)?),
        };

        let now = OffsetDateTime::now_utc();
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
            domain,
            path: path.to_string(),
            version,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure: props.secure.unwrap_or(false),
            http_only: props.http_only.unwrap_or(false),
            host_only,
            same_site: SameSite::Unspecified,
        })
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        match self.expiration_time {
            Some(expiry) => expiry < current_time,
            None => false,
        }
    }

    /// Two cookies with the same name, domain and path occupy the same slot.
    pub fn is_same_slot(&self, other: &CanonicalCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(&self, secure_origin: bool) -> Result<(), CookieError> {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(CookieError::construction_failed(
                "__Secure- cookies require the Secure attribute on a secure origin",
            ));
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return Err(CookieError::construction_failed(
                "__Host- cookies require Secure, Path=/ and no Domain",
            ));
        }

        Ok(())
    }

    /// Parse a single `Set-Cookie` line received from `url`.
    pub fn parse_set_cookie(url: &Url, cookie_line: &str) -> Result<Self, CookieError> {
        let host = url.host_str().ok_or(CookieError::InvalidUrl)?.to_lowercase();
        let parsed = cookie::Cookie::parse(cookie_line)
            .map_err(|e| CookieError::construction_failed(e.to_string()))?;

        let (domain, host_only) = match parsed.domain() {
            Some(d) => {
                let d = d.trim_start_matches('.').to_lowercase();
                if !psl::is_acceptable_cookie_domain(&d, &host) {
                    return Err(CookieError::DomainMismatch { host, domain: d });
                }
                (d, false)
            }
            None => (host, true),
        };

        let path = match parsed.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => default_path(url),
        };

        let now = OffsetDateTime::now_utc();
        // Max-Age wins over Expires.
        let expiration_time = match parsed.max_age() {
            Some(max_age) => Some(max_age_expiry(now, max_age)),
            None => parsed.expires().and_then(|e| e.datetime()),
        };

        let same_site = match parsed.same_site() {
            Some(cookie::SameSite::Lax) => SameSite::Lax,
            Some(cookie::SameSite::Strict) => SameSite::Strict,
            Some(cookie::SameSite::None) => SameSite::NoRestriction,
            None => SameSite::Unspecified,
        };

        let c = Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path,
            version: 0,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
            same_site,
        };

        if c.name.is_empty() {
            return Err(CookieError::construction_failed("cookie name must not be empty"));
        }
        c.validate_prefix(url.scheme() == "https")?;
        Ok(c)
    }

    /// Parse a raw `Set-Cookie` header value that may hold several cookies.
    ///
    /// Cookies that fail to parse or are not allowed for `url` are skipped.
    pub fn parse_response_header(url: &Url, raw: &str) -> Vec<Self> {
        split_set_cookie_header(raw)
            .into_iter()
            .filter_map(|line| match Self::parse_set_cookie(url, line) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "rejected response cookie");
                    None
                }
            })
            .collect()
    }
}

/// Split a header value holding comma-joined cookies.
///
/// A comma only separates cookies when the text after it (up to the next `;` or
/// `,`) looks like `name=value`, so `Expires=Wed, 21 Oct 2015 ...` stays intact.
pub fn split_set_cookie_header(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();

    for line in raw.lines() {
        let mut start = 0;
        for (i, ch) in line.char_indices() {
            if ch != ',' {
                continue;
            }
            let rest = &line[i + 1..];
            let token = rest.split(|c| c == ';' || c == ',').next().unwrap_or("");
            if token.contains('=') {
                parts.push(line[start..i].trim());
                start = i + 1;
            }
        }
        parts.push(line[start..].trim());
    }

    parts.retain(|p| !p.is_empty());
    parts
}

/// RFC 6265 default-path: the request path up to, but not including, its last `/`.
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Expiry for a `Max-Age` attribute, saturating at the representable range.
fn max_age_expiry(now: OffsetDateTime, max_age: time::Duration) -> OffsetDateTime {
    now.checked_add(max_age).unwrap_or_else(|| {
        if max_age.is_negative() {
            OffsetDateTime::UNIX_EPOCH
        } else {
            PrimitiveDateTime::MAX.assume_utc()
        }
    })
}

fn required_string<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a str, CookieError> {
    match value {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(CookieError::construction_failed(format!(
            "cookie {field} must be a string"
        ))),
        None => Err(CookieError::construction_failed(format!("missing cookie {field}"))),
    }
}

fn is_valid_name(name: &str) -> bool {
    !name
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || matches!(c, '=' | ';' | ','))
}

fn is_valid_value(value: &str) -> bool {
    !value.chars().any(|c| c.is_control() || c == ';')
}

fn parse_version(value: &Value) -> i32 {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn parse_expiry(value: &Value) -> Result<OffsetDateTime, CookieError> {
    match value {
        Value::String(s) => OffsetDateTime::parse(s, &Rfc3339)
            .map_err(|e| CookieError::construction_failed(format!("malformed expires {s:?}: {e}"))),
        Value::Number(n) if n.is_i64() => n
            .as_i64()
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
            .ok_or_else(|| CookieError::construction_failed(format!("malformed expires {n}"))),
        Value::Number(n) => {
            let secs = n
                .as_f64()
                .ok_or_else(|| CookieError::construction_failed("malformed expires"))?;
            let nanos = (secs * 1_000_000_000.0) as i128;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map_err(|e| CookieError::construction_failed(format!("malformed expires: {e}")))
        }
        other => Err(CookieError::construction_failed(format!(
            "malformed expires {other}"
        ))),
    }
}
