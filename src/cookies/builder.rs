//! Validation of caller-supplied cookie properties.
//!
//! The host bridge hands over an untyped property bag:
//!
//! ```json
//! { "name": "sid", "value": "abc", "domain": ".example.com", "path": "/",
//!   "version": "1", "expires": "2030-01-01T00:00:00Z", "secure": true, "httpOnly": true }
//! ```
//!
//! [`build_properties`] checks it against the target URL and assembles the native
//! attribute set; [`build`] then runs the backend constructor over it.

use crate::base::error::CookieError;
use crate::cookies::canonicalcookie::{CanonicalCookie, CookieProperties};
use serde_json::{Map, Value};
use url::Url;

/// Untyped cookie properties as received from the caller.
pub type CookieProps = Map<String, Value>;

/// Parse `url` and return its host.
pub fn parse_url_host(url: &str) -> Result<(Url, String), CookieError> {
    let parsed = Url::parse(url).map_err(|_| CookieError::InvalidUrl)?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(CookieError::InvalidUrl)?
        .to_string();
    Ok((parsed, host))
}

/// Assemble the attribute set for a cookie written to `url`.
///
/// An explicit domain, with one leading dot removed, must equal the URL host or
/// appear inside it. The domain is then passed on as written, dot included.
pub fn build_properties(url: &str, props: &CookieProps) -> Result<CookieProperties, CookieError> {
    let (_, host) = parse_url_host(url)?;

    let domain = match props.get("domain").and_then(Value::as_str) {
        Some(domain) => {
            // Url::parse has already lowercased the host.
            let stripped = domain.strip_prefix('.').unwrap_or(domain).to_lowercase();
            if !host.contains(&stripped) && host != stripped {
                return Err(CookieError::DomainMismatch {
                    host,
                    domain: domain.to_string(),
                });
            }
            domain.to_string()
        }
        None => host,
    };

    Ok(CookieProperties {
        name: props.get("name").cloned(),
        value: props.get("value").cloned(),
        path: Some(
            props
                .get("path")
                .cloned()
                .unwrap_or_else(|| Value::String("/".to_string())),
        ),
        domain: Some(domain),
        version: props.get("version").cloned(),
        expires: props.get("expires").cloned(),
        secure: flag(props, "secure"),
        http_only: flag(props, "httpOnly"),
    })
}

/// Validate `props` against `url` and construct the cookie.
pub fn build(url: &str, props: &CookieProps) -> Result<CanonicalCookie, CookieError> {
    let attributes = build_properties(url, props)?;
    CanonicalCookie::from_properties(&attributes)
}

fn flag(props: &CookieProps, key: &str) -> Option<bool> {
    match props.get(key) {
        Some(Value::Bool(true)) => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> CookieProps {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_defaults_path_and_domain() {
        let c = build("https://a.com", &bag(json!({"name": "x", "value": "y"}))).unwrap();
        assert_eq!(c.path, "/");
        assert_eq!(c.domain, "a.com");
        assert_eq!(c.name, "x");
        assert_eq!(c.value, "y");
    }

    #[test]
    fn test_invalid_url() {
        let props = bag(json!({"name": "x", "value": "y"}));
        assert_eq!(build("not a url", &props).unwrap_err(), CookieError::InvalidUrl);
        assert_eq!(build("mailto:someone@a.com", &props).unwrap_err(), CookieError::InvalidUrl);
    }

    #[test]
    fn test_domain_mismatch() {
        let err = build(
            "https://a.com",
            &bag(json!({"domain": "b.com", "name": "x", "value": "y"})),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CookieError::DomainMismatch {
                host: "a.com".into(),
                domain: "b.com".into(),
            }
        );
    }

    #[test]
    fn test_parent_domain_with_dot_accepted() {
        let c = build(
            "https://www.example.com/login",
            &bag(json!({"domain": ".example.com", "name": "x", "value": "y"})),
        )
        .unwrap();
        assert_eq!(c.domain, "example.com");
        assert!(!c.host_only);
    }

    #[test]
    fn test_domain_substring_of_host_accepted() {
        // Containment, not suffix: kept for compatibility.
        assert!(build(
            "https://www.example.com",
            &bag(json!({"domain": "www.example", "name": "x", "value": "y"})),
        )
        .is_ok());
    }

    #[test]
    fn test_domain_check_ignores_case() {
        for url in ["https://Example.com/", "https://example.com/"] {
            let c = build(
                url,
                &bag(json!({"domain": "Example.com", "name": "x", "value": "y"})),
            )
            .unwrap();
            assert_eq!(c.domain, "example.com");
        }

        let c = build(
            "https://www.example.com",
            &bag(json!({"domain": ".EXAMPLE.com", "name": "x", "value": "y"})),
        )
        .unwrap();
        assert_eq!(c.domain, "example.com");
        assert!(!c.host_only);

        // Diagnostics keep the caller's spelling.
        let err = build(
            "https://a.com",
            &bag(json!({"domain": "B.com", "name": "x", "value": "y"})),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CookieError::DomainMismatch {
                host: "a.com".into(),
                domain: "B.com".into(),
            }
        );
    }

    #[test]
    fn test_non_string_domain_defaults_to_host() {
        let c = build(
            "https://a.com",
            &bag(json!({"domain": 5, "name": "x", "value": "y"})),
        )
        .unwrap();
        assert_eq!(c.domain, "a.com");
    }

    #[test]
    fn test_flags_absent_unless_true() {
        let p = build_properties(
            "https://a.com",
            &bag(json!({"name": "x", "value": "y", "secure": false})),
        )
        .unwrap();
        assert_eq!(p.secure, None);
        assert_eq!(p.http_only, None);

        let p = build_properties(
            "https://a.com",
            &bag(json!({"name": "x", "value": "y", "secure": "true", "httpOnly": 1})),
        )
        .unwrap();
        assert_eq!(p.secure, None);
        assert_eq!(p.http_only, None);

        let p = build_properties(
            "https://a.com",
            &bag(json!({"name": "x", "value": "y", "secure": true, "httpOnly": true})),
        )
        .unwrap();
        assert_eq!(p.secure, Some(true));
        assert_eq!(p.http_only, Some(true));
    }

    #[test]
    fn test_values_copied_verbatim() {
        let p = build_properties(
            "https://a.com",
            &bag(json!({"name": "x", "value": "y", "version": "1", "expires": 12})),
        )
        .unwrap();
        assert_eq!(p.version, Some(json!("1")));
        assert_eq!(p.expires, Some(json!(12)));
        assert_eq!(p.path, Some(json!("/")));
    }

    #[test]
    fn test_missing_name_fails_construction() {
        let err = build("https://a.com", &bag(json!({"value": "y"}))).unwrap_err();
        assert_eq!(err.code(), "ConstructionFailed");
    }

    #[test]
    fn test_malformed_expiry_fails_construction() {
        let err = build(
            "https://a.com",
            &bag(json!({"name": "x", "value": "y", "expires": "yesterday-ish"})),
        )
        .unwrap_err();
        assert_eq!(err.code(), "ConstructionFailed");
    }
}
