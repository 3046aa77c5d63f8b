//! Public Suffix List (PSL) checks for cookies received in responses.
//!
//! A `Set-Cookie` header may only widen a cookie to a registrable parent of the
//! responding host, never to `.com` or `.co.uk`. Cookies written through
//! [`CookieManager::set`](crate::manager::CookieManager::set) use the builder's own
//! domain rule instead.

use crate::cookies::matcher;
use psl::{List, Psl};

/// True if `domain` is itself a public suffix (e.g. "com", "co.uk", "github.io").
pub fn is_public_suffix(domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    let domain_bytes = domain_lower.as_bytes();

    match List.suffix(domain_bytes) {
        Some(suffix) => suffix.as_bytes() == domain_bytes,
        None => false,
    }
}

/// Whether a response from `host` may set a cookie for `cookie_domain`.
///
/// The domain must strictly match the host and must not be a public suffix. A
/// host that is itself listed (e.g. `github.io` answering for itself) may still
/// set a cookie on its own name.
pub fn is_acceptable_cookie_domain(cookie_domain: &str, host: &str) -> bool {
    let cookie_domain = cookie_domain.trim_start_matches('.').to_lowercase();
    let host = host.to_lowercase();

    if !matcher::matches_origin(&host, &cookie_domain) {
        return false;
    }

    cookie_domain == host || !is_public_suffix(&cookie_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_suffixes() {
        assert!(is_public_suffix("com"));
        assert!(is_public_suffix("CO.UK"));
        assert!(is_public_suffix("github.io"));
        assert!(!is_public_suffix("example.com"));
        assert!(!is_public_suffix("sub.example.co.uk"));
    }

    #[test]
    fn test_parent_domain_accepted() {
        assert!(is_acceptable_cookie_domain("example.com", "www.example.com"));
        assert!(is_acceptable_cookie_domain(".example.com", "www.example.com"));
        assert!(is_acceptable_cookie_domain("example.co.uk", "shop.example.co.uk"));
    }

    #[test]
    fn test_supercookie_rejected() {
        assert!(!is_acceptable_cookie_domain("com", "example.com"));
        assert!(!is_acceptable_cookie_domain(".co.uk", "example.co.uk"));
    }

    #[test]
    fn test_unrelated_and_child_rejected() {
        assert!(!is_acceptable_cookie_domain("other.com", "example.com"));
        assert!(!is_acceptable_cookie_domain("api.example.com", "example.com"));
    }

    #[test]
    fn test_host_may_name_itself() {
        assert!(is_acceptable_cookie_domain("github.io", "github.io"));
    }
}
