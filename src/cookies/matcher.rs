//! Domain predicates deciding which stored cookies apply to a host.
//!
//! Two deliberately different predicates live here:
//!
//! - [`matches_origin`]: strict suffix matching, used when deleting.
//! - [`matches_for_read`]: permissive containment in either direction, used when
//!   listing cookies for a URL.
//!
//! Reads therefore return a superset of what a delete would touch. Keep them apart.

/// Strict cookie-domain scoping.
///
/// True when `origin_host` equals the cookie domain (leading dot ignored) or ends
/// with `"." + domain`. `www.example.com` and `example.com` both match
/// `.example.com`; `notexample.com` does not.
pub fn matches_origin(origin_host: &str, cookie_domain: &str) -> bool {
    let bare = cookie_domain.strip_prefix('.').unwrap_or(cookie_domain);
    if origin_host == cookie_domain || origin_host == bare {
        return true;
    }

    let dotted_len = bare.len() + 1;
    origin_host.len() > dotted_len
        && origin_host.ends_with(bare)
        && origin_host.as_bytes()[origin_host.len() - dotted_len] == b'.'
}

/// Permissive read-path filter.
///
/// True when the host contains the cookie domain, the cookie domain contains the
/// host, or they are equal. This is looser than real cookie scoping
/// (`www.example.com` sees cookies for `ample.com`) and is kept for compatibility
/// with existing callers.
pub fn matches_for_read(host: &str, cookie_domain: &str) -> bool {
    let bare = cookie_domain.strip_prefix('.').unwrap_or(cookie_domain);
    host == bare || host.contains(bare) || bare.contains(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_exact_match() {
        assert!(matches_origin("example.com", "example.com"));
        assert!(matches_origin("example.com", ".example.com"));
    }

    #[test]
    fn test_strict_subdomain_match() {
        assert!(matches_origin("www.example.com", "example.com"));
        assert!(matches_origin("www.example.com", ".example.com"));
        assert!(matches_origin("a.b.example.com", "example.com"));
    }

    #[test]
    fn test_strict_rejects_lookalike() {
        assert!(!matches_origin("notexample.com", "example.com"));
        assert!(!matches_origin("notexample.com", ".example.com"));
    }

    #[test]
    fn test_strict_rejects_parent_and_sibling() {
        assert!(!matches_origin("example.com", "www.example.com"));
        assert!(!matches_origin("api.example.com", "www.example.com"));
    }

    #[test]
    fn test_strict_empty_domain() {
        assert!(!matches_origin("example.com", ""));
        assert!(!matches_origin("example.com", "."));
    }

    #[test]
    fn test_read_is_bidirectional() {
        // host contains domain
        assert!(matches_for_read("www.example.com", "example.com"));
        // domain contains host
        assert!(matches_for_read("example.com", "www.example.com"));
        assert!(matches_for_read("example.com", "example.com"));
    }

    #[test]
    fn test_read_is_looser_than_strict() {
        // Plain substring, no label boundary.
        assert!(matches_for_read("notexample.com", "example.com"));
        assert!(!matches_origin("notexample.com", "example.com"));

        assert!(matches_for_read("www.example.com", "ample.com"));
        assert!(!matches_origin("www.example.com", "ample.com"));
    }

    #[test]
    fn test_read_rejects_unrelated() {
        assert!(!matches_for_read("example.com", "other.org"));
    }

    #[test]
    fn test_read_ignores_leading_dot() {
        assert!(matches_for_read("example.com", ".example.com"));
    }
}
