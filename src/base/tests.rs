use crate::base::error::CookieError;

#[test]
fn test_error_codes() {
    assert_eq!(CookieError::InvalidUrl.code(), "InvalidURL");
    assert_eq!(
        CookieError::DomainMismatch {
            host: "a.com".into(),
            domain: "b.com".into(),
        }
        .code(),
        "DomainMismatch"
    );
    assert_eq!(CookieError::construction_failed("x").code(), "ConstructionFailed");
    assert_eq!(CookieError::request_failed("x").code(), "RequestFailed");
    assert_eq!(CookieError::InvalidResponse.code(), "InvalidResponse");
    assert_eq!(CookieError::engine_unavailable().code(), "Unsupported");
}

#[test]
fn test_domain_mismatch_message_names_both_values() {
    let err = CookieError::DomainMismatch {
        host: "a.com".into(),
        domain: "b.com".into(),
    };
    let message = err.to_string();
    assert!(message.contains("a.com"));
    assert!(message.contains("b.com"));
}

#[test]
fn test_request_failed_message_is_verbatim() {
    let err = CookieError::request_failed("dns error: no such host");
    assert_eq!(err.to_string(), "dns error: no such host");
}

#[test]
fn test_rejection_serializes() {
    let rejection = CookieError::InvalidResponse.to_rejection();
    let json = serde_json::to_value(&rejection).unwrap();
    assert_eq!(json["code"], "InvalidResponse");
    assert_eq!(json["message"], "The response is not valid.");
}

#[test]
fn test_validation_classification() {
    assert!(CookieError::InvalidUrl.is_validation());
    assert!(CookieError::construction_failed("bad").is_validation());
    assert!(!CookieError::InvalidResponse.is_validation());
    assert!(!CookieError::engine_unavailable().is_validation());
}
