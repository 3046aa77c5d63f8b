//! Tests for the CookieManager facade against both backends.

use keet::cookies::builder::CookieProps;
use keet::cookies::enginestore::EngineCookieStore;
use keet::cookies::monster::CookieMonster;
use keet::dispatch::MainThread;
use keet::CookieManager;
use serde_json::{json, Value};
use std::sync::Arc;

fn props(value: Value) -> CookieProps {
    value.as_object().cloned().unwrap()
}

fn isolated_manager() -> CookieManager {
    CookieManager::builder()
        .legacy_store(Arc::new(CookieMonster::new()))
        .engine_store(Arc::new(EngineCookieStore::new()))
        .main_thread(MainThread::spawn("manager-it").unwrap())
        .build()
}

#[tokio::test]
async fn test_set_then_get_roundtrip_both_backends() {
    let manager = isolated_manager();

    for use_engine in [false, true] {
        let written = props(json!({
            "name": "sid",
            "value": "abc",
            "domain": ".example.com",
            "path": "/",
            "version": 1,
            "expires": "2099-01-01T00:00:00Z",
            "secure": true,
            "httpOnly": true,
        }));
        assert!(manager
            .set("https://www.example.com", &written, use_engine)
            .await
            .unwrap());

        let cookies = manager.get("https://www.example.com", use_engine).await.unwrap();
        let record = &cookies["sid"];
        assert_eq!(record.name, "sid");
        assert_eq!(record.value, "abc");
        assert_eq!(record.domain.trim_start_matches('.'), "example.com");
        assert_eq!(record.path, "/");
        assert_eq!(record.version, "1");
        assert_eq!(record.expires.as_deref(), Some("2099-01-01T00:00:00.000Z"));
        assert!(record.secure);
        assert!(record.http_only);
    }
}

#[tokio::test]
async fn test_clear_by_name_then_again() {
    let manager = isolated_manager();

    for use_engine in [false, true] {
        manager
            .set(
                "https://a.com",
                &props(json!({"name": "token", "value": "1"})),
                use_engine,
            )
            .await
            .unwrap();

        assert!(manager.clear_by_name("https://a.com", "token", use_engine).await.unwrap());
        let cookies = manager.get("https://a.com", use_engine).await.unwrap();
        assert!(!cookies.contains_key("token"));

        assert!(!manager.clear_by_name("https://a.com", "token", use_engine).await.unwrap());
    }
}

#[tokio::test]
async fn test_clear_by_name_uses_strict_domain_match() {
    let manager = isolated_manager();
    manager
        .set(
            "https://www.example.com",
            &props(json!({"name": "n", "value": "1", "domain": ".example.com"})),
            false,
        )
        .await
        .unwrap();
    manager
        .set("https://other.com", &props(json!({"name": "n", "value": "2"})), false)
        .await
        .unwrap();

    // notexample.com only loosely resembles example.com: nothing to delete.
    assert!(!manager.clear_by_name("https://notexample.com", "n", false).await.unwrap());

    // A subdomain removes the parent-domain cookie but not other.com's.
    assert!(manager.clear_by_name("https://api.example.com", "n", false).await.unwrap());
    let remaining = manager.get_all(false).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].domain, "other.com");
}

#[tokio::test]
async fn test_clear_by_name_removes_every_matching_domain() {
    let manager = isolated_manager();
    manager
        .set(
            "https://www.example.com",
            &props(json!({"name": "n", "value": "1", "domain": "example.com"})),
            true,
        )
        .await
        .unwrap();
    manager
        .set("https://www.example.com", &props(json!({"name": "n", "value": "2"})), true)
        .await
        .unwrap();
    assert_eq!(manager.get_all(true).await.unwrap().len(), 2);

    assert!(manager.clear_by_name("https://www.example.com", "n", true).await.unwrap());
    assert!(manager.get_all(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_all_grows_with_distinct_names() {
    let manager = isolated_manager();

    for use_engine in [false, true] {
        let mut last = manager.get_all(use_engine).await.unwrap().len();
        for i in 0..20 {
            manager
                .set(
                    "https://a.com",
                    &props(json!({"name": format!("c{i}"), "value": "v"})),
                    use_engine,
                )
                .await
                .unwrap();
            let now = manager.get_all(use_engine).await.unwrap().len();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 20);
    }
}

#[tokio::test]
async fn test_get_filters_by_host() {
    let manager = isolated_manager();
    manager
        .set("https://a.com", &props(json!({"name": "a", "value": "1"})), false)
        .await
        .unwrap();
    manager
        .set("https://b.org", &props(json!({"name": "b", "value": "2"})), false)
        .await
        .unwrap();

    let cookies = manager.get("https://a.com/some/page", false).await.unwrap();
    assert_eq!(cookies.len(), 1);
    assert!(cookies.contains_key("a"));
}

#[tokio::test]
async fn test_read_path_is_permissive() {
    let manager = isolated_manager();
    manager
        .set(
            "https://www.example.com",
            &props(json!({"name": "wide", "value": "1", "domain": "www.example.com"})),
            false,
        )
        .await
        .unwrap();

    // The cookie domain contains the host: visible to reads, not to deletes.
    let cookies = manager.get("https://example.com", false).await.unwrap();
    assert!(cookies.contains_key("wide"));
    assert!(!manager.clear_by_name("https://example.com", "wide", false).await.unwrap());
}

#[tokio::test]
async fn test_invalid_url_rejected_everywhere() {
    let manager = isolated_manager();
    let p = props(json!({"name": "x", "value": "y"}));

    assert_eq!(manager.get("nope", false).await.unwrap_err().code(), "InvalidURL");
    assert_eq!(manager.set("nope", &p, true).await.unwrap_err().code(), "InvalidURL");
    assert_eq!(
        manager.clear_by_name("nope", "x", false).await.unwrap_err().code(),
        "InvalidURL"
    );
    assert_eq!(
        manager.set_from_response("nope", "a=1").await.unwrap_err().code(),
        "InvalidURL"
    );
}

#[tokio::test]
async fn test_failed_validation_leaves_stores_untouched() {
    let manager = isolated_manager();

    for use_engine in [false, true] {
        let err = manager
            .set(
                "https://a.com",
                &props(json!({"name": "x", "value": "y", "expires": "garbage"})),
                use_engine,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ConstructionFailed");
        assert!(manager.get_all(use_engine).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_concurrent_engine_calls_all_complete() {
    let manager = isolated_manager();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .set(
                        "https://a.com",
                        &props(json!({"name": format!("c{i}"), "value": "v"})),
                        true,
                    )
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().unwrap());
    }
    assert_eq!(manager.get_all(true).await.unwrap().len(), 16);
}
