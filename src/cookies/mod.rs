//! Cookie model, validation, matching and the two storage backends.
//!
//! # Architecture
//!
//! | Piece | Type | Responsibility |
//! |-------|------|----------------|
//! | Domain matcher | [`matcher`] | strict (delete) and permissive (read) domain predicates |
//! | Validator/builder | [`builder`] | property bag → attribute set → [`CanonicalCookie`](canonicalcookie::CanonicalCookie) |
//! | Legacy store | [`CookieMonster`](monster::CookieMonster) | process-global jar, synchronous |
//! | Engine store | [`EngineCookieStore`](enginestore::EngineCookieStore) | main-context confined, callback based |
//! | Store contract | [`CookieStore`](store::CookieStore) | uniform async interface over both |
//! | Wire shape | [`CookieRecord`](record::CookieRecord) | what callers receive |
//!
//! # Writing a cookie
//!
//! ```rust
//! use keet::cookies::builder;
//! use keet::cookies::monster::CookieMonster;
//! use serde_json::json;
//!
//! let props = json!({ "name": "sid", "value": "abc", "domain": ".example.com" });
//! let cookie = builder::build("https://www.example.com", props.as_object().unwrap())?;
//!
//! let jar = CookieMonster::new();
//! jar.set_canonical_cookie(cookie);
//! assert_eq!(jar.total_cookie_count(), 1);
//! # Ok::<(), keet::base::error::CookieError>(())
//! ```

pub mod builder;
pub mod canonicalcookie;
pub mod enginestore;
pub mod matcher;
pub mod monster;
pub mod persistence;
pub mod psl;
pub mod record;
pub mod store;
