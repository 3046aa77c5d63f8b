//! # keet
//!
//! A cookie manager over two stores: a process-global legacy cookie jar and a
//! web-engine cookie store that may only be touched from a dedicated main
//! context.
//!
//! ## Features
//!
//! - **Explicit backend selection**: every operation takes a `use_engine_store` flag
//! - **Validated writes**: domain/host consistency checked before any store mutation
//! - **Domain matching**: strict suffix rules for deletes, permissive containment for reads
//! - **Response harvesting**: parse `Set-Cookie` headers, or fetch a URL and keep what it sets
//! - **Main-context confinement**: engine work always runs on one FIFO thread
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keet::CookieManager;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), keet::CookieError> {
//!     let manager = CookieManager::new();
//!     let props = json!({ "name": "sid", "value": "abc", "domain": ".example.com" });
//!     manager.set("https://www.example.com", props.as_object().unwrap(), false).await?;
//!
//!     for (name, record) in manager.get("https://www.example.com", false).await? {
//!         println!("{name} = {}", record.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error type and context helpers
//! - [`cookies`] - Cookie model, validation, matching and both stores
//! - [`dispatch`] - Main-context executor
//! - [`http`] - Response fetch used to harvest cookies
//! - [`socket`] - Connection setup and TLS
//! - [`manager`] - The public facade
//! - [`view`] - Page view collaborator

pub mod base;
pub mod cookies;
pub mod dispatch;
pub mod http;
pub mod manager;
pub mod socket;
pub mod view;

pub use base::error::CookieError;
pub use cookies::record::CookieRecord;
pub use cookies::store::CookieStoreBackend;
pub use manager::{CookieManager, CookieManagerBuilder};
