pub mod fetch;

// Re-exports for convenience
pub use fetch::{HttpFetcher, ResponseFetcher, ResponseHead};
