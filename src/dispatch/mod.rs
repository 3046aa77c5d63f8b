//! Main-context scheduling.
//!
//! The engine cookie store may only be touched from one dedicated thread. This
//! module provides that thread ([`MainThread`]) and the token ([`MainContext`])
//! that confined APIs require.

pub mod mainthread;

pub use mainthread::{Job, MainContext, MainThread};
