//! Socket management for the response-cookie fetch.
//!
//! - [`connectjob`]: DNS → TCP → TLS connection flow
//! - [`stream`]: plain and TLS sockets behind one type
//! - [`tls`]: TLS configuration with BoringSSL

pub mod connectjob;
pub mod stream;
pub mod tls;
