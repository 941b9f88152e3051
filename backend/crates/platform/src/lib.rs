//! Platform Crate - Technical Infrastructure
//!
//! Domain-free building blocks shared by the feature crates:
//! - HMAC-SHA256, SHA-256, hex/base64 and constant-time comparison
//! - zeroizing secret strings for credentials loaded from the environment
//! - session cookie formatting and parsing
//! - client fingerprinting for session binding

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod secret;
