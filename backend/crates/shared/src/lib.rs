//! Shared Kernel
//!
//! Vocabulary every other crate agrees on:
//! - the unified error type and its HTTP rendering
//! - typed IDs
//! - the authenticated principal handed from `auth` to feature crates

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod principal;
