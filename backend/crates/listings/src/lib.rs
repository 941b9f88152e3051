//! Marketplace Listings
//!
//! - `domain/` - listing and photo entities, value objects, repository traits
//! - `application/` - use cases (create, catalogue, photo upload, moderation)
//! - `infra/` - PostgreSQL repository, photo storage backends, thumbnails
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every route expects a [`kernel::principal::Principal`] in the request
//! extensions, put there by the auth session middleware.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::ListingsConfig;
pub use error::{ListingError, ListingResult};
pub use infra::postgres::PgListingsRepository;
pub use infra::storage::{LocalStorage, PhotoStorage, StorageError, SupabaseStorage};
pub use presentation::router::{listings_router, listings_router_generic};
