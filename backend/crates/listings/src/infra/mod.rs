//! Infrastructure Layer
//!
//! PostgreSQL repository, photo storage backends and image processing.

pub mod postgres;
pub mod storage;
pub mod thumbnail;

pub use postgres::PgListingsRepository;
pub use storage::{LocalStorage, PhotoStorage, StorageError, SupabaseStorage};
