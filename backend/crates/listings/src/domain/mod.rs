//! Domain Layer
//!
//! Listings, photos, validation rules and repository traits.

pub mod entity;
pub mod photo;
pub mod repository;
pub mod value_object;

pub use entity::listing::{Listing, ModerationDecision, NewListing};
pub use entity::listing_photo::ListingPhoto;
pub use photo::{PhotoError, PhotoUpload};
pub use repository::{ListingPhotoRepository, ListingQuery, ListingRepository, ListingsRepository};
