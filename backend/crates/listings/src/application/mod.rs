//! Application Layer
//!
//! Use cases for the marketplace catalogue.

pub mod config;
pub mod create_listing;
pub mod list_listings;
pub mod moderate_listing;
pub mod upload_photos;

pub use config::ListingsConfig;
pub use create_listing::{CreateListingInput, CreateListingUseCase};
pub use list_listings::{GetListingUseCase, ListListingsInput, ListListingsUseCase, ListingWithPhotos};
pub use moderate_listing::ModerateListingUseCase;
pub use upload_photos::{UploadPhotosUseCase, UploadedPhoto};
