pub mod listing_status;
pub mod listing_text;
pub mod price;

pub use listing_status::ListingStatus;
pub use listing_text::{ListingDescription, ListingTextError, ListingTitle};
pub use price::{Currency, Price, PriceError};
