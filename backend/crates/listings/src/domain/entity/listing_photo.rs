//! Listing Photo Entity

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, ListingPhotoId};

#[derive(Debug, Clone)]
pub struct ListingPhoto {
    pub photo_id: ListingPhotoId,
    pub listing_id: ListingId,
    /// Public URL in the storage backend
    pub photo_url: String,
    /// 0-based position in the gallery
    pub display_order: i32,
    /// Base64 JPEG, at most 300x300
    pub thumbnail_data: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub original_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ListingPhoto {
    pub fn new(listing_id: ListingId, photo_url: String, display_order: i32) -> Self {
        Self {
            photo_id: ListingPhotoId::new(),
            listing_id,
            photo_url,
            display_order,
            thumbnail_data: None,
            file_size_bytes: None,
            original_filename: None,
            created_at: Utc::now(),
        }
    }
}
