//! Listings configuration

use crate::infra::thumbnail::{THUMBNAIL_MAX_SIZE, THUMBNAIL_QUALITY};

#[derive(Debug, Clone)]
pub struct ListingsConfig {
    pub max_photos_per_listing: usize,
    /// Per file
    pub max_photo_bytes: usize,
    /// Object key prefix in the storage backend
    pub photo_folder: String,
    pub thumbnail_max_size: u32,
    pub thumbnail_quality: u8,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            max_photos_per_listing: 5,
            max_photo_bytes: 10 * 1024 * 1024,
            photo_folder: "listings".to_string(),
            thumbnail_max_size: THUMBNAIL_MAX_SIZE,
            thumbnail_quality: THUMBNAIL_QUALITY,
            default_page_size: 50,
            max_page_size: 100,
        }
    }
}

impl ListingsConfig {
    pub fn development() -> Self {
        Self {
            photo_folder: "dev-listings".to_string(),
            ..Self::default()
        }
    }

    /// Request body limit for the photo upload route: every allowed photo at
    /// full size plus room for multipart framing.
    pub fn upload_body_limit(&self) -> usize {
        self.max_photos_per_listing * self.max_photo_bytes + 64 * 1024
    }

    pub fn page_size(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}
