//! Upload Photos Use Case
//!
//! All files are validated before anything is stored. Objects already
//! uploaded are deleted again if a later step fails, so a failed request
//! leaves neither rows nor orphaned files behind.

use std::sync::Arc;

use kernel::id::ListingId;
use kernel::principal::Principal;

use crate::application::config::ListingsConfig;
use crate::domain::entity::listing_photo::ListingPhoto;
use crate::domain::photo::PhotoUpload;
use crate::domain::repository::ListingsRepository;
use crate::error::{ListingError, ListingResult};
use crate::infra::storage::PhotoStorage;
use crate::infra::thumbnail::generate_thumbnail;

#[derive(Debug)]
pub struct UploadedPhoto {
    pub url: String,
    pub thumbnail: Option<String>,
}

pub struct UploadPhotosUseCase<R>
where
    R: ListingsRepository,
{
    repo: Arc<R>,
    storage: Arc<dyn PhotoStorage>,
    config: Arc<ListingsConfig>,
}

impl<R> UploadPhotosUseCase<R>
where
    R: ListingsRepository,
{
    pub fn new(repo: Arc<R>, storage: Arc<dyn PhotoStorage>, config: Arc<ListingsConfig>) -> Self {
        Self {
            repo,
            storage,
            config,
        }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        uploads: Vec<PhotoUpload>,
    ) -> ListingResult<Vec<UploadedPhoto>> {
        if uploads.is_empty() {
            return Err(ListingError::Validation("No photos provided".to_string()));
        }

        let listing = self
            .repo
            .find_by_id(&listing_id)
            .await?
            .ok_or(ListingError::NotFound)?;
        if !listing.is_owned_by(&principal.user_id) {
            return Err(ListingError::NotOwner);
        }

        let existing = self.repo.count_for_listing(&listing_id).await?.max(0) as usize;
        let max = self.config.max_photos_per_listing;
        if existing + uploads.len() > max {
            return Err(ListingError::TooManyPhotos { existing, max });
        }

        for upload in &uploads {
            upload.validate(self.config.max_photo_bytes)?;
        }

        let mut stored: Vec<ListingPhoto> = Vec::with_capacity(uploads.len());
        for (index, upload) in uploads.into_iter().enumerate() {
            match self.store_one(listing_id, existing + index, upload).await {
                Ok(photo) => stored.push(photo),
                Err(e) => {
                    self.cleanup(&stored).await;
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.repo.insert_many(&listing_id, &stored, max).await {
            self.cleanup(&stored).await;
            return Err(e);
        }

        tracing::info!(
            listing_id = %listing_id,
            photos = stored.len(),
            backend = self.storage.name(),
            "Listing photos uploaded"
        );

        Ok(stored
            .into_iter()
            .map(|photo| UploadedPhoto {
                url: photo.photo_url,
                thumbnail: photo.thumbnail_data,
            })
            .collect())
    }

    async fn store_one(
        &self,
        listing_id: ListingId,
        display_order: usize,
        upload: PhotoUpload,
    ) -> ListingResult<ListingPhoto> {
        let upload = Arc::new(upload);

        // Decoding and resizing is CPU-bound.
        let thumbnail = {
            let upload = upload.clone();
            let max_size = self.config.thumbnail_max_size;
            let quality = self.config.thumbnail_quality;
            tokio::task::spawn_blocking(move || {
                generate_thumbnail(&upload.bytes, max_size, quality)
            })
            .await
            .map_err(|e| ListingError::Internal(format!("Thumbnail task failed: {e}")))??
        };

        let url = self
            .storage
            .upload(&upload, &self.config.photo_folder)
            .await?;

        let mut photo = ListingPhoto::new(listing_id, url, display_order as i32);
        photo.thumbnail_data = Some(thumbnail);
        photo.file_size_bytes = Some(upload.size() as i64);
        photo.original_filename = upload.filename.clone();
        Ok(photo)
    }

    async fn cleanup(&self, stored: &[ListingPhoto]) {
        for photo in stored {
            if !self.storage.delete(&photo.photo_url).await {
                tracing::warn!(url = %photo.photo_url, "Orphaned photo left in storage");
            }
        }
    }
}
