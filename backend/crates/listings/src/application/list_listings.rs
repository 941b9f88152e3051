//! Catalogue Use Cases
//!
//! Public catalogue search and single-listing view.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::ListingId;
use kernel::principal::Principal;

use crate::application::config::ListingsConfig;
use crate::domain::entity::{listing::Listing, listing_photo::ListingPhoto};
use crate::domain::repository::{ListingQuery, ListingsRepository};
use crate::error::{ListingError, ListingResult};

#[derive(Debug)]
pub struct ListingWithPhotos {
    pub listing: Listing,
    /// Ordered by `display_order`
    pub photos: Vec<ListingPhoto>,
}

pub struct ListListingsInput {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub struct ListListingsUseCase<R>
where
    R: ListingsRepository,
{
    repo: Arc<R>,
    config: Arc<ListingsConfig>,
}

impl<R> ListListingsUseCase<R>
where
    R: ListingsRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ListingsConfig>) -> Self {
        Self { repo, config }
    }

    /// Active listings, newest first, with their photos.
    pub async fn execute(&self, input: ListListingsInput) -> ListingResult<Vec<ListingWithPhotos>> {
        let query = ListingQuery {
            search: input
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            limit: self.config.page_size(input.limit),
            offset: input.offset.unwrap_or(0).max(0),
        };

        let listings = self.repo.list_active(&query).await?;
        let ids: Vec<ListingId> = listings.iter().map(|l| l.listing_id).collect();
        let photos = self.repo.find_for_listings(&ids).await?;

        Ok(attach_photos(listings, photos))
    }
}

pub struct GetListingUseCase<R>
where
    R: ListingsRepository,
{
    repo: Arc<R>,
}

impl<R> GetListingUseCase<R>
where
    R: ListingsRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Listings the caller may not see are reported as missing. Views by the
    /// seller are not counted.
    pub async fn execute(
        &self,
        principal: &Principal,
        listing_id: ListingId,
    ) -> ListingResult<ListingWithPhotos> {
        let mut listing = self
            .repo
            .find_by_id(&listing_id)
            .await?
            .filter(|l| l.is_visible_to(principal))
            .ok_or(ListingError::NotFound)?;

        if listing.status.is_public() && !listing.is_owned_by(&principal.user_id) {
            listing.view_count = self.repo.increment_view_count(&listing_id).await?;
        }

        let photos = self.repo.find_for_listings(&[listing_id]).await?;
        Ok(ListingWithPhotos { listing, photos })
    }
}

fn attach_photos(listings: Vec<Listing>, photos: Vec<ListingPhoto>) -> Vec<ListingWithPhotos> {
    let mut by_listing: HashMap<ListingId, Vec<ListingPhoto>> = HashMap::new();
    for photo in photos {
        by_listing.entry(photo.listing_id).or_default().push(photo);
    }

    listings
        .into_iter()
        .map(|listing| {
            let mut photos = by_listing.remove(&listing.listing_id).unwrap_or_default();
            photos.sort_by_key(|p| p.display_order);
            ListingWithPhotos { listing, photos }
        })
        .collect()
}
