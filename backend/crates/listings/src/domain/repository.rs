//! Repository Traits

use kernel::id::ListingId;

use crate::domain::entity::{listing::Listing, listing_photo::ListingPhoto};
use crate::error::ListingResult;

/// Catalogue query for active listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive match on title or description; `None` = no filter
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[trait_variant::make(ListingRepository: Send)]
pub trait LocalListingRepository {
    async fn create(&self, listing: &Listing) -> ListingResult<()>;

    async fn find_by_id(&self, listing_id: &ListingId) -> ListingResult<Option<Listing>>;

    /// Active listings, newest first
    async fn list_active(&self, query: &ListingQuery) -> ListingResult<Vec<Listing>>;

    /// Returns the new count
    async fn increment_view_count(&self, listing_id: &ListingId) -> ListingResult<i64>;

    /// Persist status and moderation fields
    async fn update_moderation(&self, listing: &Listing) -> ListingResult<()>;
}

#[trait_variant::make(ListingPhotoRepository: Send)]
pub trait LocalListingPhotoRepository {
    async fn count_for_listing(&self, listing_id: &ListingId) -> ListingResult<i64>;

    /// Photos of the given listings ordered by `display_order`
    async fn find_for_listings(&self, listing_ids: &[ListingId]) -> ListingResult<Vec<ListingPhoto>>;

    /// All or nothing. Fails with `TooManyPhotos` if the listing would end up
    /// with more than `max_photos`, counted under the same lock as the insert.
    async fn insert_many(
        &self,
        listing_id: &ListingId,
        photos: &[ListingPhoto],
        max_photos: usize,
    ) -> ListingResult<()>;
}

/// Everything the HTTP layer needs from a single backing store.
pub trait ListingsRepository:
    ListingRepository + ListingPhotoRepository + Clone + Send + Sync + 'static
{
}

impl<T> ListingsRepository for T where
    T: ListingRepository + ListingPhotoRepository + Clone + Send + Sync + 'static
{
}
