//! Create Listing Use Case

use std::sync::Arc;

use kernel::principal::Principal;

use crate::domain::entity::listing::{Listing, NewListing, normalize_label};
use crate::domain::repository::ListingRepository;
use crate::domain::value_object::{Currency, ListingDescription, ListingTitle, Price};
use crate::error::ListingResult;

pub struct CreateListingInput {
    pub title: String,
    pub description: String,
    pub price_minor_units: i64,
    /// Defaults to KZT
    pub currency: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
}

pub struct CreateListingUseCase<R>
where
    R: ListingRepository,
{
    repo: Arc<R>,
}

impl<R> CreateListingUseCase<R>
where
    R: ListingRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        input: CreateListingInput,
    ) -> ListingResult<Listing> {
        let new = NewListing {
            title: ListingTitle::new(&input.title)?,
            description: ListingDescription::new(&input.description)?,
            price: Price::new(input.price_minor_units)?,
            currency: match input.currency.as_deref() {
                Some(code) => Currency::new(code)?,
                None => Currency::default(),
            },
            category: normalize_label(input.category),
            condition: normalize_label(input.condition),
        };

        let listing = Listing::new(principal.user_id, new);
        self.repo.create(&listing).await?;

        tracing::info!(
            listing_id = %listing.listing_id,
            seller_id = %listing.seller_id,
            "Listing created, awaiting moderation"
        );

        Ok(listing)
    }
}
