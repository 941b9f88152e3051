//! Moderate Listing Use Case

use std::sync::Arc;

use kernel::id::ListingId;
use kernel::principal::Principal;

use crate::domain::entity::listing::{Listing, ModerationDecision};
use crate::domain::repository::ListingRepository;
use crate::error::{ListingError, ListingResult};

pub struct ModerateListingUseCase<R>
where
    R: ListingRepository,
{
    repo: Arc<R>,
}

impl<R> ModerateListingUseCase<R>
where
    R: ListingRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Moderators and admins only, and only with a Telegram-verified session.
    pub async fn execute(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        decision: ModerationDecision,
    ) -> ListingResult<Listing> {
        if !principal.role.can_moderate() {
            return Err(ListingError::NotModerator);
        }
        if !principal.identity_verified {
            return Err(ListingError::UnverifiedIdentity);
        }

        let mut listing = self
            .repo
            .find_by_id(&listing_id)
            .await?
            .ok_or(ListingError::NotFound)?;

        listing.moderate(decision, principal.user_id)?;
        self.repo.update_moderation(&listing).await?;

        tracing::info!(
            target: "audit",
            listing_id = %listing.listing_id,
            moderator_id = %principal.user_id,
            status = %listing.status,
            "Listing moderated"
        );

        Ok(listing)
    }
}
