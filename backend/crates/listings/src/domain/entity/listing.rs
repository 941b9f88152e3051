//! Listing Entity

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, UserId};
use kernel::principal::Principal;

use crate::domain::value_object::{
    Currency, ListingDescription, ListingStatus, ListingTitle, Price,
};

/// Longest accepted rejection reason (characters)
pub const REJECTION_REASON_MAX_LENGTH: usize = 500;

/// Optional free-form labels (e.g. "books", "like new")
pub const LABEL_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone)]
pub struct Listing {
    pub listing_id: ListingId,
    pub seller_id: UserId,
    pub title: ListingTitle,
    pub description: ListingDescription,
    pub price: Price,
    pub currency: Currency,
    pub status: ListingStatus,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub view_count: i64,
    pub moderated_by: Option<UserId>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated seller input
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: ListingTitle,
    pub description: ListingDescription,
    pub price: Price,
    pub currency: Currency,
    pub category: Option<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationDecision {
    Approve,
    Reject { reason: String },
}

impl ModerationDecision {
    pub const fn target_status(&self) -> ListingStatus {
        match self {
            Self::Approve => ListingStatus::Active,
            Self::Reject { .. } => ListingStatus::Rejected,
        }
    }
}

/// Why a moderation decision could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationError {
    Transition {
        from: ListingStatus,
        to: ListingStatus,
    },
    MissingReason,
    ReasonTooLong {
        length: usize,
    },
}

impl Listing {
    /// Listings start as `Pending` until a moderator approves them.
    pub fn new(seller_id: UserId, new: NewListing) -> Self {
        let now = Utc::now();

        Self {
            listing_id: ListingId::new(),
            seller_id,
            title: new.title,
            description: new.description,
            price: new.price,
            currency: new.currency,
            status: ListingStatus::Pending,
            category: new.category,
            condition: new.condition,
            view_count: 0,
            moderated_by: None,
            moderated_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.seller_id == *user_id
    }

    /// Active listings are public; anything else only to the seller and
    /// moderators.
    pub fn is_visible_to(&self, principal: &Principal) -> bool {
        self.status.is_public() || principal.is(&self.seller_id) || principal.role.can_moderate()
    }

    pub fn moderate(
        &mut self,
        decision: ModerationDecision,
        moderator: UserId,
    ) -> Result<(), ModerationError> {
        let to = decision.target_status();
        if !self.status.can_transition_to(to) {
            return Err(ModerationError::Transition {
                from: self.status,
                to,
            });
        }

        let reason = match decision {
            ModerationDecision::Approve => None,
            ModerationDecision::Reject { reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(ModerationError::MissingReason);
                }
                let length = reason.chars().count();
                if length > REJECTION_REASON_MAX_LENGTH {
                    return Err(ModerationError::ReasonTooLong { length });
                }
                Some(reason.to_string())
            }
        };

        let now = Utc::now();
        self.status = to;
        self.rejection_reason = reason;
        self.moderated_by = Some(moderator);
        self.moderated_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

/// Trim an optional label; blank becomes `None`.
pub fn normalize_label(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().chars().take(LABEL_MAX_LENGTH).collect::<String>())
        .filter(|v| !v.is_empty())
}
