//! API DTOs

use serde::{Deserialize, Serialize};

use crate::application::{ListingWithPhotos, UploadedPhoto};
use crate::domain::entity::listing::ModerationDecision;
use crate::domain::entity::listing_photo::ListingPhoto;

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /listings`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    #[serde(alias = "price_minor_units")]
    pub price_minor_units: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
}

/// Query of `GET /listings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListListingsQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
}

/// Body of `POST /listings/{id}/moderate`
#[derive(Debug, Clone, Deserialize)]
pub struct ModerateListingRequest {
    pub action: ModerationAction,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ModerateListingRequest {
    pub fn into_decision(self) -> ModerationDecision {
        match self.action {
            ModerationAction::Approve => ModerationDecision::Approve,
            ModerationAction::Reject => ModerationDecision::Reject {
                reason: self.reason.unwrap_or_default(),
            },
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: String,
    pub url: String,
    pub display_order: i32,
    /// Base64 JPEG
    pub thumbnail: Option<String>,
}

impl From<ListingPhoto> for PhotoResponse {
    fn from(photo: ListingPhoto) -> Self {
        Self {
            id: photo.photo_id.to_string(),
            url: photo.photo_url,
            display_order: photo.display_order,
            thumbnail: photo.thumbnail_data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub price_minor_units: i64,
    pub currency: String,
    pub status: String,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub view_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub photos: Vec<PhotoResponse>,
    /// Unix ms
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ListingWithPhotos> for ListingResponse {
    fn from(value: ListingWithPhotos) -> Self {
        let ListingWithPhotos { listing, photos } = value;
        Self {
            id: listing.listing_id.to_string(),
            seller_id: listing.seller_id.to_string(),
            title: listing.title.into(),
            description: listing.description.into(),
            price_minor_units: listing.price.minor_units(),
            currency: listing.currency.into(),
            status: listing.status.code().to_string(),
            category: listing.category,
            condition: listing.condition,
            view_count: listing.view_count,
            rejection_reason: listing.rejection_reason,
            photos: photos.into_iter().map(PhotoResponse::from).collect(),
            created_at: listing.created_at.timestamp_millis(),
            updated_at: listing.updated_at.timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoUploadResponse {
    pub url: String,
    pub thumbnail: Option<String>,
}

impl From<UploadedPhoto> for PhotoUploadResponse {
    fn from(photo: UploadedPhoto) -> Self {
        Self {
            url: photo.url,
            thumbnail: photo.thumbnail,
        }
    }
}
